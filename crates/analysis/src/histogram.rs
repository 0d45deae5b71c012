use serde::Serialize;

pub const SIZE_BINS: usize = 15;
pub const PUSH_AGE_BINS: usize = 20;

/// Half-open `[lower, upper)` bucket; the last bucket also includes `upper`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over the observed range of `values`.
///
/// Non-finite values are ignored. When every value is equal the result is a
/// single bin holding all of them.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if bins == 0 || finite.is_empty() {
        return Vec::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();
    for value in finite {
        let slot = (((value - min) / width).floor() as usize).min(bins - 1);
        out[slot].count += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_cover_every_value() {
        let values = [0.0, 0.5, 1.0, 2.5, 9.9, 10.0];
        let bins = histogram(&values, 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins[1].count, 1);
        assert_eq!(bins[4].count, 2);
        assert_eq!(bins[4].upper, 10.0);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(histogram(&[], 4).is_empty());
        assert!(histogram(&[1.0, 2.0], 0).is_empty());
        let single = histogram(&[3.0, 3.0, 3.0, f64::NAN], 10);
        assert_eq!(
            single,
            vec![HistogramBin {
                lower: 3.0,
                upper: 3.0,
                count: 3
            }]
        );
    }
}
