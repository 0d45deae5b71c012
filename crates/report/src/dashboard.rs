//! Static SVG dashboard.
//!
//! Purely presentational: every figure drawn here comes from [`ReportViews`].

use std::f64::consts::TAU;

use analysis::HistogramBin;
use normalizer::NormalizedRepository;

use crate::views::ReportViews;

const WIDTH: f64 = 2000.0;
const HEIGHT: f64 = 1500.0;

const BG: &str = "#0d1117";
const PANEL: &str = "#161b22";
const CARD: &str = "#21262d";
const BORDER: &str = "#30363d";
const TEXT: &str = "#c9d1d9";
const TEXT_MUTED: &str = "#8b949e";
const BLUE: &str = "#58a6ff";
const GREEN: &str = "#3fb950";
const YELLOW: &str = "#e3b341";
const PURPLE: &str = "#a371f7";
const ORANGE: &str = "#f0883e";
const PINK: &str = "#db61a2";

const LANGUAGE_COLORS: [&str; 8] = [
    BLUE, GREEN, PURPLE, ORANGE, YELLOW, PINK, "#bc4c00", "#8957e5",
];
const BAR_COLORS: [&str; 5] = [GREEN, BLUE, PURPLE, ORANGE, PINK];

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl Rect {
    const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Plot area inside a titled panel.
    fn inner(&self) -> Rect {
        Rect::new(self.x + 70.0, self.y + 60.0, self.w - 100.0, self.h - 110.0)
    }
}

struct Bar<'a> {
    label: &'a str,
    href: Option<&'a str>,
    value: f64,
    caption: String,
}

pub fn render_dashboard(views: &ReportViews<'_>, title: &str) -> String {
    let mut svg = String::with_capacity(32 * 1024);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
    ));
    svg.push('\n');
    svg.push_str(&format!(
        r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="{BG}"/>"#
    ));
    svg.push('\n');
    text(
        &mut svg,
        WIDTH / 2.0,
        70.0,
        title,
        44.0,
        TEXT,
        "middle",
        true,
    );

    let summary = &views.summary;
    let kpis = [
        (summary.total_repos.to_string(), "TOTAL REPOS", BLUE),
        (summary.active_repos.to_string(), "ACTIVE", GREEN),
        (summary.total_stars.to_string(), "STARS", YELLOW),
        (summary.distinct_languages.to_string(), "LANGUAGES", PURPLE),
    ];
    let card_w = (WIDTH - 100.0 - 3.0 * 40.0) / 4.0;
    for (i, (value, label, color)) in kpis.iter().enumerate() {
        let rect = Rect::new(50.0 + i as f64 * (card_w + 40.0), 110.0, card_w, 150.0);
        kpi_card(&mut svg, rect, value, label, color);
    }

    timeline(&mut svg, Rect::new(50.0, 290.0, WIDTH - 100.0, 260.0), views);
    language_donut(&mut svg, Rect::new(50.0, 580.0, 930.0, 500.0), views);

    let recent: Vec<Bar<'_>> = views
        .recent
        .iter()
        .map(|repo| {
            let days = repo.days_since_last_push;
            bar_for(repo, days as f64, format!("{days}d"))
        })
        .collect();
    bar_panel(
        &mut svg,
        Rect::new(1020.0, 580.0, 930.0, 240.0),
        "Most Recently Updated",
        "Days Ago",
        &recent,
    );

    histogram_panel(
        &mut svg,
        Rect::new(1020.0, 840.0, 450.0, 240.0),
        "Size Distribution",
        "Size (MB)",
        &views.size_mb,
        PURPLE,
    );
    histogram_panel(
        &mut svg,
        Rect::new(1500.0, 840.0, 450.0, 240.0),
        "Days Since Push",
        "Days",
        &views.push_age_days,
        ORANGE,
    );

    let starred: Vec<Bar<'_>> = views
        .top_starred
        .iter()
        .map(|repo| {
            let stars = repo.stargazer_count;
            bar_for(repo, stars as f64, format!("{stars} stars"))
        })
        .collect();
    bar_panel(
        &mut svg,
        Rect::new(50.0, 1110.0, WIDTH - 100.0, 340.0),
        "Top Repositories by Stars",
        "Stars",
        &starred,
    );

    svg.push_str("</svg>\n");
    svg
}

fn bar_for(repo: &NormalizedRepository, value: f64, caption: String) -> Bar<'_> {
    Bar {
        label: &repo.name,
        href: repo.html_url.as_deref(),
        value,
        caption,
    }
}

fn kpi_card(svg: &mut String, rect: Rect, value: &str, label: &str, color: &str) {
    svg.push_str(&format!(
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="16" fill="{CARD}" stroke="{color}" stroke-width="2.5"/>"#,
        rect.x, rect.y, rect.w, rect.h
    ));
    svg.push('\n');
    let cx = rect.x + rect.w / 2.0;
    text(svg, cx, rect.y + rect.h * 0.5, value, 48.0, color, "middle", true);
    text(svg, cx, rect.y + rect.h * 0.8, label, 16.0, TEXT_MUTED, "middle", true);
}

fn panel(svg: &mut String, rect: Rect, title: &str) {
    svg.push_str(&format!(
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="8" fill="{PANEL}" stroke="{BORDER}"/>"#,
        rect.x, rect.y, rect.w, rect.h
    ));
    svg.push('\n');
    text(svg, rect.x + rect.w / 2.0, rect.y + 34.0, title, 20.0, TEXT, "middle", true);
}

fn no_data(svg: &mut String, rect: Rect) {
    text(
        svg,
        rect.x + rect.w / 2.0,
        rect.y + rect.h / 2.0,
        "No data",
        16.0,
        TEXT_MUTED,
        "middle",
        false,
    );
}

fn timeline(svg: &mut String, rect: Rect, views: &ReportViews<'_>) {
    panel(svg, rect, "Repository Growth Timeline");
    let plot = rect.inner();
    let (Some(first), Some(last)) = (views.per_year.first(), views.per_year.last()) else {
        no_data(svg, plot);
        return;
    };
    let max_count = views.per_year.iter().map(|y| y.count).max().unwrap_or(1).max(1) as f64;
    let span = f64::from(last.year - first.year);
    let x_of = |year: i32| {
        if span == 0.0 {
            plot.x + plot.w / 2.0
        } else {
            plot.x + f64::from(year - first.year) / span * plot.w
        }
    };
    let y_of = |count: usize| plot.y + plot.h - count as f64 / max_count * plot.h;

    axes(svg, plot);
    for tick in y_ticks(max_count as usize) {
        let y = y_of(tick);
        grid_line(svg, plot.x, y, plot.x + plot.w, y);
        text(svg, plot.x - 10.0, y + 4.0, &tick.to_string(), 12.0, TEXT, "end", false);
    }

    let points: Vec<(f64, f64)> = views
        .per_year
        .iter()
        .map(|entry| (x_of(entry.year), y_of(entry.count)))
        .collect();
    let line = points
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect::<Vec<_>>()
        .join(" ");
    let base = plot.y + plot.h;
    if let (Some(start), Some(end)) = (points.first(), points.last()) {
        svg.push_str(&format!(
            r#"<polygon points="{:.1},{base:.1} {line} {:.1},{base:.1}" fill="{BLUE}" fill-opacity="0.2"/>"#,
            start.0, end.0
        ));
        svg.push('\n');
    }
    svg.push_str(&format!(
        r#"<polyline points="{line}" fill="none" stroke="{BLUE}" stroke-width="3.5"/>"#
    ));
    svg.push('\n');
    for (entry, (x, y)) in views.per_year.iter().zip(&points) {
        svg.push_str(&format!(
            r#"<circle cx="{x:.1}" cy="{y:.1}" r="7" fill="{BLUE}" stroke="{BG}" stroke-width="2"/>"#
        ));
        svg.push('\n');
        text(svg, *x, base + 20.0, &entry.year.to_string(), 12.0, TEXT, "middle", false);
    }
    text(svg, plot.x + plot.w / 2.0, base + 42.0, "Year", 13.0, TEXT, "middle", true);
}

fn language_donut(svg: &mut String, rect: Rect, views: &ReportViews<'_>) {
    panel(svg, rect, "Language Distribution");
    let total: usize = views.languages.iter().map(|l| l.count).sum();
    if total == 0 {
        no_data(svg, rect.inner());
        return;
    }
    let cx = rect.x + rect.w * 0.4;
    let cy = rect.y + rect.h / 2.0 + 20.0;
    let outer = (rect.h - 120.0) / 2.0;
    let inner = outer * 0.5;

    let mut start = 0.0;
    for (i, language) in views.languages.iter().enumerate() {
        let color = LANGUAGE_COLORS[i % LANGUAGE_COLORS.len()];
        let fraction = language.count as f64 / total as f64;
        let end = start + fraction * TAU;
        if views.languages.len() == 1 {
            let mid = (outer + inner) / 2.0;
            svg.push_str(&format!(
                r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{mid:.1}" fill="none" stroke="{color}" stroke-width="{:.1}"/>"#,
                outer - inner
            ));
        } else {
            svg.push_str(&format!(
                r#"<path d="{}" fill="{color}" stroke="{BG}" stroke-width="2"/>"#,
                donut_segment(cx, cy, outer, inner, start, end)
            ));
        }
        svg.push('\n');

        let mid_angle = (start + end) / 2.0;
        let (lx, ly) = polar(cx, cy, (outer + inner) / 2.0, mid_angle);
        text(
            svg,
            lx,
            ly + 4.0,
            &format!("{:.1}%", fraction * 100.0),
            12.0,
            BG,
            "middle",
            true,
        );

        let legend_y = rect.y + 90.0 + i as f64 * 40.0;
        let legend_x = rect.x + rect.w * 0.75;
        svg.push_str(&format!(
            r#"<rect x="{legend_x:.1}" y="{:.1}" width="18" height="18" rx="3" fill="{color}"/>"#,
            legend_y - 14.0
        ));
        svg.push('\n');
        text(
            svg,
            legend_x + 28.0,
            legend_y,
            &format!("{} ({})", language.language, language.count),
            14.0,
            TEXT,
            "start",
            true,
        );
        start = end;
    }
}

fn donut_segment(cx: f64, cy: f64, outer: f64, inner: f64, start: f64, end: f64) -> String {
    let large = if end - start > TAU / 2.0 { 1 } else { 0 };
    let (ox0, oy0) = polar(cx, cy, outer, start);
    let (ox1, oy1) = polar(cx, cy, outer, end);
    let (ix1, iy1) = polar(cx, cy, inner, end);
    let (ix0, iy0) = polar(cx, cy, inner, start);
    format!(
        "M {ox0:.2} {oy0:.2} A {outer:.2} {outer:.2} 0 {large} 1 {ox1:.2} {oy1:.2} \
         L {ix1:.2} {iy1:.2} A {inner:.2} {inner:.2} 0 {large} 0 {ix0:.2} {iy0:.2} Z"
    )
}

/// Angle measured clockwise from twelve o'clock.
fn polar(cx: f64, cy: f64, radius: f64, angle: f64) -> (f64, f64) {
    (cx + radius * angle.sin(), cy - radius * angle.cos())
}

fn bar_panel(svg: &mut String, rect: Rect, title: &str, axis_label: &str, bars: &[Bar<'_>]) {
    panel(svg, rect, title);
    let plot = Rect::new(rect.x + 220.0, rect.y + 55.0, rect.w - 340.0, rect.h - 95.0);
    if bars.is_empty() {
        no_data(svg, plot);
        return;
    }
    let max = bars.iter().map(|b| b.value).fold(0.0, f64::max).max(1.0);
    let slot = plot.h / bars.len() as f64;
    let thickness = (slot * 0.7).min(40.0);
    for (i, bar) in bars.iter().enumerate() {
        let color = BAR_COLORS[i % BAR_COLORS.len()];
        let y = plot.y + i as f64 * slot + (slot - thickness) / 2.0;
        let width = (bar.value / max * plot.w).max(2.0);
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{y:.1}" width="{width:.1}" height="{thickness:.1}" fill="{color}" stroke="{BG}" stroke-width="2"/>"#,
            plot.x
        ));
        svg.push('\n');
        let label_y = y + thickness / 2.0 + 5.0;
        let label = truncate_label(bar.label, 26);
        match bar.href {
            Some(href) => {
                svg.push_str(&format!(r#"<a href="{0}" xlink:href="{0}">"#, escape_xml(href)));
                text(svg, plot.x - 12.0, label_y, &label, 13.0, BLUE, "end", false);
                svg.push_str("</a>\n");
            }
            None => text(svg, plot.x - 12.0, label_y, &label, 13.0, TEXT, "end", false),
        }
        text(svg, plot.x + width + 8.0, label_y, &bar.caption, 12.0, TEXT, "start", true);
    }
    text(
        svg,
        plot.x + plot.w / 2.0,
        rect.y + rect.h - 12.0,
        axis_label,
        13.0,
        TEXT,
        "middle",
        true,
    );
}

fn histogram_panel(
    svg: &mut String,
    rect: Rect,
    title: &str,
    axis_label: &str,
    bins: &[HistogramBin],
    color: &str,
) {
    panel(svg, rect, title);
    let plot = rect.inner();
    if bins.is_empty() {
        no_data(svg, plot);
        return;
    }
    axes(svg, plot);
    let max = bins.iter().map(|b| b.count).max().unwrap_or(1).max(1) as f64;
    let slot = plot.w / bins.len() as f64;
    for (i, bin) in bins.iter().enumerate() {
        let height = bin.count as f64 / max * plot.h;
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{slot:.1}" height="{height:.1}" fill="{color}" fill-opacity="0.8" stroke="{BG}" stroke-width="1.5"/>"#,
            plot.x + i as f64 * slot,
            plot.y + plot.h - height
        ));
        svg.push('\n');
    }
    let base = plot.y + plot.h;
    if let (Some(first), Some(last)) = (bins.first(), bins.last()) {
        let (lower, upper) = (format_tick(first.lower), format_tick(last.upper));
        text(svg, plot.x, base + 18.0, &lower, 11.0, TEXT, "middle", false);
        text(svg, plot.x + plot.w, base + 18.0, &upper, 11.0, TEXT, "middle", false);
    }
    text(svg, plot.x - 8.0, plot.y + 4.0, &(max as usize).to_string(), 11.0, TEXT, "end", false);
    text(svg, plot.x + plot.w / 2.0, base + 36.0, axis_label, 13.0, TEXT, "middle", true);
}

fn axes(svg: &mut String, plot: Rect) {
    let base = plot.y + plot.h;
    svg.push_str(&format!(
        r#"<path d="M {:.1} {:.1} L {:.1} {base:.1} L {:.1} {base:.1}" fill="none" stroke="{BORDER}"/>"#,
        plot.x,
        plot.y,
        plot.x,
        plot.x + plot.w
    ));
    svg.push('\n');
}

fn grid_line(svg: &mut String, x1: f64, y1: f64, x2: f64, y2: f64) {
    svg.push_str(&format!(
        r#"<line x1="{x1:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y2:.1}" stroke="{BORDER}" stroke-opacity="0.6" stroke-dasharray="6 4"/>"#
    ));
    svg.push('\n');
}

/// At most six evenly spaced integer ticks from zero to `max`.
fn y_ticks(max: usize) -> Vec<usize> {
    let step = max.div_ceil(5).max(1);
    (0..=max).step_by(step).collect()
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let head: String = label.chars().take(max_chars - 1).collect();
        format!("{head}…")
    }
}

#[allow(clippy::too_many_arguments)]
fn text(
    svg: &mut String,
    x: f64,
    y: f64,
    content: &str,
    size: f64,
    color: &str,
    anchor: &str,
    bold: bool,
) {
    let weight = if bold { "bold" } else { "normal" };
    svg.push_str(&format!(
        r#"<text x="{x:.1}" y="{y:.1}" font-size="{size}" fill="{color}" text-anchor="{anchor}" font-weight="{weight}">{}</text>"#,
        escape_xml(content)
    ));
    svg.push('\n');
}

pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
