use tracing_subscriber::{fmt, EnvFilter};

/// HTTP plumbing is chatty at debug; keep it at warn unless RUST_LOG says otherwise.
const QUIET_TARGETS: &[&str] = &["hyper=warn", "reqwest=warn", "rustls=warn"];

pub fn init_logging(default_level: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(default_level)));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn default_directives(level: &str) -> String {
    let mut directives = vec![level.trim().to_string()];
    directives.extend(QUIET_TARGETS.iter().map(|d| d.to_string()));
    directives.join(",")
}
