use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

pub fn init_logging(verbosity: u8, quiet: bool) {
    // RUST_LOG wins; otherwise -q / -v pick the level.
    // HTTP client internals stay at warn unless -vv.
    let default_filter = match (quiet, verbosity) {
        (true, _) => "warn",
        (false, 0) => "info,hyper=warn,reqwest=warn",
        (false, 1) => "debug,hyper=warn,reqwest=warn",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(stderr)
        .with_target(false)
        .with_level(true)
        .compact()
        .init();
}
