use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("draftsmith=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    draftsmith::app::cli::run();
}
