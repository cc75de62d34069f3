use {
    clap::Parser,
    resolver_verify::{args::Args, pool, UdpQueryService, VerifyConfig},
    std::sync::Arc,
    tracing::Level,
    tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(if args.quiet { Level::WARN } else { Level::INFO });

    let config = Arc::new(VerifyConfig::from_args(&args));
    let service = Arc::new(UdpQueryService::new(config.port, config.timeout));

    pool::run(config, service).await?;
    Ok(())
}

// RUST_LOG takes precedence over the default level.
fn init_tracing(level: Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
