//! # Quote Server
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Open the database and run the bootstrap script
//! - Create the quote service
//! - Start the HTTP server

mod config;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exchange_rates::AwesomeApiProvider;
use quotes_hex::{QuoteService, inbound::HttpServer};
use quotes_repo::build_repo;

#[cfg(feature = "otel")]
mod telemetry {
    use opentelemetry::global;
    use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};

    pub fn init_tracer() -> (sdktrace::Tracer, sdktrace::SdkTracerProvider) {
        global::set_text_map_propagator(TraceContextPropagator::new());

        // Use gRPC exporter with batch processing (non-blocking)
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .build()
            .expect("failed to create OTLP span exporter");

        let provider = sdktrace::SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .build();

        global::set_tracer_provider(provider.clone());

        use opentelemetry::trace::TracerProvider as _;
        (provider.tracer("quote-server"), provider)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,quotes_app=debug,quotes_hex=debug".into());
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer());

    #[cfg(feature = "otel")]
    let otel_provider = {
        let (otel_tracer, otel_provider) = telemetry::init_tracer();
        registry
            .with(tracing_opentelemetry::layer().with_tracer(otel_tracer))
            .init();
        otel_provider
    };
    #[cfg(not(feature = "otel"))]
    registry.init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting quote server on port {}", config.port);
    tracing::info!("Using database: {}", config.database_url);
    tracing::info!(
        upstream = %config.upstream_url,
        pair = %config.upstream_pair,
        timings = ?config.timings,
        request_timeout = ?config.request_timeout,
        "Request settings"
    );

    // Schema bootstrap failure is fatal to startup
    let repo = build_repo(&config.database_url).await?;

    let provider = AwesomeApiProvider::new(config.upstream_url, config.upstream_pair);
    let service = QuoteService::new(provider, repo).with_timings(config.timings);

    let server = HttpServer::with_request_timeout(service, config.request_timeout);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    #[cfg(feature = "otel")]
    let _ = otel_provider.shutdown();
    Ok(())
}
