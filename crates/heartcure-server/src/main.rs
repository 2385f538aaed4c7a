//! HeartCure
//!
//! Serves diabetes, heart disease and Parkinson's predictions from models
//! loaded once at startup.

use anyhow::Result;
use clap::Parser;
use heartcure_classifiers::config::executable_dir;
use heartcure_core::{descriptors, Workflow};
use heartcure_server::{
    create_router, load_dispatcher, presenter, run_predict, AppState, Cli, Commands, ServerConfig,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::process::ExitCode;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    let config = ServerConfig::load(&cli.config, &cli)?;

    match &cli.command {
        Commands::Serve { listen, port } => {
            let mut config = config;
            if let Some(listen) = listen {
                config.listen = listen.clone();
            }
            if let Some(port) = port {
                config.port = *port;
            }
            serve(config).await?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Predict {
            workflow,
            values,
            ordered,
        } => Ok(predict_once(&config, *workflow, values, ordered.as_deref())?),

        Commands::Workflows => {
            for descriptor in descriptors() {
                println!("{}", presenter::render_workflow(descriptor));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn serve(config: ServerConfig) -> Result<()> {
    info!("Starting HeartCure");

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    // Models must all load before anything is served
    let dispatcher = load_dispatcher(&config, &executable_dir()?)?;
    let state = AppState::new(dispatcher, metrics_handle);

    let addr: SocketAddr = config.bind_address().parse()?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn predict_once(
    config: &ServerConfig,
    workflow: Workflow,
    values: &[(String, String)],
    ordered: Option<&[String]>,
) -> Result<ExitCode> {
    let dispatcher = load_dispatcher(config, &executable_dir()?)?;

    let succeeded = run_predict(
        &dispatcher,
        workflow,
        values,
        ordered,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )?;

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("heartcure=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("heartcure=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "heartcure_requests_total",
        "Total number of prediction requests received"
    );
    metrics::describe_counter!(
        "heartcure_predictions_total",
        "Completed predictions by workflow and outcome"
    );
    metrics::describe_counter!(
        "heartcure_prediction_errors_total",
        "Rejected or failed predictions by workflow and error kind"
    );
    metrics::describe_histogram!(
        "heartcure_inference_latency_us",
        metrics::Unit::Microseconds,
        "Classifier inference latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
