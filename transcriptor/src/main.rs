use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transcriptor::api::{create_router, AppState};
use transcriptor::config::{Config, LogFormat, LoggingConfig};
use transcriptor::models::Language;
use transcriptor::ocr::{OcrEngine, OcrProvider, TesseractEngine, ENGINE_REMEDIATION};
use transcriptor::session::SessionSweeper;

#[derive(Parser)]
#[command(name = "transcriptor")]
#[command(about = "Extract, edit and download the text in an image")]
struct Args {
    /// Address to bind (overrides TRANSCRIPTOR_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides TRANSCRIPTOR_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Check that Tesseract and every language model load, then exit
    #[arg(long)]
    check_engine: bool,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "transcriptor=info,tower_http=debug".into());

    let (text, json) = match logging.format {
        LogFormat::Text => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .init();
}

fn check_engine(config: &Config) -> anyhow::Result<()> {
    let engine = TesseractEngine::new(config.ocr.data_path.clone());
    let mut loaded = 0;

    for language in Language::ALL {
        match engine.probe(language.code()) {
            Ok(()) => {
                loaded += 1;
                tracing::info!("{} ({}): ok", language, language.code());
            }
            Err(e) => tracing::error!("{} ({}): {}", language, language.code(), e),
        }
    }

    if loaded == 0 {
        return Err(anyhow::anyhow!("No OCR language could be loaded. {ENGINE_REMEDIATION}"));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    init_tracing(&LoggingConfig::from_env());

    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if args.check_engine {
        return check_engine(&config);
    }

    tracing::info!("Initializing OCR engine...");
    let ocr = OcrProvider::new(&config.ocr);
    if !ocr.is_available() {
        tracing::warn!("OCR unavailable - the page will explain how to install it");
    }

    let state = AppState::new(config.clone(), ocr);

    let cancel_token = CancellationToken::new();

    tracing::info!(
        "Starting session sweeper... (idle_timeout={}s, interval={}s)",
        config.session.idle_timeout_secs,
        config.session.sweep_interval_secs
    );
    let sweeper = SessionSweeper::new(state.sessions.clone(), config.session.sweep_interval_secs);
    let token = cancel_token.child_token();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!("Session sweeper shutting down...");
                    break;
                }
                _ = tokio::time::sleep(tokio::time::Duration::from_secs(sweeper.interval_secs())) => {
                    sweeper.run_once();
                }
            }
        }
    });

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Transcriptor starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token))
        .await?;

    Ok(())
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping background tasks...");
    cancel_token.cancel();
}
