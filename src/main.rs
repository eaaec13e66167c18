use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use vmatch_api::config::DEFAULT_MAX_UPLOAD_BYTES;
use vmatch_api::{ApiConfig, RestApi};
use vmatch_storage::CatalogStore;

/// Demo visual product search over a static catalog
#[derive(Parser, Debug)]
#[command(name = "vmatch")]
#[command(about = "A demo visual product search service", long_about = None)]
struct Args {
    /// Path to the product catalog (JSON array)
    #[arg(short, long, default_value = "./data/product.json")]
    catalog: PathBuf,

    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP API port
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// Allowed CORS origin, may be repeated ("*" allows any)
    #[arg(
        long = "allowed-origin",
        default_values = ["http://localhost:3000", "http://localhost:3001"]
    )]
    allowed_origins: Vec<String>,

    /// Maximum accepted upload size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn api_config(&self) -> ApiConfig {
        ApiConfig {
            host: self.host.clone(),
            port: self.port,
            allowed_origins: self.allowed_origins.clone(),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting vmatch v{}", env!("CARGO_PKG_VERSION"));
    info!("Catalog: {:?}", args.catalog);

    let store = Arc::new(CatalogStore::open(&args.catalog));
    info!("Loaded {} products", store.len());

    let config = args.api_config();
    let port = config.port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(store, config).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("Server running on http://localhost:{}", args.port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
