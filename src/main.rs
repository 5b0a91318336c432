//! Vibecap service entry point

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use vibecap::application::ports::ConfigStore;
use vibecap::application::record::{RecordSessionUseCase, RecorderSettings};
use vibecap::domain::config::AppConfig;
use vibecap::infrastructure::{
    CpalAudioInput, FileConfigStore, FsRecordingStore, HttpCollectorNotifier, IioAccelerometer,
};
use vibecap::server::{router, ApiState};

/// Vibration-gated audio capture service
#[derive(Debug, Parser)]
#[command(name = "vibecap", version, about)]
struct Cli {
    /// Path to the config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address the HTTP surface binds to
    #[arg(long, env = "VIBECAP_BIND")]
    bind: Option<String>,

    /// Base URL of the collector that receives completion pings
    #[arg(long, env = "VIBECAP_COLLECTOR_URL")]
    collector_url: Option<String>,

    /// Directory holding the recording artifact
    #[arg(long, env = "VIBECAP_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// IIO device directory for the accelerometer
    #[arg(long, env = "VIBECAP_IIO_DEVICE")]
    iio_device: Option<PathBuf>,

    /// Recording length in seconds
    #[arg(long)]
    record_secs: Option<u32>,
}

fn init_logging() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

async fn load_merged_config(cli: &Cli) -> AppConfig {
    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path.clone()),
        None => FileConfigStore::new(),
    };

    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, path = %store.path().display(), "ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    let cli_config = AppConfig {
        bind_addr: cli.bind.clone(),
        collector_url: cli.collector_url.clone(),
        storage_dir: cli
            .storage_dir
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned()),
        iio_device: cli
            .iio_device
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned()),
        record_secs: cli.record_secs,
        threshold_g: None,
        offsets: None,
    };

    AppConfig::defaults().merge(file_config).merge(cli_config)
}

fn storage_dir(config: &AppConfig) -> PathBuf {
    config
        .storage_dir
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("vibecap")
        })
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    let config = load_merged_config(&cli).await;

    // Storage must be usable before anything else; without it no
    // recording is possible.
    let dir = storage_dir(&config);
    if let Err(e) = tokio::fs::create_dir_all(&dir).await {
        error!(error = %e, dir = %dir.display(), "storage initialization failed");
        return ExitCode::FAILURE;
    }
    let store = Arc::new(FsRecordingStore::new(&dir));

    let audio = match CpalAudioInput::start() {
        Ok(input) => Arc::new(input),
        Err(e) => {
            error!(error = %e, "audio peripheral initialization failed");
            return ExitCode::FAILURE;
        }
    };

    let accelerometer = match &config.iio_device {
        Some(device) => Arc::new(IioAccelerometer::with_device(device.clone())),
        None => Arc::new(IioAccelerometer::new()),
    };
    info!(device = %accelerometer.device_dir().display(), "using IIO accelerometer");

    let collector_url = config.collector_url_or_default();
    let collector = Arc::new(HttpCollectorNotifier::new(collector_url.clone()));

    let settings = RecorderSettings {
        format: config.format_or_default(),
        offsets: config.offsets_or_default(),
        threshold_g: config.threshold_or_default(),
        ..RecorderSettings::default()
    };

    let store_port: Arc<dyn vibecap::application::ports::RecordingStore> = store.clone();
    let recorder = Arc::new(RecordSessionUseCase::new(
        accelerometer,
        audio,
        Arc::clone(&store_port),
        collector,
        settings,
    ));

    let app = router(ApiState {
        recorder,
        store: store_port,
    });

    let bind_addr = config.bind_addr_or_default();
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, addr = %bind_addr, "failed to bind HTTP listener");
            return ExitCode::FAILURE;
        }
    };

    info!(addr = %bind_addr, collector = %collector_url, "vibecap listening");
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("failed to install ctrl-c handler");
    }
}
