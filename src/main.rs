//! Pi Thermometer binary
//!
//! Serves the capture API, runs the periodic monitor, or takes a single reading.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use pi_thermometer::{
    monitor::{AlertConfig, AlertNotifier, EmailNotifier, Monitor},
    sensor::one_wire::{discover_devices, W1_DEVICES_DIR},
    start_web_server, AppConfig, MonitorConfig, SafeRange, ThermometerConfig, ThermometerRegistry,
    WebConfig, DEFAULT_INTERVAL_SECS, DEFAULT_SENSOR_PATH, DEFAULT_THERMOMETER_ID,
    DEFAULT_WEB_PORT,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "pi_thermometer")]
#[command(about = "One-wire thermometer monitor and capture API")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Monitors a DS18B20 sensor against a safe range and serves captured readings over HTTP")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Web server bind address
    #[arg(long, env = "THERMO_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Web server port
    #[arg(short, long, env = "THERMO_PORT", default_value_t = DEFAULT_WEB_PORT)]
    port: u16,

    /// Base URL used in resource links (defaults to the request Host header)
    #[arg(long, env = "THERMO_PUBLIC_URL")]
    public_url: Option<String>,

    /// JSON configuration file; replaces the thermometer flags below
    #[arg(short, long, env = "THERMO_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding captured readings
    #[arg(long, env = "THERMO_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Thermometer id
    #[arg(long, env = "THERMO_ID", default_value = DEFAULT_THERMOMETER_ID)]
    id: String,

    /// Path of the sensor's w1_slave report
    #[arg(long, env = "THERMO_SENSOR_PATH", default_value = DEFAULT_SENSOR_PATH)]
    sensor_path: PathBuf,

    /// Calibration offset subtracted from every reading
    #[arg(long, env = "THERMO_CALIBRATION", default_value_t = 0.0, allow_hyphen_values = true)]
    calibration: f64,

    /// Lowest safe temperature
    #[arg(long, env = "THERMO_MIN", default_value_t = 15.0, allow_hyphen_values = true)]
    min: f64,

    /// Highest safe temperature
    #[arg(long, env = "THERMO_MAX", default_value_t = 30.0, allow_hyphen_values = true)]
    max: f64,

    /// Seconds between monitor ticks
    #[arg(short, long, env = "THERMO_INTERVAL", default_value_t = DEFAULT_INTERVAL_SECS)]
    interval: u64,

    /// Use a synthetic sensor instead of the hardware
    #[arg(long, env = "THERMO_EMULATED")]
    emulated: bool,

    /// Email every monitor message (needs SMTP_HOST and SMTP_TO)
    #[arg(long, env = "THERMO_ALERT")]
    alert: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the capture API (default)
    Serve(ServeArgs),

    /// Run the periodic monitor only
    Monitor,

    /// Take one reading per thermometer and exit
    Read,

    /// List DS18B20 sensors found on the one-wire bus
    Devices(DevicesArgs),
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,

    /// Also run the periodic monitor in this process
    #[arg(long)]
    with_monitor: bool,
}

#[derive(Args)]
struct DevicesArgs {
    /// One-wire devices directory
    #[arg(long, default_value = W1_DEVICES_DIR)]
    dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    match &cli.command {
        Some(Commands::Serve(args)) => serve_command(&cli, args).await,
        Some(Commands::Monitor) => monitor_command(&cli).await,
        Some(Commands::Read) => read_command(&cli).await,
        Some(Commands::Devices(args)) => devices_command(args),
        None => serve_command(&cli, &ServeArgs::default()).await,
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing::subscriber::set_global_default(build_subscriber(cli, &directives))?;
    Ok(())
}

/// The flags pick the default level; `RUST_LOG` directives refine it.
fn build_subscriber(cli: &Cli, directives: &str) -> impl tracing::Subscriber + Send + Sync + 'static {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy(directives);

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish()
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    if let Some(path) = &cli.config {
        return AppConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()));
    }

    let safe_range = SafeRange::new(cli.min, cli.max);
    let thermometer = if cli.emulated {
        ThermometerConfig::emulated(&cli.id, (cli.min + cli.max) / 2.0, safe_range)
    } else {
        ThermometerConfig::one_wire(&cli.id, &cli.sensor_path, safe_range)
    };
    let thermometer = thermometer.with_calibration(cli.calibration);

    let config = AppConfig {
        data_dir: cli.data_dir.clone(),
        thermometers: vec![thermometer],
        monitor: MonitorConfig {
            interval_secs: cli.interval,
            alerting: cli.alert,
        },
    };
    config.validate().context("invalid command line configuration")?;
    Ok(config)
}

fn build_notifier(config: &MonitorConfig) -> anyhow::Result<Option<Arc<dyn AlertNotifier>>> {
    if !config.alerting {
        return Ok(None);
    }
    match AlertConfig::from_env() {
        Some(alert_config) => {
            info!(host = %alert_config.smtp_host, to = %alert_config.to_address, "Email alerts enabled");
            let notifier: Arc<dyn AlertNotifier> = Arc::new(
                EmailNotifier::new(alert_config).context("configuring email alerts")?,
            );
            Ok(Some(notifier))
        }
        None => {
            warn!("Alerting requested but SMTP_HOST or SMTP_TO is unset; alerts disabled");
            Ok(None)
        }
    }
}

fn spawn_monitors(
    registry: &ThermometerRegistry,
    config: &MonitorConfig,
    notifier: Option<Arc<dyn AlertNotifier>>,
    cancel: &CancellationToken,
) -> JoinSet<()> {
    let mut tasks = JoinSet::new();
    for service in registry.services() {
        let mut monitor = Monitor::new(service.clone(), config.clone());
        if let Some(notifier) = &notifier {
            monitor = monitor.with_notifier(Arc::clone(notifier));
        }
        let cancel = cancel.clone();
        tasks.spawn(async move { monitor.run(cancel).await });
    }
    tasks
}

fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested");
                cancel.cancel();
            }
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
    });
}

async fn join_all(mut tasks: JoinSet<()>) {
    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            error!("Monitor task failed: {}", e);
        }
    }
}

fn print_banner() {
    println!("Pi Thermometer");
    println!("   Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
}

async fn serve_command(cli: &Cli, args: &ServeArgs) -> anyhow::Result<()> {
    print_banner();

    let config = load_config(cli)?;
    let registry = Arc::new(ThermometerRegistry::from_config(&config)?);
    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let monitors = if args.with_monitor {
        let notifier = build_notifier(&config.monitor)?;
        Some(spawn_monitors(&registry, &config.monitor, notifier, &cancel))
    } else {
        None
    };

    let web_config = WebConfig::new(&cli.host, cli.port)
        .with_cors(!args.no_cors)
        .with_public_url(cli.public_url.clone());

    info!("Web server configuration:");
    info!("  - Bind address: {}", web_config.bind_address());
    info!("  - CORS enabled: {}", web_config.enable_cors);
    info!("  - Capture storage: {}", config.data_dir.display());
    info!("  - Thermometers: {}", registry.ids().collect::<Vec<_>>().join(", "));

    let served = start_web_server(web_config, Arc::clone(&registry), cancel.clone()).await;
    cancel.cancel();

    if let Some(monitors) = monitors {
        join_all(monitors).await;
    }

    served.context("web server failed")
}

async fn monitor_command(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let registry = ThermometerRegistry::from_config(&config)?;
    let notifier = build_notifier(&config.monitor)?;

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    join_all(spawn_monitors(&registry, &config.monitor, notifier, &cancel)).await;
    Ok(())
}

async fn read_command(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let registry = ThermometerRegistry::from_config(&config)?;

    let mut failed = false;
    for service in registry.services() {
        match service.measure().await {
            Ok(reading) => println!("{}: Temperature = {}", service.id(), reading),
            Err(e) => {
                eprintln!("{}: {}", service.id(), e);
                failed = true;
            }
        }
    }

    if failed {
        bail!("one or more thermometers could not be read");
    }
    Ok(())
}

fn devices_command(args: &DevicesArgs) -> anyhow::Result<()> {
    let devices = discover_devices(&args.dir)?;
    if devices.is_empty() {
        println!("No DS18B20 sensors found under {}", args.dir.display());
    }
    for device in devices {
        println!("{}", device.display());
    }
    Ok(())
}
