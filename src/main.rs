use anyhow::{Context, Result};
use clap::Parser;

use gaugeclock::config::{ClusterConfig, Interval};
use gaugeclock::output::{OutputFormat, create_formatter};
use gaugeclock::source::{
    DataSourceRefresher, TideClient, WeatherClient, temperature_source, tide_source,
};
use gaugeclock::transport::{FrameSink, PrintSink, open_bus};
use gaugeclock::{ControlLoop, SystemClock};

#[derive(Parser, Debug)]
#[command(name = "gaugeclock")]
#[command(about = "Show time, temperature and tide on an instrument cluster over CAN", long_about = None)]
struct Args {
    /// SocketCAN interface
    #[arg(short = 'i', long, default_value = "can0")]
    interface: String,

    /// US zip code for the outdoor temperature
    #[arg(short = 'z', long, default_value = "33129")]
    zip: String,

    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    api_key: String,

    /// NOAA CO-OPS tide station ID
    #[arg(long, default_value = "8723214")]
    station: String,

    /// Pause between frame bursts (at most 100ms)
    #[arg(long, default_value = "70ms")]
    cycle: Interval,

    /// Time between temperature fetches
    #[arg(long, default_value = "30m")]
    weather_refresh: Interval,

    /// Minimum time between tide fetch attempts
    #[arg(long, default_value = "15m")]
    tide_retry: Interval,

    /// Warn when a source's last good value is older than this
    #[arg(long, default_value = "2h")]
    stale_warning: Interval,

    /// HTTP request timeout
    #[arg(long, default_value = "10s")]
    timeout: Interval,

    /// Print frames to stdout instead of writing to the bus
    #[arg(long)]
    dry_run: bool,

    /// Dry-run output format: candump, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "candump")]
    format: OutputFormat,

    /// Prefix dry-run candump lines with a timestamp
    #[arg(short = 't', long)]
    timestamps: bool,

    /// Stop after this many cycles
    #[arg(long)]
    cycles: Option<u64>,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = build_config(&args);
    config.validate().context("invalid configuration")?;

    log::info!("=== gaugeclock ===");
    log::info!("Interface: {}", config.bus.interface);
    log::info!(
        "Weather: zip {} every {}",
        config.weather.zip_code,
        config.weather.refresh_interval
    );
    log::info!(
        "Tide: station {}, retry every {}",
        config.tide.station,
        config.tide.retry_interval
    );
    log::info!("Cycle: {}", config.cycle.interval);

    let sink: Box<dyn FrameSink> = if args.dry_run {
        Box::new(PrintSink::new(
            config.bus.interface.clone(),
            create_formatter(args.format, args.timestamps),
        ))
    } else {
        open_bus(&config.bus.interface)
            .with_context(|| format!("opening CAN interface {}", config.bus.interface))?
    };

    let weather = WeatherClient::new(&config.weather).context("creating weather client")?;
    let tides = TideClient::new(&config.tide).context("creating tide client")?;

    let mut control = ControlLoop::new(
        &config,
        DataSourceRefresher::new(temperature_source(&config.weather), weather),
        DataSourceRefresher::new(tide_source(&config.tide), tides),
        sink,
        SystemClock,
    );
    control.run();

    Ok(())
}

fn build_config(args: &Args) -> ClusterConfig {
    let mut config = ClusterConfig::default();
    config.bus.interface = args.interface.clone();

    config.weather.zip_code = args.zip.clone();
    config.weather.api_key = args.api_key.clone();
    config.weather.refresh_interval = args.weather_refresh;
    config.weather.timeout = args.timeout;

    config.tide.station = args.station.clone();
    config.tide.retry_interval = args.tide_retry;
    config.tide.timeout = args.timeout;

    config.cycle.interval = args.cycle;
    config.cycle.max_cycles = args.cycles;
    config.cycle.stale_warning = Some(args.stale_warning);
    config
}
