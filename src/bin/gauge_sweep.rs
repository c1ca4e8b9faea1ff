use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use gaugeclock::config::Interval;
use gaugeclock::constants::DEFAULT_CYCLE_INTERVAL_MS;
use gaugeclock::frame::{
    GaugeFrame, encode_fuel, encode_rpm, encode_speed, encode_temperature, warning_suppression,
};
use gaugeclock::output::{OutputFormat, create_formatter};
use gaugeclock::transport::{FrameSink, PrintSink, open_bus};

/// Stepper positions the fuel gauge settles on.
const FUEL_STEPS: [u32; 5] = [4, 8, 16, 32, 64];

#[derive(Parser, Debug)]
#[command(name = "gauge_sweep")]
#[command(about = "Step one gauge through raw values to calibrate the cluster", long_about = None)]
struct Args {
    /// Gauge to sweep
    #[arg(value_enum)]
    gauge: Gauge,

    /// First raw value (defaults to the gauge's lowest)
    #[arg(long)]
    from: Option<u32>,

    /// Last raw value, inclusive (defaults to the gauge's highest)
    #[arg(long)]
    to: Option<u32>,

    /// Increment between values
    #[arg(long, default_value_t = 1)]
    step: u32,

    /// How long to hold each value
    #[arg(long, default_value = "500ms")]
    dwell: Interval,

    /// SocketCAN interface
    #[arg(short = 'i', long, default_value = "can0")]
    interface: String,

    /// Print frames to stdout instead of writing to the bus
    #[arg(long)]
    dry_run: bool,

    /// Dry-run output format: candump, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "candump")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Gauge {
    Speed,
    Rpm,
    Temperature,
    Fuel,
}

impl Gauge {
    fn default_range(self) -> (u32, u32) {
        match self {
            Gauge::Speed => (0, 98),
            Gauge::Rpm => (0, 40),
            Gauge::Temperature => (90, 255),
            Gauge::Fuel => (4, 64),
        }
    }

    fn frame(self, value: u32) -> Result<GaugeFrame> {
        Ok(match self {
            Gauge::Speed => encode_speed(u16::try_from(value).context("speed exceeds 16 bits")?),
            Gauge::Rpm => encode_rpm(value),
            Gauge::Temperature => {
                encode_temperature(u8::try_from(value).context("temperature exceeds 8 bits")?)
            }
            Gauge::Fuel => encode_fuel(u8::try_from(value).context("fuel exceeds 8 bits")?),
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if args.step == 0 {
        anyhow::bail!("--step must be positive");
    }

    let mut values = sweep_values(&args).peekable();
    if values.peek().is_none() {
        anyhow::bail!("empty sweep range");
    }

    let mut sink: Box<dyn FrameSink> = if args.dry_run {
        Box::new(PrintSink::new(
            args.interface.clone(),
            create_formatter(args.format, false),
        ))
    } else {
        open_bus(&args.interface)
            .with_context(|| format!("opening CAN interface {}", args.interface))?
    };

    let cycle = Interval::from_millis(DEFAULT_CYCLE_INTERVAL_MS).as_duration();
    let dwell = args.dwell.as_duration();

    for value in values {
        log::info!("{:?}: {}", args.gauge, value);
        let frame = args.gauge.frame(value)?;

        let until = Instant::now() + dwell;
        while Instant::now() < until {
            for f in [frame, warning_suppression()] {
                if let Err(e) = sink.send(&f) {
                    log::warn!("Failed to send {}: {}", f, e);
                }
            }
            thread::sleep(cycle);
        }
    }

    Ok(())
}

fn sweep_values(args: &Args) -> Box<dyn Iterator<Item = u32>> {
    if matches!(args.gauge, Gauge::Fuel) && args.from.is_none() && args.to.is_none() {
        return Box::new(FUEL_STEPS.into_iter());
    }

    let (low, high) = args.gauge.default_range();
    let from = args.from.unwrap_or(low);
    let to = args.to.unwrap_or(high);
    Box::new((from..=to).step_by(args.step as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("gauge_sweep").chain(argv.iter().copied()))
    }

    #[test]
    fn test_default_fuel_sweep_uses_stepper_marks() {
        let values: Vec<u32> = sweep_values(&args(&["fuel"])).collect();
        assert_eq!(values, FUEL_STEPS);
    }

    #[test]
    fn test_sweep_honors_range_and_step() {
        let values: Vec<u32> =
            sweep_values(&args(&["speed", "--from", "10", "--to", "20", "--step", "5"])).collect();
        assert_eq!(values, [10, 15, 20]);
    }

    #[test]
    fn test_huge_range_is_produced_lazily() {
        let mut values = sweep_values(&args(&["rpm", "--to", "4294967295"]));
        assert_eq!(values.next(), Some(0));
        assert_eq!(values.nth(1_000), Some(1_001));
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let mut values = sweep_values(&args(&["speed", "--from", "50", "--to", "10"])).peekable();
        assert!(values.peek().is_none());
    }
}
