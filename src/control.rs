//! The fixed-period cycle that turns clock and fetched values into frames.

use chrono::{Local, NaiveDateTime, TimeDelta};

use crate::config::{ClusterConfig, LoopConfig};
use crate::frame::{
    GaugeFrame, encode_fuel, encode_rpm, encode_speed, encode_temperature, warning_suppression,
};
use crate::mapping::{
    ClockReading, MappingRange, map_clock_to_rpm, map_clock_to_speed, map_tide_to_fuel_position,
    map_to_gauge_range,
};
use crate::source::{DataSourceRefresher, ExternalSource, Fetch, tide_percentage};
use crate::transport::FrameSink;

/// Source of wall-clock time, local and naive like the tide predictions
/// (station local time, daylight saving applied).
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Gauge-native values for one cycle. A fetched gauge is `None` while its
/// source has never produced a value, and its frame is skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeReadings {
    pub speed: u16,
    pub rpm: u32,
    pub temperature: Option<u8>,
    pub tide_percent: Option<f64>,
    pub fuel: Option<u8>,
}

impl GaugeReadings {
    pub fn derive(
        now: NaiveDateTime,
        temperature_f: Option<f64>,
        next_high_tide: Option<NaiveDateTime>,
        temperature_range: &MappingRange,
    ) -> Self {
        let clock = ClockReading::from_time(&now);
        let tide_percent = next_high_tide.map(|next_high| tide_percentage(next_high, now));

        Self {
            speed: map_clock_to_speed(clock.hour12, clock.minute_fraction),
            rpm: map_clock_to_rpm(clock.minute, clock.second),
            temperature: temperature_f.map(|t| map_to_gauge_range(t, temperature_range)),
            tide_percent,
            fuel: tide_percent.map(map_tide_to_fuel_position),
        }
    }

    /// Frames in bus order: speed, rpm, temperature, fuel, warning lamps.
    pub fn frames(&self) -> Vec<GaugeFrame> {
        let mut frames = Vec::with_capacity(5);
        frames.push(encode_speed(self.speed));
        frames.push(encode_rpm(self.rpm));
        if let Some(temperature) = self.temperature {
            frames.push(encode_temperature(temperature));
        }
        if let Some(fuel) = self.fuel {
            frames.push(encode_fuel(fuel));
        }
        frames.push(warning_suppression());
        frames
    }
}

/// Result of one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub readings: GaugeReadings,
    pub sent: usize,
    pub failed: usize,
}

pub struct ControlLoop<W, T, S, C = SystemClock> {
    temperature: DataSourceRefresher<f64, W>,
    tide: DataSourceRefresher<NaiveDateTime, T>,
    sink: S,
    clock: C,
    temperature_range: MappingRange,
    cycle: LoopConfig,
    temperature_stale_warned: bool,
    tide_stale_warned: bool,
}

impl<W, T, S, C> ControlLoop<W, T, S, C>
where
    W: Fetch<f64>,
    T: Fetch<NaiveDateTime>,
    S: FrameSink,
    C: Clock,
{
    pub fn new(
        config: &ClusterConfig,
        temperature: DataSourceRefresher<f64, W>,
        tide: DataSourceRefresher<NaiveDateTime, T>,
        sink: S,
        clock: C,
    ) -> Self {
        Self {
            temperature,
            tide,
            sink,
            clock,
            temperature_range: config.gauges.temperature,
            cycle: config.cycle.clone(),
            temperature_stale_warned: false,
            tide_stale_warned: false,
        }
    }

    /// Refresh due sources, then map, encode and send every frame once.
    ///
    /// Send failures are logged and counted; the remaining frames are still
    /// attempted.
    pub fn run_cycle(&mut self) -> CycleReport {
        let now = self.clock.now();
        log::debug!("Cycle at {}", now.format("%Y-%m-%d %H:%M:%S"));

        self.temperature.refresh(now);
        self.tide.refresh(now);
        self.report_staleness(now);

        let readings = GaugeReadings::derive(
            now,
            self.temperature.value().copied(),
            self.tide.value().copied(),
            &self.temperature_range,
        );
        log_readings(&readings);

        let mut report = CycleReport {
            readings,
            sent: 0,
            failed: 0,
        };
        for frame in readings.frames() {
            log::trace!("Sending {}", frame);
            match self.sink.send(&frame) {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    log::warn!("Failed to send {}: {}", frame, e);
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Cycle forever, pausing for the configured interval between cycles.
    ///
    /// Returns only when a cycle limit is configured and reached.
    pub fn run(&mut self) {
        let interval = self.cycle.interval.as_duration();
        let mut cycles: u64 = 0;

        loop {
            self.run_cycle();
            cycles += 1;

            if self.cycle.max_cycles.is_some_and(|max| cycles >= max) {
                log::info!("Stopping after {} cycles", cycles);
                return;
            }
            std::thread::sleep(interval);
        }
    }

    pub fn temperature(&self) -> &DataSourceRefresher<f64, W> {
        &self.temperature
    }

    pub fn tide(&self) -> &DataSourceRefresher<NaiveDateTime, T> {
        &self.tide
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn report_staleness(&mut self, now: NaiveDateTime) {
        let threshold = self.cycle.stale_warning.map(|i| i.as_time_delta());
        check_staleness(
            self.temperature.source(),
            now,
            threshold,
            &mut self.temperature_stale_warned,
        );
        check_staleness(self.tide.source(), now, threshold, &mut self.tide_stale_warned);
    }
}

fn log_readings(readings: &GaugeReadings) {
    log::debug!(
        "Speed: {}, rpm: {} (gauge {} rpm)",
        readings.speed,
        readings.rpm,
        readings.rpm * 200
    );
    match readings.temperature {
        Some(t) => log::debug!("Temperature position on gauge: {}", t),
        None => log::debug!("Temperature unavailable, gauge not updated"),
    }
    match (readings.tide_percent, readings.fuel) {
        (Some(pct), Some(fuel)) => {
            log::debug!("Tide: {:.1}%, fuel position on gauge: {}", pct, fuel)
        }
        _ => log::debug!("Tide unavailable, gauge not updated"),
    }
}

/// Log source ages, warning once when the held value has been past its expiry
/// or refresh point for longer than `threshold`, and re-arming after it is
/// refreshed.
fn check_staleness<V>(
    source: &ExternalSource<V>,
    now: NaiveDateTime,
    threshold: Option<TimeDelta>,
    warned: &mut bool,
) {
    let Some(age) = source.staleness(now) else {
        return;
    };
    log::debug!(
        "{} value age: {}s, attempt age: {}s",
        source.name(),
        age.num_seconds(),
        source.attempt_age(now).map_or(0, |a| a.num_seconds())
    );

    match (threshold, source.overdue(now)) {
        (Some(limit), Some(overdue)) if overdue > limit => {
            if !*warned {
                log::warn!(
                    "{} value is {} minutes overdue for refresh (fetched {} minutes ago)",
                    source.name(),
                    overdue.num_minutes(),
                    age.num_minutes()
                );
                *warned = true;
            }
        }
        _ => *warned = false,
    }
}
