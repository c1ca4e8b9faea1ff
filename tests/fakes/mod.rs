#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use gaugeclock::error::{ClusterError, FetchError, Result};
use gaugeclock::frame::GaugeFrame;
use gaugeclock::source::Fetch;
use gaugeclock::transport::FrameSink;
use gaugeclock::Clock;

pub fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(hour, minute, second)
        .unwrap()
}

/// Clock the test moves by hand. Clones share the same time.
#[derive(Clone)]
pub struct ManualClock {
    now: Rc<Cell<NaiveDateTime>>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn advance(&self, by: TimeDelta) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

/// Replays queued replies, then fails with `Status(503)` once exhausted.
pub struct ScriptedFetcher<T> {
    replies: VecDeque<std::result::Result<T, FetchError>>,
    calls: Vec<NaiveDateTime>,
}

impl<T> ScriptedFetcher<T> {
    pub fn new(replies: Vec<std::result::Result<T, FetchError>>) -> Self {
        Self {
            replies: replies.into(),
            calls: Vec::new(),
        }
    }

    pub fn failing() -> Self {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> &[NaiveDateTime] {
        &self.calls
    }
}

impl<T> Fetch<T> for ScriptedFetcher<T> {
    fn fetch(&mut self, now: NaiveDateTime) -> std::result::Result<T, FetchError> {
        self.calls.push(now);
        self.replies
            .pop_front()
            .unwrap_or(Err(FetchError::Status(503)))
    }
}

/// Records frames, rejecting any whose identifier is in `fail_ids`.
#[derive(Default)]
pub struct FlakySink {
    pub fail_ids: Vec<u32>,
    pub sent: Vec<GaugeFrame>,
    pub rejected: usize,
}

impl FlakySink {
    pub fn failing_on(ids: &[u32]) -> Self {
        Self {
            fail_ids: ids.to_vec(),
            ..Self::default()
        }
    }

    pub fn frames_with_id(&self, id: u32) -> Vec<GaugeFrame> {
        self.sent.iter().filter(|f| f.id == id).copied().collect()
    }
}

impl FrameSink for FlakySink {
    fn send(&mut self, frame: &GaugeFrame) -> Result<()> {
        if self.fail_ids.contains(&frame.id) {
            self.rejected += 1;
            return Err(ClusterError::Transport("bus off".to_string()));
        }
        self.sent.push(*frame);
        Ok(())
    }
}
