use chrono::{NaiveDateTime, TimeDelta};

/// Where a source stands relative to its refresh schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// No fetch has ever succeeded; there is nothing to display.
    NeverFetched,
    /// The held value is current.
    Fresh,
    /// The held value is due for replacement but still displayed until a
    /// fetch succeeds.
    StaleAwaitingRetry,
}

/// Fetch bookkeeping for one externally-fetched quantity.
///
/// A successful attempt updates the attempt time, success time and value
/// together. A failed attempt only moves the attempt time, so the last good
/// value is kept however old it gets.
#[derive(Debug, Clone)]
pub struct ExternalSource<T> {
    name: &'static str,
    last_fetch_attempt: Option<NaiveDateTime>,
    last_fetch_success: Option<NaiveDateTime>,
    last_value: Option<T>,
    refresh_interval: TimeDelta,
    retry_interval: TimeDelta,
    expiry: fn(&T) -> Option<NaiveDateTime>,
}

impl<T> ExternalSource<T> {
    /// Create a source that has never been fetched.
    ///
    /// # Arguments
    /// * `refresh_interval` - age of the last good value after which a refetch is wanted
    /// * `retry_interval` - minimum spacing between attempts
    pub fn new(name: &'static str, refresh_interval: TimeDelta, retry_interval: TimeDelta) -> Self {
        Self {
            name,
            last_fetch_attempt: None,
            last_fetch_success: None,
            last_value: None,
            refresh_interval,
            retry_interval,
            expiry: |_| None,
        }
    }

    /// Also treat the value as stale once `expiry` returns a time that has passed.
    pub fn with_expiry(mut self, expiry: fn(&T) -> Option<NaiveDateTime>) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> Option<&T> {
        self.last_value.as_ref()
    }

    pub fn last_fetch_attempt(&self) -> Option<NaiveDateTime> {
        self.last_fetch_attempt
    }

    pub fn last_fetch_success(&self) -> Option<NaiveDateTime> {
        self.last_fetch_success
    }

    pub fn refresh_interval(&self) -> TimeDelta {
        self.refresh_interval
    }

    pub fn retry_interval(&self) -> TimeDelta {
        self.retry_interval
    }

    /// Age of the held value.
    pub fn staleness(&self, now: NaiveDateTime) -> Option<TimeDelta> {
        self.last_fetch_success.map(|success| now - success)
    }

    /// Moment the held value stopped being fresh: its expiry or the end of
    /// its refresh interval, whichever comes first.
    pub fn stale_since(&self) -> Option<NaiveDateTime> {
        let value = self.last_value.as_ref()?;
        let refresh_point = self
            .last_fetch_success
            .and_then(|success| success.checked_add_signed(self.refresh_interval));
        match ((self.expiry)(value), refresh_point) {
            (Some(expiry), Some(refresh)) => Some(expiry.min(refresh)),
            (expiry, refresh) => expiry.or(refresh),
        }
    }

    /// How long the held value has been past its expiry or refresh point.
    /// `None` while the value is fresh or absent.
    pub fn overdue(&self, now: NaiveDateTime) -> Option<TimeDelta> {
        let since = self.stale_since()?;
        (now >= since).then(|| now - since)
    }

    /// Time since the last attempt, successful or not.
    pub fn attempt_age(&self, now: NaiveDateTime) -> Option<TimeDelta> {
        self.last_fetch_attempt.map(|attempt| now - attempt)
    }

    pub fn state(&self, now: NaiveDateTime) -> SourceState {
        if self.last_value.is_none() {
            SourceState::NeverFetched
        } else if self.wants_refresh(now) {
            SourceState::StaleAwaitingRetry
        } else {
            SourceState::Fresh
        }
    }

    /// Whether a fetch should be attempted at `now`.
    ///
    /// The first attempt is always due. After that the value has to want
    /// refreshing and the retry interval has to have passed since the last
    /// attempt.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        match self.last_fetch_attempt {
            None => true,
            Some(attempt) => {
                self.wants_refresh(now) && elapsed_at_least(attempt, now, self.retry_interval)
            }
        }
    }

    pub fn record_success(&mut self, now: NaiveDateTime, value: T) {
        self.last_fetch_attempt = Some(now);
        self.last_fetch_success = Some(now);
        self.last_value = Some(value);
    }

    pub fn record_failure(&mut self, now: NaiveDateTime) {
        self.last_fetch_attempt = Some(now);
    }

    fn wants_refresh(&self, now: NaiveDateTime) -> bool {
        match (&self.last_value, self.last_fetch_success) {
            (Some(value), Some(success)) => {
                let expired = (self.expiry)(value).is_some_and(|at| now >= at);
                expired || elapsed_at_least(success, now, self.refresh_interval)
            }
            _ => true,
        }
    }
}

/// A clock that stepped backwards counts as elapsed, so a time change never
/// silences a source.
fn elapsed_at_least(since: NaiveDateTime, now: NaiveDateTime, interval: TimeDelta) -> bool {
    let elapsed = now - since;
    elapsed < TimeDelta::zero() || elapsed >= interval
}
