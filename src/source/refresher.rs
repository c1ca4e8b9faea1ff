use std::fmt;

use chrono::NaiveDateTime;

use super::external::ExternalSource;
use crate::error::FetchError;

/// A blocking fetch of one external quantity.
pub trait Fetch<T> {
    fn fetch(&mut self, now: NaiveDateTime) -> std::result::Result<T, FetchError>;
}

/// What a call to [`DataSourceRefresher::refresh`] did.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// The source was not due; nothing was fetched.
    NotDue,
    /// A fetch succeeded and replaced the value.
    Updated,
    /// A fetch was attempted and failed; the previous value is kept.
    Failed(FetchError),
}

/// Pairs an [`ExternalSource`] with the fetcher that feeds it.
pub struct DataSourceRefresher<T, F> {
    source: ExternalSource<T>,
    fetcher: F,
}

impl<T, F> DataSourceRefresher<T, F>
where
    T: fmt::Debug,
    F: Fetch<T>,
{
    pub fn new(source: ExternalSource<T>, fetcher: F) -> Self {
        Self { source, fetcher }
    }

    /// Fetch if the source is due, recording the outcome.
    ///
    /// Failures are logged and never propagate; the source keeps whatever
    /// value it last fetched successfully.
    pub fn refresh(&mut self, now: NaiveDateTime) -> RefreshOutcome {
        if !self.source.is_due(now) {
            return RefreshOutcome::NotDue;
        }

        log::debug!("Fetching {}", self.source.name());
        match self.fetcher.fetch(now) {
            Ok(value) => {
                log::info!("{} updated: {:?}", self.source.name(), value);
                self.source.record_success(now, value);
                RefreshOutcome::Updated
            }
            Err(err) => {
                log::warn!("Error getting {}: {}", self.source.name(), err);
                self.source.record_failure(now);
                RefreshOutcome::Failed(err)
            }
        }
    }

    pub fn value(&self) -> Option<&T> {
        self.source.value()
    }

    pub fn source(&self) -> &ExternalSource<T> {
        &self.source
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceState;
    use chrono::{NaiveDate, TimeDelta};
    use std::collections::VecDeque;

    struct Scripted {
        replies: VecDeque<std::result::Result<f64, FetchError>>,
        calls: usize,
    }

    impl Scripted {
        fn new(replies: Vec<std::result::Result<f64, FetchError>>) -> Self {
            Self {
                replies: replies.into(),
                calls: 0,
            }
        }
    }

    impl Fetch<f64> for Scripted {
        fn fetch(&mut self, _now: NaiveDateTime) -> std::result::Result<f64, FetchError> {
            self.calls += 1;
            self.replies
                .pop_front()
                .unwrap_or(Err(FetchError::MissingField("main")))
        }
    }

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn refresher(
        replies: Vec<std::result::Result<f64, FetchError>>,
    ) -> DataSourceRefresher<f64, Scripted> {
        let interval = TimeDelta::minutes(30);
        DataSourceRefresher::new(
            ExternalSource::new("temperature", interval, interval),
            Scripted::new(replies),
        )
    }

    #[test]
    fn test_first_refresh_fetches() {
        let mut refresher = refresher(vec![Ok(81.5)]);
        assert!(matches!(refresher.refresh(t0()), RefreshOutcome::Updated));
        assert_eq!(refresher.value(), Some(&81.5));
        assert_eq!(refresher.fetcher().calls, 1);
    }

    #[test]
    fn test_not_due_skips_fetcher() {
        let mut refresher = refresher(vec![Ok(81.5), Ok(90.0)]);
        refresher.refresh(t0());
        for m in 1..30 {
            let outcome = refresher.refresh(t0() + TimeDelta::minutes(m));
            assert!(matches!(outcome, RefreshOutcome::NotDue));
        }
        assert_eq!(refresher.fetcher().calls, 1);

        assert!(matches!(
            refresher.refresh(t0() + TimeDelta::minutes(30)),
            RefreshOutcome::Updated
        ));
        assert_eq!(refresher.value(), Some(&90.0));
    }

    #[test]
    fn test_failure_retains_previous_value() {
        let mut refresher = refresher(vec![Ok(81.5), Err(FetchError::Status(500))]);
        refresher.refresh(t0());

        let later = t0() + TimeDelta::minutes(30);
        assert!(matches!(
            refresher.refresh(later),
            RefreshOutcome::Failed(FetchError::Status(500))
        ));
        assert_eq!(refresher.value(), Some(&81.5));
        assert_eq!(refresher.source().last_fetch_attempt(), Some(later));
        assert_eq!(refresher.source().last_fetch_success(), Some(t0()));
        assert_eq!(refresher.source().state(later), SourceState::StaleAwaitingRetry);
    }

    #[test]
    fn test_always_failing_source_has_no_value() {
        let mut refresher = refresher(vec![]);
        assert!(matches!(refresher.refresh(t0()), RefreshOutcome::Failed(_)));
        assert!(refresher.value().is_none());
        assert_eq!(refresher.source().state(t0()), SourceState::NeverFetched);

        // No hammering between retries
        assert!(matches!(
            refresher.refresh(t0() + TimeDelta::minutes(1)),
            RefreshOutcome::NotDue
        ));
        assert_eq!(refresher.fetcher().calls, 1);
    }
}
