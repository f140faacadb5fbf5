//! Submission channel entity and its daily quota bookkeeping.

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};

use crate::domain::notifier::UrlNotifier;

/// Current UTC calendar date. Quota days roll over at UTC midnight.
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Usage counters for one UTC day.
#[derive(Debug, Clone, Copy)]
struct DayUsage {
    used: u32,
    day: NaiveDate,
}

/// Point-in-time view of a channel's quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaSnapshot {
    pub used: u32,
    pub remaining: u32,
    pub daily_limit: u32,
    /// UTC day the counters belong to.
    pub day: NaiveDate,
}

/// Per-channel daily submission counter.
///
/// The counter belongs to a single UTC day; the first operation performed
/// after midnight resets it before applying. All methods take the current
/// day explicitly (`*_on`) so tests can pin time; the plain variants use
/// [`utc_today`].
///
/// The check-and-increment in [`QuotaTracker::try_consume_on`] happens under
/// one lock acquisition, so the counter can never exceed `daily_limit` even
/// with concurrent callers.
#[derive(Debug)]
pub struct QuotaTracker {
    daily_limit: u32,
    state: Mutex<DayUsage>,
}

impl QuotaTracker {
    /// Creates a tracker with zero usage for the current UTC day.
    pub fn new(daily_limit: u32) -> Self {
        Self::with_usage(daily_limit, 0, utc_today())
    }

    /// Creates a tracker with preset usage, for restoring state or tests.
    pub fn with_usage(daily_limit: u32, used: u32, day: NaiveDate) -> Self {
        Self {
            daily_limit,
            state: Mutex::new(DayUsage { used, day }),
        }
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Reserves one submission if quota is left on `today`.
    ///
    /// Returns `true` and increments the counter when `used < daily_limit`,
    /// otherwise leaves the counter untouched and returns `false`.
    pub fn try_consume_on(&self, today: NaiveDate) -> bool {
        let mut state = self.state.lock().unwrap();
        Self::roll_over(&mut state, today);
        if state.used < self.daily_limit {
            state.used += 1;
            true
        } else {
            false
        }
    }

    /// Reserves one submission against the current UTC day.
    pub fn try_consume(&self) -> bool {
        self.try_consume_on(utc_today())
    }

    /// Submissions still available on `today`.
    pub fn remaining_on(&self, today: NaiveDate) -> u32 {
        let mut state = self.state.lock().unwrap();
        Self::roll_over(&mut state, today);
        self.daily_limit - state.used
    }

    /// Submissions still available on the current UTC day.
    pub fn remaining(&self) -> u32 {
        self.remaining_on(utc_today())
    }

    /// Counters as of `today`, applying the day rollover first.
    pub fn snapshot_on(&self, today: NaiveDate) -> QuotaSnapshot {
        let mut state = self.state.lock().unwrap();
        Self::roll_over(&mut state, today);
        QuotaSnapshot {
            used: state.used,
            remaining: self.daily_limit - state.used,
            daily_limit: self.daily_limit,
            day: state.day,
        }
    }

    /// Counters as of the current UTC day.
    pub fn snapshot(&self) -> QuotaSnapshot {
        self.snapshot_on(utc_today())
    }

    fn roll_over(state: &mut DayUsage, today: NaiveDate) {
        if state.day != today {
            state.used = 0;
            state.day = today;
        }
    }
}

/// One credential bound to the indexing service, with its own daily quota.
///
/// Channels are named after the credential's account identifier so quota
/// reports and logs can tell them apart.
pub struct Channel {
    name: String,
    notifier: Arc<dyn UrlNotifier>,
    quota: QuotaTracker,
}

impl Channel {
    /// Creates a channel with a fresh quota for the current UTC day.
    pub fn new(name: impl Into<String>, notifier: Arc<dyn UrlNotifier>, daily_limit: u32) -> Self {
        Self::with_quota(name, notifier, QuotaTracker::new(daily_limit))
    }

    /// Creates a channel with an existing tracker, for restoring state or tests.
    pub fn with_quota(
        name: impl Into<String>,
        notifier: Arc<dyn UrlNotifier>,
        quota: QuotaTracker,
    ) -> Self {
        Self {
            name: name.into(),
            notifier,
            quota,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn notifier(&self) -> &dyn UrlNotifier {
        self.notifier.as_ref()
    }

    pub fn quota(&self) -> &QuotaTracker {
        &self.quota
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("quota", &self.quota)
            .finish_non_exhaustive()
    }
}
