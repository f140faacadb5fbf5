//! Channel pool and eligibility-based selection.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::entities::{Channel, utc_today};

/// All configured submission channels, in configuration order.
///
/// Selection is deliberately simple: the first channel whose remaining
/// quota covers the whole URL list wins. A run is never split across
/// channels, so a report always names exactly one credential.
pub struct ChannelPool {
    channels: Vec<Arc<Channel>>,
}

impl ChannelPool {
    pub fn new(channels: Vec<Arc<Channel>>) -> Self {
        Self { channels }
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Channels in configuration order, for quota reports.
    pub fn channels(&self) -> &[Arc<Channel>] {
        &self.channels
    }

    /// Picks the first channel that can submit `url_count` URLs on `today`.
    ///
    /// Returns `None` when no channel has enough quota left; nothing is
    /// consumed by the check itself.
    pub fn select_on(&self, url_count: usize, today: NaiveDate) -> Option<Arc<Channel>> {
        self.channels
            .iter()
            .find(|channel| channel.quota().remaining_on(today) as usize >= url_count)
            .cloned()
    }

    /// Picks the first channel that can submit `url_count` URLs today (UTC).
    pub fn select(&self, url_count: usize) -> Option<Arc<Channel>> {
        self.select_on(url_count, utc_today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::QuotaTracker;
    use crate::domain::notifier::MockUrlNotifier;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn channel_with_remaining(name: &str, limit: u32, used: u32, on: NaiveDate) -> Arc<Channel> {
        Arc::new(Channel::with_quota(
            name,
            Arc::new(MockUrlNotifier::new()),
            QuotaTracker::with_usage(limit, used, on),
        ))
    }

    #[test]
    fn test_select_skips_channels_without_room() {
        let today = day(2025, 6, 1);
        // First channel has 50 left, second 120.
        let pool = ChannelPool::new(vec![
            channel_with_remaining("first", 200, 150, today),
            channel_with_remaining("second", 200, 80, today),
        ]);

        let picked = pool.select_on(100, today).unwrap();
        assert_eq!(picked.name(), "second");
    }

    #[test]
    fn test_select_prefers_earlier_channel_when_both_fit() {
        let today = day(2025, 6, 1);
        let pool = ChannelPool::new(vec![
            channel_with_remaining("first", 200, 150, today),
            channel_with_remaining("second", 200, 80, today),
        ]);

        let picked = pool.select_on(30, today).unwrap();
        assert_eq!(picked.name(), "first");
    }

    #[test]
    fn test_select_returns_none_when_no_channel_fits() {
        let today = day(2025, 6, 1);
        let pool = ChannelPool::new(vec![
            channel_with_remaining("first", 200, 150, today),
            channel_with_remaining("second", 200, 80, today),
        ]);

        assert!(pool.select_on(121, today).is_none());
    }

    #[test]
    fn test_select_exact_fit_is_eligible() {
        let today = day(2025, 6, 1);
        let pool = ChannelPool::new(vec![channel_with_remaining("only", 200, 195, today)]);

        let picked = pool.select_on(5, today).unwrap();
        assert_eq!(picked.name(), "only");
        // Selection does not consume anything.
        assert_eq!(picked.quota().remaining_on(today), 5);
    }

    #[test]
    fn test_select_on_empty_pool() {
        let pool = ChannelPool::new(Vec::new());
        assert!(pool.is_empty());
        assert!(pool.select_on(1, day(2025, 6, 1)).is_none());
    }

    #[test]
    fn test_exhausted_channel_recovers_next_day() {
        let yesterday = day(2025, 6, 1);
        let pool = ChannelPool::new(vec![channel_with_remaining("only", 200, 200, yesterday)]);

        assert!(pool.select_on(1, yesterday).is_none());
        assert!(pool.select_on(1, day(2025, 6, 2)).is_some());
    }
}
