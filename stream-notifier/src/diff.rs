//! Newly-live detection between two snapshots.

use std::collections::HashSet;

use crate::snapshot::{ChannelId, LiveStreamRecord, Snapshot};

/// What to report when there is no previous snapshot to compare against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirstPollPolicy {
    /// Channels already live at startup are treated as the baseline.
    #[default]
    Suppress,
    /// Every channel live at startup is reported as new.
    AnnounceAll,
}

/// Records of `current` whose identity is absent from `previous`, in `current` order.
///
/// A missing `current` (failed fetch) never yields anything: a failure is not
/// "everyone went offline".
pub fn diff(
    previous: Option<&Snapshot>,
    current: Option<&Snapshot>,
    policy: FirstPollPolicy,
) -> Vec<LiveStreamRecord> {
    let Some(current) = current else {
        return Vec::new();
    };

    let Some(previous) = previous else {
        return match policy {
            FirstPollPolicy::Suppress => Vec::new(),
            FirstPollPolicy::AnnounceAll => current.records().to_vec(),
        };
    };

    let known: HashSet<&ChannelId> = previous.iter().map(|r| &r.id).collect();
    current
        .iter()
        .filter(|r| !known.contains(&r.id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::record;

    fn ids(records: &[LiveStreamRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn self_diff_is_empty() {
        let snap = Snapshot::new([record("1", "x"), record("2", "y"), record("3", "z")]);
        for policy in [FirstPollPolicy::Suppress, FirstPollPolicy::AnnounceAll] {
            assert!(diff(Some(&snap), Some(&snap), policy).is_empty());
        }
    }

    #[test]
    fn first_poll_suppressed_by_default() {
        let snap = Snapshot::new([record("1", "x"), record("2", "y")]);
        assert!(diff(None, Some(&snap), FirstPollPolicy::default()).is_empty());
    }

    #[test]
    fn first_poll_announce_all_returns_everything_in_order() {
        let snap = Snapshot::new([record("2", "y"), record("1", "x")]);
        let out = diff(None, Some(&snap), FirstPollPolicy::AnnounceAll);
        assert_eq!(ids(&out), ["2", "1"]);
    }

    #[test]
    fn failed_fetch_yields_nothing() {
        let prev = Snapshot::new([record("1", "x")]);
        assert!(diff(Some(&prev), None, FirstPollPolicy::AnnounceAll).is_empty());
        assert!(diff(None, None, FirstPollPolicy::AnnounceAll).is_empty());
    }

    #[test]
    fn new_channel_is_reported() {
        let a = Snapshot::new([record("1", "x")]);
        let b = Snapshot::new([record("1", "x"), record("2", "y")]);

        let out = diff(Some(&a), Some(&b), FirstPollPolicy::Suppress);
        assert_eq!(out, vec![record("2", "y")]);
    }

    #[test]
    fn channels_going_offline_are_silent() {
        let a = Snapshot::new([record("1", "x"), record("2", "y")]);
        let b = Snapshot::new([record("2", "y")]);

        assert!(diff(Some(&a), Some(&b), FirstPollPolicy::Suppress).is_empty());
    }

    #[test]
    fn output_follows_current_order() {
        let a = Snapshot::new([record("3", "c")]);
        let b = Snapshot::new([
            record("5", "e"),
            record("3", "c"),
            record("1", "a"),
            record("4", "d"),
        ]);

        let out = diff(Some(&a), Some(&b), FirstPollPolicy::Suppress);
        assert_eq!(ids(&out), ["5", "1", "4"]);
        assert!(out.len() <= b.len());
    }

    #[test]
    fn identity_alone_decides_novelty() {
        let mut renamed = record("1", "x");
        renamed.title = Some("new title".into());
        let a = Snapshot::new([record("1", "x")]);
        let b = Snapshot::new([renamed]);

        assert!(diff(Some(&a), Some(&b), FirstPollPolicy::Suppress).is_empty());
    }
}
