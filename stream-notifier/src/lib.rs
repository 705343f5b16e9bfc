//! Desktop notifications for followed Twitch channels going live.
//!
//! One poll cycle fetches the live subset of a user's follows, diffs it
//! against the previous snapshot by channel identity and notifies about
//! every channel that was not live before.

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod daemon;
pub mod diff;
pub mod fetcher;
pub mod logging;
pub mod notification;
pub mod scheduler;
pub mod shutdown;
pub mod snapshot;

pub use diff::{FirstPollPolicy, diff};
pub use fetcher::{FetchError, LiveSource, SnapshotFetcher};
pub use scheduler::{PollOutcome, PollScheduler, SchedulerState};
pub use snapshot::{ChannelId, LiveStreamRecord, Snapshot};
