//! Trait seams between the core and its external collaborators.

mod provider;
mod registry;
mod sink;

pub use provider::{FetchOutcome, StatsProvider};
pub use registry::{StaticRegistry, TrackedRegistry};
pub use sink::{LogSink, NotificationSink, NullSink};
