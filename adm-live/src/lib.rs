//! Real-time gauges for the dashboard header.
//!
//! - `gauges`: the random-walk state and the tick that advances it
//! - `notifications`: the bounded activity feed
//! - `ticker`: a cancellable tokio task driving the tick on a fixed interval
//!
//! The simulator only ever writes its own [`LiveMetrics`] state.

pub mod gauges;
pub mod notifications;
pub mod ticker;

pub use gauges::{GaugeState, LiveMetrics};
pub use notifications::{NotificationEvent, NotificationLog};
pub use ticker::{spawn_simulator, SimulatorHandle, TICK_INTERVAL};
