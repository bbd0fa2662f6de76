use adm_utils::dates::clock_label;
use chrono::{DateTime, Local};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::notifications::{pick_message, NotificationEvent, NotificationLog};

/// Chance that a tick emits a notification.
pub const NOTIFICATION_PROBABILITY: f64 = 0.25;

pub const BOUNCE_RATE_MIN: f64 = 15.0;
pub const BOUNCE_RATE_MAX: f64 = 45.0;

/// Real-time header gauges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeState {
    pub live_users: u64,
    pub bounce_rate_percent: f64,
    /// "M:SS"
    pub session_duration_label: String,
    pub page_views: u64,
}

impl Default for GaugeState {
    fn default() -> Self {
        Self {
            live_users: 1247,
            bounce_rate_percent: 24.5,
            session_duration_label: "3:42".to_string(),
            page_views: 18542,
        }
    }
}

impl GaugeState {
    /// Advance every gauge one random-walk step.
    ///
    /// - live users: `round((u - 0.4) * 50)`, i.e. -20..=+30, floored at 0
    /// - bounce rate: `(u - 0.5) * 1.5`, clamped to 15..=45
    /// - session duration: a fresh "M:SS", minutes 2..=4
    /// - page views: `round(u * 25)`, never decreasing
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let users_delta = ((rng.gen::<f64>() - 0.4) * 50.0).round() as i64;
        self.live_users = (self.live_users as i64 + users_delta).max(0) as u64;

        let bounce_delta = (rng.gen::<f64>() - 0.5) * 1.5;
        self.bounce_rate_percent = (self.bounce_rate_percent + bounce_delta).clamp(BOUNCE_RATE_MIN, BOUNCE_RATE_MAX);

        let minutes = rng.gen_range(2..5);
        let seconds = rng.gen_range(0..60);
        self.session_duration_label = format!("{}:{:02}", minutes, seconds);

        self.page_views += (rng.gen::<f64>() * 25.0).round() as u64;
    }
}

/// Everything the simulator owns: the gauges and the notification feed.
#[derive(Debug, Clone, Default)]
pub struct LiveMetrics {
    pub gauges: GaugeState,
    pub notifications: NotificationLog,
}

impl LiveMetrics {
    pub fn new(gauges: GaugeState) -> Self {
        Self {
            gauges,
            notifications: NotificationLog::new(),
        }
    }

    /// One simulator tick at time `now`. Returns the notification emitted, if any.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Local>) -> Option<NotificationEvent> {
        self.gauges.step(rng);
        if rng.gen_bool(NOTIFICATION_PROBABILITY) {
            let message = pick_message(rng);
            let event = self
                .notifications
                .push(message, now.timestamp_millis(), clock_label(&now))
                .clone();
            log::debug!("notification {}: {}", event.id, event.message);
            Some(event)
        } else {
            None
        }
    }
}
