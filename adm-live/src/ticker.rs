use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::gauges::LiveMetrics;

/// Default period between simulator ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(5000);

/// Owns the recurring tick task. Dropping the handle stops the task.
#[derive(Debug)]
pub struct SimulatorHandle {
    task: Option<JoinHandle<()>>,
}

impl SimulatorHandle {
    /// Cancel the task. No tick runs after this returns; calling it again is a no-op.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            log::debug!("live simulator stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for SimulatorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Tick `state` every `period`, first tick one period after spawning.
///
/// Must be called from within a tokio runtime.
pub fn spawn_simulator(state: Arc<Mutex<LiveMetrics>>, period: Duration) -> SimulatorHandle {
    spawn_with_rng(state, period, StdRng::from_entropy())
}

/// As [`spawn_simulator`], with a caller-supplied generator.
pub fn spawn_with_rng(state: Arc<Mutex<LiveMetrics>>, period: Duration, mut rng: StdRng) -> SimulatorHandle {
    let task = tokio::spawn(async move {
        let mut ticks = interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            match state.lock() {
                Ok(mut live) => {
                    live.tick(&mut rng, Local::now());
                }
                Err(_) => {
                    log::error!("live metrics lock poisoned; stopping simulator");
                    break;
                }
            }
        }
    });
    log::debug!("live simulator started, period {:?}", period);
    SimulatorHandle { task: Some(task) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauges::GaugeState;

    fn page_views(state: &Arc<Mutex<LiveMetrics>>) -> u64 {
        state.lock().unwrap().gauges.page_views
    }

    fn session_label(state: &Arc<Mutex<LiveMetrics>>) -> String {
        state.lock().unwrap().gauges.session_duration_label.clone()
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let state = Arc::new(Mutex::new(LiveMetrics::new(GaugeState::default())));
        let _handle = spawn_with_rng(state.clone(), TICK_INTERVAL, StdRng::seed_from_u64(9));

        tokio::time::sleep(Duration::from_millis(4900)).await;
        assert_eq!(session_label(&state), "3:42");

        let mut labels_changed = 0;
        let mut last = session_label(&state);
        for _ in 0..10 {
            tokio::time::sleep(TICK_INTERVAL).await;
            let now = session_label(&state);
            if now != last {
                labels_changed += 1;
            }
            last = now;
        }
        // A tick redraws the duration, so a few repeats are possible but not ten.
        assert!(labels_changed >= 5, "changed {}", labels_changed);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_prevents_further_ticks() {
        let state = Arc::new(Mutex::new(LiveMetrics::default()));
        let mut handle = spawn_with_rng(state.clone(), Duration::from_millis(100), StdRng::seed_from_u64(10));
        tokio::time::sleep(Duration::from_millis(550)).await;
        assert!(handle.is_running());

        handle.stop();
        handle.stop();
        tokio::task::yield_now().await;
        let frozen = page_views(&state);
        let frozen_label = session_label(&state);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(page_views(&state), frozen);
        assert_eq!(session_label(&state), frozen_label);
        assert!(!handle.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_task() {
        let state = Arc::new(Mutex::new(LiveMetrics::default()));
        {
            let _handle = spawn_with_rng(state.clone(), Duration::from_millis(100), StdRng::seed_from_u64(11));
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
        tokio::task::yield_now().await;
        let frozen = session_label(&state);
        let views = page_views(&state);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(session_label(&state), frozen);
        assert_eq!(page_views(&state), views);
    }
}
