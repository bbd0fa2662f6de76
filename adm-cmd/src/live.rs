//! Live simulator command.

use adm_live::{spawn_simulator, GaugeState, LiveMetrics, NotificationEvent};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Print the gauges after each of `ticks` ticks, plus any new notifications.
pub async fn run_live(interval_ms: u64, ticks: u32) -> anyhow::Result<()> {
    let period = Duration::from_millis(interval_ms.max(1));
    let state = Arc::new(Mutex::new(LiveMetrics::default()));
    let mut handle = spawn_simulator(state.clone(), period);

    let mut last_seen = 0;
    println!("{}", gauge_line(&GaugeState::default()));
    for _ in 0..ticks {
        tokio::time::sleep(period).await;
        let (gauges, fresh) = {
            let live = state
                .lock()
                .map_err(|_| anyhow::anyhow!("live metrics lock poisoned"))?;
            let fresh: Vec<NotificationEvent> = live
                .notifications
                .events()
                .filter(|e| e.id > last_seen)
                .cloned()
                .collect();
            (live.gauges.clone(), fresh)
        };
        println!("{}", gauge_line(&gauges));
        for event in fresh {
            println!("  [{}] {}", event.timestamp_label, event.message);
            last_seen = event.id;
        }
    }
    handle.stop();
    Ok(())
}

fn gauge_line(g: &GaugeState) -> String {
    format!(
        "live users {:>5}  bounce {:>5.1}%  session {:>5}  page views {}",
        g.live_users,
        g.bounce_rate_percent,
        g.session_duration_label,
        adm_utils::numbers::with_thousands(g.page_views as i64)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge_line_initial_values() {
        assert_eq!(
            gauge_line(&GaugeState::default()),
            "live users  1247  bounce  24.5%  session  3:42  page views 18,542"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_live_finishes() {
        run_live(10, 5).await.unwrap();
    }
}
