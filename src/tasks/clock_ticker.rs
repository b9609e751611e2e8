//! Clock ticker background task

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::broadcast::{self, error::RecvError},
    time::{sleep, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};

use crate::state::{AppState, ClockEvent};

/// Background task that re-synchronizes the engine on a fixed cadence while
/// the clock runs and goes idle while it is stopped
pub async fn clock_ticker_task(state: Arc<AppState>) {
    info!("Starting clock ticker task ({}ms cadence)", state.tick_interval.as_millis());

    let mut event_rx = state.subscribe_events();

    loop {
        // Check the engine directly so a clock started before we subscribed is still polled
        match state.is_running() {
            Ok(true) => {
                if !poll_while_running(&state, &mut event_rx).await {
                    info!("Clock event channel closed, stopping ticker");
                    return;
                }
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                error!("Failed to read clock state: {}", e);
                sleep(Duration::from_secs(1)).await;
                continue;
            }
        }

        // Idle until the next transition
        match event_rx.recv().await {
            Ok(event) => debug!("Ticker received {:?}", event),
            Err(RecvError::Lagged(skipped)) => warn!("Ticker skipped {} clock events", skipped),
            Err(RecvError::Closed) => {
                info!("Clock event channel closed, stopping ticker");
                return;
            }
        }
    }
}

/// Advance the engine every tick until it stops. Returns false once the event
/// channel has closed.
async fn poll_while_running(state: &AppState, event_rx: &mut broadcast::Receiver<ClockEvent>) -> bool {
    let mut interval = tokio::time::interval(state.tick_interval.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match state.tick() {
                    Ok(snapshot) if !snapshot.running => {
                        debug!("Clock no longer running, pausing ticks");
                        return true;
                    }
                    Ok(_) => {}
                    Err(e) => error!("Failed to advance clock: {}", e),
                }
            }

            result = event_rx.recv() => match result {
                Ok(event) if !event.leaves_running() => {
                    debug!("Pausing ticks after {:?}", event);
                    return true;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => warn!("Ticker skipped {} clock events", skipped),
                Err(RecvError::Closed) => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ClockSettings, Side, SideSettings};

    fn spawn_with(settings: ClockSettings) -> Arc<AppState> {
        let state = Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            settings,
            Side::Left,
            Duration::from_millis(100),
        ));
        tokio::spawn(clock_ticker_task(Arc::clone(&state)));
        state
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_counts_down_until_flag_fall() {
        let settings = ClockSettings::symmetric(SideSettings { minutes: 0, seconds: 1, tenths: 0, increment_seconds: 0 });
        let state = spawn_with(settings);
        tokio::task::yield_now().await;

        state.toggle_running().unwrap();
        sleep(Duration::from_millis(450)).await;
        let snapshot = state.snapshot().unwrap();
        assert!(snapshot.running);
        assert!(snapshot.left.remaining_tenths < 10);

        sleep(Duration::from_secs(2)).await;
        let snapshot = state.snapshot().unwrap();
        assert!(!snapshot.running);
        assert_eq!(snapshot.left.remaining_tenths, 0);
        assert_eq!(snapshot.flagged, Some(Side::Left));
        assert_eq!(snapshot.right.remaining_tenths, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_clock_is_not_polled() {
        let state = spawn_with(ClockSettings::symmetric(SideSettings::from_minutes(5, 0)));
        tokio::task::yield_now().await;

        state.toggle_running().unwrap();
        sleep(Duration::from_millis(500)).await;
        state.toggle_running().unwrap();

        sleep(Duration::from_secs(5)).await;
        let snapshot = state.snapshot().unwrap();
        assert!(!snapshot.running);
        assert_eq!(snapshot.left.remaining_tenths, 2995);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_follows_side_switches() {
        let state = spawn_with(ClockSettings::symmetric(SideSettings::from_minutes(1, 0)));
        tokio::task::yield_now().await;

        state.toggle_running().unwrap();
        sleep(Duration::from_millis(1000)).await;
        state.switch_side().unwrap();
        sleep(Duration::from_millis(2000)).await;

        let snapshot = state.snapshot().unwrap();
        assert!(snapshot.running);
        assert_eq!(snapshot.active_side, Side::Right);
        assert_eq!(snapshot.left.remaining_tenths, 590);
        assert!(snapshot.right.remaining_tenths < 600);
    }
}
