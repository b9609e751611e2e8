//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    engine::{ClockEngine, ClockPhase, ClockSettings, ClockSnapshot, SettingsError, SettingsForm, Side},
    error::AppError,
};
use super::ClockEvent;

/// Current monotonic time from the runtime clock.
///
/// Goes through tokio so that paused test runtimes control it.
pub fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Shared application state. Every engine call goes through the engine mutex,
/// which serializes input events, settings commits and ticker polls.
#[derive(Debug)]
pub struct AppState {
    pub engine: Arc<Mutex<ClockEngine>>,
    /// Settings restored by a reset; replaced on every settings commit
    pub presets: Arc<Mutex<ClockSettings>>,
    pub first_side: Side,
    /// How often the ticker re-synchronizes the engine while running
    pub tick_interval: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last user action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Transition notifications for background tasks
    pub event_tx: broadcast::Sender<ClockEvent>,
    /// Latest display values
    pub snapshot_tx: watch::Sender<ClockSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<ClockSnapshot>,
}

impl AppState {
    pub fn new(
        port: u16,
        host: String,
        settings: ClockSettings,
        first_side: Side,
        tick_interval: Duration,
    ) -> Self {
        let engine = settings.build_engine(first_side);
        let (event_tx, _) = broadcast::channel(100);
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());

        Self {
            engine: Arc::new(Mutex::new(engine)),
            presets: Arc::new(Mutex::new(settings)),
            first_side,
            tick_interval,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            event_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Build state from CLI configuration, rejecting out-of-range presets
    pub fn from_config(config: &Config) -> Result<Self, SettingsError> {
        let settings = config.clock_settings()?;
        Ok(Self::new(
            config.port,
            config.host.clone(),
            settings,
            config.first,
            config.tick_interval(),
        ))
    }

    fn lock_engine(&self) -> Result<MutexGuard<'_, ClockEngine>, AppError> {
        self.engine.lock().map_err(|_| AppError::LockPoisoned("clock engine"))
    }

    /// Run `op` against the engine at the current instant and publish the
    /// resulting display values. Nothing is published when `op` fails.
    fn modify<T, F>(&self, op: F) -> Result<(T, ClockSnapshot), AppError>
    where
        F: FnOnce(&mut ClockEngine, Instant) -> Result<T, AppError>,
    {
        let mut engine = self.lock_engine()?;
        let value = op(&mut *engine, now())?;
        let snapshot = engine.snapshot();
        drop(engine); // Release the lock early

        self.publish(&snapshot);
        Ok((value, snapshot))
    }

    fn publish(&self, snapshot: &ClockSnapshot) {
        self.snapshot_tx.send_if_modified(|current| {
            if *current == *snapshot {
                false
            } else {
                *current = snapshot.clone();
                true
            }
        });
    }

    fn emit(&self, event: ClockEvent) {
        // No subscribers is normal before the ticker starts
        if let Err(e) = self.event_tx.send(event) {
            debug!("No listeners for clock event {:?}: {}", e.0, e);
        }
    }

    /// Emit the event for a running/stopped transition, if one happened
    fn emit_transition(&self, was_running: bool, snapshot: &ClockSnapshot) {
        match (was_running, snapshot.running) {
            (false, true) => {
                info!("Clock started, {} side to move", snapshot.active_side);
                self.emit(ClockEvent::Started { side: snapshot.active_side });
            }
            (true, false) => self.emit_stopped(snapshot.flagged),
            _ => {}
        }
    }

    /// Announce that a running clock stopped, by flag-fall or by request
    fn emit_stopped(&self, flagged: Option<Side>) {
        match flagged {
            Some(side) => {
                info!("Flag fell on {} side", side);
                self.emit(ClockEvent::Flagged { side });
            }
            None => {
                info!("Clock stopped");
                self.emit(ClockEvent::Stopped);
            }
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Start the clock if stopped, stop it if running
    pub fn toggle_running(&self) -> Result<ClockSnapshot, AppError> {
        let (was_running, snapshot) = self.modify(|engine, now| {
            let was_running = engine.is_running();
            engine.toggle_running(now)?;
            Ok(was_running)
        })?;

        self.record_action("toggle");
        self.emit_transition(was_running, &snapshot);
        Ok(snapshot)
    }

    /// Pass the move to the other side. Only meaningful during a game, so a
    /// stopped clock is left untouched.
    pub fn switch_side(&self) -> Result<ClockSnapshot, AppError> {
        let (_, snapshot) = self.modify(|engine, now| {
            if !engine.is_running() {
                debug!("Ignoring side switch while stopped");
                return Err(AppError::NotRunning);
            }
            engine.switch_side(now);
            Ok(())
        })?;

        self.record_action("switch");
        if snapshot.running {
            debug!("Move passed to {} side", snapshot.active_side);
            self.emit(ClockEvent::Switched { to: snapshot.active_side });
        } else {
            self.emit_transition(true, &snapshot);
        }
        Ok(snapshot)
    }

    /// Re-synchronize the engine with real time. Called by the ticker.
    pub fn tick(&self) -> Result<ClockSnapshot, AppError> {
        let (was_running, snapshot) = self.modify(|engine, now| {
            let was_running = engine.is_running();
            engine.advance(now);
            Ok(was_running)
        })?;

        self.emit_transition(was_running, &snapshot);
        Ok(snapshot)
    }

    /// Commit a settings form. The form is validated before the engine is
    /// touched; a running clock is stopped first.
    pub fn configure(&self, form: &SettingsForm) -> Result<ClockSnapshot, AppError> {
        let settings = form.validate()?;

        let ((was_running, flagged), snapshot) = self.modify(|engine, now| {
            let was_running = engine.is_running();
            engine.stop(now);
            let flagged = engine.flagged_side();
            engine.apply_settings(&settings)?;
            Ok((was_running, flagged))
        })?;

        match self.presets.lock() {
            Ok(mut presets) => *presets = settings,
            Err(e) => warn!("Failed to store settings as presets: {}", e),
        }

        self.record_action("configure");
        if was_running {
            self.emit_stopped(flagged);
        }
        info!(
            "Clock configured: left {} +{}s, right {} +{}s",
            snapshot.left.display,
            snapshot.left.increment_seconds,
            snapshot.right.display,
            snapshot.right.increment_seconds
        );
        self.emit(ClockEvent::Configured);
        Ok(snapshot)
    }

    /// Stop the clock and restore the preset times for a new game
    pub fn reset(&self) -> Result<ClockSnapshot, AppError> {
        let presets = *self.presets.lock().map_err(|_| AppError::LockPoisoned("presets"))?;
        let first_side = self.first_side;

        let ((was_running, flagged), snapshot) = self.modify(|engine, now| {
            let was_running = engine.is_running();
            engine.stop(now);
            let flagged = engine.flagged_side();
            engine.apply_settings(&presets)?;
            engine.set_active_side(first_side)?;
            Ok((was_running, flagged))
        })?;

        self.record_action("reset");
        if was_running {
            self.emit_stopped(flagged);
        }
        info!("Clock reset to presets");
        self.emit(ClockEvent::Reset);
        Ok(snapshot)
    }

    pub fn snapshot(&self) -> Result<ClockSnapshot, AppError> {
        Ok(self.lock_engine()?.snapshot())
    }

    pub fn phase(&self) -> Result<ClockPhase, AppError> {
        Ok(self.lock_engine()?.phase())
    }

    /// Display values and phase read under a single lock
    pub fn status(&self) -> Result<(ClockSnapshot, ClockPhase), AppError> {
        let engine = self.lock_engine()?;
        Ok((engine.snapshot(), engine.phase()))
    }

    pub fn is_running(&self) -> Result<bool, AppError> {
        Ok(self.lock_engine()?.is_running())
    }

    /// Settings form prefilled with the engine's current values
    pub fn settings_form(&self) -> Result<SettingsForm, AppError> {
        Ok(SettingsForm::from_engine(&*self.lock_engine()?))
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClockEvent> {
        self.event_tx.subscribe()
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<ClockSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
