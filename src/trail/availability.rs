use bevy::prelude::*;
use std::time::Duration;

use crate::tween::TweenEngine;

/// How often the monitor checks for the tween engine while it is missing
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvailabilityState {
    #[default]
    Unknown,
    /// Engine missing, presence checks running (or halted by `stop`)
    Pending,
    /// Engine seen at least once. Never reverts.
    Resolved,
}

/// Tracks whether the optional tween engine has shown up.
///
/// Single writer (the systems below), read by the animator at the
/// instant of every pointer move.
#[derive(Resource, Debug, Default)]
pub struct EngineMonitor {
    state: AvailabilityState,
    poll: Option<Timer>,
}

impl EngineMonitor {
    pub fn state(&self) -> AvailabilityState {
        self.state
    }

    pub fn is_resolved(&self) -> bool {
        self.state == AvailabilityState::Resolved
    }

    pub fn is_polling(&self) -> bool {
        self.poll.is_some()
    }

    /// Begin watching for the engine. Idempotent: once resolved, or while
    /// already polling, this does nothing.
    pub fn start(&mut self, engine_present: bool) {
        if self.is_resolved() {
            return;
        }
        if engine_present {
            self.resolve();
            return;
        }
        if self.poll.is_none() {
            self.state = AvailabilityState::Pending;
            self.poll = Some(Timer::new(POLL_INTERVAL, TimerMode::Repeating));
        }
    }

    /// Halt polling. The state is left as it is.
    pub fn stop(&mut self) {
        self.poll = None;
    }

    /// Advance the polling timer; true when a presence check is due
    pub fn tick(&mut self, delta: Duration) -> bool {
        match &mut self.poll {
            Some(timer) => timer.tick(delta).just_finished(),
            None => false,
        }
    }

    /// Record the result of a presence check
    pub fn observe(&mut self, engine_present: bool) {
        if engine_present {
            self.resolve();
        }
    }

    fn resolve(&mut self) {
        self.state = AvailabilityState::Resolved;
        self.poll = None;
    }
}

/// System: Initial presence check at startup
pub fn start_engine_monitor(mut monitor: ResMut<EngineMonitor>, engine: Option<Res<TweenEngine>>) {
    monitor.start(engine.is_some());
    if monitor.is_resolved() {
        info!("Tween engine available, trail will use staggered tweens");
    } else {
        debug!("Tween engine not available yet, polling every {:?}", POLL_INTERVAL);
    }
}

/// System: Repeating presence check while the engine is missing
pub fn poll_engine_availability(
    time: Res<Time>,
    mut monitor: ResMut<EngineMonitor>,
    engine: Option<Res<TweenEngine>>,
) {
    if !monitor.tick(time.delta()) {
        return;
    }

    monitor.observe(engine.is_some());
    if monitor.is_resolved() {
        info!("Tween engine detected, switching trail to staggered tweens");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unknown() {
        let monitor = EngineMonitor::default();
        assert_eq!(monitor.state(), AvailabilityState::Unknown);
        assert!(!monitor.is_polling());
    }

    #[test]
    fn test_start_with_engine_resolves_without_polling() {
        let mut monitor = EngineMonitor::default();
        monitor.start(true);
        assert_eq!(monitor.state(), AvailabilityState::Resolved);
        assert!(!monitor.is_polling());
    }

    #[test]
    fn test_start_without_engine_polls_every_interval() {
        let mut monitor = EngineMonitor::default();
        monitor.start(false);
        assert_eq!(monitor.state(), AvailabilityState::Pending);
        assert!(monitor.is_polling());

        assert!(!monitor.tick(Duration::from_millis(99)));
        assert!(monitor.tick(Duration::from_millis(1)));
        assert!(!monitor.tick(Duration::from_millis(50)));
        assert!(monitor.tick(Duration::from_millis(50)));
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut monitor = EngineMonitor::default();
        monitor.start(false);
        monitor.tick(Duration::from_millis(60));

        // A second start must not reset the running interval
        monitor.start(false);
        assert!(monitor.tick(Duration::from_millis(40)));
    }

    #[test]
    fn test_observe_resolves_and_stops_polling() {
        let mut monitor = EngineMonitor::default();
        monitor.start(false);

        monitor.observe(false);
        assert_eq!(monitor.state(), AvailabilityState::Pending);

        monitor.observe(true);
        assert_eq!(monitor.state(), AvailabilityState::Resolved);
        assert!(!monitor.is_polling());
        assert!(!monitor.tick(Duration::from_secs(1)));
    }

    #[test]
    fn test_stop_halts_without_resetting() {
        let mut monitor = EngineMonitor::default();
        monitor.start(false);
        monitor.stop();

        assert!(!monitor.is_polling());
        assert_eq!(monitor.state(), AvailabilityState::Pending);
        assert!(!monitor.tick(Duration::from_secs(1)));

        // Stopping when never started is harmless
        let mut idle = EngineMonitor::default();
        idle.stop();
        assert_eq!(idle.state(), AvailabilityState::Unknown);
    }

    #[test]
    fn test_resolved_never_reverts() {
        let mut monitor = EngineMonitor::default();
        monitor.start(true);
        monitor.stop();
        monitor.start(false);
        monitor.observe(false);
        assert_eq!(monitor.state(), AvailabilityState::Resolved);
        assert!(!monitor.is_polling());
    }

    #[test]
    fn test_polling_system_detects_late_engine() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<EngineMonitor>()
            .add_systems(Startup, start_engine_monitor)
            .add_systems(Update, poll_engine_availability);

        app.update();
        assert_eq!(
            app.world().resource::<EngineMonitor>().state(),
            AvailabilityState::Pending
        );

        app.insert_resource(TweenEngine::default());
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(50));
        app.update();
        assert!(!app.world().resource::<EngineMonitor>().is_resolved());

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(50));
        app.update();
        assert!(app.world().resource::<EngineMonitor>().is_resolved());
    }
}
