//! Staggered tween engine.
//!
//! The trail treats this engine as an optional collaborator: it only uses
//! it once a `TweenEngine` resource exists. `TweenPlugin` installs that
//! resource after a configurable load delay, or never when disabled.

mod easing;

use bevy::prelude::*;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

pub use easing::ease_out_quad;

pub struct TweenPlugin {
    /// `None` keeps the engine unavailable for the whole run
    pub load_delay: Option<Duration>,
    /// Duration of each target's tween
    pub duration: Duration,
}

impl Plugin for TweenPlugin {
    fn build(&self, app: &mut App) {
        match self.load_delay {
            Some(delay) if delay.is_zero() => {
                app.insert_resource(TweenEngine::new(self.duration));
            }
            Some(delay) => {
                app.insert_resource(EngineLoader {
                    timer: Timer::new(delay, TimerMode::Once),
                    duration: self.duration,
                });
            }
            None => info!("Tween engine disabled"),
        }

        app.add_systems(
            Update,
            (
                load_engine.run_if(resource_exists::<EngineLoader>),
                (start_requested_tweens, advance_tweens)
                    .chain()
                    .run_if(resource_exists::<TweenEngine>),
            ),
        );
    }
}

/// Position animated by the engine: window pixels, top-left origin
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct Translation2d(pub Vec2);

/// One "move these targets to here, staggered" request
#[derive(Debug, Clone, PartialEq)]
pub struct StaggerRequest {
    pub targets: Vec<Entity>,
    pub to: Vec2,
    /// Extra delay per target, in seconds
    pub stagger: f32,
}

/// The engine itself. Requests queue here until the next `Update`.
#[derive(Resource, Debug)]
pub struct TweenEngine {
    duration: Duration,
    requests: Vec<StaggerRequest>,
}

impl Default for TweenEngine {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

impl TweenEngine {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            requests: Vec::new(),
        }
    }

    /// Animate every target's `Translation2d` to `to`; target `i` starts
    /// `i * stagger` seconds after the first. Moves already queued on a
    /// target keep their start time.
    pub fn to(&mut self, targets: &[Entity], to: Vec2, stagger: f32) {
        self.requests.push(StaggerRequest {
            targets: targets.to_vec(),
            to,
            stagger,
        });
    }

    /// Requests not yet turned into tweens
    pub fn pending(&self) -> &[StaggerRequest] {
        &self.requests
    }
}

/// Pending installation of the engine
#[derive(Resource, Debug)]
struct EngineLoader {
    timer: Timer,
    duration: Duration,
}

/// Moves queued on one target.
///
/// Each move starts once its own delay has run out, counted from when it
/// was requested, so later requests never push an earlier start back.
/// A move that starts takes over from the one running, seeded with the
/// current value. Under a steady stream of requests the target replays
/// the requested path with a lag.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Tween {
    duration: f32,
    queued: VecDeque<QueuedMove>,
    active: Option<ActiveMove>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct QueuedMove {
    to: Vec2,
    /// Seconds left before the move starts
    remaining: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveMove {
    from: Vec2,
    to: Vec2,
    elapsed: f32,
}

impl Tween {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            queued: VecDeque::new(),
            active: None,
        }
    }

    /// Queue a move to `to` starting `delay` seconds from now
    pub fn queue(&mut self, to: Vec2, delay: f32) {
        self.queued.push_back(QueuedMove {
            to,
            remaining: delay,
        });
    }

    /// Destination of the most recent request
    pub fn target(&self) -> Option<Vec2> {
        self.queued
            .back()
            .map(|queued| queued.to)
            .or(self.active.map(|active| active.to))
    }

    /// Seconds until the next queued move starts
    pub fn next_start(&self) -> Option<f32> {
        self.queued
            .iter()
            .map(|queued| queued.remaining)
            .reduce(f32::min)
    }

    /// Advance by `dt` seconds and return the new value, if a move has started.
    /// `current` seeds the start point of a move that starts this step.
    pub fn step(&mut self, dt: f32, current: Vec2) -> Option<Vec2> {
        // Of the moves starting this step, the latest one wins
        let mut started: Option<QueuedMove> = None;
        self.queued.retain_mut(|queued| {
            queued.remaining -= dt;
            if queued.remaining > 0.0 {
                return true;
            }
            if started.is_none_or(|latest| queued.remaining >= latest.remaining) {
                started = Some(*queued);
            }
            false
        });

        if let Some(next) = started {
            self.active = Some(ActiveMove {
                from: current,
                to: next.to,
                elapsed: -next.remaining,
            });
        } else if let Some(active) = self.active.as_mut() {
            active.elapsed += dt;
        }

        let active = self.active?;
        let progress = if self.duration > 0.0 {
            (active.elapsed / self.duration).min(1.0)
        } else {
            1.0
        };

        Some(active.from.lerp(active.to, ease_out_quad(progress)))
    }

    pub fn is_finished(&self) -> bool {
        self.queued.is_empty()
            && self
                .active
                .is_none_or(|active| active.elapsed >= self.duration)
    }
}

fn load_engine(
    time: Res<Time>,
    mut commands: Commands,
    mut loader: ResMut<EngineLoader>,
) {
    if loader.timer.tick(time.delta()).just_finished() {
        commands.insert_resource(TweenEngine::new(loader.duration));
        commands.remove_resource::<EngineLoader>();
        info!("Tween engine loaded");
    }
}

/// System: Queue requested moves on each target's `Tween`
fn start_requested_tweens(
    mut commands: Commands,
    mut engine: ResMut<TweenEngine>,
    mut running: Query<&mut Tween>,
) {
    let duration = engine.duration.as_secs_f32();
    let mut fresh: HashMap<Entity, Tween> = HashMap::new();

    for request in engine.requests.drain(..) {
        for (i, &target) in request.targets.iter().enumerate() {
            let delay = i as f32 * request.stagger;
            if let Ok(mut tween) = running.get_mut(target) {
                tween.queue(request.to, delay);
            } else {
                fresh
                    .entry(target)
                    .or_insert_with(|| Tween::new(duration))
                    .queue(request.to, delay);
            }
        }
    }

    for (target, tween) in fresh {
        // Target may have been despawned since the request was issued
        if let Ok(mut entity) = commands.get_entity(target) {
            entity.try_insert(tween);
        }
    }
}

/// System: Step every running tween
fn advance_tweens(
    time: Res<Time>,
    mut commands: Commands,
    mut tweens: Query<(Entity, &mut Tween, &mut Translation2d)>,
) {
    let dt = time.delta_secs();

    for (entity, mut tween, mut translation) in &mut tweens {
        if let Some(value) = tween.step(dt, translation.0) {
            translation.0 = value;
        }
        if tween.is_finished() {
            commands.entity(entity).try_remove::<Tween>();
        }
    }
}
