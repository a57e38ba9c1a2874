use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::events::{lenient_number, EventSequence, RawEvent};

/// Phase state `[position, velocity]` of a point mass on a line.
pub type Phase = Vector2<f64>;

/// Stable identity of an object, never reused while the controller lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u32);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Authored configuration of one object. Editable at any time, read at the start of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectConfig {
    #[serde(default, deserialize_with = "lenient_number")]
    pub initial_position: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub initial_velocity: f64,
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

impl ObjectConfig {
    pub fn new(initial_position: f64, initial_velocity: f64) -> Self {
        Self {
            initial_position,
            initial_velocity,
            events: Vec::new(),
        }
    }

    pub fn with_event(mut self, acceleration: f64, duration: f64) -> Self {
        self.events.push(RawEvent::new(acceleration, duration));
        self
    }
}

/// One trace point: `time` is the simulated time at the start of the step
/// that produced `position`/`velocity`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub time: f64,
    pub position: f64,
    pub velocity: f64,
}

/// Current kinematic state of an object, for status displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSnapshot {
    pub id: ObjectId,
    pub position: f64,
    pub velocity: f64,
    pub event_index: usize,
    pub event_count: usize,
    pub finished: bool,
    pub samples: usize,
}

/// Mutable per-object simulation state.
///
/// `config` is what the user authored; `sequence`, `initial` and the phase are
/// frozen copies taken by [`ObjectState::restart`] at the start of each run.
#[derive(Debug, Clone)]
pub struct ObjectState {
    id: ObjectId,
    pub config: ObjectConfig,
    sequence: EventSequence,
    initial: Phase,
    pub(crate) phase: Phase,
    pub(crate) event_index: usize,
    pub(crate) time_in_event: f64,
    pub(crate) trace: Vec<Sample>,
}

impl ObjectState {
    /// Empty plan at rest at the origin; finished until the next restart picks up a config.
    pub fn new(id: ObjectId) -> Self {
        Self::with_config(id, ObjectConfig::default())
    }

    pub fn with_config(id: ObjectId, config: ObjectConfig) -> Self {
        let mut s = Self {
            id,
            config,
            sequence: EventSequence::default(),
            initial: Phase::zeros(),
            phase: Phase::zeros(),
            event_index: 0,
            time_in_event: 0.0,
            trace: Vec::new(),
        };
        s.restart();
        s
    }

    /// Re-reads the authored config and rewinds to the start of a run.
    pub fn restart(&mut self) {
        let position = crate::events::finite_or_zero(self.config.initial_position);
        let velocity = crate::events::finite_or_zero(self.config.initial_velocity);
        self.initial = Phase::new(position, velocity);
        self.sequence = EventSequence::build(&self.config.events);
        self.rewind();
    }

    /// Rewinds to the frozen initial state, keeping the frozen sequence.
    pub fn rewind(&mut self) {
        self.phase = self.initial;
        self.event_index = 0;
        self.time_in_event = 0.0;
        self.trace.clear();
    }

    pub fn id(&self) -> ObjectId { self.id }
    pub fn sequence(&self) -> &EventSequence { &self.sequence }
    pub fn initial_position(&self) -> f64 { self.initial.x }
    pub fn initial_velocity(&self) -> f64 { self.initial.y }
    pub fn position(&self) -> f64 { self.phase.x }
    pub fn velocity(&self) -> f64 { self.phase.y }
    pub fn event_index(&self) -> usize { self.event_index }
    pub fn time_in_event(&self) -> f64 { self.time_in_event }
    pub fn trace(&self) -> &[Sample] { &self.trace }

    pub fn is_finished(&self) -> bool {
        self.event_index >= self.sequence.len()
    }

    pub fn snapshot(&self) -> ObjectSnapshot {
        ObjectSnapshot {
            id: self.id,
            position: self.position(),
            velocity: self.velocity(),
            event_index: self.event_index,
            event_count: self.sequence.len(),
            finished: self.is_finished(),
            samples: self.trace.len(),
        }
    }
}
