//! Pre-pass that bounds the plot axes before playback starts.
//!
//! Each object's plan is replayed on independent copies of its initial values
//! with a finer step than the real run. Only the extents are kept.

use serde::Serialize;

use crate::events::EventSequence;
use crate::sim::{ObjectState, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeEstimate {
    /// Longest nominal plan (sum of durations) over all objects.
    pub max_duration: f64,
    pub min_position: f64,
    pub max_position: f64,
    pub min_velocity: f64,
    pub max_velocity: f64,
}

impl Default for RangeEstimate {
    fn default() -> Self {
        Self {
            max_duration: 0.0,
            min_position: 0.0,
            max_position: 1.0,
            min_velocity: 0.0,
            max_velocity: 1.0,
        }
    }
}

/// Axis limits handed to the plotting layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisBounds {
    pub min_time: f64,
    pub max_time: f64,
    pub min_position: f64,
    pub max_position: f64,
    pub min_velocity: f64,
    pub max_velocity: f64,
}

impl RangeEstimate {
    /// Pads the time axis by `time_padding * max_duration` and each value axis by
    /// `value_padding * span` on both sides (a zero span counts as 1).
    pub fn axis_bounds(&self, time_padding: f64, value_padding: f64) -> AxisBounds {
        let pad = |lo: f64, hi: f64| {
            let span = (hi - lo).abs();
            let span = if span > 0.0 { span } else { 1.0 };
            value_padding * span
        };
        let pos_pad = pad(self.min_position, self.max_position);
        let vel_pad = pad(self.min_velocity, self.max_velocity);
        AxisBounds {
            min_time: 0.0,
            max_time: self.max_duration * (1.0 + time_padding),
            min_position: self.min_position - pos_pad,
            max_position: self.max_position + pos_pad,
            min_velocity: self.min_velocity - vel_pad,
            max_velocity: self.max_velocity + vel_pad,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Extents {
    min_x: f64,
    max_x: f64,
    min_v: f64,
    max_v: f64,
    samples: usize,
}

impl Extents {
    const EMPTY: Extents = Extents {
        min_x: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        min_v: f64::INFINITY,
        max_v: f64::NEG_INFINITY,
        samples: 0,
    };

    fn push(&mut self, p: &Phase) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_v = self.min_v.min(p.y);
        self.max_v = self.max_v.max(p.y);
        self.samples += 1;
    }

    fn merge(self, o: Extents) -> Extents {
        Extents {
            min_x: self.min_x.min(o.min_x),
            max_x: self.max_x.max(o.max_x),
            min_v: self.min_v.min(o.min_v),
            max_v: self.max_v.max(o.max_v),
            samples: self.samples + o.samples,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RangeEstimator {
    step: f64,
}

impl RangeEstimator {
    pub fn new(step: f64) -> Self {
        debug_assert!(step > 0.0);
        Self { step }
    }

    pub fn step(&self) -> f64 { self.step }

    /// Does not touch `objects`; their frozen initial values and sequences are copied.
    pub fn estimate(&self, objects: &[ObjectState]) -> RangeEstimate {
        let max_duration = objects
            .iter()
            .map(|o| o.sequence().total_duration())
            .fold(0.0, f64::max);

        let extents = self.replay_all(objects);

        let mut out = RangeEstimate { max_duration, ..RangeEstimate::default() };
        if extents.samples > 0 {
            out.min_position = extents.min_x;
            out.max_position = extents.max_x;
            out.min_velocity = extents.min_v;
            out.max_velocity = extents.max_v;
        }
        tracing::debug!(
            max_duration,
            samples = extents.samples,
            min_position = out.min_position,
            max_position = out.max_position,
            "range estimate"
        );
        out
    }

    #[cfg(not(feature = "parallel"))]
    fn replay_all(&self, objects: &[ObjectState]) -> Extents {
        objects
            .iter()
            .map(|o| self.replay(Phase::new(o.initial_position(), o.initial_velocity()), o.sequence()))
            .fold(Extents::EMPTY, Extents::merge)
    }

    #[cfg(feature = "parallel")]
    fn replay_all(&self, objects: &[ObjectState]) -> Extents {
        use rayon::prelude::*;
        objects
            .par_iter()
            .map(|o| self.replay(Phase::new(o.initial_position(), o.initial_velocity()), o.sequence()))
            .reduce(|| Extents::EMPTY, Extents::merge)
    }

    /// Each event gets `ceil(duration / step)` fine steps; the initial state is not recorded.
    fn replay(&self, mut phase: Phase, seq: &EventSequence) -> Extents {
        let dt = self.step;
        let mut ext = Extents::EMPTY;
        for event in seq {
            let steps = (event.duration() / dt).ceil() as usize;
            for _ in 0..steps {
                phase.y += event.acceleration() * dt;
                phase.x += phase.y * dt;
                ext.push(&phase);
            }
        }
        ext
    }
}
