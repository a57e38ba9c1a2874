//! Fixed-step semi-implicit Euler integrator for a single object.
//!
//! Velocity is updated first and the new velocity moves the position:
//!
//! ```text
//! v_{n+1} = v_n + a * dt
//! x_{n+1} = x_n + v_{n+1} * dt
//! ```
//!
//! An event ends on the step where its elapsed time reaches the duration.
//! The step is not split at the boundary, so an event may run up to one
//! step past its nominal end.

use crate::sim::{ObjectState, Sample};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The object moved and still has events left.
    Advanced,
    /// The object moved and this step completed its last event.
    Finished,
    /// Nothing to do: the object was done before the call.
    AlreadyFinished,
}

impl StepOutcome {
    pub fn is_finished(self) -> bool {
        !matches!(self, StepOutcome::Advanced)
    }
}

/// Advance `state` by one step of `dt`, recording a sample stamped with `time`
/// (the clock's time before this step).
pub fn step(state: &mut ObjectState, time: f64, dt: f64) -> StepOutcome {
    debug_assert!(dt > 0.0, "step size must be positive");

    let Some(event) = state.sequence().get(state.event_index).copied() else {
        return StepOutcome::AlreadyFinished;
    };

    state.phase.y += event.acceleration() * dt;
    state.phase.x += state.phase.y * dt;

    state.time_in_event += dt;
    if state.time_in_event >= event.duration() {
        state.event_index += 1;
        state.time_in_event = 0.0;
    }

    state.trace.push(Sample {
        time,
        position: state.phase.x,
        velocity: state.phase.y,
    });

    if state.is_finished() {
        StepOutcome::Finished
    } else {
        StepOutcome::Advanced
    }
}
