use crate::integrator;
use crate::sim::ObjectState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// At least one object still has events; the clock moved forward.
    Continue,
    /// Every object is done; the clock did not move.
    Complete,
}

/// Global simulated time for one run.
///
/// Time is kept as a tick count so that the k-th sample is stamped exactly
/// `k * step_size`, without accumulated rounding.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    ticks: u64,
    step_size: f64,
}

impl SimulationClock {
    pub fn new(step_size: f64) -> Self {
        debug_assert!(step_size > 0.0);
        Self { ticks: 0, step_size }
    }

    pub fn sim_time(&self) -> f64 { self.ticks as f64 * self.step_size }
    pub fn step_size(&self) -> f64 { self.step_size }
    pub fn ticks(&self) -> u64 { self.ticks }

    pub fn reset(&mut self) { self.ticks = 0; }

    /// Steps every unfinished object once, in slice order.
    pub fn tick(&mut self, objects: &mut [ObjectState]) -> TickOutcome {
        let time = self.sim_time();
        let dt = self.step_size;

        let mut all_done = true;
        for obj in objects.iter_mut() {
            if !integrator::step(obj, time, dt).is_finished() {
                all_done = false;
            }
        }

        if all_done {
            tracing::trace!(time, "all objects finished");
            return TickOutcome::Complete;
        }

        self.ticks += 1;
        tracing::trace!(time = self.sim_time(), "tick");
        TickOutcome::Continue
    }
}
