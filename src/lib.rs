//! Point masses on a line driven by piecewise-constant acceleration plans.
//!
//! Every object has an initial position/velocity and an ordered list of
//! `(acceleration, duration)` events. [`SimulationController`] advances all
//! objects with a fixed semi-implicit Euler step, one tick per frame callback,
//! and records a `{time, position, velocity}` trace per object for plotting.

pub mod clock;
pub mod config;
pub mod engine;
pub mod events;
pub mod integrator;
pub mod range;
pub mod sim;

pub use clock::{SimulationClock, TickOutcome};
pub use config::{ConfigError, EngineConfig};
pub use engine::{ManualDriver, PlaybackStatus, SimulationController, TickDriver};
pub use events::{parse_number, Event, EventSequence, RawEvent};
pub use integrator::StepOutcome;
pub use range::{AxisBounds, RangeEstimate, RangeEstimator};
pub use sim::{ObjectConfig, ObjectId, ObjectSnapshot, ObjectState, Sample};

#[cfg(target_arch = "wasm32")]
pub mod wasm;
