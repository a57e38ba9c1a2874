use serde::Serialize;

use crate::clock::{SimulationClock, TickOutcome};
use crate::config::{ConfigError, EngineConfig};
use crate::range::{AxisBounds, RangeEstimate, RangeEstimator};
use crate::sim::{ObjectConfig, ObjectId, ObjectSnapshot, ObjectState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    Idle,
    Running,
    Paused,
    Finished,
}

impl PlaybackStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PlaybackStatus::Idle => "idle",
            PlaybackStatus::Running => "running",
            PlaybackStatus::Paused => "paused",
            PlaybackStatus::Finished => "finished",
        }
    }
}

/// Source of "next frame" callbacks.
///
/// The controller asks for at most one pending frame at a time; whoever owns
/// the driver calls [`SimulationController::on_frame`] when that frame fires.
pub trait TickDriver {
    fn request_next_tick(&mut self);
    fn cancel(&mut self);
}

/// Driver for loops that step frames by hand (tests, headless runs, the wasm
/// bindings where JS polls it from `requestAnimationFrame`).
#[derive(Debug, Clone, Default)]
pub struct ManualDriver {
    pending: bool,
    requested: usize,
}

impl ManualDriver {
    pub fn is_pending(&self) -> bool { self.pending }

    /// Total frames requested since creation.
    pub fn requested(&self) -> usize { self.requested }

    /// Consumes the pending request, if any.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl TickDriver for ManualDriver {
    fn request_next_tick(&mut self) {
        self.pending = true;
        self.requested += 1;
    }

    fn cancel(&mut self) {
        self.pending = false;
    }
}

/// Owns every object and runs the play/pause/reset state machine.
pub struct SimulationController<D: TickDriver = ManualDriver> {
    config: EngineConfig,
    objects: Vec<ObjectState>,
    next_id: u32,
    clock: SimulationClock,
    estimator: RangeEstimator,
    estimate: Option<RangeEstimate>,
    status: PlaybackStatus,
    speed: f64,
    driver: D,
}

impl SimulationController<ManualDriver> {
    pub fn manual(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::new(config, ManualDriver::default())
    }

    /// Serves frames until nothing is pending. Returns the number of frames served.
    pub fn run_pending(&mut self) -> usize {
        let mut frames = 0;
        while self.driver.take_pending() {
            self.on_frame();
            frames += 1;
        }
        frames
    }
}

impl<D: TickDriver> SimulationController<D> {
    pub fn new(config: EngineConfig, driver: D) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            objects: Vec::new(),
            next_id: 0,
            clock: SimulationClock::new(config.step_size),
            estimator: RangeEstimator::new(config.estimate_step),
            estimate: None,
            status: PlaybackStatus::Idle,
            speed: 1.0,
            driver,
        })
    }

    pub fn config(&self) -> &EngineConfig { &self.config }
    pub fn status(&self) -> PlaybackStatus { self.status }
    pub fn sim_time(&self) -> f64 { self.clock.sim_time() }
    pub fn driver(&self) -> &D { &self.driver }
    pub fn driver_mut(&mut self) -> &mut D { &mut self.driver }

    pub fn len(&self) -> usize { self.objects.len() }
    pub fn is_empty(&self) -> bool { self.objects.is_empty() }

    /// Objects in insertion order.
    pub fn objects(&self) -> &[ObjectState] { &self.objects }

    pub fn object(&self, id: ObjectId) -> Option<&ObjectState> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(ObjectState::id).collect()
    }

    pub fn snapshots(&self) -> Vec<ObjectSnapshot> {
        self.objects.iter().map(ObjectState::snapshot).collect()
    }

    /// Estimate from the last fresh start.
    pub fn range_estimate(&self) -> Option<&RangeEstimate> { self.estimate.as_ref() }

    pub fn axis_bounds(&self) -> Option<AxisBounds> {
        self.estimate
            .map(|e| e.axis_bounds(self.config.time_padding, self.config.value_padding))
    }

    pub fn add_object(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(ObjectState::new(id));
        tracing::debug!(%id, "object added");
        id
    }

    /// Adds an object with an authored config already in place.
    pub fn add_configured(&mut self, config: ObjectConfig) -> ObjectId {
        let id = self.add_object();
        self.set_config(id, config);
        id
    }

    /// Deleting an unknown id does nothing.
    pub fn delete_object(&mut self, id: ObjectId) -> bool {
        let before = self.objects.len();
        self.objects.retain(|o| o.id() != id);
        let removed = self.objects.len() != before;
        if removed {
            tracing::debug!(%id, "object deleted");
        }
        removed
    }

    /// Replaces an object's authored config; it takes effect at the next fresh start.
    pub fn set_config(&mut self, id: ObjectId, config: ObjectConfig) -> bool {
        match self.objects.iter_mut().find(|o| o.id() == id) {
            Some(obj) => {
                obj.config = config;
                true
            }
            None => false,
        }
    }

    pub fn config_mut(&mut self, id: ObjectId) -> Option<&mut ObjectConfig> {
        self.objects
            .iter_mut()
            .find(|o| o.id() == id)
            .map(|o| &mut o.config)
    }

    pub fn playback_speed(&self) -> f64 { self.speed }

    /// Only changes how often frames should be requested. Non-positive or
    /// non-finite values are ignored.
    pub fn set_playback_speed(&mut self, speed: f64) {
        if speed.is_finite() && speed > 0.0 {
            self.speed = speed;
        } else {
            tracing::warn!(speed, "ignoring invalid playback speed");
        }
    }

    /// Wall-clock seconds between frames so that speed 1 plays in real time.
    pub fn frame_interval(&self) -> f64 {
        self.config.step_size / self.speed
    }

    pub fn play(&mut self) {
        match self.status {
            PlaybackStatus::Running => return,
            PlaybackStatus::Paused => {
                tracing::info!(time = self.clock.sim_time(), "resume");
            }
            PlaybackStatus::Idle | PlaybackStatus::Finished => {
                for obj in self.objects.iter_mut() {
                    obj.restart();
                }
                self.estimate = Some(self.estimator.estimate(&self.objects));
                self.clock.reset();
                tracing::info!(objects = self.objects.len(), "play");
            }
        }
        self.status = PlaybackStatus::Running;
        self.driver.request_next_tick();
    }

    pub fn pause(&mut self) {
        if self.status != PlaybackStatus::Running {
            return;
        }
        self.driver.cancel();
        self.status = PlaybackStatus::Paused;
        tracing::info!(time = self.clock.sim_time(), "pause");
    }

    /// Back to `Idle` with empty traces. Authored configs are kept.
    pub fn reset(&mut self) {
        self.driver.cancel();
        for obj in self.objects.iter_mut() {
            obj.rewind();
        }
        self.clock.reset();
        if self.status != PlaybackStatus::Idle {
            tracing::info!("reset");
        }
        self.status = PlaybackStatus::Idle;
    }

    /// Frame callback: one tick if running, then asks for the next frame unless done.
    pub fn on_frame(&mut self) -> PlaybackStatus {
        if self.status != PlaybackStatus::Running {
            return self.status;
        }
        match self.clock.tick(&mut self.objects) {
            TickOutcome::Continue => self.driver.request_next_tick(),
            TickOutcome::Complete => {
                self.status = PlaybackStatus::Finished;
                self.driver.cancel();
                tracing::info!(time = self.clock.sim_time(), "finished");
            }
        }
        self.status
    }
}
