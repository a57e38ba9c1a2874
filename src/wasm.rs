#![cfg(target_arch = "wasm32")]

use crate::engine::{PlaybackStatus, SimulationController};
use crate::sim::{ObjectConfig, ObjectId};
use crate::EngineConfig;
use wasm_bindgen::prelude::*;

const PALETTE: [&str; 6] = ["red", "cyan", "lime", "yellow", "magenta", "orange"];

/// Display color for an object. Keyed by id so it survives deletes of other objects.
#[wasm_bindgen(js_name = "colorFor")]
pub fn color_for(id: u32) -> String {
    PALETTE[id as usize % PALETTE.len()].to_string()
}

#[wasm_bindgen(js_name = "defaultConfig")]
pub fn default_config() -> JsValue {
    serde_wasm_bindgen::to_value(&EngineConfig::default()).unwrap_or(JsValue::NULL)
}

/// Browser handle. JS drives it from `requestAnimationFrame`:
///
/// ```js
/// sim.play();
/// const loop = () => { if (sim.frame()) requestAnimationFrame(loop); redraw(); };
/// requestAnimationFrame(loop);
/// ```
#[wasm_bindgen]
pub struct WasmKinematics {
    controller: SimulationController,
}

#[wasm_bindgen]
impl WasmKinematics {
    /// `config` may be `undefined` or a partial `{ stepSize, estimateStep, timePadding, valuePadding }`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmKinematics, JsValue> {
        let config: EngineConfig = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("invalid config: {}", e)))?
        };
        let controller = SimulationController::manual(config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmKinematics { controller })
    }

    pub fn len(&self) -> usize { self.controller.len() }

    pub fn ids(&self) -> Vec<u32> {
        self.controller.ids().into_iter().map(|id| id.0).collect()
    }

    #[wasm_bindgen(js_name = "addObject")]
    pub fn add_object(&mut self) -> u32 { self.controller.add_object().0 }

    #[wasm_bindgen(js_name = "deleteObject")]
    pub fn delete_object(&mut self, id: u32) -> bool {
        self.controller.delete_object(ObjectId(id))
    }

    /// `{ initialPosition, initialVelocity, events: [{ acc, dur }] }`; numbers may be strings.
    #[wasm_bindgen(js_name = "setObject")]
    pub fn set_object(&mut self, id: u32, config: JsValue) -> Result<bool, JsValue> {
        let config: ObjectConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("invalid object config: {}", e)))?;
        Ok(self.controller.set_config(ObjectId(id), config))
    }

    pub fn play(&mut self) { self.controller.play(); }

    pub fn pause(&mut self) { self.controller.pause(); }

    pub fn reset(&mut self) { self.controller.reset(); }

    /// Serves one pending frame. Returns whether another frame is wanted.
    pub fn frame(&mut self) -> bool {
        if self.controller.driver_mut().take_pending() {
            self.controller.on_frame();
        }
        self.controller.driver().is_pending()
    }

    #[wasm_bindgen(js_name = "setSpeed")]
    pub fn set_speed(&mut self, speed: f64) { self.controller.set_playback_speed(speed); }

    #[wasm_bindgen(js_name = "frameIntervalMs")]
    pub fn frame_interval_ms(&self) -> f64 { self.controller.frame_interval() * 1000.0 }

    pub fn status(&self) -> String { self.controller.status().as_str().to_string() }

    #[wasm_bindgen(js_name = "isFinished")]
    pub fn is_finished(&self) -> bool { self.controller.status() == PlaybackStatus::Finished }

    #[wasm_bindgen(js_name = "simTime")]
    pub fn sim_time(&self) -> f64 { self.controller.sim_time() }

    /// `{ minTime, maxTime, minPosition, maxPosition, minVelocity, maxVelocity }` or `null` before the first run.
    pub fn axes(&self) -> JsValue {
        match self.controller.axis_bounds() {
            Some(axes) => serde_wasm_bindgen::to_value(&axes).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    /// Flattened `[t, x, v]*` samples; empty for unknown ids.
    pub fn trace(&self, id: u32) -> js_sys::Float32Array {
        let Some(obj) = self.controller.object(ObjectId(id)) else {
            return js_sys::Float32Array::new_with_length(0);
        };
        let mut out = Vec::with_capacity(obj.trace().len() * 3);
        for s in obj.trace() {
            out.push(s.time as f32);
            out.push(s.position as f32);
            out.push(s.velocity as f32);
        }
        js_sys::Float32Array::from(&out[..])
    }

    pub fn snapshots(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.controller.snapshots()).unwrap_or(JsValue::NULL)
    }
}
