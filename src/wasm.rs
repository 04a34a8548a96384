//! WebAssembly bindings for the replay controller.
//!
//! The browser owns the drawing and the event loop: it forwards button and
//! selector events to the controller, calls `poll()` from a
//! `requestAnimationFrame` or `setInterval` callback, and draws whatever
//! `takeFrame()` hands back.

use std::time::Duration;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{
    playback::{Clock, PlaybackDriver, Presenter, RenderHint},
    replay::{DataState, OperationLog, ReplayEngine, ReplayError},
    schema::PlaybackConfig,
    trace::heap_sort_trace,
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

/// Wall clock based on `Date.now()`.
#[derive(Debug, Clone, Copy, Default)]
struct WasmClock;

impl Clock for WasmClock {
    fn now(&self) -> Duration {
        Duration::from_secs_f64(js_sys::Date::now() / 1000.0)
    }
}

/// Serializable frame handed to JavaScript.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Frame {
    position: usize,
    /// Transition duration in milliseconds; 0 means draw instantly.
    animation_ms: u64,
    state: DataState,
}

/// Keeps only the newest frame; older ones are superseded.
#[derive(Default)]
struct FrameSlot {
    pending: Option<Frame>,
    error: Option<String>,
}

impl Presenter for FrameSlot {
    fn render(&mut self, state: &DataState, position: usize, hint: RenderHint) {
        self.pending = Some(Frame {
            position,
            animation_ms: hint.duration().as_millis() as u64,
            state: state.clone(),
        });
    }

    fn fatal(&mut self, error: &ReplayError) {
        self.error = Some(error.to_string());
    }
}

/// WebAssembly wrapper for the playback driver.
#[wasm_bindgen]
pub struct WasmReplayController {
    driver: PlaybackDriver<WasmClock, FrameSlot>,
}

#[wasm_bindgen]
impl WasmReplayController {
    /// Create a controller from a JSON operation log.
    ///
    /// # Arguments
    /// * `log_json` - JSON array of operations
    /// * `config_json` - JSON PlaybackConfig, or an empty string for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(log_json: &str, config_json: &str) -> Result<WasmReplayController, JsValue> {
        let log = OperationLog::from_json_str(log_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid log JSON: {e}")))?;
        Self::from_log(log, config_json)
    }

    /// Create a controller replaying a heap sort of `values_json` (a JSON array of integers).
    #[wasm_bindgen(js_name = fromValues)]
    pub fn from_values(values_json: &str, config_json: &str) -> Result<WasmReplayController, JsValue> {
        let values: Vec<i64> = serde_json::from_str(values_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid values JSON: {e}")))?;
        Self::from_log(heap_sort_trace(&values), config_json)
    }

    #[wasm_bindgen(js_name = seekTo)]
    pub fn seek_to(&mut self, position: i32) -> Result<(), JsValue> {
        self.driver.seek_to(position as i64).map_err(to_js)
    }

    #[wasm_bindgen(js_name = stepForward)]
    pub fn step_forward(&mut self) -> Result<(), JsValue> {
        self.driver.step_forward().map_err(to_js)
    }

    #[wasm_bindgen(js_name = stepBackward)]
    pub fn step_backward(&mut self) -> Result<(), JsValue> {
        self.driver.step_backward().map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.driver.reset().map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn play(&mut self) -> Result<(), JsValue> {
        self.driver.play().map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn pause(&mut self) {
        self.driver.pause();
    }

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&mut self) -> Result<(), JsValue> {
        self.driver.toggle_play().map_err(to_js)
    }

    /// Run due timers. Call regularly from the page's event loop.
    #[wasm_bindgen]
    pub fn poll(&mut self) -> Result<(), JsValue> {
        self.driver.poll().map_err(to_js)
    }

    /// Take the newest unrendered frame, or `null` if nothing changed.
    #[wasm_bindgen(js_name = takeFrame)]
    pub fn take_frame(&mut self) -> Result<JsValue, JsValue> {
        match self.driver.presenter_mut().pending.take() {
            Some(frame) => serde_wasm_bindgen::to_value(&frame)
                .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}"))),
            None => Ok(JsValue::NULL),
        }
    }

    /// Get the current data state as JSON.
    #[wasm_bindgen(js_name = getSnapshot)]
    pub fn get_snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.driver.snapshot())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Numbered operation labels for the operation selector.
    #[wasm_bindgen(js_name = getLabels)]
    pub fn get_labels(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.driver.engine().log().labels())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Message of the fatal error that halted navigation, if any.
    #[wasm_bindgen(js_name = getFatalError)]
    pub fn get_fatal_error(&self) -> Option<String> {
        self.driver.presenter().error.clone()
    }

    #[wasm_bindgen(js_name = currentPosition)]
    pub fn current_position(&self) -> usize {
        self.driver.current_position()
    }

    #[wasm_bindgen(js_name = operationCount)]
    pub fn operation_count(&self) -> usize {
        self.driver.engine().log().len()
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.driver.is_playing()
    }
}

impl WasmReplayController {
    fn from_log(log: OperationLog, config_json: &str) -> Result<WasmReplayController, JsValue> {
        let config: PlaybackConfig = if config_json.trim().is_empty() {
            PlaybackConfig::default()
        } else {
            serde_json::from_str(config_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {e}")))?
        };

        let engine = ReplayEngine::new(log).map_err(to_js)?;
        let driver = PlaybackDriver::new(engine, config, WasmClock, FrameSlot::default())
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;

        Ok(WasmReplayController { driver })
    }
}

fn to_js(err: ReplayError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
