use statig::blocking::IntoStateMachineExt as _;

mod gesture;
mod hsm;

use hsm::TouchHsm;

pub(crate) use gesture::{axis_travel, detect_swipe};

use super::types::{TouchEvent, TouchPoint, TouchState};
use crate::config::GestureConfig;

#[derive(Clone, Copy, Debug)]
enum TouchHsmEvent {
    Sample {
        now_ms: u64,
        point: Option<TouchPoint>,
    },
}

#[derive(Clone, Copy, Debug, Default)]
struct DispatchContext {
    event: Option<TouchEvent>,
}

impl DispatchContext {
    // One event per poll: a later emission in the same poll replaces the earlier one.
    fn emit(&mut self, event: TouchEvent) {
        self.event = Some(event);
    }

    fn finish(self) -> Option<TouchEvent> {
        self.event
    }
}

/// Single-finger press classifier: `Down`, `Move`, `LongPress`, then one of
/// `Up`, `DoubleTap` or a swipe on release.
pub struct TouchClassifier {
    config: GestureConfig,
    machine: statig::blocking::StateMachine<TouchHsm>,
}

impl Default for TouchClassifier {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl TouchClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            machine: TouchHsm::new(config).state_machine(),
        }
    }

    /// Advances by one poll. `point` is the calibrated sample, `None` when the
    /// panel reported no contact or the read failed.
    pub fn tick(&mut self, now_ms: u64, point: Option<TouchPoint>) -> Option<TouchEvent> {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&TouchHsmEvent::Sample { now_ms, point }, &mut context);
        context.finish()
    }

    pub fn reset(&mut self) {
        self.machine = TouchHsm::new(self.config).state_machine();
    }

    pub fn state(&self) -> TouchState {
        self.machine.inner().state
    }

    pub fn is_pressed(&self) -> bool {
        self.machine.inner().state.is_pressed
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }
}
