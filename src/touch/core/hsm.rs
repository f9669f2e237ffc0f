use super::super::types::TouchEventKind;
use super::*;
use statig::prelude::*;

pub(super) struct TouchHsm {
    config: GestureConfig,
    pub(super) state: TouchState,
}

#[state_machine(initial = "State::idle()")]
impl TouchHsm {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &TouchHsmEvent) -> Outcome<State> {
        match event {
            TouchHsmEvent::Sample { now_ms, point } => {
                self.expire_tap_window(*now_ms);
                match point {
                    Some(point) => {
                        self.begin_press(context, *now_ms, *point);
                        Transition(State::pressed())
                    }
                    None => Handled,
                }
            }
        }
    }

    #[state]
    fn pressed(&mut self, context: &mut DispatchContext, event: &TouchHsmEvent) -> Outcome<State> {
        match event {
            TouchHsmEvent::Sample { now_ms, point } => {
                self.expire_tap_window(*now_ms);
                match point {
                    Some(point) => {
                        self.track_press(context, *now_ms, *point);
                        Handled
                    }
                    None => {
                        self.finish_press(context, *now_ms);
                        Transition(State::idle())
                    }
                }
            }
        }
    }
}

impl TouchHsm {
    pub(super) fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: TouchState::default(),
        }
    }

    fn begin_press(&mut self, context: &mut DispatchContext, now_ms: u64, point: TouchPoint) {
        let state = &mut self.state;
        state.is_pressed = true;
        state.start_point = point;
        state.current_point = point;
        state.last_point = point;
        state.press_start_ms = now_ms;
        state.last_event_ms = now_ms;
        state.long_press_triggered = false;

        log::debug!("touch: down ({},{})", point.x, point.y);
        context.emit(self.build_event(TouchEventKind::Down, now_ms, point));
    }

    fn track_press(&mut self, context: &mut DispatchContext, now_ms: u64, point: TouchPoint) {
        if axis_travel(point, self.state.current_point) >= self.config.touch_threshold_px {
            self.state.last_point = self.state.current_point;
            self.state.current_point = point;
            self.state.last_event_ms = now_ms;
            context.emit(self.build_event(TouchEventKind::Move, now_ms, point));
        }

        if !self.state.long_press_triggered
            && now_ms.saturating_sub(self.state.press_start_ms) > self.config.long_press_ms
        {
            self.state.long_press_triggered = true;
            let current = self.state.current_point;
            log::debug!("touch: long press ({},{})", current.x, current.y);
            context.emit(self.build_event(TouchEventKind::LongPress, now_ms, current));
        }
    }

    fn finish_press(&mut self, context: &mut DispatchContext, now_ms: u64) {
        self.state.is_pressed = false;
        let duration_ms = now_ms.saturating_sub(self.state.press_start_ms);
        let kind = self.classify_release(now_ms, duration_ms);

        let current = self.state.current_point;
        log::debug!(
            "touch: {} ({},{}) duration={}ms",
            kind,
            current.x,
            current.y,
            duration_ms
        );
        context.emit(self.build_event(kind, now_ms, current));
    }

    fn classify_release(&mut self, now_ms: u64, duration_ms: u64) -> TouchEventKind {
        // A long press always resolves as a plain release.
        if self.state.long_press_triggered {
            return TouchEventKind::Up;
        }

        if let Some(direction) = detect_swipe(
            self.state.start_point,
            self.state.current_point,
            self.config.min_gesture_distance_px,
        ) {
            return TouchEventKind::Swipe(direction);
        }

        if duration_ms >= self.config.double_tap_ms {
            return TouchEventKind::Up;
        }

        if self.state.tap_count > 0
            && now_ms.saturating_sub(self.state.last_event_ms) < self.config.double_tap_ms
        {
            self.state.tap_count = 0;
            TouchEventKind::DoubleTap
        } else {
            self.state.tap_count = 1;
            self.state.last_event_ms = now_ms;
            TouchEventKind::Up
        }
    }

    // Runs before the sample is handled; a new press overwrites `last_event_ms`.
    fn expire_tap_window(&mut self, now_ms: u64) {
        if self.state.tap_count > 0
            && now_ms.saturating_sub(self.state.last_event_ms) > self.config.double_tap_ms
        {
            self.state.tap_count = 0;
        }
    }

    fn build_event(&self, kind: TouchEventKind, now_ms: u64, point: TouchPoint) -> TouchEvent {
        TouchEvent::new(kind, now_ms, point, self.state.start_point)
    }
}
