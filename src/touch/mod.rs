mod areas;
mod burn_in;
pub mod calibration;
mod core;
mod source;
mod types;

use embedded_storage::{ReadStorage, Storage};

pub use areas::{RegistryError, TouchAreaRegistry};
pub use burn_in::BurnInShifter;
pub use self::core::TouchClassifier;
pub use source::{SampleError, TouchSampleSource};
pub use types::{
    AreaLayout, DisplayOffset, RawTouch, SwipeDirection, TouchArea, TouchEvent, TouchEventKind,
    TouchPoint, TouchState,
};

use self::calibration::{CalibrationModel, CalibrationSession};
use crate::config::{TouchConfig, SENSOR_TILE_LAYOUT};
use crate::storage::{CalibrationStore, StoreError};

/// Poll-driven touch pipeline: sample, calibrate, classify, hit-test.
///
/// Owns everything the pipeline mutates. The host loop calls [`update`] once
/// per iteration from a single task.
///
/// [`update`]: TouchManager::update
pub struct TouchManager<S> {
    source: S,
    config: TouchConfig,
    classifier: TouchClassifier,
    calibration: CalibrationModel,
    registry: TouchAreaRegistry,
    session: Option<CalibrationSession>,
    initialized: bool,
}

impl<S> TouchManager<S>
where
    S: TouchSampleSource,
{
    /// Manager over the default sensor tile layout.
    pub fn new(source: S, config: TouchConfig) -> Self {
        Self::with_registry(
            source,
            config,
            TouchAreaRegistry::new(&SENSOR_TILE_LAYOUT).unwrap_or_default(),
        )
    }

    pub fn with_layout(
        source: S,
        config: TouchConfig,
        layout: &[AreaLayout],
    ) -> Result<Self, RegistryError> {
        Ok(Self::with_registry(
            source,
            config,
            TouchAreaRegistry::new(layout)?,
        ))
    }

    fn with_registry(source: S, config: TouchConfig, registry: TouchAreaRegistry) -> Self {
        Self {
            source,
            classifier: TouchClassifier::new(config.gesture),
            calibration: CalibrationModel::uncalibrated(),
            config,
            registry,
            session: None,
            initialized: false,
        }
    }

    /// Probes the controller and loads the stored calibration. Returns
    /// `false` when no controller answers; `update` then stays silent.
    pub fn initialize<St>(&mut self, store: &mut CalibrationStore<St>) -> bool
    where
        St: ReadStorage + Storage,
    {
        if let Err(err) = self.source.probe() {
            log::warn!("touch: controller not found: {}", err);
            self.initialized = false;
            return false;
        }

        self.calibration = store.load(self.config.calibration_fallback);
        self.registry.rebuild(self.registry.offset());
        self.classifier.reset();
        self.initialized = true;

        if self.calibration.has_calibration {
            log::info!("touch: ready, calibrated");
        } else {
            log::warn!("touch: ready, uncalibrated");
        }
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Drops the press in flight and leaves calibration mode without solving.
    pub fn reset(&mut self) {
        self.classifier.reset();
        self.session = None;
    }

    /// Runs one poll. Sample errors count as "no contact" for the classifier.
    /// While calibrating they are skipped so a held press is not split in two.
    pub fn update(&mut self, now_ms: u64) -> Option<TouchEvent> {
        if !self.initialized {
            return None;
        }

        let sample = match self.source.read_sample() {
            Ok(sample) => Some(sample),
            Err(err) => {
                log::debug!("touch: sample dropped: {}", err);
                None
            }
        };

        if let Some(session) = self.session.as_mut() {
            if let Some(sample) = sample {
                if session.feed(sample).is_some() && session.is_complete() {
                    log::info!("touch_cal: all corners captured");
                }
            }
            return None;
        }

        let sample = sample.flatten();

        let point = sample.map(|raw| self.calibration.apply(raw, self.config.display));
        let mut event = self.classifier.tick(now_ms, point)?;
        event.sensor_index = self.registry.find_touched(&event.point);
        log::debug!(
            "touch: event {} ({},{}) sensor={:?} t={}",
            event.kind,
            event.point.x,
            event.point.y,
            event.sensor_index,
            event.t_ms
        );
        Some(event)
    }

    pub fn start_calibration(&mut self) {
        log::info!("touch_cal: started");
        self.classifier.reset();
        self.session = Some(CalibrationSession::new(self.config.calibration_targets));
    }

    /// Leaves calibration mode, adopts the solved transform when the capture
    /// allows one, and persists the active calibration.
    pub fn stop_calibration<St>(
        &mut self,
        store: &mut CalibrationStore<St>,
    ) -> Result<(), StoreError<St::Error>>
    where
        St: ReadStorage + Storage,
    {
        if let Some(session) = self.session.take() {
            match session.solve() {
                Ok(transform) => {
                    log::info!(
                        "touch_cal: solved from {} corners",
                        session.captured_count()
                    );
                    self.calibration = CalibrationModel::calibrated(transform);
                }
                Err(err) => log::warn!("touch_cal: keeping previous calibration: {}", err),
            }
        }
        self.classifier.reset();

        if !self.calibration.has_calibration {
            return Ok(());
        }
        store.save(&self.calibration)
    }

    pub fn is_calibrating(&self) -> bool {
        self.session.is_some()
    }

    /// Screen position of the next corner to touch while calibrating.
    pub fn calibration_target(&self) -> Option<(u16, u16)> {
        self.session
            .as_ref()
            .and_then(CalibrationSession::current_target)
    }

    pub fn calibration_session(&self) -> Option<&CalibrationSession> {
        self.session.as_ref()
    }

    /// Records an externally captured corner, entering calibration mode when
    /// needed. Indices outside the corner set are ignored.
    pub fn set_calibration_point(
        &mut self,
        index: usize,
        screen: (u16, u16),
        raw: RawTouch,
    ) -> bool {
        let targets = self.config.calibration_targets;
        self.session
            .get_or_insert_with(|| CalibrationSession::new(targets))
            .set_point(index, screen, raw)
    }

    pub fn apply_calibration(&self, raw: RawTouch) -> TouchPoint {
        self.calibration.apply(raw, self.config.display)
    }

    pub fn find_touched_sensor(&self, point: &TouchPoint) -> Option<u16> {
        self.registry.find_touched(point)
    }

    /// Must follow every change of the rendered content offset.
    pub fn rebuild_touch_areas(&mut self, offset: DisplayOffset) {
        self.registry.rebuild(offset);
    }

    pub fn set_touch_layout(&mut self, layout: &[AreaLayout]) -> Result<(), RegistryError> {
        self.registry.set_layout(layout)
    }

    pub fn enable_touch_area(&mut self, id: u16, enabled: bool) {
        self.registry.set_enabled(id, enabled);
    }

    pub fn is_touch_area_enabled(&self, id: u16) -> bool {
        self.registry.is_enabled(id)
    }

    pub fn touch_areas(&self) -> &[TouchArea] {
        self.registry.areas()
    }

    pub fn is_touch(&self) -> bool {
        self.classifier.is_pressed()
    }

    /// Tracked point of the press in flight.
    pub fn current_touch(&self) -> Option<TouchPoint> {
        let state = self.classifier.state();
        state.is_pressed.then_some(state.current_point)
    }

    pub fn touch_state(&self) -> TouchState {
        self.classifier.state()
    }

    pub fn has_valid_calibration(&self) -> bool {
        self.calibration.has_calibration
    }

    pub fn calibration(&self) -> &CalibrationModel {
        &self.calibration
    }

    pub fn set_calibration(&mut self, model: CalibrationModel) {
        self.calibration = model;
    }

    pub fn config(&self) -> &TouchConfig {
        &self.config
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

#[cfg(test)]
mod tests;
