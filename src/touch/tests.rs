use std::collections::VecDeque;

use super::calibration::{AffineTransform, CalibrationFallback};
use super::*;
use crate::config::DEFAULT_TOUCH_CONFIG;
use crate::storage::ram_flash::RamFlash;

#[derive(Debug, PartialEq, Eq)]
struct BusFault;

#[derive(Default)]
struct ScriptedSource {
    present: bool,
    samples: VecDeque<Result<Option<RawTouch>, SampleError<BusFault>>>,
}

impl ScriptedSource {
    fn present() -> Self {
        Self {
            present: true,
            samples: VecDeque::new(),
        }
    }

    fn push(&mut self, sample: Option<(u16, u16)>) {
        self.samples
            .push_back(Ok(sample.map(|(x, y)| RawTouch::new(x, y))));
    }

    fn push_fault(&mut self) {
        self.samples.push_back(Err(SampleError::Bus(BusFault)));
    }
}

impl TouchSampleSource for ScriptedSource {
    type Error = BusFault;

    fn probe(&mut self) -> Result<(), SampleError<Self::Error>> {
        if self.present {
            Ok(())
        } else {
            Err(SampleError::Bus(BusFault))
        }
    }

    fn read_sample(&mut self) -> Result<Option<RawTouch>, SampleError<Self::Error>> {
        self.samples.pop_front().unwrap_or(Ok(None))
    }
}

fn ready_manager() -> (TouchManager<ScriptedSource>, CalibrationStore<RamFlash>) {
    let mut store = CalibrationStore::new(RamFlash::erased(256));
    let mut manager = TouchManager::new(ScriptedSource::present(), DEFAULT_TOUCH_CONFIG);
    assert!(manager.initialize(&mut store));
    (manager, store)
}

fn poll(
    manager: &mut TouchManager<ScriptedSource>,
    t_ms: u64,
    sample: Option<(u16, u16)>,
) -> Option<TouchEvent> {
    manager.source_mut().push(sample);
    manager.update(t_ms)
}

#[test]
fn missing_controller_disables_updates() {
    let mut store = CalibrationStore::new(RamFlash::erased(256));
    let mut manager = TouchManager::new(ScriptedSource::default(), DEFAULT_TOUCH_CONFIG);

    assert!(!manager.initialize(&mut store));
    assert!(!manager.is_initialized());
    assert_eq!(poll(&mut manager, 0, Some((100, 100))), None);
    assert!(!manager.is_touch());
}

#[test]
fn short_press_reports_tile_under_finger() {
    let (mut manager, _store) = ready_manager();

    let down = poll(&mut manager, 0, Some((100, 100))).unwrap();
    assert_eq!(down.kind, TouchEventKind::Down);
    assert_eq!(down.sensor_index, Some(3));
    assert!(manager.is_touch());
    assert_eq!(manager.current_touch(), Some(TouchPoint::new(100, 100)));

    assert_eq!(poll(&mut manager, 20, Some((102, 101))), None);
    assert_eq!(poll(&mut manager, 40, Some((101, 102))), None);
    let up = poll(&mut manager, 50, None).unwrap();
    assert_eq!(up.kind, TouchEventKind::Up);
    assert_eq!(up.sensor_index, Some(3));
    assert!(!manager.is_touch());
    assert_eq!(manager.current_touch(), None);
}

#[test]
fn press_outside_tiles_has_no_sensor() {
    let (mut manager, _store) = ready_manager();
    let down = poll(&mut manager, 0, Some((300, 220))).unwrap();
    assert_eq!(down.sensor_index, None);
    assert_eq!(manager.find_touched_sensor(&TouchPoint::new(300, 220)), None);
}

#[test]
fn sample_faults_read_as_release() {
    let (mut manager, _store) = ready_manager();
    poll(&mut manager, 0, Some((60, 50))).unwrap();

    manager.source_mut().push_fault();
    let release = manager.update(40).unwrap();
    assert_eq!(release.kind, TouchEventKind::Up);
    assert!(!manager.is_touch());
}

#[test]
fn offset_change_moves_hit_targets() {
    let (mut manager, _store) = ready_manager();
    assert_eq!(manager.find_touched_sensor(&TouchPoint::new(112, 50)), None);

    manager.rebuild_touch_areas(DisplayOffset::new(10, 0));
    assert_eq!(manager.find_touched_sensor(&TouchPoint::new(112, 50)), Some(0));
    assert_eq!(manager.touch_areas()[0].x, 20);
}

#[test]
fn disabled_tile_is_not_reported() {
    let (mut manager, _store) = ready_manager();
    manager.enable_touch_area(4, false);
    assert!(!manager.is_touch_area_enabled(4));
    assert!(manager.is_touch_area_enabled(3));
    assert!(!manager.is_touch_area_enabled(99));

    let down = poll(&mut manager, 0, Some((150, 100))).unwrap();
    assert_eq!(down.sensor_index, None);
}

#[test]
fn stored_calibration_is_applied() {
    let mut store = CalibrationStore::new(RamFlash::erased(256));
    let transform = AffineTransform::from_array([0.5, 0.0, 10.0, 0.0, 0.5, 20.0]);
    store.save(&CalibrationModel::calibrated(transform)).unwrap();

    let mut manager = TouchManager::new(ScriptedSource::present(), DEFAULT_TOUCH_CONFIG);
    assert!(manager.initialize(&mut store));
    assert!(manager.has_valid_calibration());
    assert_eq!(manager.calibration().transform, transform);

    let down = poll(&mut manager, 0, Some((300, 100))).unwrap();
    assert_eq!((down.point.x, down.point.y), (160, 70));
    assert_eq!(down.sensor_index, Some(1));
}

#[test]
fn factory_fallback_counts_as_calibrated() {
    let mut store = CalibrationStore::new(RamFlash::erased(256));
    let factory = AffineTransform::from_array([1.0, 0.0, -5.0, 0.0, 1.0, 0.0]);
    let config = TouchConfig {
        calibration_fallback: CalibrationFallback::Factory(factory),
        ..DEFAULT_TOUCH_CONFIG
    };
    let mut manager = TouchManager::new(ScriptedSource::present(), config);
    manager.initialize(&mut store);

    assert!(manager.has_valid_calibration());
    assert_eq!(
        manager.apply_calibration(RawTouch::new(50, 50)),
        TouchPoint::new(45, 50)
    );
}

#[test]
fn calibration_flow_captures_solves_and_persists() {
    let (mut manager, mut store) = ready_manager();
    assert!(!manager.has_valid_calibration());

    manager.start_calibration();
    assert!(manager.is_calibrating());
    assert_eq!(manager.calibration_target(), Some((30, 30)));

    let corners = [(230, 9), (230, 310), (1, 310), (1, 9)];
    let mut t = 0;
    for raw in corners {
        assert_eq!(poll(&mut manager, t, Some(raw)), None);
        assert_eq!(poll(&mut manager, t + 30, Some(raw)), None);
        assert_eq!(poll(&mut manager, t + 60, None), None);
        t += 500;
    }
    assert_eq!(manager.calibration_target(), None);
    assert!(manager.calibration_session().unwrap().is_complete());

    manager.stop_calibration(&mut store).unwrap();
    assert!(!manager.is_calibrating());
    assert!(manager.has_valid_calibration());
    assert_eq!(
        manager.apply_calibration(RawTouch::new(1, 310)),
        TouchPoint::new(290, 210)
    );

    let mut reloaded = TouchManager::new(ScriptedSource::present(), DEFAULT_TOUCH_CONFIG);
    reloaded.initialize(&mut store);
    assert!(reloaded.has_valid_calibration());
    assert_eq!(
        reloaded.apply_calibration(RawTouch::new(230, 9)),
        TouchPoint::new(30, 30)
    );
}

#[test]
fn calibration_swallows_events() {
    let (mut manager, _store) = ready_manager();
    poll(&mut manager, 0, Some((60, 50))).unwrap();

    manager.start_calibration();
    assert!(!manager.is_touch());
    assert_eq!(poll(&mut manager, 10, Some((60, 50))), None);
    assert_eq!(poll(&mut manager, 2_000, Some((60, 50))), None);
    assert_eq!(poll(&mut manager, 2_010, None), None);
}

#[test]
fn explicit_diagonal_points_calibrate() {
    let (mut manager, mut store) = ready_manager();
    assert!(manager.set_calibration_point(0, (30, 30), RawTouch::new(230, 9)));
    assert!(manager.set_calibration_point(2, (290, 210), RawTouch::new(1, 310)));
    assert!(!manager.set_calibration_point(7, (0, 0), RawTouch::new(0, 0)));
    assert!(manager.is_calibrating());

    manager.stop_calibration(&mut store).unwrap();
    assert_eq!(
        manager.apply_calibration(RawTouch::new(230, 9)),
        TouchPoint::new(30, 30)
    );
}

#[test]
fn sample_fault_during_calibration_keeps_the_press() {
    let (mut manager, _store) = ready_manager();
    manager.start_calibration();

    assert_eq!(poll(&mut manager, 0, Some((230, 9))), None);
    manager.source_mut().push_fault();
    assert_eq!(manager.update(20), None);
    assert_eq!(poll(&mut manager, 40, Some((230, 9))), None);

    let session = manager.calibration_session().unwrap();
    assert_eq!(session.captured_count(), 1);
    assert_eq!(manager.calibration_target(), Some((290, 30)));

    assert_eq!(poll(&mut manager, 60, None), None);
    assert_eq!(poll(&mut manager, 500, Some((230, 310))), None);
    assert_eq!(manager.calibration_session().unwrap().captured_count(), 2);
}

#[test]
fn aborted_calibration_keeps_previous_model() {
    let (mut manager, mut store) = ready_manager();
    manager.start_calibration();
    poll(&mut manager, 0, Some((230, 9)));

    manager.stop_calibration(&mut store).unwrap();
    assert!(!manager.has_valid_calibration());
    assert!(store.into_inner().bytes.iter().all(|&byte| byte == 0xFF));
}

#[test]
fn reset_leaves_calibration_mode() {
    let (mut manager, _store) = ready_manager();
    manager.start_calibration();
    manager.reset();

    assert!(!manager.is_calibrating());
    let down = poll(&mut manager, 0, Some((60, 50))).unwrap();
    assert_eq!(down.kind, TouchEventKind::Down);
    assert_eq!(down.sensor_index, Some(0));
}

#[test]
fn custom_layout_replaces_tiles() {
    let mut manager = TouchManager::with_layout(
        ScriptedSource::present(),
        DEFAULT_TOUCH_CONFIG,
        &[
            AreaLayout::new(40, 0, 0, 160, 240),
            AreaLayout::new(41, 160, 0, 160, 240),
        ],
    )
    .unwrap();
    let mut store = CalibrationStore::new(RamFlash::erased(256));
    manager.initialize(&mut store);

    let down = poll(&mut manager, 0, Some((200, 10))).unwrap();
    assert_eq!(down.sensor_index, Some(41));

    manager
        .set_touch_layout(&[AreaLayout::new(9, 0, 0, 320, 240)])
        .unwrap();
    assert_eq!(manager.find_touched_sensor(&TouchPoint::new(200, 10)), Some(9));
}
