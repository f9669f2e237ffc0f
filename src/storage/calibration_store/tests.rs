use super::*;
use crate::storage::ram_flash::{OutOfBounds, RamFlash};

fn sample_model() -> CalibrationModel {
    CalibrationModel::calibrated(AffineTransform::from_array([
        0.0, 0.8638, 22.23, -0.786, 0.0, 210.79,
    ]))
}

#[test]
fn erased_flash_loads_fallback() {
    let mut store = CalibrationStore::new(RamFlash::erased(256));
    assert_eq!(
        store.load(CalibrationFallback::Identity),
        CalibrationModel::uncalibrated()
    );

    let factory = AffineTransform::from_array([1.0, 0.0, 5.0, 0.0, 1.0, -5.0]);
    let model = store.load(CalibrationFallback::Factory(factory));
    assert!(model.has_calibration);
    assert_eq!(model.transform, factory);
}

#[test]
fn saved_calibration_loads_back() {
    let mut store = CalibrationStore::new(RamFlash::erased(256));
    store.save(&sample_model()).unwrap();
    assert_eq!(store.load(CalibrationFallback::Identity), sample_model());
}

#[test]
fn record_layout_is_magic_then_coefficients() {
    let mut store = CalibrationStore::new(RamFlash::erased(256));
    store.save(&sample_model()).unwrap();
    let flash = store.into_inner();

    let record = &flash.bytes[100..128];
    assert_eq!(&record[0..4], &[0x4C, 0x43, 0x54, 0x00]);
    assert_eq!(&record[4..8], &0.0f32.to_le_bytes());
    assert_eq!(&record[8..12], &0.8638f32.to_le_bytes());
    assert_eq!(&record[24..28], &210.79f32.to_le_bytes());
    assert!(flash.bytes[..100].iter().all(|&byte| byte == 0xFF));
    assert!(flash.bytes[128..].iter().all(|&byte| byte == 0xFF));
}

#[test]
fn bad_magic_is_rejected() {
    let mut store = CalibrationStore::new(RamFlash::erased(256));
    store.save(&sample_model()).unwrap();
    let mut flash = store.into_inner();
    flash.bytes[100] ^= 0x01;

    let mut store = CalibrationStore::new(flash);
    assert_eq!(
        store.load(CalibrationFallback::Identity),
        CalibrationModel::uncalibrated()
    );
}

#[test]
fn non_finite_coefficients_are_rejected() {
    let mut flash = RamFlash::erased(256);
    flash.bytes[100..104].copy_from_slice(&CALIBRATION_MAGIC.to_le_bytes());
    for index in 0..6 {
        let value = if index == 3 { f32::NAN } else { 1.0 };
        let start = 104 + index * 4;
        flash.bytes[start..start + 4].copy_from_slice(&value.to_le_bytes());
    }

    let mut store = CalibrationStore::new(flash);
    assert!(!store.load(CalibrationFallback::Identity).has_calibration);
}

#[test]
fn uncalibrated_model_is_not_saved() {
    let mut store = CalibrationStore::new(RamFlash::erased(256));
    assert_eq!(
        store.save(&CalibrationModel::uncalibrated()),
        Err(StoreError::NotCalibrated)
    );
    assert!(store.into_inner().bytes.iter().all(|&byte| byte == 0xFF));
}

#[test]
fn storage_errors_surface_on_save_and_fall_back_on_load() {
    let mut flash = RamFlash::erased(256);
    flash.fail_writes = true;
    let mut store = CalibrationStore::new(flash);
    assert_eq!(
        store.save(&sample_model()),
        Err(StoreError::Storage(OutOfBounds))
    );

    let mut short = CalibrationStore::new(RamFlash::erased(64));
    assert!(!short.load(CalibrationFallback::Identity).has_calibration);
}

#[test]
fn last_write_wins_and_clear_erases() {
    let mut store = CalibrationStore::with_offset(RamFlash::erased(64), 8);
    store.save(&sample_model()).unwrap();
    let replacement = CalibrationModel::calibrated(AffineTransform::IDENTITY);
    store.save(&replacement).unwrap();
    assert_eq!(store.load(CalibrationFallback::Identity), replacement);

    store.clear().unwrap();
    assert_eq!(
        store.load(CalibrationFallback::Identity),
        CalibrationModel::uncalibrated()
    );
}
