use core::fmt;

use embedded_storage::{ReadStorage, Storage};

use crate::config::{CALIBRATION_MAGIC, CALIBRATION_RECORD_LEN, CALIBRATION_STORE_OFFSET};
use crate::touch::calibration::{AffineTransform, CalibrationFallback, CalibrationModel};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreError<E> {
    Storage(E),
    /// Only real calibrations are persisted.
    NotCalibrated,
}

impl<E: fmt::Debug> fmt::Display for StoreError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "storage error: {err:?}"),
            Self::NotCalibrated => f.write_str("no calibration to save"),
        }
    }
}

/// Calibration record in non-volatile storage: magic `u32` then the six
/// transform coefficients as `f32`, all little endian.
pub struct CalibrationStore<S> {
    storage: S,
    offset: u32,
}

impl<S> CalibrationStore<S>
where
    S: ReadStorage + Storage,
{
    pub fn new(storage: S) -> Self {
        Self::with_offset(storage, CALIBRATION_STORE_OFFSET)
    }

    pub fn with_offset(storage: S, offset: u32) -> Self {
        Self { storage, offset }
    }

    /// Stored calibration, or the fallback when the record is missing or
    /// unreadable.
    pub fn load(&mut self, fallback: CalibrationFallback) -> CalibrationModel {
        match self.load_record() {
            Some(transform) => {
                log::info!("touch_store: calibration loaded");
                CalibrationModel::calibrated(transform)
            }
            None => {
                log::warn!("touch_store: no valid calibration, using {:?}", fallback);
                fallback.model()
            }
        }
    }

    pub fn save(&mut self, model: &CalibrationModel) -> Result<(), StoreError<S::Error>> {
        if !model.has_calibration {
            return Err(StoreError::NotCalibrated);
        }

        let mut record = [0u8; CALIBRATION_RECORD_LEN];
        record[0..4].copy_from_slice(&CALIBRATION_MAGIC.to_le_bytes());
        for (chunk, value) in record[4..]
            .chunks_exact_mut(4)
            .zip(model.transform.to_array())
        {
            chunk.copy_from_slice(&value.to_le_bytes());
        }

        self.storage
            .write(self.offset, &record)
            .map_err(StoreError::Storage)?;
        log::info!("touch_store: calibration saved");
        Ok(())
    }

    /// Overwrites the record with erased bytes.
    pub fn clear(&mut self) -> Result<(), StoreError<S::Error>> {
        self.storage
            .write(self.offset, &[0xFFu8; CALIBRATION_RECORD_LEN])
            .map_err(StoreError::Storage)
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    fn load_record(&mut self) -> Option<AffineTransform> {
        let mut record = [0u8; CALIBRATION_RECORD_LEN];
        self.storage.read(self.offset, &mut record).ok()?;
        if record.iter().all(|&byte| byte == 0xFF) {
            return None;
        }
        if u32::from_le_bytes([record[0], record[1], record[2], record[3]]) != CALIBRATION_MAGIC {
            return None;
        }

        let mut values = [0.0f32; 6];
        for (value, chunk) in values.iter_mut().zip(record[4..].chunks_exact(4)) {
            *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        let transform = AffineTransform::from_array(values);
        transform.is_finite().then_some(transform)
    }
}

#[cfg(test)]
mod tests;
