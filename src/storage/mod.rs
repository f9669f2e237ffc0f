mod calibration_store;
#[cfg(test)]
pub(crate) mod ram_flash;

pub use calibration_store::{CalibrationStore, StoreError};
