use embedded_storage::{ReadStorage, Storage};

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct OutOfBounds;

/// Erased-on-creation byte array standing in for the EEPROM emulation.
pub(crate) struct RamFlash {
    pub(crate) bytes: std::vec::Vec<u8>,
    pub(crate) fail_writes: bool,
}

impl RamFlash {
    pub(crate) fn erased(len: usize) -> Self {
        Self {
            bytes: std::vec![0xFF; len],
            fail_writes: false,
        }
    }
}

impl ReadStorage for RamFlash {
    type Error = OutOfBounds;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let start = offset as usize;
        let source = self
            .bytes
            .get(start..start + bytes.len())
            .ok_or(OutOfBounds)?;
        bytes.copy_from_slice(source);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.bytes.len()
    }
}

impl Storage for RamFlash {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(OutOfBounds);
        }
        let start = offset as usize;
        self.bytes
            .get_mut(start..start + bytes.len())
            .ok_or(OutOfBounds)?
            .copy_from_slice(bytes);
        Ok(())
    }
}
