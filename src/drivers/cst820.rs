//! Hynitron CST820 single-touch capacitive controller.

use embedded_hal::i2c::{I2c, SevenBitAddress};

use crate::touch::{RawTouch, SampleError, TouchSampleSource};

pub const CST820_ADDR: u8 = 0x15;

const REG_FINGER_NUM: u8 = 0x02;
const REG_CHIP_ID: u8 = 0xA7;
const REG_DIS_AUTO_SLEEP: u8 = 0xFE;

// Finger count, then X and Y as (high nibble, low byte) pairs.
const TOUCH_FRAME_LEN: usize = 5;
const MAX_REPORTED_FINGERS: u8 = 2;

pub struct Cst820<I> {
    i2c: I,
    address: SevenBitAddress,
    chip_id: Option<u8>,
}

impl<I> Cst820<I>
where
    I: I2c<SevenBitAddress>,
{
    pub fn new(i2c: I) -> Self {
        Self::with_address(i2c, CST820_ADDR)
    }

    pub fn with_address(i2c: I, address: SevenBitAddress) -> Self {
        Self {
            i2c,
            address,
            chip_id: None,
        }
    }

    /// Chip id read by the last successful probe.
    pub fn chip_id(&self) -> Option<u8> {
        self.chip_id
    }

    pub fn release(self) -> I {
        self.i2c
    }

    fn read_reg(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), SampleError<I::Error>> {
        self.i2c
            .write_read(self.address, &[reg], buf)
            .map_err(SampleError::Bus)
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), SampleError<I::Error>> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(SampleError::Bus)
    }
}

impl<I> TouchSampleSource for Cst820<I>
where
    I: I2c<SevenBitAddress>,
{
    type Error = I::Error;

    fn probe(&mut self) -> Result<(), SampleError<Self::Error>> {
        let mut id = [0u8; 1];
        self.read_reg(REG_CHIP_ID, &mut id)?;
        // A floating bus reads as all zeros or all ones.
        if id[0] == 0x00 || id[0] == 0xFF {
            return Err(SampleError::Malformed);
        }
        self.write_reg(REG_DIS_AUTO_SLEEP, 0x01)?;

        self.chip_id = Some(id[0]);
        log::info!("cst820: chip id {:#04x} at {:#04x}", id[0], self.address);
        Ok(())
    }

    fn read_sample(&mut self) -> Result<Option<RawTouch>, SampleError<Self::Error>> {
        let mut frame = [0u8; TOUCH_FRAME_LEN];
        self.read_reg(REG_FINGER_NUM, &mut frame)?;
        decode_frame(&frame)
    }
}

fn decode_frame<E>(frame: &[u8; TOUCH_FRAME_LEN]) -> Result<Option<RawTouch>, SampleError<E>> {
    let fingers = frame[0] & 0x0F;
    if fingers == 0 {
        return Ok(None);
    }
    if fingers > MAX_REPORTED_FINGERS {
        return Err(SampleError::Malformed);
    }

    let x = (u16::from(frame[1] & 0x0F) << 8) | u16::from(frame[2]);
    let y = (u16::from(frame[3] & 0x0F) << 8) | u16::from(frame[4]);
    Ok(Some(RawTouch::new(x, y)))
}
