use core::fmt;

use super::types::RawTouch;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleError<E> {
    /// Bus transaction with the controller failed.
    Bus(E),
    /// Controller answered with a frame that does not decode.
    Malformed,
}

impl<E: fmt::Debug> fmt::Display for SampleError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(err) => write!(f, "touch bus error: {err:?}"),
            Self::Malformed => f.write_str("malformed touch frame"),
        }
    }
}

/// Polled access to the first contact reported by a touch controller.
pub trait TouchSampleSource {
    type Error: fmt::Debug;

    /// Checks that the controller answers; called once at startup.
    fn probe(&mut self) -> Result<(), SampleError<Self::Error>>;

    /// Latest contact, `Ok(None)` when nothing touches the panel.
    fn read_sample(&mut self) -> Result<Option<RawTouch>, SampleError<Self::Error>>;
}

impl<T: TouchSampleSource + ?Sized> TouchSampleSource for &mut T {
    type Error = T::Error;

    fn probe(&mut self) -> Result<(), SampleError<Self::Error>> {
        (**self).probe()
    }

    fn read_sample(&mut self) -> Result<Option<RawTouch>, SampleError<Self::Error>> {
        (**self).read_sample()
    }
}
