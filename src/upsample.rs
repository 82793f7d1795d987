use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::{Error, Process, Sample};

/// Upsampling style
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::AsRefStr,
)]
pub enum Upsample {
    /// Insert `rate - 1` zeros after each sample
    #[default]
    Zero,
    /// Repeat each sample `rate` times
    Hold,
}

/// Integer rate upsampler
///
/// Feeds a modulator running at `rate` times the input sample rate.
/// Ingests an optional low-rate sample and emits one high-rate sample per call.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Upsampler<T> {
    rate: usize,
    mode: Upsample,
    index: usize,
    x: T,
}

impl<T: Sample> Upsampler<T> {
    /// Create a new upsampler.
    ///
    /// # Arguments
    /// * `rate`: Rate change, `rate >= 1`
    /// * `mode`: Zero-stuffing or sample-and-hold
    pub fn new(rate: usize, mode: Upsample) -> Result<Self, Error> {
        if rate == 0 {
            return Err(Error::InvalidParameter);
        }
        Ok(Self {
            rate,
            mode,
            index: rate,
            x: T::ZERO,
        })
    }

    /// The rate change
    pub fn rate(&self) -> usize {
        self.rate
    }
}

impl<T: Sample> Process<Option<T>, T> for Upsampler<T> {
    /// A new sample restarts the output period.
    /// Without one, zeros are emitted after the period of the last sample ran out.
    fn process(&mut self, x: Option<T>) -> T {
        if let Some(x) = x {
            self.x = x;
            self.index = 0;
        }
        let y = match (self.index, self.mode) {
            (0, _) => self.x,
            (i, Upsample::Hold) if i < self.rate => self.x,
            _ => T::ZERO,
        };
        self.index = self.index.saturating_add(1);
        y
    }
}

/// Upsample a sequence by an integer rate.
///
/// ```
/// # use pdm::{upsample, Upsample};
/// assert_eq!(upsample(&[1, 2], 3, Upsample::Zero).unwrap(), [1, 0, 0, 2, 0, 0]);
/// assert_eq!(upsample(&[1, 2], 3, Upsample::Hold).unwrap(), [1, 1, 1, 2, 2, 2]);
/// ```
pub fn upsample<T: Sample>(x: &[T], rate: usize, mode: Upsample) -> Result<Vec<T>, Error> {
    let mut u = Upsampler::new(rate, mode)?;
    Ok(x.iter()
        .flat_map(|x| core::iter::once(Some(*x)).chain(core::iter::repeat_n(None, rate - 1)))
        .map(|x| u.process(x))
        .collect())
}
