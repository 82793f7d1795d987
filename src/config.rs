use miniconf::{Leaf, Tree};
use serde::{Deserialize, Serialize};

use crate::{BitOrder, Error, Pdm, Sample, Upsample};

/// Modulator settings
///
/// Runtime configurable through `miniconf` as `/high`, `/rate`, `/upsample`
/// and `/bit_order`.
///
/// ```
/// # use pdm::{PdmConfig, Pdm};
/// let c = PdmConfig::<i32>::default();
/// let p = Pdm::try_from(&c).unwrap();
/// assert_eq!(p.high(), 1 << 14);
/// ```
#[derive(Clone, Debug, PartialEq, Tree, Serialize, Deserialize)]
pub struct PdmConfig<T> {
    /// Output level for a logical `1`
    ///
    /// Must be strictly positive.
    pub high: T,
    /// Oversampling rate of the modulator relative to the input samples
    pub rate: usize,
    /// Upsampling style
    pub upsample: Leaf<Upsample>,
    /// Bit order of the packed output stream
    pub bit_order: Leaf<BitOrder>,
}

impl<T: Sample> Default for PdmConfig<T> {
    fn default() -> Self {
        Self {
            high: T::HALF_SCALE,
            rate: 1,
            upsample: Leaf(Upsample::default()),
            bit_order: Leaf(BitOrder::default()),
        }
    }
}

impl<T: Sample> TryFrom<&PdmConfig<T>> for Pdm<T> {
    type Error = Error;

    fn try_from(value: &PdmConfig<T>) -> Result<Self, Self::Error> {
        Pdm::new(value.high)
    }
}

impl<T: Sample> TryFrom<&PdmConfig<T>> for crate::Upsampler<T> {
    type Error = Error;

    fn try_from(value: &PdmConfig<T>) -> Result<Self, Self::Error> {
        Self::new(value.rate, value.upsample.0)
    }
}
