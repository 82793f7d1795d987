use num_traits::{WrappingAdd, WrappingSub, Zero};

use crate::{Error, Process};

/// Cascaded integrator comb decimator
///
/// Reconstructs a low-rate PCM signal from a pulse density stream.
/// Order `N` where `N = 3` is cubic.
///
/// Integrators and combs wrap. The output is exact as long as the
/// true output fits `T`: `gain() * max(|x|)` must not exceed `T::MAX`.
///
/// ```
/// # use pdm::{CicDecimator, Process, encode};
/// let e = encode(&[4096i64; 1 << 10], 16384).unwrap();
/// let mut cic = CicDecimator::<i64, 3>::new(64).unwrap();
/// let y: Vec<i64> = e.levels.iter().filter_map(|x| cic.process(*x)).collect();
/// assert_eq!(y.len(), 16);
/// assert!(y[8..].iter().all(|y| (y / cic.gain() as i64 - 4096).abs() <= 300));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CicDecimator<T, const N: usize> {
    rate: usize,
    integrators: [T; N],
    combs: [T; N],
    index: usize,
}

impl<T: Zero + Copy, const N: usize> CicDecimator<T, N> {
    /// Create a new zero-initialized decimator with the given rate change.
    pub fn new(rate: usize) -> Result<Self, Error> {
        if rate == 0 {
            return Err(Error::InvalidParameter);
        }
        Ok(Self {
            rate,
            integrators: [T::zero(); N],
            combs: [T::zero(); N],
            index: 0,
        })
    }

    /// The rate change
    pub fn rate(&self) -> usize {
        self.rate
    }

    /// The DC gain `rate**N`
    pub fn gain(&self) -> usize {
        self.rate.pow(N as _)
    }
}

impl<T: WrappingAdd + WrappingSub + Zero + Copy, const N: usize> Process<T, Option<T>>
    for CicDecimator<T, N>
{
    /// Ingest a new high-rate sample and optionally emit the next low-rate output.
    fn process(&mut self, x: T) -> Option<T> {
        let x = self
            .integrators
            .iter_mut()
            .fold(x, |x, i| {
                *i = i.wrapping_add(&x);
                *i
            });
        if self.index > 0 {
            self.index -= 1;
            return None;
        }
        self.index = self.rate - 1;
        Some(self.combs.iter_mut().fold(x, |x, c| {
            let y = x.wrapping_sub(c);
            *c = x;
            y
        }))
    }
}
