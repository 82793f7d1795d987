use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::{Error, Inplace, Process, Sample};

/// First-order delta-sigma pulse density modulator
///
/// Quantizes each input sample to one of two levels, `0` or `high`, while
/// integrating the quantization error and feeding it back into the next
/// decision:
///
/// * decide high iff `x >= err` (ties are high)
/// * `err <- level - x + err`
///
/// The accumulator starts at zero. For inputs in `0..=high` the accumulator
/// stays in `0..=high` and the long-run average output equals the long-run
/// average input.
///
/// ```
/// # use pdm::{Pdm, Process};
/// let mut p = Pdm::new(16384).unwrap();
/// let y: [i32; 6] = core::array::from_fn(|_| p.process(8192));
/// assert_eq!(y, [16384, 16384, 0, 16384, 0, 16384]);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pdm<T> {
    high: T,
    err: T,
    index: usize,
}

/// Result of a single modulator step
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step<T> {
    /// Output level, `0` or the high level
    pub level: T,
    /// Accumulator value the decision was based on
    pub error: T,
}

impl<T: Sample> Step<T> {
    /// The output level as a single bit
    pub fn bit(&self) -> bool {
        self.level > T::ZERO
    }
}

impl<T: Sample> Pdm<T> {
    /// Create a new modulator with zero accumulator.
    ///
    /// # Arguments
    /// * `high`: Output level for a logical `1`. Must be strictly positive.
    pub fn new(high: T) -> Result<Self, Error> {
        if !high.is_strictly_positive() {
            return Err(Error::InvalidParameter);
        }
        Ok(Self {
            high,
            err: T::ZERO,
            index: 0,
        })
    }

    /// The high output level
    pub fn high(&self) -> T {
        self.high
    }

    /// The current accumulator value
    ///
    /// This is the value the next decision will be based on.
    pub fn error(&self) -> T {
        self.err
    }

    /// Number of samples processed since creation or the last reset
    pub fn index(&self) -> usize {
        self.index
    }

    /// Clear the accumulator and the sample count
    pub fn reset(&mut self) {
        self.err = T::ZERO;
        self.index = 0;
    }

    fn decide(&self, x: T) -> T {
        if x >= self.err { self.high } else { T::ZERO }
    }

    /// Ingest a sample and emit the decision.
    ///
    /// If the accumulator update is not representable, the state is left
    /// unchanged and [`Error::Overflow`] is returned.
    pub fn update(&mut self, x: T) -> Result<Step<T>, Error> {
        let level = self.decide(x);
        let error = self.err;
        self.err = T::checked_feedback(level, x, error).ok_or(Error::Overflow {
            index: self.index,
        })?;
        self.index += 1;
        Ok(Step { level, error })
    }
}

impl<T: Sample> Process<T> for Pdm<T> {
    /// Ingest a sample and emit the output level.
    ///
    /// The accumulator saturates at `T::MIN..=T::MAX` instead of failing.
    /// Once saturated, the long-run average no longer tracks the input.
    /// For floats the accumulator stays finite: infinite samples saturate it
    /// and NaN samples decide low and leave it unchanged.
    fn process(&mut self, x: T) -> T {
        let level = self.decide(x);
        self.err = T::saturating_feedback(level, x, self.err);
        self.index += 1;
        level
    }
}

impl<T: Sample> Inplace<T> for Pdm<T> {}

/// Encoder output
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Encoded<T> {
    /// Output levels, each `0` or the high level
    pub levels: Vec<T>,
    /// Accumulator values before each decision
    ///
    /// `errors[0]` is zero. The value after the last decision is not included.
    pub errors: Vec<T>,
}

impl<T: Sample> Encoded<T> {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the input was empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The decisions as single bits, `true` for high
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.levels.iter().map(|l| *l > T::ZERO)
    }

    /// Fraction of high decisions
    ///
    /// Zero for empty output.
    pub fn density(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.bits().filter(|b| *b).count() as f64 / self.len() as f64
    }

    /// Split into `(levels, errors)`
    pub fn into_parts(self) -> (Vec<T>, Vec<T>) {
        (self.levels, self.errors)
    }
}

/// Encode a sample sequence into a two-level pulse density sequence.
///
/// Returns the output levels and the accumulator values before each decision,
/// both of the same length as the input. A fresh accumulator is used for every
/// call.
///
/// ```
/// let e = pdm::encode(&[20000, 20000, 20000], 16384).unwrap();
/// assert_eq!(e.levels, [16384; 3]);
/// assert_eq!(e.errors, [0, -3616, -7232]);
/// ```
///
/// # Arguments
/// * `samples`: Input samples in time order
/// * `high`: Output level for a logical `1`. Must be strictly positive.
///
/// # Errors
/// * [`Error::InvalidParameter`] if `high` is not strictly positive.
/// * [`Error::Overflow`] if the accumulator leaves the sample representation.
///   No partial output is returned.
pub fn encode<T: Sample>(samples: &[T], high: T) -> Result<Encoded<T>, Error> {
    let mut pdm = Pdm::new(high)?;
    let mut levels = Vec::with_capacity(samples.len());
    let mut errors = Vec::with_capacity(samples.len());
    for x in samples.iter() {
        let step = pdm.update(*x).inspect_err(|e| {
            log::debug!("encoding {} samples at high={high:?}: {e}", samples.len());
        })?;
        levels.push(step.level);
        errors.push(step.error);
    }
    Ok(Encoded { levels, errors })
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec;
    use core::f64::consts::PI;
    use quickcheck_macros::quickcheck;
    use rand::{prelude::*, rngs::StdRng};
    use rustfft::{FftPlanner, num_complex::Complex};

    const H: i32 = 16384;

    #[test]
    fn saturating_high() {
        let e = encode(&[20000, 20000, 20000], H).unwrap();
        assert_eq!(e.levels, [H; 3]);
        assert_eq!(e.errors, [0, -3616, -7232]);
        let e = encode(&[20000.0f32; 3], 16384.0).unwrap();
        assert_eq!(e.levels, [16384.0; 3]);
        assert_eq!(e.errors, [0.0, -3616.0, -7232.0]);
    }

    #[test]
    fn zero_input() {
        // The first decision is a tie and goes high. The accumulator then
        // holds `H` and a zero input never reaches it again.
        let e = encode(&[0; 4], H).unwrap();
        assert_eq!(e.levels, [H, 0, 0, 0]);
        assert_eq!(e.errors, [0, H, H, H]);
    }

    #[test]
    fn half_scale() {
        let e = encode(&[8192; 7], H).unwrap();
        assert_eq!(e.levels, [H, H, 0, H, 0, H, 0]);
        assert_eq!(e.errors, [0, 8192, H, 8192, H, 8192, H]);
        assert_eq!(e.bits().collect::<Vec<_>>(), [
            true, true, false, true, false, true, false
        ]);
    }

    #[test]
    fn full_scale() {
        let e = encode(&[H; 5], H).unwrap();
        assert_eq!(e.levels, [H; 5]);
        assert_eq!(e.errors, [0; 5]);
        assert_eq!(e.density(), 1.0);
    }

    #[test]
    fn empty() {
        let e = encode::<i32>(&[], H).unwrap();
        assert!(e.is_empty());
        let (levels, errors) = e.into_parts();
        assert!(levels.is_empty() && errors.is_empty());
        assert_eq!(encode::<f64>(&[], 1.0).unwrap().density(), 0.0);
    }

    #[test]
    fn reject() {
        assert_eq!(encode(&[1, 2, 3], 0), Err(Error::InvalidParameter));
        assert_eq!(encode(&[1, 2, 3], -5), Err(Error::InvalidParameter));
        assert_eq!(encode::<i64>(&[], 0), Err(Error::InvalidParameter));
        assert_eq!(encode(&[1.0f32], 0.0), Err(Error::InvalidParameter));
        assert_eq!(encode(&[1.0f64], f64::NAN), Err(Error::InvalidParameter));
        assert_eq!(Pdm::new(-1i16), Err(Error::InvalidParameter));
    }

    #[test]
    fn overflow() {
        assert_eq!(
            encode(&[-20000i16, -20000, 0], 16384),
            Err(Error::Overflow { index: 1 })
        );
        assert_eq!(
            encode(&[-f32::MAX, -f32::MAX], 1.0),
            Err(Error::Overflow { index: 1 })
        );
        assert_eq!(
            encode(&[1.0, f64::NAN], 1.0),
            Err(Error::Overflow { index: 1 })
        );

        let mut p = Pdm::new(16384i16).unwrap();
        p.update(-20000).unwrap();
        assert_eq!(p.error(), 20000);
        assert_eq!(p.update(-20000), Err(Error::Overflow { index: 1 }));
        assert_eq!(p.error(), 20000);
        assert_eq!(p.index(), 1);
    }

    #[test]
    fn saturate() {
        let mut p = Pdm::new(16384i16).unwrap();
        assert_eq!(p.process(-20000), 0);
        assert_eq!(p.process(-20000), 0);
        assert_eq!(p.error(), i16::MAX);
        assert_eq!(p.process(i16::MAX), 16384);
        assert_eq!(p.error(), 16384);
        assert_eq!(p.index(), 3);
        p.reset();
        assert_eq!((p.error(), p.index()), (0, 0));
    }

    #[test]
    fn saturate_float() {
        let mut p = Pdm::new(1.0f32).unwrap();
        assert_eq!(p.process(f32::NAN), 0.0);
        assert_eq!(p.error(), 0.0);
        let y: [f32; 4] = core::array::from_fn(|_| p.process(0.5));
        assert_eq!(y, [1.0, 1.0, 0.0, 1.0]);
        assert_eq!(p.process(f32::INFINITY), 1.0);
        assert_eq!(p.error(), f32::MIN);
        p.reset();
        assert_eq!(p.process(f32::NEG_INFINITY), 0.0);
        assert_eq!(p.error(), f32::MAX);
        assert_eq!(p.process(f32::NAN), 0.0);
        assert_eq!(p.error(), f32::MAX);
    }

    #[test]
    fn process_matches_encode() {
        let mut rng = StdRng::seed_from_u64(42);
        let x: Vec<i32> = (0..1000).map(|_| rng.random_range(-H..2 * H)).collect();
        let e = encode(&x, H).unwrap();
        let mut p = Pdm::new(H).unwrap();
        let mut y = vec![0; x.len()];
        p.block(&x, &mut y);
        assert_eq!(y, e.levels);
        let mut xy = x.clone();
        Pdm::new(H).unwrap().inplace(&mut xy);
        assert_eq!(xy, e.levels);
    }

    #[test]
    fn step_bit() {
        let mut p = Pdm::new(3.0f64).unwrap();
        let s = p.update(1.0).unwrap();
        assert_eq!(s, Step { level: 3.0, error: 0.0 });
        assert!(s.bit());
        let s = p.update(1.0).unwrap();
        assert_eq!(s, Step { level: 0.0, error: 2.0 });
        assert!(!s.bit());
    }

    #[test]
    fn density() {
        let n = 10_000;
        for k in [0.0, 0.1, 0.3, 0.5, 0.77, 1.0] {
            let e = encode(&vec![k * 16384.0f64; n], 16384.0).unwrap();
            let d = e.density();
            log::info!("{k} {d}");
            assert!((d - k).abs() <= 2.0 / n as f64, "{d} != {k}");
        }
    }

    #[test]
    fn noise_shaping() {
        // Mid-scale sine, quantization error must be high-pass shaped
        let n = 1 << 12;
        let x: Vec<f64> = (0..n)
            .map(|i| 8192.0 + 0.4 * 16384.0 * (2.0 * PI * 8.0 * i as f64 / n as f64).sin())
            .collect();
        let e = encode(&x, 16384.0).unwrap();
        let mut q: Vec<_> = e
            .levels
            .iter()
            .zip(&x)
            .map(|(l, x)| Complex::new(l - x, 0.0))
            .collect();
        FftPlanner::<f64>::new().plan_fft_forward(n).process(&mut q);
        let power = |b: &[Complex<f64>]| b.iter().map(|c| c.norm_sqr()).sum::<f64>() / b.len() as f64;
        let low = power(&q[1..33]);
        let high = power(&q[n / 2 - 256..n / 2]);
        log::info!("low {low:e} high {high:e} ratio {}", high / low);
        assert!(low * 20.0 < high, "{low} {high}");
    }

    #[quickcheck]
    fn lengths_and_levels(x: Vec<i16>, high: u16) -> bool {
        let high = high as i32 + 1;
        let x: Vec<i32> = x.into_iter().map(Into::into).collect();
        let e = encode(&x, high).unwrap();
        e.len() == x.len()
            && e.errors.len() == x.len()
            && e.levels.iter().all(|l| *l == 0 || *l == high)
            && e.errors.first().is_none_or(|e0| *e0 == 0)
    }

    #[quickcheck]
    fn recurrence(x: Vec<i16>) -> bool {
        let x: Vec<f64> = x.into_iter().map(Into::into).collect();
        let e = encode(&x, 16384.0).unwrap();
        (0..x.len().saturating_sub(1))
            .all(|i| e.errors[i + 1] == e.levels[i] - x[i] + e.errors[i])
    }

    #[quickcheck]
    fn decision(x: Vec<i16>) -> bool {
        let x: Vec<i64> = x.into_iter().map(Into::into).collect();
        let e = encode(&x, 12345).unwrap();
        x.iter()
            .zip(e.levels.iter().zip(&e.errors))
            .all(|(x, (l, err))| (*l == 12345) == (x >= err))
    }

    #[quickcheck]
    fn deterministic(x: Vec<i32>) -> bool {
        let x: Vec<i64> = x.into_iter().map(Into::into).collect();
        encode(&x, 1 << 20) == encode(&x, 1 << 20)
    }

    #[quickcheck]
    fn bounded(x: Vec<u16>, high: u16) -> bool {
        // Inputs within `0..=high` keep the accumulator in `0..=high`
        // and the output sum within `high` of the input sum.
        let high = high as i32 + 1;
        let x: Vec<i32> = x.into_iter().map(|x| x as i32 % (high + 1)).collect();
        let e = encode(&x, high).unwrap();
        let dsum: i64 = e.levels.iter().zip(&x).map(|(l, x)| (l - x) as i64).sum();
        e.errors.iter().all(|e| (0..=high).contains(e)) && dsum.abs() <= high as i64
    }
}
