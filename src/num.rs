use core::fmt::Debug;

/// Helper trait unifying fixed point and floating point samples
///
/// The sample type fixes the numeric contract of the modulator:
///
/// * Integers are exact. The accumulator update is computed in a type twice as
///   wide and fails (or saturates) only if the result does not fit `Self`.
/// * Floats round once per operation in their own precision (`f32` or `f64`).
///   Long runs accumulate rounding drift in the error trace bounded by
///   `high * EPSILON` per step. A non-finite update is treated as overflow.
///   Saturation clamps to the finite range and ignores NaN updates.
pub trait Sample: Copy + PartialOrd + Debug + 'static {
    /// Additive identity
    const ZERO: Self;
    /// Lowest value
    const MIN: Self;
    /// Highest value
    const MAX: Self;
    /// Half scale of a 15 bit unsigned quantizer: `1 << 14`
    const HALF_SCALE: Self;

    /// Accumulator feedback `level - x + err`
    ///
    /// Returns `None` if the result is not representable.
    fn checked_feedback(level: Self, x: Self, err: Self) -> Option<Self>;

    /// Accumulator feedback `level - x + err`, clamped to `MIN..=MAX`.
    fn saturating_feedback(level: Self, x: Self, err: Self) -> Self;

    /// Whether the value is a usable high level (strictly positive, not NaN)
    fn is_strictly_positive(self) -> bool {
        self > Self::ZERO
    }
}

macro_rules! impl_float {
    ($T:ty) => {
        impl Sample for $T {
            const ZERO: Self = 0.0;
            const MIN: Self = <$T>::MIN;
            const MAX: Self = <$T>::MAX;
            const HALF_SCALE: Self = (1 << 14) as _;
            fn checked_feedback(level: Self, x: Self, err: Self) -> Option<Self> {
                let e = level - x + err;
                e.is_finite().then_some(e)
            }
            fn saturating_feedback(level: Self, x: Self, err: Self) -> Self {
                let e = level - x + err;
                if e.is_nan() {
                    err
                } else {
                    e.clamp(<$T>::MIN, <$T>::MAX)
                }
            }
        }
    };
}
impl_float!(f32);
impl_float!(f64);

macro_rules! impl_int {
    ($T:ty, $A:ty) => {
        impl Sample for $T {
            const ZERO: Self = 0;
            const MIN: Self = <$T>::MIN;
            const MAX: Self = <$T>::MAX;
            const HALF_SCALE: Self = 1 << 14;
            fn checked_feedback(level: Self, x: Self, err: Self) -> Option<Self> {
                <$T>::try_from(level as $A - x as $A + err as $A).ok()
            }
            fn saturating_feedback(level: Self, x: Self, err: Self) -> Self {
                (level as $A - x as $A + err as $A).clamp(<$T>::MIN as $A, <$T>::MAX as $A) as Self
            }
        }
    };
}
impl_int!(i16, i32);
impl_int!(i32, i64);
impl_int!(i64, i128);
