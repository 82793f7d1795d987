//! Sample processing and cascading of processors.
use core::marker::PhantomData;

/// Processing block
///
/// Single input, single output
///
/// Processors that carry their own configuration and state implement
/// `Process for Self`. Two processors can be chained in a [`Cascade`]
/// as long as the output type of the first is the input type of the second,
/// e.g. an [`crate::Upsampler`] feeding a [`crate::Pdm`] feeding a
/// [`crate::CicDecimator`].
pub trait Process<X: Copy, Y = X> {
    /// Update the state with a new input and obtain an output
    fn process(&mut self, x: X) -> Y;

    /// Process a block of inputs into a block of outputs
    ///
    /// Input and output must be of the same size.
    fn block(&mut self, x: &[X], y: &mut [Y]) {
        debug_assert_eq!(x.len(), y.len());
        for (x, y) in x.iter().zip(y) {
            *y = self.process(*x);
        }
    }
}

/// Process a block in place.
pub trait Inplace<X: Copy>: Process<X> {
    /// Process an input block into the same data as output
    fn inplace(&mut self, xy: &mut [X]) {
        for xy in xy.iter_mut() {
            *xy = self.process(*xy);
        }
    }
}

//////////// BLANKET ////////////

impl<X: Copy, Y, T: Process<X, Y>> Process<X, Y> for &mut T {
    fn process(&mut self, x: X) -> Y {
        (*self).process(x)
    }

    fn block(&mut self, x: &[X], y: &mut [Y]) {
        (*self).block(x, y)
    }
}

impl<X: Copy, T: Inplace<X>> Inplace<X> for &mut T {
    fn inplace(&mut self, xy: &mut [X]) {
        (*self).inplace(xy)
    }
}

//////////// CASCADE ////////////

/// Processors in series
///
/// `P` is a `(P0, P1)` tuple and `U` the intermediate sample type
/// between `P0` and `P1`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cascade<P, U> {
    /// The processors
    pub inner: P,
    _intermediate: PhantomData<U>,
}

impl<P, U> Cascade<P, U> {
    /// Create a new cascade
    pub const fn new(inner: P) -> Self {
        Self {
            inner,
            _intermediate: PhantomData,
        }
    }
}

/// Type sequence must be X->U->Y
impl<X: Copy, U: Copy, Y, P0, P1> Process<X, Y> for Cascade<(P0, P1), U>
where
    P0: Process<X, U>,
    P1: Process<U, Y>,
{
    fn process(&mut self, x: X) -> Y {
        self.inner.1.process(self.inner.0.process(x))
    }
}

/// Block-wise in place, stage by stage
impl<X: Copy, P0: Inplace<X>, P1: Inplace<X>> Inplace<X> for Cascade<(P0, P1), X> {
    fn inplace(&mut self, xy: &mut [X]) {
        self.inner.0.inplace(xy);
        self.inner.1.inplace(xy);
    }
}
