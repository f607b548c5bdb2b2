//! Negation

use super::{UnaryOp, apply_unary};
use crate::dtype::{DType, DTypeSet, Element};
use crate::error::Result;
use crate::tensor::Tensor;

/// Element types with a native negation
///
/// Signed integers wrap, so `MIN` maps to itself.
pub trait NegElement: Element {
    /// `-self`
    fn neg_value(self) -> Self;
}

impl NegElement for i64 {
    #[inline]
    fn neg_value(self) -> Self {
        self.wrapping_neg()
    }
}

impl NegElement for i32 {
    #[inline]
    fn neg_value(self) -> Self {
        self.wrapping_neg()
    }
}

impl NegElement for f32 {
    #[inline]
    fn neg_value(self) -> Self {
        -self
    }
}

/// Compute core: `out[i] = -input[i]`
#[inline]
pub fn neg_kernel<T: NegElement>(input: &[T], out: &mut [T]) {
    for (o, &x) in out.iter_mut().zip(input) {
        *o = x.neg_value();
    }
}

/// The "NEG" operator
#[derive(Copy, Clone, Debug, Default)]
pub struct NegOp;

impl UnaryOp for NegOp {
    const NAME: &'static str = "NEG";
    const SUPPORTED: DTypeSet = DTypeSet::single(DType::F32)
        .with(DType::I32)
        .with(DType::I64);

    fn compute(input: &Tensor, output: &mut Tensor) -> Result<()> {
        crate::dispatch_dtype!(input.dtype(), T => {
            apply_unary::<T>(input, output, neg_kernel::<T>)
        }, Self::NAME, [F32 => f32, I32 => i32, I64 => i64])
    }
}
