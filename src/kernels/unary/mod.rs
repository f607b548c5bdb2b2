//! Unary elementwise operator family
//!
//! Every operator here has the same contract: one input, one output, output
//! dtype and dims copied from the input, and `out[i] = f(in[i])`. The family
//! implements [`Kernel`] once in [`UnaryElementwise`]; each operator only
//! supplies its tag, the dtypes it accepts, and a typed compute core.

pub mod abs;
pub mod neg;

pub use abs::{AbsElement, AbsOp, abs_kernel};
pub use neg::{NegElement, NegOp, neg_kernel};

use super::{Kernel, ensure_arity};
use crate::dtype::{DTypeSet, Element};
use crate::error::{Error, PortKind, Result};
use crate::runtime::Context;
use crate::tensor::Tensor;
use std::marker::PhantomData;

/// A type-polymorphic elementwise operator
pub trait UnaryOp: Send + Sync + 'static {
    /// Operator tag used for registration and messages
    const NAME: &'static str;

    /// Dtypes `compute` accepts
    const SUPPORTED: DTypeSet;

    /// Dispatch on `input.dtype()` and write the result into `output`.
    ///
    /// Returns `UnsupportedDType` without touching `output` when the tag is
    /// outside `SUPPORTED`.
    fn compute(input: &Tensor, output: &mut Tensor) -> Result<()>;
}

/// Run a typed compute core over a prepared input/output pair.
///
/// All checks happen before the first write, so a failure leaves `output`
/// untouched.
pub fn apply_unary<T: Element>(
    input: &Tensor,
    output: &mut Tensor,
    kernel: fn(&[T], &mut [T]),
) -> Result<()> {
    let num_elements = input.numel();
    if output.numel() != num_elements {
        return Err(Error::shape_mismatch(input.shape(), output.shape()));
    }
    let src = input.as_slice::<T>()?;
    let dst = output.as_mut_slice::<T>()?;
    kernel(&src[..num_elements], &mut dst[..num_elements]);
    Ok(())
}

/// [`Kernel`] implementation shared by every [`UnaryOp`]
pub struct UnaryElementwise<O> {
    _op: PhantomData<fn() -> O>,
}

impl<O: UnaryOp> UnaryElementwise<O> {
    /// Create the kernel
    pub const fn new() -> Self {
        Self { _op: PhantomData }
    }
}

impl<O: UnaryOp> Default for UnaryElementwise<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: UnaryOp> std::fmt::Debug for UnaryElementwise<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("UnaryElementwise").field(&O::NAME).finish()
    }
}

impl<O: UnaryOp> Kernel for UnaryElementwise<O> {
    fn name(&self) -> &'static str {
        O::NAME
    }

    fn prepare(&self, ctx: &mut dyn Context) -> Result<()> {
        ensure_arity(ctx, O::NAME, PortKind::Input, 1)?;
        ensure_arity(ctx, O::NAME, PortKind::Output, 1)?;

        let input = ctx.input(0)?;
        let output = ctx.output(0)?;

        let (dtype, dims) = {
            let tensor = ctx.tensor(input)?;
            (tensor.dtype(), tensor.dims().clone())
        };
        tracing::debug!(op = O::NAME, %dtype, shape = ?dims, "prepare");

        ctx.set_dtype(output, dtype)?;
        ctx.resize_tensor(output, dims)
    }

    fn eval(&self, ctx: &mut dyn Context) -> Result<()> {
        let input = ctx.input(0)?;
        let output = ctx.output(0)?;

        let result = {
            let (src, dst) = ctx.split(input, output)?;
            tracing::debug!(op = O::NAME, dtype = %src.dtype(), numel = src.numel(), "eval");
            O::compute(src, dst)
        };

        if let Err(Error::UnsupportedDType { dtype, .. }) = &result {
            ctx.report_error(&format!(
                "{} only supports {}, got {}.",
                O::NAME,
                O::SUPPORTED,
                dtype
            ));
        }
        result
    }
}

/// Absolute value kernel, registered as "ABS"
pub type AbsKernel = UnaryElementwise<AbsOp>;

/// Negation kernel, registered as "NEG"
pub type NegKernel = UnaryElementwise<NegOp>;
