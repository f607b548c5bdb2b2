//! Operator kernels
//!
//! A kernel implements one operator as a pair of phases:
//!
//! ```text
//! graph build ── registry.resolve("ABS") ──► Arc<dyn Kernel>
//!                                               │
//!   allocate_tensors ──► prepare(ctx)   validate arity, set output dtype,
//!                                       resize output to the input's dims
//!   invoke ───────────► eval(ctx)       dispatch on dtype, run compute core
//! ```
//!
//! Kernels are stateless: everything a call needs is reached through the
//! [`Context`], and nothing survives between calls except tensor contents.

pub mod registry;
pub mod unary;

pub use registry::OpRegistry;
pub use unary::{
    AbsElement, AbsKernel, AbsOp, NegElement, NegKernel, NegOp, UnaryElementwise, UnaryOp,
    abs_kernel, neg_kernel,
};

use crate::error::{Error, PortKind, Result};
use crate::runtime::Context;

/// One operator implementation: shape/type inference plus execution
pub trait Kernel: Send + Sync {
    /// Operator tag this kernel implements (e.g. "ABS")
    fn name(&self) -> &'static str;

    /// Validate the node and size its outputs.
    ///
    /// Must be idempotent: running it again after an upstream shape change
    /// gives the same result as running it on a fresh node.
    fn prepare(&self, ctx: &mut dyn Context) -> Result<()>;

    /// Compute the outputs from the inputs.
    ///
    /// On failure the outputs are unspecified and must not be read.
    fn eval(&self, ctx: &mut dyn Context) -> Result<()>;
}

/// Check that a node has exactly `expected` inputs or outputs.
///
/// A mismatch is reported through the context (without the op tag, which
/// the reporter adds) before the error is returned.
pub fn ensure_arity(
    ctx: &mut dyn Context,
    op: &'static str,
    kind: PortKind,
    expected: usize,
) -> Result<()> {
    let got = match kind {
        PortKind::Input => ctx.num_inputs(),
        PortKind::Output => ctx.num_outputs(),
    };
    if got != expected {
        ctx.report_error(&format!("expected {expected} {kind}, got {got}"));
        return Err(Error::invalid_arity(op, kind, expected, got));
    }
    Ok(())
}
