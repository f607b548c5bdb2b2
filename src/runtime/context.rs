//! Host context protocol consumed by kernels
//!
//! A kernel never owns tensors. During `prepare` and `eval` it receives a
//! [`Context`] scoped to one node and asks it for typed handles to the node's
//! input and output slots. [`InputRef`] grants read access and [`OutputRef`]
//! grants write access; both are only constructible by a context, so a kernel
//! cannot reach tensors outside the node it is running for.

use crate::dtype::DType;
use crate::error::{Error, PortKind, Result};
use crate::tensor::{Shape, Tensor, TensorIndex};

/// Read capability for one of a node's input tensors
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InputRef(TensorIndex);

/// Write capability for one of a node's output tensors
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OutputRef(TensorIndex);

impl InputRef {
    /// Tensor table position this handle points at
    pub fn index(self) -> TensorIndex {
        self.0
    }
}

impl OutputRef {
    /// Tensor table position this handle points at
    pub fn index(self) -> TensorIndex {
        self.0
    }
}

/// Services a host provides to a kernel for the duration of one call
pub trait Context {
    /// Number of input slots on the node
    fn num_inputs(&self) -> usize;

    /// Number of output slots on the node
    fn num_outputs(&self) -> usize;

    /// Handle to input slot `index`
    fn input(&self, index: usize) -> Result<InputRef>;

    /// Handle to output slot `index`
    fn output(&self, index: usize) -> Result<OutputRef>;

    /// Read access to an input tensor
    fn tensor(&self, input: InputRef) -> Result<&Tensor>;

    /// Read access to an input together with write access to an output
    ///
    /// Fails with `AliasedTensors` if both handles name the same tensor.
    fn split(&mut self, input: InputRef, output: OutputRef) -> Result<(&Tensor, &mut Tensor)>;

    /// Set the element type of an output tensor
    fn set_dtype(&mut self, output: OutputRef, dtype: DType) -> Result<()>;

    /// Resize an output tensor to `dims`
    ///
    /// The output takes ownership of `dims`; it never shares a shape with
    /// any other tensor.
    fn resize_tensor(&mut self, output: OutputRef, dims: Shape) -> Result<()>;

    /// Forward a human-readable failure description to the host
    fn report_error(&mut self, message: &str);
}

/// Context over a graph's tensor table, scoped to a single node
pub(crate) struct NodeContext<'a> {
    pub(crate) op: &'a str,
    pub(crate) tensors: &'a mut [Tensor],
    pub(crate) inputs: &'a [TensorIndex],
    pub(crate) outputs: &'a [TensorIndex],
    pub(crate) reporter: &'a mut dyn super::ErrorReporter,
}

impl NodeContext<'_> {
    fn check(&self, index: TensorIndex) -> Result<usize> {
        let raw = index.raw();
        if raw >= self.tensors.len() {
            return Err(Error::TensorIndexOutOfBounds {
                index: raw,
                len: self.tensors.len(),
            });
        }
        Ok(raw)
    }

    fn tensor_mut(&mut self, output: OutputRef) -> Result<&mut Tensor> {
        let raw = self.check(output.0)?;
        Ok(&mut self.tensors[raw])
    }
}

fn port(slots: &[TensorIndex], kind: PortKind, index: usize) -> Result<TensorIndex> {
    slots
        .get(index)
        .copied()
        .ok_or(Error::PortIndexOutOfBounds {
            kind,
            index,
            len: slots.len(),
        })
}

impl Context for NodeContext<'_> {
    fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    fn input(&self, index: usize) -> Result<InputRef> {
        port(self.inputs, PortKind::Input, index).map(InputRef)
    }

    fn output(&self, index: usize) -> Result<OutputRef> {
        port(self.outputs, PortKind::Output, index).map(OutputRef)
    }

    fn tensor(&self, input: InputRef) -> Result<&Tensor> {
        let raw = self.check(input.0)?;
        Ok(&self.tensors[raw])
    }

    fn split(&mut self, input: InputRef, output: OutputRef) -> Result<(&Tensor, &mut Tensor)> {
        let read = self.check(input.0)?;
        let write = self.check(output.0)?;
        if read == write {
            return Err(Error::AliasedTensors { index: read });
        }
        if read < write {
            let (lo, hi) = self.tensors.split_at_mut(write);
            Ok((&lo[read], &mut hi[0]))
        } else {
            let (lo, hi) = self.tensors.split_at_mut(read);
            Ok((&hi[0], &mut lo[write]))
        }
    }

    fn set_dtype(&mut self, output: OutputRef, dtype: DType) -> Result<()> {
        self.tensor_mut(output)?.set_dtype(dtype)
    }

    fn resize_tensor(&mut self, output: OutputRef, dims: Shape) -> Result<()> {
        let op = self.op;
        let tensor = self.tensor_mut(output)?;
        if tensor.resize(dims)? {
            tracing::trace!(op, tensor = output.0.raw(), shape = ?tensor.shape(), "resized output");
        }
        Ok(())
    }

    fn report_error(&mut self, message: &str) {
        self.reporter.report(self.op, message);
    }
}
