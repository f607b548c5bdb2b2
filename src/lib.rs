//! # numr-lite
//!
//! **Operator kernel contract for on-device tensor graph interpreters.**
//!
//! numr-lite runs small inference graphs whose nodes are pluggable operator
//! kernels. Every kernel follows the same two-phase protocol:
//!
//! 1. **Prepare** (once, or after an input shape changes): validate the node,
//!    propagate the element type, and size the outputs.
//! 2. **Eval** (once per invocation): dispatch on the element type and run the
//!    matching compute core.
//!
//! ## Features
//!
//! - **Tensors**: contiguous typed buffers owned by the graph; kernels reach
//!   them through index handles with read or write capability
//! - **Registry**: flat tag → kernel table (`"ABS"`, `"NEG"`)
//! - **Elementwise family**: one `Kernel` implementation shared by every
//!   unary elementwise operator
//! - **Error channel**: descriptive failure messages routed to a host sink
//!
//! ## Quick Start
//!
//! ```
//! use numr_lite::prelude::*;
//!
//! let mut graph = Graph::new();
//! let x = graph.add_tensor(Tensor::from_slice(&[-2i64, -1, 0, 3], [1, 2, 2, 1])?);
//! let y = graph.add_tensor(Tensor::empty([0], DType::I64));
//! graph.add_node("ABS", &[x], &[y])?;
//!
//! graph.allocate_tensors()?;
//! graph.invoke()?;
//! assert_eq!(graph.tensor_data::<i64>(y)?, &[2, 1, 0, 3]);
//! # Ok::<(), numr_lite::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `f16`: Half-precision floats (F16, BF16)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod error;
pub mod kernels;
mod ops;
pub mod runtime;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::kernels::{Kernel, OpRegistry};
    pub use crate::runtime::{
        CollectingReporter, Context, ErrorReporter, Graph, GraphOptions, NodeState,
    };
    pub use crate::tensor::{Shape, Tensor, TensorIndex};
}
