//! Error types for numr-lite

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using numr-lite's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Which side of a node a port index refers to
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PortKind {
    /// Input slot
    Input,
    /// Output slot
    Output,
}

impl std::fmt::Display for PortKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => f.write_str("inputs"),
            Self::Output => f.write_str("outputs"),
        }
    }
}

/// Errors that can occur while building or running a graph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Node has the wrong number of inputs or outputs for its operator
    #[error("{op}: expected {expected} {kind}, got {got}")]
    InvalidArity {
        /// Operator tag
        op: &'static str,
        /// Inputs or outputs
        kind: PortKind,
        /// Required count
        expected: usize,
        /// Count found on the node
        got: usize,
    },

    /// Unsupported dtype for an operation
    #[error("Unsupported dtype {dtype} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// No kernel registered under the requested operator tag
    #[error("No kernel registered for operator '{tag}'")]
    UnknownOperator {
        /// Operator tag that failed to resolve
        tag: String,
    },

    /// DType mismatch between a tensor and the requested element type
    #[error("DType mismatch: expected {expected}, got {got}")]
    DTypeMismatch {
        /// Expected dtype
        expected: DType,
        /// Actual dtype
        got: DType,
    },

    /// Shape mismatch in an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Data length does not match the element count of a shape
    #[error("Buffer length mismatch: shape holds {expected} elements, got {got}")]
    BufferLength {
        /// Element count implied by the shape
        expected: usize,
        /// Length of the provided data
        got: usize,
    },

    /// Tensor index outside the graph's tensor table
    #[error("Tensor index {index} out of bounds for table of {len} tensors")]
    TensorIndexOutOfBounds {
        /// The invalid index
        index: usize,
        /// Number of tensors in the table
        len: usize,
    },

    /// Node index outside the graph's node list
    #[error("Node index {index} out of bounds for graph with {len} nodes")]
    NodeIndexOutOfBounds {
        /// The invalid index
        index: usize,
        /// Number of nodes
        len: usize,
    },

    /// Kernel asked for a port the node does not have
    #[error("Port {index} out of bounds: node has {len} {kind}")]
    PortIndexOutOfBounds {
        /// Inputs or outputs
        kind: PortKind,
        /// The requested slot
        index: usize,
        /// Number of slots on the node
        len: usize,
    },

    /// Input and output of a call refer to the same tensor
    #[error("Tensor {index} is used as both input and output")]
    AliasedTensors {
        /// The aliased tensor index
        index: usize,
    },

    /// Invoke attempted on a node that has not been prepared
    #[error("Node {node} has not been prepared")]
    NodeNotPrepared {
        /// Index of the node
        node: usize,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

impl Error {
    /// Create an unsupported dtype error
    pub fn unsupported_dtype(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedDType { dtype, op }
    }

    /// Create an arity error for a node's inputs or outputs
    pub fn invalid_arity(op: &'static str, kind: PortKind, expected: usize, got: usize) -> Self {
        Self::InvalidArity {
            op,
            kind,
            expected,
            got,
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an unknown operator error
    pub fn unknown_operator(tag: impl Into<String>) -> Self {
        Self::UnknownOperator { tag: tag.into() }
    }

    /// True for errors that indicate a malformed node rather than bad data.
    ///
    /// These are raised while building or preparing the graph and are fatal
    /// to the node they concern.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidArity { .. }
                | Self::UnknownOperator { .. }
                | Self::PortIndexOutOfBounds { .. }
                | Self::AliasedTensors { .. }
        )
    }
}
