//! Tensor types
//!
//! This module provides the `Tensor` type stored in a graph's tensor table,
//! its `Shape` and `Storage`, and the `TensorIndex` handle kernels use to
//! refer to table entries.

mod core;
mod id;
mod shape;
mod storage;

pub use core::Tensor;
pub use id::TensorIndex;
pub use shape::Shape;
pub use storage::Storage;
