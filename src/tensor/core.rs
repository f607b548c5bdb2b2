//! Core Tensor type

use super::{Shape, Storage};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use std::fmt;

/// Contiguous n-dimensional array owned by a graph's tensor table
///
/// A `Tensor` consists of:
/// - **Shape**: ordered dimension sizes
/// - **Storage**: contiguous buffer holding exactly `shape.numel()` elements
///   of the tensor's dtype
///
/// Only the owning graph changes a tensor's dtype or shape; kernels request
/// those changes through their context during prepare.
#[derive(Clone)]
pub struct Tensor {
    shape: Shape,
    storage: Storage,
}

impl Tensor {
    /// Create a zero-filled tensor
    ///
    /// # Panics
    ///
    /// Panics if the element count or byte size of `shape` overflows.
    /// For a fallible alternative, use [`Self::try_empty`].
    ///
    /// # Example
    ///
    /// ```
    /// use numr_lite::prelude::*;
    ///
    /// let t = Tensor::empty([2, 3], DType::F32);
    /// assert_eq!(t.numel(), 6);
    /// ```
    pub fn empty(shape: impl Into<Shape>, dtype: DType) -> Self {
        Self::try_empty(shape, dtype).expect("Tensor::empty failed")
    }

    /// Create a zero-filled tensor (fallible version)
    ///
    /// Returns `InvalidArgument` if the shape's element count or byte size
    /// overflows.
    pub fn try_empty(shape: impl Into<Shape>, dtype: DType) -> Result<Self> {
        let shape = shape.into();
        let storage = Storage::zeroed(checked_numel(&shape)?, dtype)?;
        Ok(Self { shape, storage })
    }

    /// Create a tensor from a slice of data
    ///
    /// Returns an error if `data.len()` does not equal the product of the
    /// `shape` dimensions.
    ///
    /// # Example
    ///
    /// ```
    /// use numr_lite::prelude::*;
    ///
    /// let t = Tensor::from_slice(&[-1i32, 2, -3, 4], [2, 2]).unwrap();
    /// assert_eq!(t.dtype(), DType::I32);
    /// ```
    pub fn from_slice<T: Element>(data: &[T], shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        let numel = checked_numel(&shape)?;
        if data.len() != numel {
            return Err(Error::BufferLength {
                expected: numel,
                got: data.len(),
            });
        }
        Ok(Self {
            shape,
            storage: Storage::from_slice(data)?,
        })
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Dimensions as a slice
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.shape.as_slice()
    }

    /// Dimensions as an owned-shape reference
    #[inline]
    pub fn dims(&self) -> &Shape {
        &self.shape
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    /// Underlying storage
    #[inline]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Typed read access to the buffer
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        self.storage.as_slice()
    }

    /// Typed write access to the buffer
    pub fn as_mut_slice<T: Element>(&mut self) -> Result<&mut [T]> {
        self.storage.as_mut_slice()
    }

    /// Copy the buffer out as a `Vec`
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        Ok(self.as_slice::<T>()?.to_vec())
    }

    /// Overwrite the buffer with `data`, which must match dtype and length
    pub fn copy_from_slice<T: Element>(&mut self, data: &[T]) -> Result<()> {
        let dst = self.storage.as_mut_slice::<T>()?;
        if dst.len() != data.len() {
            return Err(Error::BufferLength {
                expected: dst.len(),
                got: data.len(),
            });
        }
        dst.copy_from_slice(data);
        Ok(())
    }

    /// Retag the tensor; the buffer is reallocated when the dtype changes.
    pub(crate) fn set_dtype(&mut self, dtype: DType) -> Result<()> {
        if self.storage.dtype() != dtype {
            self.storage = Storage::zeroed(self.storage.len(), dtype)?;
        }
        Ok(())
    }

    /// Commit a new shape, reallocating when the element count changes.
    ///
    /// Returns true if the shape changed. On error the tensor is unchanged.
    pub(crate) fn resize(&mut self, shape: Shape) -> Result<bool> {
        if self.shape == shape {
            return Ok(false);
        }
        let numel = checked_numel(&shape)?;
        if numel != self.storage.len() {
            self.storage = Storage::zeroed(numel, self.storage.dtype())?;
        }
        self.shape = shape;
        Ok(true)
    }
}

fn checked_numel(shape: &Shape) -> Result<usize> {
    shape.checked_numel().ok_or_else(|| Error::InvalidArgument {
        arg: "shape",
        reason: format!("element count of {shape:?} overflows usize"),
    })
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("dtype", &self.dtype())
            .finish()
    }
}
