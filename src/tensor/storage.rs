//! Storage: contiguous host memory tagged with a dtype

use crate::dtype::{DType, Element};
use crate::error::{Error, Result};

/// Contiguous element buffer for a tensor
///
/// Memory is held as 8-byte words so every supported element type can be
/// reinterpreted in place (bytemuck) without alignment faults. The buffer
/// always holds exactly `len` elements of `dtype`.
#[derive(Clone)]
pub struct Storage {
    words: Vec<u64>,
    len: usize,
    dtype: DType,
}

const WORD_BYTES: usize = std::mem::size_of::<u64>();

impl Storage {
    /// Allocate zero-initialized storage for `len` elements of `dtype`
    ///
    /// Fails with `InvalidArgument` if the byte size does not fit in
    /// `isize::MAX`.
    pub fn zeroed(len: usize, dtype: DType) -> Result<Self> {
        let size_bytes = len
            .checked_mul(dtype.size_in_bytes())
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or_else(|| Error::InvalidArgument {
                arg: "len",
                reason: format!("{len} elements of {dtype} exceed the addressable size"),
            })?;
        Ok(Self {
            words: vec![0u64; size_bytes.div_ceil(WORD_BYTES)],
            len,
            dtype,
        })
    }

    /// Create storage from existing data with inferred dtype
    pub fn from_slice<T: Element>(data: &[T]) -> Result<Self> {
        let mut storage = Self::zeroed(data.len(), T::DTYPE)?;
        storage.as_mut_slice::<T>()?.copy_from_slice(data);
        Ok(storage)
    }

    /// Number of elements (not bytes)
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the storage holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Size of the live data in bytes
    #[inline]
    pub fn size_in_bytes(&self) -> usize {
        self.len * self.dtype.size_in_bytes()
    }

    /// Raw bytes of the live data
    pub fn as_bytes(&self) -> &[u8] {
        let bytes: &[u8] = bytemuck::cast_slice(&self.words);
        &bytes[..self.size_in_bytes()]
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        let size = self.size_in_bytes();
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.words);
        &mut bytes[..size]
    }

    /// Typed read view; `T` must match the storage dtype
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        self.check_dtype::<T>()?;
        bytemuck::try_cast_slice(self.as_bytes()).map_err(|e| Error::InvalidArgument {
            arg: "storage",
            reason: format!("cannot view {} buffer: {e}", self.dtype),
        })
    }

    /// Typed write view; `T` must match the storage dtype
    pub fn as_mut_slice<T: Element>(&mut self) -> Result<&mut [T]> {
        self.check_dtype::<T>()?;
        let dtype = self.dtype;
        bytemuck::try_cast_slice_mut(self.as_bytes_mut()).map_err(|e| Error::InvalidArgument {
            arg: "storage",
            reason: format!("cannot view {dtype} buffer: {e}"),
        })
    }

    fn check_dtype<T: Element>(&self) -> Result<()> {
        if T::DTYPE != self.dtype {
            return Err(Error::DTypeMismatch {
                expected: self.dtype,
                got: T::DTYPE,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("len", &self.len)
            .field("dtype", &self.dtype)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_lengths() {
        let s = Storage::zeroed(3, DType::I16).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.size_in_bytes(), 6);
        assert_eq!(s.as_bytes(), &[0u8; 6]);
        assert_eq!(s.as_slice::<i16>().unwrap(), &[0, 0, 0]);
    }

    #[test]
    fn test_from_slice_roundtrip() {
        let s = Storage::from_slice(&[1.5f64, -2.0]).unwrap();
        assert_eq!(s.dtype(), DType::F64);
        assert_eq!(s.as_slice::<f64>().unwrap(), &[1.5, -2.0]);
    }

    #[test]
    fn test_wrong_element_type() {
        let s = Storage::from_slice(&[1i32, 2]).unwrap();
        let err = s.as_slice::<i64>().unwrap_err();
        assert_eq!(
            err,
            Error::DTypeMismatch {
                expected: DType::I32,
                got: DType::I64
            }
        );
    }

    #[test]
    fn test_empty_storage() {
        let mut s = Storage::zeroed(0, DType::F32).unwrap();
        assert!(s.is_empty());
        assert!(s.as_mut_slice::<f32>().unwrap().is_empty());
    }

    #[test]
    fn test_zeroed_rejects_oversized() {
        assert!(matches!(
            Storage::zeroed(usize::MAX, DType::F32),
            Err(Error::InvalidArgument { arg: "len", .. })
        ));
        assert!(Storage::zeroed(isize::MAX as usize + 1, DType::U8).is_err());
    }

    #[test]
    fn test_bool_storage_has_bytes() {
        let s = Storage::zeroed(5, DType::Bool).unwrap();
        assert_eq!(s.as_bytes().len(), 5);
        assert!(s.as_slice::<u8>().is_err());
    }
}
