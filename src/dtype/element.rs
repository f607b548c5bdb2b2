//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::{Pod, Zeroable};
use std::fmt::Debug;

/// Trait for types that can be elements of a tensor
///
/// This trait connects Rust's type system to the runtime dtype tag. Typed
/// tensor accessors check `T::DTYPE` against the tensor's tag before handing
/// out a slice.
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - Basic trait requirements
/// - `Pod + Zeroable` - Reinterpreting the untyped storage (bytemuck)
/// - `PartialEq + Debug` - Test assertions and diagnostics
pub trait Element: Copy + Send + Sync + Pod + Zeroable + PartialEq + Debug + 'static {
    /// The corresponding DType for this Rust type
    const DTYPE: DType;
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:ident),+ $(,)?) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = DType::$dtype;
            }
        )+
    };
}

impl_element!(
    f64 => F64,
    f32 => F32,
    i64 => I64,
    i32 => I32,
    i16 => I16,
    i8 => I8,
    u64 => U64,
    u32 => U32,
    u16 => U16,
    u8 => U8,
);

#[cfg(feature = "f16")]
impl Element for half::f16 {
    const DTYPE: DType = DType::F16;
}

#[cfg(feature = "f16")]
impl Element for half::bf16 {
    const DTYPE: DType = DType::BF16;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_dtype() {
        assert_eq!(f32::DTYPE, DType::F32);
        assert_eq!(i64::DTYPE, DType::I64);
        assert_eq!(u8::DTYPE, DType::U8);
    }

    #[test]
    fn test_element_size_matches_dtype() {
        assert_eq!(std::mem::size_of::<f64>(), f64::DTYPE.size_in_bytes());
        assert_eq!(std::mem::size_of::<i16>(), i16::DTYPE.size_in_bytes());
    }
}
