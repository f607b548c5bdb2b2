//! DType dispatch utilities for kernels
//!
//! This module provides the `dispatch_dtype!` macro for runtime type dispatch
//! in kernel evaluation. It converts a `DType` tag into a concrete Rust type
//! chosen from an explicit per-operator list.
//!
//! # Usage
//!
//! ```ignore
//! fn my_operation(input: &Tensor) -> Result<()> {
//!     dispatch_dtype!(input.dtype(), T => {
//!         // T is now a concrete type (f32, i32, i64)
//!         let size = std::mem::size_of::<T>();
//!         Ok(())
//!     }, "my_operation", [F32 => f32, I32 => i32, I64 => i64])
//! }
//! ```
//!
//! # Macro Details
//!
//! ## Arguments
//!
//! * `$dtype` - Expression evaluating to a `DType` value
//! * `$T` - Identifier to bind to the concrete type in the body
//! * `$body` - Code block to execute with `T` bound; must evaluate to a `Result`
//! * `$error_op` - Operation name for error messages
//! * `[Variant => type, ...]` - The types this operator implements. Entries
//!   may carry attributes such as `#[cfg(feature = "f16")]`.
//!
//! Every tag missing from the list falls through to a default arm returning
//! `Error::UnsupportedDType`. Supporting a new type means adding it to the
//! list of the operator that gains it; other operators are unaffected.

/// Macro for runtime dtype dispatch to typed operations.
///
/// Expands to a `match` on the tag with one arm per listed type and a
/// default arm producing `UnsupportedDType`.
#[macro_export]
macro_rules! dispatch_dtype {
    (
        $dtype:expr, $T:ident => $body:block, $error_op:expr,
        [$($(#[$attr:meta])* $variant:ident => $ty:ty),+ $(,)?]
    ) => {
        match $dtype {
            $(
                $(#[$attr])*
                $crate::dtype::DType::$variant => {
                    type $T = $ty;
                    $body
                }
            )+
            #[allow(unreachable_patterns)]
            other => Err($crate::error::Error::unsupported_dtype(other, $error_op)),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::dtype::{DType, Element};
    use crate::error::{Error, Result};

    fn element_size(dtype: DType) -> Result<usize> {
        dispatch_dtype!(dtype, T => {
            Ok(std::mem::size_of::<T>())
        }, "element_size", [F32 => f32, I64 => i64])
    }

    fn tag_of(dtype: DType) -> Result<DType> {
        dispatch_dtype!(dtype, T => { Ok(T::DTYPE) }, "tag_of", [
            I32 => i32,
            #[cfg(feature = "f16")]
            F16 => half::f16,
        ])
    }

    #[test]
    fn test_dispatch_selects_listed_type() {
        assert_eq!(element_size(DType::F32).unwrap(), 4);
        assert_eq!(element_size(DType::I64).unwrap(), 8);
        assert_eq!(tag_of(DType::I32).unwrap(), DType::I32);
    }

    #[test]
    fn test_dispatch_default_arm() {
        assert_eq!(
            element_size(DType::I32).unwrap_err(),
            Error::UnsupportedDType {
                dtype: DType::I32,
                op: "element_size"
            }
        );
    }

    #[cfg(feature = "f16")]
    #[test]
    fn test_dispatch_feature_gated_entry() {
        assert_eq!(tag_of(DType::F16).unwrap(), DType::F16);
    }

    #[cfg(not(feature = "f16"))]
    #[test]
    fn test_dispatch_feature_gated_entry_disabled() {
        assert!(tag_of(DType::F16).is_err());
    }
}
