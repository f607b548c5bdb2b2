//! Absolute value

use super::{UnaryOp, apply_unary};
use crate::dtype::{DType, DTypeSet, Element};
use crate::error::Result;
use crate::tensor::Tensor;

/// Element types with a native absolute value
///
/// Floats clear the sign bit: NaN stays NaN and `-0.0` becomes `+0.0`.
/// Signed integers wrap, so `MIN` maps to itself; callers should not rely
/// on that value.
pub trait AbsElement: Element {
    /// `|self|`
    fn abs_value(self) -> Self;
}

macro_rules! impl_abs_int {
    ($($ty:ty),+) => {
        $(
            impl AbsElement for $ty {
                #[inline]
                fn abs_value(self) -> Self {
                    self.wrapping_abs()
                }
            }
        )+
    };
}

macro_rules! impl_abs_float {
    ($($ty:ty),+) => {
        $(
            impl AbsElement for $ty {
                #[inline]
                fn abs_value(self) -> Self {
                    self.abs()
                }
            }
        )+
    };
}

impl_abs_int!(i64, i32, i16, i8);
impl_abs_float!(f64, f32);

#[cfg(feature = "f16")]
impl AbsElement for half::f16 {
    #[inline]
    fn abs_value(self) -> Self {
        half::f16::from_bits(self.to_bits() & 0x7fff)
    }
}

#[cfg(feature = "f16")]
impl AbsElement for half::bf16 {
    #[inline]
    fn abs_value(self) -> Self {
        half::bf16::from_bits(self.to_bits() & 0x7fff)
    }
}

/// Compute core: `out[i] = |input[i]|`
#[inline]
pub fn abs_kernel<T: AbsElement>(input: &[T], out: &mut [T]) {
    for (o, &x) in out.iter_mut().zip(input) {
        *o = x.abs_value();
    }
}

/// The "ABS" operator
#[derive(Copy, Clone, Debug, Default)]
pub struct AbsOp;

#[cfg(not(feature = "f16"))]
const ABS_DTYPES: DTypeSet = DTypeSet::SIGNED_INTS
    .with(DType::F64)
    .with(DType::F32);

#[cfg(feature = "f16")]
const ABS_DTYPES: DTypeSet = DTypeSet::SIGNED_INTS
    .with(DType::F64)
    .with(DType::F32)
    .with(DType::F16)
    .with(DType::BF16);

impl UnaryOp for AbsOp {
    const NAME: &'static str = "ABS";
    const SUPPORTED: DTypeSet = ABS_DTYPES;

    fn compute(input: &Tensor, output: &mut Tensor) -> Result<()> {
        crate::dispatch_dtype!(input.dtype(), T => {
            apply_unary::<T>(input, output, abs_kernel::<T>)
        }, Self::NAME, [
            F32 => f32,
            I32 => i32,
            I64 => i64,
            F64 => f64,
            I16 => i16,
            I8 => i8,
            #[cfg(feature = "f16")]
            F16 => half::f16,
            #[cfg(feature = "f16")]
            BF16 => half::bf16,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_abs_kernel_f32() {
        let input = [-2.0f32, -1.0, 0.0, 1.0, 2.0, 3.0];
        let mut out = [0.0f32; 6];
        abs_kernel(&input, &mut out);
        assert_eq!(out, [2.0, 1.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_abs_kernel_signed_zero_and_nan() {
        let input = [-0.0f32, 0.0, f32::NAN, -f32::NAN, f32::NEG_INFINITY];
        let mut out = [1.0f32; 5];
        abs_kernel(&input, &mut out);

        assert_eq!(out[0].to_bits(), 0.0f32.to_bits());
        assert_eq!(out[1].to_bits(), 0.0f32.to_bits());
        assert!(out[2].is_nan());
        assert!(out[3].is_nan());
        assert!(out.iter().all(|v| v.is_sign_positive()));
        assert_eq!(out[4], f32::INFINITY);
    }

    #[test]
    fn test_abs_kernel_ints() {
        let input = [-2i64, -1, 0, 3, i64::MAX, -i64::MAX];
        let mut out = [0i64; 6];
        abs_kernel(&input, &mut out);
        assert_eq!(out, [2, 1, 0, 3, i64::MAX, i64::MAX]);

        let input = [-128i8, -127, 5];
        let mut out = [0i8; 3];
        // MIN has no positive counterpart; the kernel must not panic on it
        abs_kernel(&input, &mut out);
        assert_eq!(&out[1..], &[127, 5]);
    }

    #[test]
    fn test_supported_set() {
        assert!(AbsOp::SUPPORTED.contains(DType::I32));
        assert!(AbsOp::SUPPORTED.contains(DType::I64));
        assert!(AbsOp::SUPPORTED.contains(DType::F32));
        assert!(!AbsOp::SUPPORTED.contains(DType::U8));
        assert!(!AbsOp::SUPPORTED.contains(DType::Bool));
    }

    #[test]
    fn test_compute_dispatch() {
        let input = Tensor::from_slice(&[-2i32, -1, 0, 3], [1, 2, 2, 1]).unwrap();
        let mut output = Tensor::empty([1, 2, 2, 1], DType::I32);
        AbsOp::compute(&input, &mut output).unwrap();
        assert_eq!(output.to_vec::<i32>().unwrap(), vec![2, 1, 0, 3]);
    }

    #[test]
    fn test_compute_unsupported_leaves_output() {
        let input = Tensor::from_slice(&[1u32, 2], [2]).unwrap();
        let mut output = Tensor::from_slice(&[9u32, 9], [2]).unwrap();
        let err = AbsOp::compute(&input, &mut output).unwrap_err();
        assert_eq!(err, Error::unsupported_dtype(DType::U32, "ABS"));
        assert_eq!(output.to_vec::<u32>().unwrap(), vec![9, 9]);
    }

    #[test]
    fn test_compute_rejects_unprepared_output() {
        let input = Tensor::from_slice(&[-1.0f32, 2.0], [2]).unwrap();
        let mut output = Tensor::from_slice(&[5i32, 5], [2]).unwrap();
        assert!(matches!(
            AbsOp::compute(&input, &mut output),
            Err(Error::DTypeMismatch { .. })
        ));
        assert_eq!(output.to_vec::<i32>().unwrap(), vec![5, 5]);

        let mut short = Tensor::empty([1], DType::F32);
        assert!(matches!(
            AbsOp::compute(&input, &mut short),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[cfg(feature = "f16")]
    #[test]
    fn test_abs_half() {
        use half::{bf16, f16};

        let input = [f16::from_f32(-1.5), f16::NEG_ZERO, f16::NAN];
        let mut out = [f16::ZERO; 3];
        abs_kernel(&input, &mut out);
        assert_eq!(out[0], f16::from_f32(1.5));
        assert_eq!(out[1].to_bits(), f16::ZERO.to_bits());
        assert!(out[2].is_nan());

        let input = [bf16::from_f32(-3.0)];
        let mut out = [bf16::ZERO];
        abs_kernel(&input, &mut out);
        assert_eq!(out[0], bf16::from_f32(3.0));
    }
}
