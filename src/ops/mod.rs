//! Operator plumbing shared by kernels
//!
//! The `dispatch_dtype!` macro defined here is exported at the crate root.

mod dispatch;
