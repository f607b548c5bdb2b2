//! Operator registry for resolving kernels by tag.
//!
//! Graphs look kernels up here when a node is added. The registry is a flat
//! map from operator tag to a shared kernel instance; there is no fallback or
//! inheritance between entries.

use super::{AbsKernel, Kernel, NegKernel};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Table mapping operator tags (e.g. "ABS") to kernels
#[derive(Clone, Default)]
pub struct OpRegistry {
    kernels: HashMap<String, Arc<dyn Kernel>>,
}

impl OpRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in operator installed
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register_kernel(AbsKernel::new());
        registry.register_kernel(NegKernel::new());
        registry
    }

    /// Install `kernel` under `tag`, returning any kernel it replaced
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        kernel: Arc<dyn Kernel>,
    ) -> Option<Arc<dyn Kernel>> {
        let tag = tag.into();
        tracing::debug!(op = %tag, "register kernel");
        self.kernels.insert(tag, kernel)
    }

    /// Install `kernel` under its own name
    pub fn register_kernel<K: Kernel + 'static>(&mut self, kernel: K) -> Option<Arc<dyn Kernel>> {
        let tag = kernel.name();
        self.register(tag, Arc::new(kernel))
    }

    /// Look up a kernel by tag
    pub fn get(&self, tag: &str) -> Option<Arc<dyn Kernel>> {
        self.kernels.get(tag).cloned()
    }

    /// Look up a kernel by tag, failing with `UnknownOperator` on a miss
    pub fn resolve(&self, tag: &str) -> Result<Arc<dyn Kernel>> {
        self.get(tag).ok_or_else(|| Error::unknown_operator(tag))
    }

    /// True if a kernel is registered under `tag`
    pub fn contains(&self, tag: &str) -> bool {
        self.kernels.contains_key(tag)
    }

    /// Registered tags in sorted order
    pub fn ops(&self) -> Vec<&str> {
        let mut ops: Vec<&str> = self.kernels.keys().map(String::as_str).collect();
        ops.sort_unstable();
        ops
    }
}

impl std::fmt::Debug for OpRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpRegistry")
            .field("ops", &self.ops())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ops() {
        let registry = OpRegistry::builtin();
        assert_eq!(registry.ops(), vec!["ABS", "NEG"]);
        assert_eq!(registry.resolve("ABS").unwrap().name(), "ABS");
    }

    #[test]
    fn test_unknown_operator() {
        let registry = OpRegistry::builtin();
        assert!(!registry.contains("abs"));
        assert_eq!(
            registry.resolve("SQRT").err(),
            Some(Error::unknown_operator("SQRT"))
        );
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = OpRegistry::new();
        assert!(registry.register_kernel(AbsKernel::new()).is_none());
        let replaced = registry.register("ABS", Arc::new(NegKernel::new()));
        assert_eq!(replaced.map(|k| k.name()), Some("ABS"));
        assert_eq!(registry.resolve("ABS").unwrap().name(), "NEG");
    }
}
