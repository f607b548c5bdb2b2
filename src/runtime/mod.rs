//! Host runtime for kernels
//!
//! ```text
//! Graph (owns the tensor table and nodes)
//! ├── OpRegistry   tag → kernel, consulted by add_node
//! ├── NodeContext  per-call view handed to a kernel (implements Context)
//! └── ErrorReporter  where kernel failure messages go
//! ```

mod context;
mod graph;
mod reporter;

pub use context::{Context, InputRef, OutputRef};
pub use graph::{Graph, GraphOptions, NodeState};
pub use reporter::{CollectingReporter, ErrorReporter, TracingReporter};
