//! Graph host: tensor table, nodes and their prepare/eval lifecycle

use super::context::NodeContext;
use super::{ErrorReporter, TracingReporter};
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::kernels::{Kernel, OpRegistry};
use crate::tensor::{Shape, Tensor, TensorIndex};
use smallvec::SmallVec;
use std::sync::Arc;

/// Lifecycle state of a node
///
/// ```text
/// Unprepared ──prepare ok──► Prepared ──eval ok──► Prepared
///      ▲                        │
///      │                     eval err
///  input resized                ▼
///      └──────────────────── Failed ──prepare/eval──► ...
/// ```
///
/// `Failed` only describes the last invocation attempt; the node can be
/// prepared and evaluated again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeState {
    /// Prepare has not run since the node was added or an input was resized
    Unprepared,
    /// Prepare succeeded and the last eval, if any, succeeded
    Prepared,
    /// The last eval failed; outputs must not be read
    Failed,
}

/// Host-side switches for a [`Graph`]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphOptions {
    /// Run prepare on unprepared nodes during `invoke` instead of failing
    /// with `NodeNotPrepared`.
    pub auto_prepare: bool,
}

struct Node {
    kernel: Arc<dyn Kernel>,
    inputs: SmallVec<[TensorIndex; 2]>,
    outputs: SmallVec<[TensorIndex; 1]>,
    state: NodeState,
}

#[derive(Copy, Clone)]
enum Phase {
    Prepare,
    Eval,
}

/// An interpreter graph: owns every tensor and runs nodes in insertion order
///
/// # Example
///
/// ```
/// use numr_lite::prelude::*;
///
/// let mut graph = Graph::new();
/// let x = graph.add_tensor(Tensor::from_slice(&[-2.0f32, 1.0, -0.5], [3]).unwrap());
/// let y = graph.add_tensor(Tensor::empty([0], DType::F32));
/// graph.add_node("ABS", &[x], &[y]).unwrap();
///
/// graph.allocate_tensors().unwrap();
/// graph.invoke().unwrap();
/// assert_eq!(graph.tensor_data::<f32>(y).unwrap(), &[2.0, 1.0, 0.5]);
/// ```
pub struct Graph {
    tensors: Vec<Tensor>,
    nodes: Vec<Node>,
    registry: Arc<OpRegistry>,
    reporter: Box<dyn ErrorReporter>,
    options: GraphOptions,
}

impl Graph {
    /// Empty graph using the built-in operators and a tracing reporter
    pub fn new() -> Self {
        Self::with_registry(Arc::new(OpRegistry::builtin()))
    }

    /// Empty graph resolving operators from `registry`
    pub fn with_registry(registry: Arc<OpRegistry>) -> Self {
        Self {
            tensors: Vec::new(),
            nodes: Vec::new(),
            registry,
            reporter: Box::new(TracingReporter),
            options: GraphOptions::default(),
        }
    }

    /// Replace the error reporting channel
    pub fn with_reporter(mut self, reporter: impl ErrorReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Replace the host options
    pub fn with_options(mut self, options: GraphOptions) -> Self {
        self.options = options;
        self
    }

    /// Add a tensor to the table
    pub fn add_tensor(&mut self, tensor: Tensor) -> TensorIndex {
        self.tensors.push(tensor);
        TensorIndex::new(self.tensors.len() - 1)
    }

    /// Add a node running operator `op`
    ///
    /// The operator is resolved immediately. Arity is not checked here; that
    /// is the kernel's job during prepare.
    pub fn add_node(
        &mut self,
        op: &str,
        inputs: &[TensorIndex],
        outputs: &[TensorIndex],
    ) -> Result<usize> {
        let kernel = self.registry.resolve(op)?;
        for &index in inputs.iter().chain(outputs) {
            self.check_tensor(index)?;
        }
        if let Some(&aliased) = outputs.iter().find(|o| inputs.contains(*o)) {
            return Err(Error::AliasedTensors {
                index: aliased.raw(),
            });
        }

        self.nodes.push(Node {
            kernel,
            inputs: inputs.iter().copied().collect(),
            outputs: outputs.iter().copied().collect(),
            state: NodeState::Unprepared,
        });
        let node = self.nodes.len() - 1;
        tracing::debug!(op, node, inputs = inputs.len(), outputs = outputs.len(), "add node");
        Ok(node)
    }

    /// Run prepare on every node that is not already prepared
    ///
    /// Stops at the first failure, leaving that node unprepared.
    pub fn allocate_tensors(&mut self) -> Result<()> {
        for node in 0..self.nodes.len() {
            if self.nodes[node].state != NodeState::Prepared {
                self.prepare_node(node)?;
            }
        }
        Ok(())
    }

    /// Run prepare on a single node
    pub fn prepare_node(&mut self, node: usize) -> Result<()> {
        match self.run(node, Phase::Prepare) {
            Ok(()) => {
                self.nodes[node].state = NodeState::Prepared;
                Ok(())
            }
            Err(err) => {
                if let Some(entry) = self.nodes.get_mut(node) {
                    entry.state = NodeState::Unprepared;
                    tracing::warn!(op = entry.kernel.name(), node, error = %err, "prepare failed");
                }
                Err(err)
            }
        }
    }

    /// Evaluate every node in insertion order
    ///
    /// Stops at the first failure. Outputs of nodes evaluated before the
    /// failing one keep their results.
    pub fn invoke(&mut self) -> Result<()> {
        for node in 0..self.nodes.len() {
            self.eval_node(node)?;
        }
        Ok(())
    }

    /// Evaluate a single node
    pub fn eval_node(&mut self, node: usize) -> Result<()> {
        if self.node_state(node)? == NodeState::Unprepared {
            if !self.options.auto_prepare {
                return Err(Error::NodeNotPrepared { node });
            }
            self.prepare_node(node)?;
        }

        let result = self.run(node, Phase::Eval);
        let entry = &mut self.nodes[node];
        match &result {
            Ok(()) => entry.state = NodeState::Prepared,
            Err(err) => {
                entry.state = NodeState::Failed;
                tracing::warn!(op = entry.kernel.name(), node, error = %err, "eval failed");
            }
        }
        result
    }

    /// Change the dims of a graph input
    ///
    /// Every node becomes unprepared so the next `allocate_tensors` reruns
    /// shape inference. Resizing to the current dims is a no-op. Dims whose
    /// element count overflows fail with `InvalidArgument` and leave the
    /// graph unchanged.
    pub fn resize_input_tensor(&mut self, index: TensorIndex, dims: impl Into<Shape>) -> Result<()> {
        let raw = self.check_tensor(index)?;
        if self.tensors[raw].resize(dims.into())? {
            tracing::debug!(tensor = raw, shape = ?self.tensors[raw].shape(), "resize input");
            for node in &mut self.nodes {
                node.state = NodeState::Unprepared;
            }
        }
        Ok(())
    }

    /// Swap in a new tensor at `index`, returning the old one
    ///
    /// The replacement may change dtype and dims, so every node becomes
    /// unprepared.
    pub fn replace_tensor(&mut self, index: TensorIndex, tensor: Tensor) -> Result<Tensor> {
        let raw = self.check_tensor(index)?;
        tracing::debug!(tensor = raw, dtype = %tensor.dtype(), shape = ?tensor.shape(), "replace tensor");
        for node in &mut self.nodes {
            node.state = NodeState::Unprepared;
        }
        Ok(std::mem::replace(&mut self.tensors[raw], tensor))
    }

    /// Tensor at `index`
    pub fn tensor(&self, index: TensorIndex) -> Result<&Tensor> {
        let raw = self.check_tensor(index)?;
        Ok(&self.tensors[raw])
    }

    /// Overwrite the contents of the tensor at `index`
    pub fn set_tensor_data<T: Element>(&mut self, index: TensorIndex, data: &[T]) -> Result<()> {
        let raw = self.check_tensor(index)?;
        self.tensors[raw].copy_from_slice(data)
    }

    /// Typed view of the tensor at `index`
    pub fn tensor_data<T: Element>(&self, index: TensorIndex) -> Result<&[T]> {
        self.tensor(index)?.as_slice()
    }

    /// Current lifecycle state of `node`
    pub fn node_state(&self, node: usize) -> Result<NodeState> {
        self.nodes
            .get(node)
            .map(|n| n.state)
            .ok_or(Error::NodeIndexOutOfBounds {
                index: node,
                len: self.nodes.len(),
            })
    }

    /// Operator tag of `node`
    pub fn node_op(&self, node: usize) -> Result<&'static str> {
        self.nodes
            .get(node)
            .map(|n| n.kernel.name())
            .ok_or(Error::NodeIndexOutOfBounds {
                index: node,
                len: self.nodes.len(),
            })
    }

    /// Number of tensors in the table
    pub fn num_tensors(&self) -> usize {
        self.tensors.len()
    }

    /// Number of nodes
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn check_tensor(&self, index: TensorIndex) -> Result<usize> {
        let raw = index.raw();
        if raw >= self.tensors.len() {
            return Err(Error::TensorIndexOutOfBounds {
                index: raw,
                len: self.tensors.len(),
            });
        }
        Ok(raw)
    }

    fn run(&mut self, node: usize, phase: Phase) -> Result<()> {
        let Self {
            tensors,
            nodes,
            reporter,
            ..
        } = self;
        let len = nodes.len();
        let entry = nodes
            .get(node)
            .ok_or(Error::NodeIndexOutOfBounds { index: node, len })?;
        let kernel = Arc::clone(&entry.kernel);

        let mut ctx = NodeContext {
            op: kernel.name(),
            tensors: tensors.as_mut_slice(),
            inputs: &entry.inputs,
            outputs: &entry.outputs,
            reporter: &mut **reporter,
        };
        match phase {
            Phase::Prepare => kernel.prepare(&mut ctx),
            Phase::Eval => kernel.eval(&mut ctx),
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("tensors", &self.tensors.len())
            .field("nodes", &self.nodes.len())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;

    fn abs_graph() -> (Graph, TensorIndex, TensorIndex) {
        let mut graph = Graph::new();
        let x = graph.add_tensor(Tensor::from_slice(&[-1i32, 4], [2]).unwrap());
        let y = graph.add_tensor(Tensor::empty([0], DType::F32));
        graph.add_node("ABS", &[x], &[y]).unwrap();
        (graph, x, y)
    }

    #[test]
    fn test_states() {
        let (mut graph, _, y) = abs_graph();
        assert_eq!(graph.node_state(0).unwrap(), NodeState::Unprepared);
        assert_eq!(
            graph.invoke().unwrap_err(),
            Error::NodeNotPrepared { node: 0 }
        );

        graph.allocate_tensors().unwrap();
        assert_eq!(graph.node_state(0).unwrap(), NodeState::Prepared);
        assert_eq!(graph.tensor(y).unwrap().dtype(), DType::I32);

        graph.invoke().unwrap();
        assert_eq!(graph.node_state(0).unwrap(), NodeState::Prepared);
        assert_eq!(graph.tensor_data::<i32>(y).unwrap(), &[1, 4]);
    }

    #[test]
    fn test_auto_prepare() {
        let (graph, _, y) = abs_graph();
        let mut graph = graph.with_options(GraphOptions { auto_prepare: true });
        graph.invoke().unwrap();
        assert_eq!(graph.tensor_data::<i32>(y).unwrap(), &[1, 4]);
    }

    #[test]
    fn test_add_node_validation() {
        let mut graph = Graph::new();
        let x = graph.add_tensor(Tensor::empty([1], DType::F32));

        assert_eq!(
            graph.add_node("CONV_2D", &[x], &[x]).unwrap_err(),
            Error::unknown_operator("CONV_2D")
        );
        assert_eq!(
            graph
                .add_node("ABS", &[x], &[TensorIndex::new(5)])
                .unwrap_err(),
            Error::TensorIndexOutOfBounds { index: 5, len: 1 }
        );
        assert_eq!(
            graph.add_node("ABS", &[x], &[x]).unwrap_err(),
            Error::AliasedTensors { index: 0 }
        );
        assert_eq!(graph.num_nodes(), 0);
        assert_eq!(graph.num_tensors(), 1);
    }

    #[test]
    fn test_node_lookup_out_of_bounds() {
        let (graph, _, _) = abs_graph();
        assert_eq!(graph.node_op(0).unwrap(), "ABS");
        assert_eq!(
            graph.node_state(3).unwrap_err(),
            Error::NodeIndexOutOfBounds { index: 3, len: 1 }
        );
    }
}
