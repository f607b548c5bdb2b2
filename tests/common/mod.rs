//! Common test utilities
#![allow(dead_code)]

use numr_lite::prelude::*;

/// Graph with a single `op` node reading `input` and writing a fresh output.
///
/// The output starts as an empty F32 tensor so tests can observe prepare
/// retagging and resizing it.
pub fn single_op_graph(op: &str, input: Tensor) -> (Graph, TensorIndex, TensorIndex) {
    let mut graph = Graph::new();
    let x = graph.add_tensor(input);
    let y = graph.add_tensor(Tensor::empty([0], DType::F32));
    graph.add_node(op, &[x], &[y]).expect("add_node");
    (graph, x, y)
}

/// Same as [`single_op_graph`] with a collecting reporter attached.
pub fn single_op_graph_with_reporter(
    op: &str,
    input: Tensor,
) -> (Graph, TensorIndex, TensorIndex, CollectingReporter) {
    let reporter = CollectingReporter::new();
    let mut graph = Graph::new().with_reporter(reporter.clone());
    let x = graph.add_tensor(input);
    let y = graph.add_tensor(Tensor::empty([0], DType::F32));
    graph.add_node(op, &[x], &[y]).expect("add_node");
    (graph, x, y, reporter)
}

/// Build, prepare and invoke a single ABS node, returning the output tensor.
pub fn run_abs(input: Tensor) -> Tensor {
    let (mut graph, _, y) = single_op_graph("ABS", input);
    graph.allocate_tensors().expect("allocate_tensors");
    graph.invoke().expect("invoke");
    graph.tensor(y).expect("output").clone()
}
