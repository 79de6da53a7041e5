//! Inspection of expression graphs without sampling them.

use crate::value::Value;
use std::fmt::Write;

/// Counts the nodes of the expression graph.
///
/// Distributions, deferred computations, containers and scalars each count as one
/// node; a sub-expression shared in several places is counted at every use.
#[must_use]
pub fn node_count(value: &Value) -> usize {
    1 + children(value).iter().map(|child| node_count(child)).sum::<usize>()
}

/// Gets the depth of the expression graph
#[must_use]
pub fn depth(value: &Value) -> usize {
    1 + children(value)
        .iter()
        .map(|child| depth(child))
        .max()
        .unwrap_or(0)
}

/// Checks whether anything in the graph is still to be computed by a combinator
#[must_use]
pub fn has_deferred(value: &Value) -> bool {
    matches!(value, Value::Deferred(_))
        || children(value).iter().any(|child| has_deferred(child))
}

fn children(value: &Value) -> Vec<&Value> {
    match value {
        Value::Choice(choice) => choice.outcomes().iter().map(|o| o.value()).collect(),
        Value::Deferred(deferred) => deferred
            .args()
            .iter()
            .chain(deferred.kwargs().iter().map(|(_, v)| v))
            .collect(),
        Value::Seq(items) => items.iter().collect(),
        Value::Map(entries) => entries.values().collect(),
        Value::Scalar(_) => Vec::new(),
    }
}

/// Expression graph visualizer for debugging and analysis
pub struct GraphVisualizer;

impl GraphVisualizer {
    /// Generates a DOT graph representation for visualization
    ///
    /// # Example
    /// ```rust
    /// use choice_rs::{Choice, graph::GraphVisualizer, operations::add};
    ///
    /// let expr = add(Choice::flat([1, 2])?, 10);
    /// let dot = GraphVisualizer::to_dot(&expr.into());
    /// assert!(dot.starts_with("digraph G {"));
    /// assert!(dot.contains("add"));
    /// # Ok::<(), choice_rs::ChoiceError>(())
    /// ```
    #[must_use]
    pub fn to_dot(value: &Value) -> String {
        let mut dot = String::from("digraph G {\n");
        let mut node_id = 0;
        Self::add_node_to_dot(value, &mut dot, &mut node_id);
        dot.push_str("}\n");
        dot
    }

    fn add_node_to_dot(value: &Value, dot: &mut String, node_id: &mut usize) -> usize {
        let current_id = *node_id;
        *node_id += 1;

        // writing into a String never fails
        let _ = match value {
            Value::Choice(choice) => {
                let label = match choice.total() {
                    Some(total) => format!("Choice / {total}"),
                    None => "Choice".to_owned(),
                };
                writeln!(dot, "  {current_id} [label={label:?}, shape=diamond];")
            }
            Value::Deferred(deferred) => writeln!(
                dot,
                "  {current_id} [label={:?}, shape=box];",
                deferred.combinator().name()
            ),
            Value::Seq(_) => writeln!(dot, "  {current_id} [label=\"Seq\", shape=box];"),
            Value::Map(_) => writeln!(dot, "  {current_id} [label=\"Map\", shape=box];"),
            Value::Scalar(scalar) => writeln!(
                dot,
                "  {current_id} [label={:?}, shape=circle];",
                scalar.to_string()
            ),
        };

        let labelled: Vec<(Option<String>, &Value)> = match value {
            Value::Choice(choice) => choice
                .outcomes()
                .iter()
                .map(|o| (o.weight().map(|w| w.to_string()), o.value()))
                .collect(),
            Value::Map(entries) => entries.iter().map(|(k, v)| (Some(k.clone()), v)).collect(),
            Value::Deferred(deferred) => deferred
                .args()
                .iter()
                .map(|v| (None, v))
                .chain(deferred.kwargs().iter().map(|(k, v)| (Some(k.clone()), v)))
                .collect(),
            Value::Seq(items) => items.iter().map(|v| (None, v)).collect(),
            Value::Scalar(_) => Vec::new(),
        };
        for (label, child) in labelled {
            let child_id = Self::add_node_to_dot(child, dot, node_id);
            let _ = match label {
                Some(label) => writeln!(dot, "  {current_id} -> {child_id} [label={label:?}];"),
                None => writeln!(dot, "  {current_id} -> {child_id};"),
            };
        }

        current_id
    }
}
