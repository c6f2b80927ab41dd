// SPDX-License-Identifier: MIT

//! Compile-once conditional state graphs
//!
//! Each agent describes its steps as a small directed graph: fixed edges
//! between nodes, plus conditional edges whose router inspects the state and
//! either continues to a node or ends the traversal. Node labels are plain
//! enums and routers are function pointers, so a graph is a static value
//! built once in the agent's constructor.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::flow::error::GraphError;

/// Default interpreter safety limit; the agent graphs here are 2-3 nodes.
const DEFAULT_STEP_LIMIT: usize = 16;

/// Outcome of a router function: follow an edge or end the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<L> {
    Continue(L),
    End,
}

/// Pure routing function for a conditional edge. Must not mutate state.
pub type Router<S, L> = fn(&S) -> Verdict<L>;

/// Outgoing edge of a node
pub enum Edge<S, L> {
    /// Always proceed to the target node
    Fixed(L),
    /// Router decides between a target node and termination
    Conditional(Router<S, L>),
    /// Terminal node
    End,
}

impl<S, L: fmt::Debug> fmt::Debug for Edge<S, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Fixed(target) => write!(f, "Fixed({:?})", target),
            Edge::Conditional(_) => write!(f, "Conditional(<router>)"),
            Edge::End => write!(f, "End"),
        }
    }
}

/// A compiled agent graph
pub struct Graph<S, L> {
    entry: Edge<S, L>,
    edges: HashMap<L, Edge<S, L>>,
    step_limit: usize,
}

impl<S, L> Graph<S, L>
where
    L: Copy + Eq + Hash + fmt::Debug,
{
    /// Resolve the entry edge against the initial state.
    pub fn first(&self, state: &S) -> Option<L> {
        Self::resolve(&self.entry, state)
    }

    /// Resolve the outgoing edge of `from` against the current state.
    pub fn next(&self, from: L, state: &S) -> Result<Option<L>, GraphError> {
        let edge = self
            .edges
            .get(&from)
            .ok_or_else(|| GraphError::MissingEdge(format!("{:?}", from)))?;
        Ok(Self::resolve(edge, state))
    }

    /// Maximum number of steps the interpreter may execute.
    pub fn step_limit(&self) -> usize {
        self.step_limit
    }

    fn resolve(edge: &Edge<S, L>, state: &S) -> Option<L> {
        match edge {
            Edge::Fixed(target) => Some(*target),
            Edge::Conditional(router) => match router(state) {
                Verdict::Continue(target) => Some(target),
                Verdict::End => None,
            },
            Edge::End => None,
        }
    }
}

/// Builder for agent graphs
pub struct GraphBuilder<S, L> {
    entry: Option<Edge<S, L>>,
    edges: HashMap<L, Edge<S, L>>,
    step_limit: usize,
}

impl<S, L> GraphBuilder<S, L>
where
    L: Copy + Eq + Hash + fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            entry: None,
            edges: HashMap::new(),
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    /// Start the traversal at `node` unconditionally.
    pub fn entry(mut self, node: L) -> Self {
        self.entry = Some(Edge::Fixed(node));
        self
    }

    /// Route before the first step; the traversal may end without executing
    /// any node (the Blogger graph guards its inputs this way).
    pub fn entry_router(mut self, router: Router<S, L>) -> Self {
        self.entry = Some(Edge::Conditional(router));
        self
    }

    /// Add a fixed edge between two nodes.
    pub fn edge(mut self, from: L, to: L) -> Self {
        self.edges.insert(from, Edge::Fixed(to));
        self
    }

    /// Add a conditional edge leaving `from`.
    pub fn conditional_edge(mut self, from: L, router: Router<S, L>) -> Self {
        self.edges.insert(from, Edge::Conditional(router));
        self
    }

    /// Mark `node` as terminal.
    pub fn terminal(mut self, node: L) -> Self {
        self.edges.insert(node, Edge::End);
        self
    }

    /// Override the interpreter safety limit.
    pub fn step_limit(mut self, limit: usize) -> Self {
        self.step_limit = limit;
        self
    }

    /// Validate and freeze the graph.
    ///
    /// Every fixed edge (including a fixed entry) must point at a node with
    /// an outgoing edge registered; conditional targets are checked by the
    /// interpreter at runtime.
    pub fn compile(self) -> Result<Graph<S, L>, GraphError> {
        let entry = self.entry.ok_or(GraphError::NoEntryPoint)?;

        let mut fixed_targets = Vec::new();
        if let Edge::Fixed(target) = &entry {
            fixed_targets.push(*target);
        }
        for edge in self.edges.values() {
            if let Edge::Fixed(target) = edge {
                fixed_targets.push(*target);
            }
        }
        for target in fixed_targets {
            if !self.edges.contains_key(&target) {
                return Err(GraphError::MissingEdge(format!("{:?}", target)));
            }
        }

        Ok(Graph {
            entry,
            edges: self.edges,
            step_limit: self.step_limit,
        })
    }
}

impl<S, L> Default for GraphBuilder<S, L>
where
    L: Copy + Eq + Hash + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Node {
        A,
        B,
    }

    struct State {
        proceed: bool,
    }

    fn route(state: &State) -> Verdict<Node> {
        if state.proceed {
            Verdict::Continue(Node::B)
        } else {
            Verdict::End
        }
    }

    #[test]
    fn test_compile_requires_entry() {
        let result = GraphBuilder::<State, Node>::new().terminal(Node::A).compile();
        assert!(matches!(result, Err(GraphError::NoEntryPoint)));
    }

    #[test]
    fn test_compile_rejects_dangling_fixed_edge() {
        let result = GraphBuilder::<State, Node>::new()
            .entry(Node::A)
            .edge(Node::A, Node::B)
            .compile();
        assert!(matches!(result, Err(GraphError::MissingEdge(_))));
    }

    #[test]
    fn test_conditional_edge_resolution() {
        let graph = GraphBuilder::new()
            .entry(Node::A)
            .conditional_edge(Node::A, route)
            .terminal(Node::B)
            .compile()
            .unwrap();

        assert_eq!(graph.first(&State { proceed: true }), Some(Node::A));
        assert_eq!(
            graph.next(Node::A, &State { proceed: true }).unwrap(),
            Some(Node::B)
        );
        assert_eq!(graph.next(Node::A, &State { proceed: false }).unwrap(), None);
        assert_eq!(graph.next(Node::B, &State { proceed: true }).unwrap(), None);
    }

    #[test]
    fn test_conditional_entry_can_end_immediately() {
        let graph = GraphBuilder::new()
            .entry_router(route)
            .terminal(Node::B)
            .compile()
            .unwrap();

        assert_eq!(graph.first(&State { proceed: false }), None);
        assert_eq!(graph.first(&State { proceed: true }), Some(Node::B));
    }

    #[test]
    fn test_next_on_unregistered_node_is_error() {
        let graph = GraphBuilder::new()
            .entry(Node::A)
            .terminal(Node::A)
            .compile()
            .unwrap();

        assert!(graph.next(Node::B, &State { proceed: true }).is_err());
    }
}
