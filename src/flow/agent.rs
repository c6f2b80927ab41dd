// SPDX-License-Identifier: MIT

//! Agent trait and the graph interpreter loop

use std::fmt;
use std::hash::Hash;

use async_trait::async_trait;

use crate::flow::error::GraphError;
use crate::flow::graph::Graph;

/// An agent is one bounded state machine: a typed state record plus a graph
/// of steps over it. Implementations expose a `run()` entry point that
/// builds a fresh state, drives [execute], and returns the terminal
/// snapshot with any failure recorded in the state's `error` field.
#[async_trait]
pub trait GraphAgent: Send + Sync {
    type State: Send;
    type Label: Copy + Eq + Hash + fmt::Debug + Send + Sync;

    /// Agent name, used for logging.
    fn name(&self) -> &str;

    /// The agent's compiled graph.
    fn graph(&self) -> &Graph<Self::State, Self::Label>;

    /// Execute one node. Steps merge their result (or an error marker) into
    /// the state and never return errors directly.
    async fn step(&self, label: Self::Label, state: &mut Self::State);
}

/// Drive an agent's graph to termination.
///
/// Resolves the entry edge, then alternates step execution and edge
/// resolution until a router or terminal edge ends the traversal. Errors
/// only signal structural graph defects; callers fold them into the state.
pub async fn execute<A: GraphAgent>(agent: &A, state: &mut A::State) -> Result<(), GraphError> {
    let graph = agent.graph();
    let mut current = graph.first(state);
    let mut steps = 0;

    while let Some(label) = current {
        steps += 1;
        if steps > graph.step_limit() {
            log::error!("agent '{}' exceeded step limit", agent.name());
            return Err(GraphError::StepLimit(graph.step_limit()));
        }

        log::debug!("agent '{}': executing node {:?}", agent.name(), label);
        agent.step(label, state).await;
        current = graph.next(label, state)?;
    }

    log::debug!("agent '{}' finished after {} steps", agent.name(), steps);
    Ok(())
}
