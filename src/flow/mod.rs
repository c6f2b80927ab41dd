// SPDX-License-Identifier: MIT

//! Minimal state-graph framework for the pipeline agents
//!
//! - [graph] - compile-once graphs with fixed and conditional edges
//! - [agent] - the `GraphAgent` trait and interpreter loop
//! - [error] - typed errors shared across the crate

pub mod agent;
pub mod error;
pub mod graph;

pub use agent::{execute, GraphAgent};
pub use error::{GraphError, ScribeError};
pub use graph::{Graph, GraphBuilder, Verdict};
