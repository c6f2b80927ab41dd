// SPDX-License-Identifier: MIT

//! The video-to-blog application
//!
//! - [collab] - external collaborators (transcript fetch, completion, search)
//! - [agents] - the three state-machine agents
//! - [pipeline] - the sequential orchestrator
//! - [server] - the HTTP adapter

pub mod agents;
pub mod collab;
pub mod pipeline;
pub mod server;
