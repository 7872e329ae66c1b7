//! Agent turn loop for the devteam
//!
//! An [`Agent`] repeatedly asks its model for the next step, runs the tool
//! the model picked, and feeds the result back until the model stops asking
//! for tools or the turn limit is reached.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod agent;
mod context;
mod error;
pub mod factory;
pub mod persona;

pub use agent::Agent;
pub use context::Context;
pub use error::AgentError;
pub use factory::build_agent;
