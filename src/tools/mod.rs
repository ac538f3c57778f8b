//! Feedlab Tools module
//!
//! MCP tool implementations. Each tool is a plain function over the session
//! state; the MCP layer handles locking and serialization.

pub mod analysis;
pub mod catalog;
pub mod premix;
pub mod recipe;
pub mod settings;
pub mod status;
