//! Batch scoring: runs each application through retrieve → extract → score
//! and assembles the response. Items are processed one at a time; an item
//! that fails at any stage is logged and left out of the output.

pub mod handlers;
pub mod models;
pub mod orchestrator;
