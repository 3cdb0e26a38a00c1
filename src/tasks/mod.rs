//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod evaluation_loop;

// Re-export main functions
pub use evaluation_loop::evaluation_loop_task;
