//! Session management and the operation layer.
//!
//! Every command the outer CLI surface exposes maps to one function in
//! [`ops`]: the function receives the explicit actor resolved from the
//! session, runs the permission guards, and performs the domain mutation
//! inside a single transaction. Nothing in here reads ambient session
//! state; only the outermost entry point touches the session file.

pub mod auth;
pub mod config;
pub mod error;
pub mod ops;
