//! The operation layer: one module per command group.
//!
//! Every operation follows the same shape: resolve the explicit actor,
//! run the permission guards, validate input, then mutate through the
//! repositories inside one transactional scope. Failures short-circuit
//! before any write; no operation leaves a partial mutation visible.

pub mod clients;
pub mod contracts;
pub mod events;
pub mod users;
