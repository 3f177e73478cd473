//! Pure domain logic for the clientele CRM ledger.
//!
//! This crate holds everything that can be expressed without I/O: shared
//! id/timestamp types, the closed role enumeration, the permission
//! evaluator, computed event status, payment arithmetic rules, and the
//! shared error type. Persistence lives in `clientele-db`, session handling
//! and the operation layer in `clientele-app`.

pub mod error;
pub mod payments;
pub mod permissions;
pub mod roles;
pub mod status;
pub mod types;
