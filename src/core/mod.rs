//! core
//!
//! Pure domain logic: validated types, the persisted schema, aggregate
//! transforms, the permission policy, integrity verification, and the
//! guided-interaction state machine. Nothing here performs I/O; the
//! store and engine layers own persistence and orchestration.

pub mod config;
pub mod naming;
pub mod ops;
pub mod policy;
pub mod schema;
pub mod session;
pub mod types;
pub mod verify;
