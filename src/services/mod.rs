//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own provider I/O and background work so route handlers
//! can stay focused on request validation and status mapping.

pub mod contact;
pub mod github;
pub mod sweeper;
