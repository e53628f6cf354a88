//! Core types for TrackZone.
//!
//! Type-safe wrappers for the domain concepts shared between the session
//! core and the dashboards.

pub mod employee;
pub mod id;
pub mod role;

pub use employee::EmployeeProfile;
pub use id::EmployeeId;
pub use role::Role;
