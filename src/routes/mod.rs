//! Request/response types for the individual API endpoints.
//!
//! Each submodule owns the DTO types for one endpoint family. The business
//! logic lives in [`crate::services`]; these modules only define the wire
//! shapes, all serde-serializable.

pub mod dashboard;

pub mod finance;

pub mod logistics;

pub mod nutrition;

pub mod pagination;

pub mod posyandu;
