//! Data Transfer Objects for REST request/response serialization.
//!
//! Request parameters use the backend's PascalCase; response bodies use
//! camelCase.

pub mod catalog_dto;
pub mod common_dto;

pub use catalog_dto::*;
pub use common_dto::*;
