//! REST boundary: resource descriptors, wire DTOs, and the HTTP client.
//!
//! Everything above this module sees `Result<T, ClientError>`; response
//! shapes are resolved here and nowhere else.

pub mod client;
pub mod dto;
pub mod resource;

pub use client::{HttpResourceApi, build_http_client, decode_list};
pub use resource::{ListApi, ListMethod, MutationApi, Resource};
