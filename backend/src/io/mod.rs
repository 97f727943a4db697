//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain. Handlers translate JSON
//! requests into service calls and domain results into DTOs and status codes.

pub mod rest;

pub use rest::*;
