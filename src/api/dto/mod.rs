//! Data Transfer Objects for REST response serialization.

pub mod subscriber_dto;

pub use subscriber_dto::*;
