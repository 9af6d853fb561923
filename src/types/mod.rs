//! Shared request/response types.

pub mod lenient;
mod response;

pub use response::{Created, LoginResponse, MessageResponse, RegisteredResponse};
