//! # Algorithms Module

pub mod validator;

pub use validator::{validate, validate_field};
