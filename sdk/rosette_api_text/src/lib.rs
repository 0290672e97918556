#![doc = include_str!("../README.md")]

pub mod categories;
pub mod embedding;
pub mod entities;
pub mod language;
pub mod models;
pub mod morphology;
pub mod relationships;
pub mod sentences;
pub mod sentiment;
pub mod syntax;
pub mod tokens;
pub mod topics;
pub mod transliteration;

/// Test utilities shared across modules.
#[cfg(test)]
pub(crate) mod test_utils {
    pub use rosette_api_core::test_support::setup_mock_client;
}
