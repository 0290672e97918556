#![doc = include_str!("../README.md")]

pub mod address_similarity;
pub mod models;
pub mod name_deduplication;
pub mod name_similarity;
pub mod name_translation;
pub mod record_similarity;

/// Test utilities shared across modules.
#[cfg(test)]
pub(crate) mod test_utils {
    pub use rosette_api_core::test_support::setup_mock_client;
}
