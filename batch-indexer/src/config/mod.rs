//! Configuration for the batch indexer binary.

pub mod dependencies;
pub mod settings;

pub use dependencies::Dependencies;
pub use settings::Settings;
