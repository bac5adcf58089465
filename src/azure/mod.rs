//! Azure DevOps integration: URL parsing and REST log retrieval.

pub mod client;
pub mod url;
