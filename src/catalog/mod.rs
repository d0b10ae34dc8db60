pub mod service;
pub mod source;

pub use service::CatalogService;
pub use source::{CatalogSource, JsonFileSource};
#[cfg(test)]
pub use source::StaticSource;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
