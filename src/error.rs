use thiserror::Error;

/// Failure while fetching or splicing a page fragment. Every variant is
/// recovered by a full document navigation to the requested URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("page request returned HTTP {0}")]
    Status(u16),
    #[error("page request failed: {0}")]
    Network(String),
    #[error("fetched document has no body")]
    MissingBody,
    #[error("content shell #{0} is not mounted")]
    MissingShell(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("page key {0:?} appears more than once")]
    DuplicatePage(String),
    #[cfg(not(target_arch = "wasm32"))]
    #[error("catalog file could not be read or written: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("site config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscribeError {
    #[error("could not encode subscribe request: {0}")]
    Encode(String),
    #[error("subscribe request failed: {0}")]
    Network(String),
}
