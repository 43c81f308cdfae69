/// Errors a body builder reports for one body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// An asset the body references could not be found.
    #[error("asset '{path}' not found")]
    MissingAsset { path: String },

    /// The body refers to another body that was not built.
    #[error("body '{name}' not found")]
    MissingBody { name: String },

    /// Any other builder failure.
    #[error("build failed: {detail}")]
    Failed { detail: String },
}
