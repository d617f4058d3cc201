//! Crate-wide error taxonomy.
//!
//! Configuration problems are caught before the pipeline touches the
//! network; transport problems abort the invocation without crashing the
//! process. Empty-result states are not errors at all, they are
//! [`crate::pipeline::PipelineOutcome`] variants.

use thiserror::Error;

/// Errors surfaced by the price-check pipeline and its collaborators.
#[derive(Debug, Error)]
pub enum Error {
    /// Search credentials were not supplied via config or environment.
    #[error("missing search credentials: set GOOGLE_API_KEY and GOOGLE_CX")]
    MissingCredentials,

    /// The product name resolved to an empty string.
    #[error("product name must not be empty")]
    EmptyProductName,

    /// The search collaborator request failed (network or non-2xx).
    #[error("search request failed")]
    Transport(#[source] anyhow::Error),
}

/// Convenience result alias for pipeline-facing APIs.
pub type Result<T> = std::result::Result<T, Error>;
