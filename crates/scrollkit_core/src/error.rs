//! Host environment errors

use thiserror::Error;

/// Failures reported by the host document.
///
/// Geometry reads on detached or unknown elements are not errors; hosts
/// report a zero rect for those and computations degrade to no-ops. The only
/// fallible operations are the document accessors and probe insertion, which
/// fail when no renderable document exists (e.g. server-side rendering).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// No renderable document is available
    #[error("no renderable document available")]
    DocumentUnavailable,
}
