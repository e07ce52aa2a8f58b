//! Tech error type.

use blockdown_bundle::BundleError;
use blockdown_renderer::EngineError;
use thiserror::Error;

/// Error produced by a tech build.
///
/// Engine and bundle failures surface unwrapped so the host build
/// system sees the underlying message for the failing target.
#[derive(Debug, Error)]
pub enum TechError {
    /// Reading a source from the bundle failed.
    #[error(transparent)]
    Bundle(#[from] BundleError),
    /// Tree expansion or markup rendering failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[cfg(test)]
mod tests {
    use blockdown_renderer::EngineError;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_engine_error_message_passes_through() {
        let err = TechError::from(EngineError::UndeclaredBlock("hero".to_owned()));
        assert_eq!(err.to_string(), "root block \"hero\" is not declared");
    }

    #[test]
    fn test_bundle_error_message_passes_through() {
        let err = TechError::from(BundleError::not_found("a.markdown"));
        assert_eq!(err.to_string(), "Not found (path: a.markdown)");
    }
}
