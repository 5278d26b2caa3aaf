//! Error types for the map-preview crates.

use thiserror::Error;

/// Result type alias using PreviewError.
pub type PreviewResult<T> = Result<T, PreviewError>;

/// How far an error reaches before it stops propagating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    /// Only the offending layer is dropped; the scene keeps rendering.
    Layer,
    /// A single point query; surfaced as an absent result.
    Query,
    /// The widget cannot be initialized at all.
    Widget,
}

/// Primary error type for map-preview operations.
#[derive(Debug, Error)]
pub enum PreviewError {
    // === Per-layer errors ===
    #[error("Invalid configuration for layer '{layer}': {message}")]
    InvalidLayerConfig { layer: String, message: String },

    #[error("Unsupported kind '{kind}' for layer '{layer}'")]
    UnsupportedLayerKind { layer: String, kind: String },

    // === Query errors ===
    #[error("Point query failed: {0}")]
    NetworkFailure(String),

    // === Widget errors ===
    #[error("Failed to parse configuration: {0}")]
    ConfigParseError(String),

    #[error("Invalid color ramp: {0}")]
    InvalidColorRamp(String),
}

impl PreviewError {
    pub fn invalid_layer(layer: impl Into<String>, message: impl Into<String>) -> Self {
        PreviewError::InvalidLayerConfig {
            layer: layer.into(),
            message: message.into(),
        }
    }

    /// Get the propagation scope for this error.
    pub fn scope(&self) -> ErrorScope {
        match self {
            PreviewError::InvalidLayerConfig { .. } | PreviewError::UnsupportedLayerKind { .. } => {
                ErrorScope::Layer
            }
            PreviewError::NetworkFailure(_) => ErrorScope::Query,
            PreviewError::ConfigParseError(_) | PreviewError::InvalidColorRamp(_) => {
                ErrorScope::Widget
            }
        }
    }

    /// Whether this error must abort widget initialization.
    pub fn is_fatal(&self) -> bool {
        self.scope() == ErrorScope::Widget
    }
}

impl From<serde_json::Error> for PreviewError {
    fn from(err: serde_json::Error) -> Self {
        PreviewError::ConfigParseError(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for PreviewError {
    fn from(err: url::ParseError) -> Self {
        PreviewError::ConfigParseError(format!("URL error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scopes() {
        assert_eq!(
            PreviewError::invalid_layer("dem", "missing url").scope(),
            ErrorScope::Layer
        );
        assert_eq!(
            PreviewError::NetworkFailure("timeout".into()).scope(),
            ErrorScope::Query
        );
        assert!(PreviewError::ConfigParseError("bad".into()).is_fatal());
        assert!(!PreviewError::UnsupportedLayerKind {
            layer: "a".into(),
            kind: "wms".into()
        }
        .is_fatal());
    }

    #[test]
    fn test_json_error_maps_to_config_parse() {
        let err: PreviewError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, PreviewError::ConfigParseError(_)));
    }
}
