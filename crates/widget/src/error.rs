//! Unified error handling and non-fatal diagnostics.
//!
//! Nothing in the widget is allowed to take down the host page. Operations
//! that can fail return [`WidgetError`]; conditions the widget recovers from
//! on its own are reported as [`Diagnostic`]s, logged with `tracing::warn!`
//! and kept on the instance for inspection.

use thiserror::Error;

/// Widget-level error type.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// Rejected input at the programmatic surface.
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// A template failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// A snapshot could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A gesture name that the view does not understand.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// A row-addressing gesture without a usable row id.
    #[error("Action {action} needs a valid item id (got {item_id:?})")]
    MissingItemId {
        action: String,
        item_id: Option<String>,
    },
}

/// Result type alias for `WidgetError`.
pub type Result<T> = std::result::Result<T, WidgetError>;

/// A recoverable problem reported through the diagnostic channel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The configured mount target is not in the host document.
    #[error("Mount target #{id} not found; compact trigger skipped")]
    MountTargetMissing { id: String },

    /// A second instance was requested for a registered site.
    #[error("Cart for site {site:?} already exists; returning existing instance")]
    DuplicateInstance { site: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_error_display() {
        let err = WidgetError::InvalidItem("name cannot be empty".to_string());
        assert_eq!(err.to_string(), "Invalid item: name cannot be empty");

        let err = WidgetError::UnknownAction("explode".to_string());
        assert_eq!(err.to_string(), "Unknown action: explode");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::MountTargetMissing {
            id: "cart-slot".to_string(),
        };
        assert!(diag.to_string().contains("#cart-slot"));

        let diag = Diagnostic::DuplicateInstance {
            site: "shop".to_string(),
        };
        assert!(diag.to_string().contains("\"shop\""));
    }
}
