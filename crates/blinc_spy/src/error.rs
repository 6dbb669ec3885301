//! Scroll-spy error types

use thiserror::Error;

/// Errors raised while building a page or configuring a spy
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpyError {
    /// An element id was registered twice on the same page
    #[error("Duplicate element id: {0}")]
    DuplicateElement(String),

    /// A lookup referenced an element that is not on the page
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// An element named a parent that is not on the page
    #[error("Unknown offset parent '{parent}' for element '{element}'")]
    UnknownParent { element: String, parent: String },

    /// Spy options failed validation
    #[error("Invalid spy options: {0}")]
    InvalidOptions(String),

    /// Element geometry failed validation
    #[error("Invalid geometry for '{element}': {reason}")]
    InvalidGeometry { element: String, reason: String },
}

/// Result type for scroll-spy operations
pub type Result<T> = std::result::Result<T, SpyError>;
