//! Errors surfaced by the form controller.
//!
//! The `Display` text of each variant is the message shown to the user.

use thiserror::Error;

/// Errors that abort a form operation. Prior UI state is kept intact.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    /// Selected file does not declare an image MIME type
    #[error("Invalid file format. Please select an image file.")]
    InvalidFileType {
        /// Declared MIME type of the rejected file
        mime: String,
    },

    /// Selected file could not be read
    #[error("Could not read {name}. Please select the file again.")]
    FileUnreadable {
        /// Name of the file being read
        name: String,
    },

    /// Parameter input is not an acceptable number
    #[error("{message}")]
    InvalidParameter {
        /// Multipart field the input belongs to
        field: &'static str,
        /// Alert text for this field
        message: &'static str,
    },

    /// Two-image algorithm submitted without a second image
    #[error("Upload a second image to use this algorithm!")]
    SecondImageMissing {
        /// Canonical name of the selected algorithm
        algorithm: &'static str,
    },

    /// Submit pressed before any algorithm was chosen
    #[error("Select an algorithm first!")]
    NoAlgorithmSelected,

    /// Name does not match any registered algorithm
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Submit pressed without a primary image
    #[error("Upload an image first!")]
    NoPrimaryImage,

    /// Submit pressed while a request is still in flight
    #[error("A request is already being processed.")]
    SubmissionInFlight,

    /// Response body is not a base64-encoded image
    #[error("Error: invalid image data in response ({0})")]
    InvalidResponse(String),

    /// Transport or server failure
    #[error("Error: {0}")]
    RequestFailed(String),

    /// Save pressed without a result image
    #[error("No image to save!")]
    NothingToSave,
}

impl FormError {
    /// Create an invalid response error with a message.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Create a request failure with a message.
    pub fn request_failed(message: impl Into<String>) -> Self {
        Self::RequestFailed(message.into())
    }
}
