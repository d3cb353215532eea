//! imgproc_core - form logic for the image processing page.
//!
//! Algorithm registry, option labels, parameter validation, request
//! assembly and the [`FormController`] state machine. Nothing here touches
//! the DOM or the network, so the same controller drives the browser page
//! and the native command-line client.

pub mod catalog;
pub mod controller;
pub mod error;
pub mod locale;
pub mod media;
pub mod params;
pub mod request;

pub use catalog::{Algorithm, Category};
pub use controller::{ButtonState, FormController, Notice, RequestState, SelectOption, Submission};
pub use error::FormError;
pub use locale::Locale;
pub use media::{ImageFile, ResultImage, SavedImage};
pub use params::{ParamKind, ParamSpec, ParamValue};
pub use request::{FieldValue, FormField, ProcessRequest, RequestBuilder};
