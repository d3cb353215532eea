//! imgproc - client for an HTTP image processing service.
//!
//! The browser build binds [`imgproc_core::FormController`] to the processing
//! page; the native build drives the same controller from the command line.

pub mod config;
pub mod constants;
pub mod transport;

pub use imgproc_core;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
