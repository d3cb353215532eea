//! Native driver for the processing form.
//!
//! Runs the same [`FormController`] flow the browser page runs (pick images,
//! choose an algorithm, fill in parameters, submit, save) with files from
//! disk and the blocking HTTP client.

use std::path::{Path, PathBuf};

use imgproc_core::{Category, FormController, FormError, ImageFile, Locale, media};
use thiserror::Error;

use crate::config::{AppConfig, ConfigError};
use crate::transport::{HttpClient, TransportError};

/// Errors from a native processing run.
#[derive(Error, Debug)]
pub enum NativeError {
    /// Reading an input or writing the result failed
    #[error("{path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Form validation or processing error
    #[error(transparent)]
    Form(#[from] FormError),

    /// Could not set up the HTTP client
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Invalid configuration file
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Inputs of one processing run.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub image: PathBuf,
    pub second_image: Option<PathBuf>,
    /// Canonical algorithm name
    pub algorithm: String,
    /// Parameter field name and raw value pairs
    pub params: Vec<(String, String)>,
    /// Output file, or a directory to place `resultImage.jpg` in
    pub out: PathBuf,
}

/// Read an image from disk. The MIME type is sniffed from the content.
pub fn load_image_file(path: &Path) -> Result<ImageFile, NativeError> {
    let bytes = std::fs::read(path).map_err(|source| NativeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = media::sniff_mime(&name, &bytes);

    log::debug!("📂 Read {} ({}, {} bytes)", name, mime, bytes.len());
    Ok(ImageFile::new(name, mime, bytes))
}

/// Run one full processing cycle and write the result. Returns the written path.
pub fn run_process(config: &AppConfig, options: &ProcessOptions) -> Result<PathBuf, NativeError> {
    let mut controller = FormController::new(config.locale);

    controller.on_first_image_selected(Some(load_image_file(&options.image)?))?;
    if let Some(second) = &options.second_image {
        controller.on_second_image_selected(Some(load_image_file(second)?))?;
    }

    if let Some(notice) = controller.on_algorithm_changed(&options.algorithm)? {
        if options.second_image.is_none() {
            log::warn!("⚠️ {}", notice.message());
        }
    }
    for (field, value) in &options.params {
        controller.set_param_input(field, value.as_str());
    }

    let submission = controller.submit()?;
    let client = HttpClient::new(config)?;
    let outcome = client.send(&submission.request);
    controller.complete(submission.ticket, outcome)?;

    let saved = controller.save_result()?;
    let path = if options.out.is_dir() {
        options.out.join(saved.filename)
    } else {
        options.out.clone()
    };
    std::fs::write(&path, &saved.bytes).map_err(|source| NativeError::Io {
        path: path.clone(),
        source,
    })?;

    log::info!("💾 Saved result to {:?}", path);
    Ok(path)
}

/// Human-readable listing of every algorithm, grouped by category.
pub fn algorithm_listing(locale: Locale) -> String {
    let mut out = String::new();
    for category in Category::ALL {
        out.push_str(&format!("{} ({})\n", category.name(), category.endpoint()));
        for alg in category.algorithms() {
            let label = locale.label(alg);
            let mut line = format!("  {}", alg.name());
            if label != alg.name() {
                line.push_str(&format!(" [{}]", label));
            }
            let params: Vec<&str> = alg.params().iter().map(|p| p.field).collect();
            if !params.is_empty() {
                line.push_str(&format!("  --param {}=<n>", params.join("=<n> --param ")));
            }
            if alg.requires_second_image() {
                line.push_str("  --second-image <path>");
            }
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::test_server::{contains, serve_once};

    const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("imgproc-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_image_file_sniffs_mime() {
        let dir = scratch_dir("load");
        let path = dir.join("upload.bin");
        std::fs::write(&path, PNG_BYTES).unwrap();

        let file = load_image_file(&path).unwrap();
        assert_eq!(file.name, "upload.bin");
        assert_eq!(file.mime, "image/png");
        assert_eq!(&*file.bytes, PNG_BYTES);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_input_file() {
        let err = load_image_file(Path::new("/nonexistent/imgproc/a.png")).unwrap_err();
        assert!(matches!(err, NativeError::Io { .. }));
    }

    #[test]
    fn test_run_process_end_to_end() {
        let dir = scratch_dir("run");
        let input = dir.join("input.png");
        std::fs::write(&input, PNG_BYTES).unwrap();

        let body = {
            use base64::Engine as _;
            base64::engine::general_purpose::STANDARD.encode(JPEG_BYTES)
        };
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", body);
        let config = AppConfig {
            base_url,
            ..AppConfig::new()
        };

        let options = ProcessOptions {
            image: input,
            second_image: None,
            algorithm: "Shift&Rescale".to_string(),
            params: vec![
                ("scalingFactor".to_string(), "2".to_string()),
                ("shiftingValue".to_string(), "10".to_string()),
            ],
            out: dir.clone(),
        };

        let written = run_process(&config, &options).unwrap();
        assert_eq!(written, dir.join("resultImage.jpg"));
        assert_eq!(std::fs::read(&written).unwrap(), JPEG_BYTES);

        let raw = server.join().unwrap();
        assert!(raw.starts_with(b"POST /imageProcessing/process HTTP/1.1"));
        assert!(contains(&raw, "name=\"scalingFactor\""));
        assert!(contains(&raw, "name=\"shiftingValue\""));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_invalid_param_sends_nothing() {
        let dir = scratch_dir("invalid");
        let input = dir.join("input.png");
        std::fs::write(&input, PNG_BYTES).unwrap();

        // Nothing listens here; a request would fail with a transport error.
        let config = AppConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..AppConfig::new()
        };
        let options = ProcessOptions {
            image: input,
            second_image: None,
            algorithm: "Bit Plane Slicing".to_string(),
            params: vec![("nBit".to_string(), "three".to_string())],
            out: dir.clone(),
        };

        let err = run_process(&config, &options).unwrap_err();
        assert!(matches!(
            err,
            NativeError::Form(FormError::InvalidParameter { field: "nBit", .. })
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_algorithm_listing() {
        let listing = algorithm_listing(Locale::Zh);
        assert!(listing.contains("convolution (/imageProcessing/process/convolution)"));
        assert!(listing.contains("  Negative [负片]"));
        assert!(listing.contains("--param scalingFactor=<n> --param shiftingValue=<n>"));
        assert!(listing.contains("Bitwise And [按位与]  --second-image <path>"));
    }
}
