//! Form controller for the image processing page.
//!
//! The controller owns everything the page shows (options, previews, result,
//! button state) and turns user events into at most one in-flight request.
//! It performs no I/O itself: [`FormController::submit`] hands back a
//! [`Submission`] that the frontend sends, and the outcome is reported back
//! through [`FormController::complete`].

use std::collections::HashMap;

use crate::catalog::Algorithm;
use crate::error::FormError;
use crate::locale::Locale;
use crate::media::{ImageFile, RESULT_FILENAME, ResultImage, SavedImage};
use crate::params::ParamSpec;
use crate::request::{ProcessRequest, RequestBuilder};

/// One entry of the algorithm select control.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    /// Canonical algorithm name, never translated
    pub value: &'static str,
    /// Displayed text
    pub text: &'static str,
}

/// Enabled/visible state of the page's action buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    pub process_enabled: bool,
    pub save_enabled: bool,
    pub save_visible: bool,
}

/// Lifecycle of the processing request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    /// Nothing sent yet
    #[default]
    Idle,
    /// Request in flight
    Sending { ticket: u64 },
    /// Last request produced a result
    Done,
    /// Last request failed
    Failed(String),
}

/// Informational message raised by a selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The chosen algorithm operates on two images
    SecondImageRequired,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::SecondImageRequired => "Upload a second image to use this algorithm!",
        }
    }
}

/// A request ready to be sent.
///
/// The ticket identifies the request when its outcome is reported back.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub ticket: u64,
    pub request: ProcessRequest,
}

/// State and event handlers of the processing form.
#[derive(Debug, Default)]
pub struct FormController {
    options: Vec<SelectOption>,
    selected: Option<Algorithm>,
    first_image: Option<ImageFile>,
    second_image: Option<ImageFile>,
    first_preview: Option<String>,
    second_preview: Option<String>,
    result: Option<ResultImage>,
    second_image_visible: bool,
    param_inputs: HashMap<String, String>,
    buttons: ButtonState,
    request_state: RequestState,
    next_ticket: u64,
}

impl FormController {
    /// Create a controller with populated, localized options.
    pub fn new(locale: Locale) -> Self {
        let mut controller = Self::default();
        controller.populate_algorithm_options();
        controller.localize_option_labels(locale);
        controller.refresh_button_state();
        controller
    }

    /// Fill the select control with every algorithm, in registry order.
    pub fn populate_algorithm_options(&mut self) {
        self.options = Algorithm::ALL
            .iter()
            .map(|alg| SelectOption {
                value: alg.name(),
                text: alg.name(),
            })
            .collect();
        log::debug!("📋 Populated {} algorithm options", self.options.len());
    }

    /// Replace displayed option text with labels for `locale`.
    pub fn localize_option_labels(&mut self, locale: Locale) {
        for option in &mut self.options {
            if let Some(label) = locale.translate(option.value) {
                option.text = label;
            }
        }
    }

    /// Re-evaluate which actions are available.
    pub fn refresh_button_state(&mut self) {
        let has_image = self.first_image.is_some();
        self.buttons = ButtonState {
            process_enabled: has_image && !self.is_sending(),
            save_enabled: has_image,
            save_visible: self.result.is_some(),
        };
    }

    /// Primary image picked. `None` means the picker was dismissed.
    pub fn on_first_image_selected(&mut self, file: Option<ImageFile>) -> Result<(), FormError> {
        let Some(file) = file else {
            return Ok(());
        };
        check_image(&file)?;

        log::info!("🖼️ First image: {} ({} bytes)", file.name, file.len());
        self.first_preview = Some(file.to_data_url());
        self.first_image = Some(file);
        self.refresh_button_state();
        Ok(())
    }

    /// Second image picked. `None` means the picker was dismissed.
    pub fn on_second_image_selected(&mut self, file: Option<ImageFile>) -> Result<(), FormError> {
        let Some(file) = file else {
            return Ok(());
        };
        check_image(&file)?;

        log::info!("🖼️ Second image: {} ({} bytes)", file.name, file.len());
        self.second_preview = Some(file.to_data_url());
        self.second_image = Some(file);
        Ok(())
    }

    /// Algorithm chosen in the select control, by canonical name.
    ///
    /// Two-image algorithms reveal the second upload area and return a notice
    /// for the user; everything else hides it.
    pub fn on_algorithm_changed(&mut self, name: &str) -> Result<Option<Notice>, FormError> {
        let Some(algorithm) = Algorithm::from_name(name) else {
            self.selected = None;
            self.second_image_visible = false;
            return Err(FormError::UnknownAlgorithm(name.to_string()));
        };

        log::debug!("🔀 Algorithm selected: {}", algorithm);
        self.selected = Some(algorithm);
        self.second_image_visible = algorithm.requires_second_image();

        Ok(self
            .second_image_visible
            .then_some(Notice::SecondImageRequired))
    }

    /// Store raw text typed into a parameter field.
    pub fn set_param_input(&mut self, field: &str, raw: impl Into<String>) {
        self.param_inputs.insert(field.to_string(), raw.into());
    }

    pub fn param_input(&self, field: &str) -> Option<&str> {
        self.param_inputs.get(field).map(String::as_str)
    }

    /// Parameter fields the selected algorithm needs.
    pub fn param_fields(&self) -> &'static [ParamSpec] {
        self.selected.map(|alg| alg.params()).unwrap_or(&[])
    }

    /// Append the algorithm-specific fields to `builder`.
    ///
    /// Any invalid input aborts the whole submission.
    pub fn collect_parameters(
        &self,
        algorithm: Algorithm,
        mut builder: RequestBuilder,
    ) -> Result<RequestBuilder, FormError> {
        for spec in algorithm.params() {
            let raw = self.param_input(spec.field).unwrap_or("");
            builder = builder.param(spec.parse(raw)?);
        }

        if algorithm.requires_second_image() {
            let second = self
                .second_image
                .clone()
                .ok_or(FormError::SecondImageMissing {
                    algorithm: algorithm.name(),
                })?;
            builder = builder.second_image(second);
        }

        Ok(builder)
    }

    /// Assemble the payload and mark the request as in flight.
    pub fn submit(&mut self) -> Result<Submission, FormError> {
        if self.is_sending() {
            log::warn!("⏳ Submit ignored, request already in flight");
            return Err(FormError::SubmissionInFlight);
        }
        let algorithm = self.selected.ok_or(FormError::NoAlgorithmSelected)?;
        let image = self.first_image.clone().ok_or(FormError::NoPrimaryImage)?;

        let builder = RequestBuilder::new(algorithm, image);
        let request = self.collect_parameters(algorithm, builder)?.build();

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.request_state = RequestState::Sending { ticket };
        self.refresh_button_state();

        log::info!(
            "📤 Submitting {} to {} (ticket {})",
            algorithm,
            request.endpoint,
            ticket
        );
        Ok(Submission { ticket, request })
    }

    /// Report the outcome of a submission.
    ///
    /// Outcomes for cancelled or superseded tickets are ignored.
    pub fn complete<E: std::fmt::Display>(
        &mut self,
        ticket: u64,
        outcome: Result<String, E>,
    ) -> Result<(), FormError> {
        if self.request_state != (RequestState::Sending { ticket }) {
            log::debug!("🗑️ Dropping outcome of stale ticket {}", ticket);
            return Ok(());
        }

        let result = match outcome {
            Ok(body) => ResultImage::from_base64(&body),
            Err(e) => Err(FormError::request_failed(e.to_string())),
        };

        match result {
            Ok(image) => {
                log::info!("✅ Result received ({} bytes)", image.bytes.len());
                self.result = Some(image);
                self.request_state = RequestState::Done;
                self.refresh_button_state();
                Ok(())
            }
            Err(e) => {
                log::error!("❌ Processing failed: {}", e);
                self.request_state = RequestState::Failed(e.to_string());
                self.refresh_button_state();
                Err(e)
            }
        }
    }

    /// Abandon the in-flight request. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        if !self.is_sending() {
            return false;
        }
        log::info!("🛑 Request cancelled");
        self.request_state = RequestState::Idle;
        self.refresh_button_state();
        true
    }

    /// The current result, prepared for download.
    pub fn save_result(&self) -> Result<SavedImage, FormError> {
        let result = self.result.as_ref().ok_or(FormError::NothingToSave)?;
        Ok(SavedImage {
            filename: RESULT_FILENAME,
            data_url: result.data_url.clone(),
            bytes: result.bytes.clone(),
        })
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<Algorithm> {
        self.selected
    }

    pub fn buttons(&self) -> ButtonState {
        self.buttons
    }

    pub fn second_image_visible(&self) -> bool {
        self.second_image_visible
    }

    pub fn first_preview(&self) -> Option<&str> {
        self.first_preview.as_deref()
    }

    pub fn second_preview(&self) -> Option<&str> {
        self.second_preview.as_deref()
    }

    pub fn result(&self) -> Option<&ResultImage> {
        self.result.as_ref()
    }

    pub fn request_state(&self) -> &RequestState {
        &self.request_state
    }

    pub fn is_sending(&self) -> bool {
        matches!(self.request_state, RequestState::Sending { .. })
    }
}

fn check_image(file: &ImageFile) -> Result<(), FormError> {
    if file.is_image() {
        Ok(())
    } else {
        log::warn!("🚫 Rejected {} ({})", file.name, file.mime);
        Err(FormError::InvalidFileType {
            mime: file.mime.clone(),
        })
    }
}
