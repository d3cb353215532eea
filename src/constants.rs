//! Global constants for the imgproc application

/// Processing service address when no configuration overrides it
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Seconds before an unanswered processing request is abandoned
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Element IDs of the processing page.
pub mod dom {
    pub const ALGORITHM_SELECT: &str = "algorithmSelect";
    pub const FIRST_FILE_INPUT: &str = "customFile";
    pub const SECOND_FILE_INPUT: &str = "customFile2";
    pub const FIRST_PREVIEW: &str = "originalImage";
    pub const SECOND_PREVIEW: &str = "originalImage2";
    pub const RESULT_IMAGE: &str = "resultImage";
    pub const PROCESS_BUTTON: &str = "processImage-button";
    pub const SAVE_BUTTON: &str = "saveImage-button";
    pub const SECOND_IMAGE_AREA: &str = "second-image-div";
    /// Container the inline parameter inputs are rendered into
    pub const PARAMS_AREA: &str = "algorithm-params";
}
