//! Multipart request assembly.
//!
//! A [`RequestBuilder`] is created fresh for every submission and consumed
//! when the request is built, so no payload survives between submissions.

use crate::catalog::Algorithm;
use crate::media::ImageFile;
use crate::params::ParamValue;

/// Value of one multipart field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    File(ImageFile),
}

/// One multipart form field.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub value: FieldValue,
}

/// A fully assembled processing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRequest {
    pub algorithm: Algorithm,
    /// Endpoint path relative to the service base URL
    pub endpoint: &'static str,
    /// Fields in the order they were appended
    pub fields: Vec<FormField>,
}

impl ProcessRequest {
    /// Absolute URL of the endpoint under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.endpoint)
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    /// Text value of a field, if present and textual.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.field(name)? {
            FieldValue::Text(text) => Some(text),
            FieldValue::File(_) => None,
        }
    }

    /// File value of a field, if present and a file.
    pub fn file(&self, name: &str) -> Option<&ImageFile> {
        match self.field(name)? {
            FieldValue::File(file) => Some(file),
            FieldValue::Text(_) => None,
        }
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.name).collect()
    }

    /// Total size of the file parts.
    pub fn upload_size(&self) -> usize {
        self.fields
            .iter()
            .map(|field| match &field.value {
                FieldValue::File(file) => file.len(),
                FieldValue::Text(_) => 0,
            })
            .sum()
    }
}

/// Builder for one submission's payload.
#[derive(Debug)]
pub struct RequestBuilder {
    algorithm: Algorithm,
    fields: Vec<FormField>,
}

impl RequestBuilder {
    /// Start a payload with the primary image and the algorithm name.
    pub fn new(algorithm: Algorithm, image: ImageFile) -> Self {
        Self {
            algorithm,
            fields: vec![
                FormField {
                    name: "image",
                    value: FieldValue::File(image),
                },
                FormField {
                    name: "algorithm",
                    value: FieldValue::Text(algorithm.name().to_string()),
                },
            ],
        }
    }

    /// Append a validated numeric parameter.
    pub fn param(mut self, value: ParamValue) -> Self {
        self.fields.push(FormField {
            name: value.field,
            value: FieldValue::Text(value.text),
        });
        self
    }

    /// Append the second operand image.
    pub fn second_image(mut self, image: ImageFile) -> Self {
        self.fields.push(FormField {
            name: "secondImage",
            value: FieldValue::File(image),
        });
        self
    }

    /// Finish the payload, routed to the algorithm's category endpoint.
    pub fn build(self) -> ProcessRequest {
        ProcessRequest {
            algorithm: self.algorithm,
            endpoint: self.algorithm.endpoint(),
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::test_util::png_file;
    use crate::params::{SCALING_FACTOR, SHIFTING_VALUE};

    #[test]
    fn test_builder_starts_with_image_and_algorithm() {
        let request = RequestBuilder::new(Algorithm::Negative, png_file("a.png"))
            .build();

        assert_eq!(request.field_names(), vec!["image", "algorithm"]);
        assert_eq!(request.text("algorithm"), Some("Negative"));
        assert_eq!(request.file("image").map(|f| f.name.as_str()), Some("a.png"));
        assert_eq!(request.endpoint, "/imageProcessing/process");
    }

    #[test]
    fn test_params_appended_in_order() {
        let request = RequestBuilder::new(Algorithm::ShiftRescale, png_file("a.png"))
            .param(SCALING_FACTOR.parse("2").unwrap())
            .param(SHIFTING_VALUE.parse("-10").unwrap())
            .build();

        assert_eq!(
            request.field_names(),
            vec!["image", "algorithm", "scalingFactor", "shiftingValue"]
        );
        assert_eq!(request.text("scalingFactor"), Some("2"));
        assert_eq!(request.text("shiftingValue"), Some("-10"));
    }

    #[test]
    fn test_url_joins_base() {
        let request = RequestBuilder::new(Algorithm::BitwiseAnd, png_file("a.png"))
            .second_image(png_file("b.png"))
            .build();

        assert_eq!(
            request.url("http://localhost:8080/"),
            "http://localhost:8080/imageProcessing/process/bitOperations"
        );
        assert_eq!(request.file("secondImage").map(|f| f.name.as_str()), Some("b.png"));
    }

    #[test]
    fn test_large_images_are_not_capped() {
        let photo = ImageFile::new("photo.jpg", "image/jpeg", vec![0u8; 11 << 20]);
        let request = RequestBuilder::new(Algorithm::Addition, photo)
            .second_image(png_file("b.png"))
            .build();

        assert_eq!(request.field_names(), vec!["image", "algorithm", "secondImage"]);
        assert_eq!(request.upload_size(), (11 << 20) + png_file("b.png").len());
    }
}
