//! Parameter schema for algorithms that need numeric input.
//!
//! Each parameter is bound to one multipart field. Input is collected from
//! inline form fields and validated before anything is sent.

use crate::error::FormError;

/// Kind of number a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// Any finite decimal number
    Number,
    /// Whole number within an inclusive range
    Integer { min: i64, max: i64 },
}

/// A numeric parameter an algorithm requires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Multipart field name
    pub field: &'static str,
    /// Prompt shown next to the input
    pub label: &'static str,
    /// Accepted values
    pub kind: ParamKind,
    /// Alert shown when the input is rejected
    pub invalid_message: &'static str,
}

pub const SCALING_FACTOR: ParamSpec = ParamSpec {
    field: "scalingFactor",
    label: "Insert scaling factor",
    kind: ParamKind::Number,
    invalid_message: "Insert a number for the scaling factor!",
};

pub const SHIFTING_VALUE: ParamSpec = ParamSpec {
    field: "shiftingValue",
    label: "Insert shifting value",
    kind: ParamKind::Number,
    invalid_message: "Insert a number for the shifting value!",
};

/// Bit plane index. Channels are 8 bit.
pub const BIT_PLANE: ParamSpec = ParamSpec {
    field: "nBit",
    label: "Insert number of bit plane",
    kind: ParamKind::Integer { min: 0, max: 7 },
    invalid_message: "Insert a number!",
};

pub const TRANSFORM_PARAM: ParamSpec = ParamSpec {
    field: "param",
    label: "Insert parameter",
    kind: ParamKind::Number,
    invalid_message: "Insert a number!",
};

/// A validated parameter ready to be appended to the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamValue {
    pub field: &'static str,
    /// Normalized text sent to the service
    pub text: String,
}

impl ParamSpec {
    /// Validate raw input for this parameter.
    ///
    /// Surrounding whitespace is ignored; the service parses the trimmed text.
    pub fn parse(&self, raw: &str) -> Result<ParamValue, FormError> {
        let text = raw.trim();
        let valid = match self.kind {
            ParamKind::Number => is_numeric(text),
            ParamKind::Integer { min, max } => text
                .parse::<i64>()
                .map(|n| (min..=max).contains(&n))
                .unwrap_or(false),
        };

        if !valid {
            log::debug!("❌ Rejected {} input {:?}", self.field, raw);
            return Err(FormError::InvalidParameter {
                field: self.field,
                message: self.invalid_message,
            });
        }

        Ok(ParamValue {
            field: self.field,
            text: text.to_string(),
        })
    }
}

/// True for finite decimal numbers such as `2`, `-0.5`, `.5` or `1e3`.
pub fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric() {
        for ok in ["2", "-0.5", ".5", "5.", "1e3", "+7"] {
            assert!(is_numeric(ok), "{}", ok);
        }
        for bad in ["", "abc", "1,5", "NaN", "inf", "2x"] {
            assert!(!is_numeric(bad), "{}", bad);
        }
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let value = SCALING_FACTOR.parse("  1.5 \n").unwrap();
        assert_eq!(value.field, "scalingFactor");
        assert_eq!(value.text, "1.5");
    }

    #[test]
    fn test_parse_rejects_with_field_message() {
        let err = SHIFTING_VALUE.parse("ten").unwrap_err();
        assert_eq!(err.to_string(), "Insert a number for the shifting value!");
    }

    #[test]
    fn test_bit_plane_must_be_whole_and_in_range() {
        assert!(BIT_PLANE.parse("0").is_ok());
        assert!(BIT_PLANE.parse("7").is_ok());
        assert!(BIT_PLANE.parse("8").is_err());
        assert!(BIT_PLANE.parse("-1").is_err());
        assert!(BIT_PLANE.parse("2.5").is_err());
    }
}
