//! Display labels for algorithm options.
//!
//! Only the displayed text is ever translated. Option values stay canonical
//! so the service always receives the original algorithm name.

use serde::{Deserialize, Serialize};

use crate::catalog::Algorithm;

/// Display language for option labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Canonical names
    En,
    /// Simplified Chinese
    #[default]
    Zh,
}

impl Locale {
    /// Label for `algorithm` in this locale.
    pub fn label(&self, algorithm: Algorithm) -> &'static str {
        match self {
            Locale::En => algorithm.name(),
            Locale::Zh => zh_label(algorithm),
        }
    }

    /// Translate displayed text, if it is a known canonical name.
    pub fn translate(&self, text: &str) -> Option<&'static str> {
        Algorithm::from_name(text).map(|alg| self.label(alg))
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "zh" => Ok(Locale::Zh),
            other => Err(format!("unsupported locale '{}'", other)),
        }
    }
}

fn zh_label(algorithm: Algorithm) -> &'static str {
    match algorithm {
        Algorithm::Negative => "负片",
        Algorithm::Rescaling => "重新缩放",
        Algorithm::ShiftRescale => "移位和重新缩放",
        Algorithm::BitPlaneSlicing => "位平面切片",
        Algorithm::SaltPepperNoise => "椒盐噪声",
        Algorithm::Addition => "加法",
        Algorithm::Subtraction => "减法",
        Algorithm::Multiplication => "乘法",
        Algorithm::Division => "除法",
        Algorithm::BitwiseNot => "按位取反",
        Algorithm::BitwiseAnd => "按位与",
        Algorithm::BitwiseOr => "按位或",
        Algorithm::BitwiseXor => "按位异或",
        Algorithm::ConvAveraging => "卷积 - 平均",
        Algorithm::ConvWeightedAveraging => "卷积 - 加权平均",
        Algorithm::ConvFourNeighbourLaplacian => "卷积 - 四邻域拉普拉斯",
        Algorithm::ConvEightNeighbourLaplacian => "卷积 - 八邻域拉普拉斯",
        Algorithm::ConvFourNeighbourLaplacianEnhancement => "卷积 - 四邻域拉普拉斯增强",
        Algorithm::ConvEightNeighbourLaplacianEnhancement => "卷积 - 八邻域拉普拉斯增强",
        Algorithm::ConvRobertsOne => "卷积 - 罗伯茨一",
        Algorithm::ConvRobertsTwo => "卷积 - 罗伯茨二",
        Algorithm::ConvSobelX => "卷积 - 索贝尔 X",
        Algorithm::ConvSobelY => "卷积 - 索贝尔 Y",
        Algorithm::LogTransformation => "对数变换",
        Algorithm::PowerLaw => "幂律变换",
        Algorithm::RandomLut => "随机 LUT",
    }
}
