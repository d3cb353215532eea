//! Algorithm registry.
//!
//! Every algorithm the processing service understands is listed here once,
//! together with its category, the parameters it needs and whether it
//! operates on a second image. The category decides the endpoint.

use crate::params::{BIT_PLANE, ParamSpec, SCALING_FACTOR, SHIFTING_VALUE, TRANSFORM_PARAM};

/// Algorithm category. Each category is served by its own endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Point-wise single image transforms
    Mixed,
    /// Pixel arithmetic between two images
    Arithmetic,
    /// Bitwise operations (one or two images)
    Bitwise,
    /// Fixed-kernel spatial filters
    Convolution,
    /// Intensity transformations
    Transformation,
}

impl Category {
    /// All categories in the order their algorithms are listed.
    pub const ALL: [Category; 5] = [
        Category::Mixed,
        Category::Arithmetic,
        Category::Bitwise,
        Category::Convolution,
        Category::Transformation,
    ];

    /// Endpoint path, relative to the service base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Category::Mixed => "/imageProcessing/process",
            Category::Arithmetic => "/imageProcessing/process/arithmeticOperations",
            Category::Bitwise => "/imageProcessing/process/bitOperations",
            Category::Convolution => "/imageProcessing/process/convolution",
            Category::Transformation => "/imageProcessing/process/transformations",
        }
    }

    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Mixed => "mixed",
            Category::Arithmetic => "arithmetic",
            Category::Bitwise => "bitwise",
            Category::Convolution => "convolution",
            Category::Transformation => "transformation",
        }
    }

    /// Algorithms belonging to this category, in list order.
    pub fn algorithms(&self) -> impl Iterator<Item = Algorithm> + '_ {
        Algorithm::ALL
            .iter()
            .copied()
            .filter(move |alg| alg.category() == *self)
    }
}

/// Every algorithm offered by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Negative,
    Rescaling,
    ShiftRescale,
    BitPlaneSlicing,
    SaltPepperNoise,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    BitwiseNot,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ConvAveraging,
    ConvWeightedAveraging,
    ConvFourNeighbourLaplacian,
    ConvEightNeighbourLaplacian,
    ConvFourNeighbourLaplacianEnhancement,
    ConvEightNeighbourLaplacianEnhancement,
    ConvRobertsOne,
    ConvRobertsTwo,
    ConvSobelX,
    ConvSobelY,
    LogTransformation,
    PowerLaw,
    RandomLut,
}

impl Algorithm {
    /// Registry order: mixed, arithmetic, bitwise, convolution, transformation.
    pub const ALL: [Algorithm; 26] = [
        Algorithm::Negative,
        Algorithm::Rescaling,
        Algorithm::ShiftRescale,
        Algorithm::BitPlaneSlicing,
        Algorithm::SaltPepperNoise,
        Algorithm::Addition,
        Algorithm::Subtraction,
        Algorithm::Multiplication,
        Algorithm::Division,
        Algorithm::BitwiseNot,
        Algorithm::BitwiseAnd,
        Algorithm::BitwiseOr,
        Algorithm::BitwiseXor,
        Algorithm::ConvAveraging,
        Algorithm::ConvWeightedAveraging,
        Algorithm::ConvFourNeighbourLaplacian,
        Algorithm::ConvEightNeighbourLaplacian,
        Algorithm::ConvFourNeighbourLaplacianEnhancement,
        Algorithm::ConvEightNeighbourLaplacianEnhancement,
        Algorithm::ConvRobertsOne,
        Algorithm::ConvRobertsTwo,
        Algorithm::ConvSobelX,
        Algorithm::ConvSobelY,
        Algorithm::LogTransformation,
        Algorithm::PowerLaw,
        Algorithm::RandomLut,
    ];

    /// Canonical name, as sent to the service in the `algorithm` field.
    ///
    /// "Substraction" is the spelling the service matches on.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Negative => "Negative",
            Algorithm::Rescaling => "Rescaling",
            Algorithm::ShiftRescale => "Shift&Rescale",
            Algorithm::BitPlaneSlicing => "Bit Plane Slicing",
            Algorithm::SaltPepperNoise => "Salt&Pepper noise",
            Algorithm::Addition => "Addition",
            Algorithm::Subtraction => "Substraction",
            Algorithm::Multiplication => "Multiplication",
            Algorithm::Division => "Division",
            Algorithm::BitwiseNot => "Bitwise Not",
            Algorithm::BitwiseAnd => "Bitwise And",
            Algorithm::BitwiseOr => "Bitwise Or",
            Algorithm::BitwiseXor => "Bitwise Xor",
            Algorithm::ConvAveraging => "Convolution - Averaging",
            Algorithm::ConvWeightedAveraging => "Convolution - Weighted averaging",
            Algorithm::ConvFourNeighbourLaplacian => "Convolution - Four Neighbour Laplacian",
            Algorithm::ConvEightNeighbourLaplacian => "Convolution - Eight Neighbour Laplacian",
            Algorithm::ConvFourNeighbourLaplacianEnhancement => {
                "Convolution - Four Neighbour Laplacian Enhancement"
            }
            Algorithm::ConvEightNeighbourLaplacianEnhancement => {
                "Convolution - Eight Neighbour Laplacian Enhancement"
            }
            Algorithm::ConvRobertsOne => "Convolution - Roberts One",
            Algorithm::ConvRobertsTwo => "Convolution - Roberts Two",
            Algorithm::ConvSobelX => "Convolution - Sobel X",
            Algorithm::ConvSobelY => "Convolution - Sobel Y",
            Algorithm::LogTransformation => "Logarithmic Transformation",
            Algorithm::PowerLaw => "Power Law",
            Algorithm::RandomLut => "Random LUT",
        }
    }

    /// Look up an algorithm by its canonical name.
    pub fn from_name(name: &str) -> Option<Algorithm> {
        Self::ALL.iter().copied().find(|alg| alg.name() == name)
    }

    pub fn category(&self) -> Category {
        use Algorithm::*;
        match self {
            Negative | Rescaling | ShiftRescale | BitPlaneSlicing | SaltPepperNoise => {
                Category::Mixed
            }
            Addition | Subtraction | Multiplication | Division => Category::Arithmetic,
            BitwiseNot | BitwiseAnd | BitwiseOr | BitwiseXor => Category::Bitwise,
            ConvAveraging
            | ConvWeightedAveraging
            | ConvFourNeighbourLaplacian
            | ConvEightNeighbourLaplacian
            | ConvFourNeighbourLaplacianEnhancement
            | ConvEightNeighbourLaplacianEnhancement
            | ConvRobertsOne
            | ConvRobertsTwo
            | ConvSobelX
            | ConvSobelY => Category::Convolution,
            LogTransformation | PowerLaw | RandomLut => Category::Transformation,
        }
    }

    /// Endpoint path for this algorithm's category.
    pub fn endpoint(&self) -> &'static str {
        self.category().endpoint()
    }

    /// Numeric parameters the service expects, in the order they are asked for.
    pub fn params(&self) -> &'static [ParamSpec] {
        match self {
            Algorithm::Rescaling => &[SCALING_FACTOR],
            Algorithm::ShiftRescale => &[SCALING_FACTOR, SHIFTING_VALUE],
            Algorithm::BitPlaneSlicing => &[BIT_PLANE],
            Algorithm::LogTransformation | Algorithm::PowerLaw | Algorithm::RandomLut => {
                &[TRANSFORM_PARAM]
            }
            _ => &[],
        }
    }

    /// Whether the algorithm combines the primary image with a second one.
    ///
    /// True for all arithmetic operations and every bitwise operation except
    /// "Bitwise Not".
    pub fn requires_second_image(&self) -> bool {
        match self.category() {
            Category::Arithmetic => true,
            Category::Bitwise => *self != Algorithm::BitwiseNot,
            _ => false,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_list_sizes() {
        let counts: Vec<usize> = Category::ALL
            .iter()
            .map(|cat| cat.algorithms().count())
            .collect();
        assert_eq!(counts, vec![5, 4, 4, 10, 3]);
    }

    #[test]
    fn test_registry_order_groups_categories() {
        let mut seen: Vec<Category> = Vec::new();
        for alg in Algorithm::ALL {
            if seen.last() != Some(&alg.category()) {
                seen.push(alg.category());
            }
        }
        assert_eq!(seen, Category::ALL.to_vec());
    }

    #[test]
    fn test_name_lookup_roundtrip() {
        for alg in Algorithm::ALL {
            assert_eq!(Algorithm::from_name(alg.name()), Some(alg));
        }
        assert_eq!(Algorithm::from_name("Subtraction"), None);
        assert_eq!(Algorithm::from_name("negative"), None);
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(Algorithm::Negative.endpoint(), "/imageProcessing/process");
        assert_eq!(
            Algorithm::Division.endpoint(),
            "/imageProcessing/process/arithmeticOperations"
        );
        assert_eq!(
            Algorithm::BitwiseNot.endpoint(),
            "/imageProcessing/process/bitOperations"
        );
        assert_eq!(
            Algorithm::ConvSobelX.endpoint(),
            "/imageProcessing/process/convolution"
        );
        assert_eq!(
            Algorithm::RandomLut.endpoint(),
            "/imageProcessing/process/transformations"
        );
    }

    #[test]
    fn test_second_image_rule() {
        for alg in Algorithm::ALL {
            let expected = match alg.category() {
                Category::Arithmetic => true,
                Category::Bitwise => alg != Algorithm::BitwiseNot,
                _ => false,
            };
            assert_eq!(alg.requires_second_image(), expected, "{}", alg);
        }
        assert!(!Algorithm::BitwiseNot.requires_second_image());
        assert!(Algorithm::BitwiseXor.requires_second_image());
    }

    #[test]
    fn test_param_fields() {
        let fields =
            |alg: Algorithm| -> Vec<&'static str> { alg.params().iter().map(|p| p.field).collect() };
        assert_eq!(fields(Algorithm::Rescaling), vec!["scalingFactor"]);
        assert_eq!(
            fields(Algorithm::ShiftRescale),
            vec!["scalingFactor", "shiftingValue"]
        );
        assert_eq!(fields(Algorithm::BitPlaneSlicing), vec!["nBit"]);
        assert_eq!(fields(Algorithm::PowerLaw), vec!["param"]);
        assert!(fields(Algorithm::ConvSobelX).is_empty());
        assert!(fields(Algorithm::Addition).is_empty());
    }
}
