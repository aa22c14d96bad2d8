pub mod error;
pub mod report;
pub mod types;

pub use error::SightError;
pub use report::{Report, ReportKind, ReportMetadata};
pub use types::{
    ComparisonResult, FaceMatch, Feature, FeatureOutcome, ImageInput, ParseFeatureError,
    SimilarityThreshold,
};
