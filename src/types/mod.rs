//! Response types produced by the generation service
//!
//! - Structured documents with an itemized requirement breakdown
//! - Plain-text documents for the simpler generation mode

mod requirements;

pub use requirements::{FormattedResult, GenerationOutput, RequirementItem};
