//! reqscribe - AI-assisted requirements writing
//!
//! Turns free-form notes and attached documents into a structured
//! requirements document plus an itemized requirement list, and renders the
//! result as rich text, Markdown, HTML, or CSV.

// Allow certain clippy warnings that are either stylistic or from external dependencies
#![allow(clippy::uninlined_format_args)] // Style preference
#![allow(clippy::format_push_string)] // Performance improvement but stylistic
#![allow(clippy::future_not_send)] // Boxed provider futures are Send, the session future need not be
#![allow(clippy::return_self_not_must_use)] // Builder pattern is clear enough
#![allow(clippy::items_after_statements)] // Locally-scoped use statements are fine

pub mod cli;
pub mod commands;
pub mod config;
pub mod encoder;
pub mod error;
pub mod export;
pub mod llm;
pub mod llm_providers;
pub mod logger;
pub mod messages;
pub mod prompt;
pub mod render;
pub mod session;
pub mod types;
pub mod ui;

// Re-export important structs and functions for easier testing
pub use config::Config;
pub use encoder::{AttachmentSet, EncodedFile, EncodedInput, FileInput, FileKind};
pub use error::ReqscribeError;
pub use llm::{GenerationMode, RequirementsClient};
pub use render::{ResultView, ViewMode};
pub use session::{RequestState, Session};

// Re-exports from types module
pub use types::{FormattedResult, GenerationOutput, RequirementItem};
