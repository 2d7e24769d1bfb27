//! Shared data models for VividMotion.
//!
//! This crate provides Serde-serializable types for:
//! - Generation requests (prompt, format, reference image)
//! - Remote job handles returned by the generation service
//! - History records of finished videos
//! - The access credential passed to every remote call

pub mod config;
pub mod credential;
pub mod format;
pub mod job;
pub mod video;

// Re-export common types
pub use config::{ConfigError, GenerationConfig, ReferenceImage, REFERENCE_IMAGE_MIME_TYPE};
pub use credential::ApiKey;
pub use format::{AspectRatio, FormatParseError, Resolution};
pub use job::{JobError, JobHandle};
pub use video::{GeneratedVideoRecord, VideoId};
