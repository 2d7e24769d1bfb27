//! Client for the remote video generation job service.
//!
//! This crate provides:
//! - The `VideoJobService` contract (submit, poll, fetch artifact)
//! - A typed, fixed-shape generation request
//! - `VeoClient`, the REST implementation against the Gemini API
//!   long-running operations endpoint

pub mod client;
pub mod error;
pub mod metrics;
pub mod request;
pub mod service;
pub mod types;

#[cfg(test)]
mod client_tests;

pub use client::{VeoClient, VeoConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::{VeoError, VeoResult};
pub use request::{ImageInput, VideoRequest};
pub use service::VideoJobService;
