//! Core library for the `weather-assistant` CLI.
//!
//! This crate defines:
//! - The form-and-results view state and its submit flow
//! - The client for the weather recommendation backend
//! - Plain-text rendering of the view
//! - Configuration handling
//!
//! It is used by `assistant-cli`, but can also be reused by other front ends.

pub mod client;
pub mod config;
pub mod model;
pub mod render;
pub mod view;

pub use client::{FetchError, HttpBackend, RecommendationBackend};
pub use config::Config;
pub use model::{Recommendation, RecommendationRequest, WeatherSummary};
pub use view::FormView;
