//! Lead Enhancer API Library
//!
//! Cleans raw sales leads, scores them by likely value and flags probable
//! duplicates. The core (`validator`, `scorer`, `duplicates`) is pure and
//! synchronous; `handlers` exposes it over HTTP.
//!
//! # Modules
//!
//! - `api`: API-layer namespace.
//! - `core`: Domain-layer namespace.
//! - `config`: Configuration management.
//! - `duplicates`: Company-name duplicate detection.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers and router.
//! - `models`: Core data models.
//! - `pipeline`: Batch validate/score workflow.
//! - `scorer`: Weighted lead scoring and recommendations.
//! - `validator`: Field validation and normalization.

pub mod api;
pub mod core;

pub mod config;
pub mod duplicates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod scorer;
pub mod validator;

pub use duplicates::detect_duplicates;
pub use scorer::score;
pub use validator::validate;
