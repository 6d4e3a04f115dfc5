//! facegate-client — Remote collaborators for the profile photo gate.
//!
//! Typed adapters for the face analysis and comparison HTTP API, image
//! preparation before upload, the never-failing gate entry points, and the
//! cached exchange-rate provider.

pub mod config;
pub mod error;
pub mod facepp;
pub mod gate;
pub mod image_prep;
pub mod rates;
pub mod wire;

pub use config::{FaceApiConfig, RateConfig};
pub use error::ClientError;
pub use facepp::FaceApiClient;
pub use gate::{check_capture, compare_faces, FaceAnalyzer, FaceComparer};
pub use image_prep::prepare_image;
pub use rates::{ExchangeRate, HttpRateSource, RateProvider, RateSource};
