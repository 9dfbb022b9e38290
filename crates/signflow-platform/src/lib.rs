//! Client for the e-signature platform.
//!
//! Exposes the [`SignaturePlatform`] trait (create document, add recipient, send
//! for signing, mint signing token) and [`PlatformClient`], its JSON-over-HTTP
//! implementation authenticated with a static `X-API-KEY` header.
//!
//! Failures distinguish a platform that answered with an error
//! ([`PlatformError::Rejected`]) from one that never answered
//! ([`PlatformError::Unreachable`]).

pub mod client;
pub mod traits;

pub use client::PlatformClient;
pub use traits::{PlatformError, PlatformOperation, PlatformResult, SignaturePlatform};
