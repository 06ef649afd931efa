//! Blocking client library for the Featrix Sphere model-hosting API.
//!
//! Sphere hosts foundational models: it trains them from uploaded tabular
//! data, tracks the server-side job plan while training runs, and serves
//! embeddings once a model is ready. This crate wraps that HTTP API in a
//! small synchronous client plus the credential plumbing around it.
//!
//! # Features
//!
//! - Credential resolution (environment variable, per-project file, home file)
//! - Blocking HTTP client with bearer-token auth and optional cluster routing
//! - [`FoundationalModel`] handle for per-model operations (refresh, extend,
//!   encode, publish, deprecate, delete)
//!
//! # Example
//!
//! ```rust,no_run
//! use ffs_sphere::SphereClient;
//!
//! # fn example() -> ffs_sphere::Result<()> {
//! let client = SphereClient::new("https://sphere-api.featrix.com", "my-api-key")?;
//! let report = client.health_check()?;
//! println!("server status: {:?}", report.fields.get("status"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod credentials;
pub mod error;
pub mod model;
pub mod types;

pub use client::{CreateModelRequest, ExtendModelRequest, SphereClient, DEFAULT_BASE_URL};
pub use credentials::{CredentialSource, Credentials};
pub use error::{Result, SphereError};
pub use model::FoundationalModel;
pub use types::{
    CreatedModel, DeletionReceipt, HealthReport, Job, JobPlanEntry, ModelRecord, PublishReceipt,
    StatusClass, TrainingProgress,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        // Verify public types are accessible
        let _: fn() -> Result<()> = || Ok(());
    }
}
