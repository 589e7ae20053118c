//! Risk checks and the polymorphic check abstraction.
//!
//! The orchestrator holds checks as `Arc<dyn Check>` and never depends on
//! concrete check types. Each check converts every internal failure mode into
//! a finding; `run` has no error path by design.

mod certificate;
mod domain_age;
mod redirect;
mod similarity;

pub use certificate::CertificateCheck;
pub use domain_age::DomainAgeCheck;
pub use redirect::RedirectCheck;
pub use similarity::{SimilarityCheck, SimilarityPolicy};

use async_trait::async_trait;
use url::Url;

use crate::models::CheckFinding;

/// A single risk check runnable against a resolved URL.
#[async_trait]
pub trait Check: Send + Sync {
    /// Human-readable check name, used as `CheckFinding::check_name`.
    fn name(&self) -> &'static str;

    /// Runs the check. Always produces exactly one finding; internal
    /// failures degrade to scored or neutral findings, never errors.
    async fn run(&self, url: &Url) -> CheckFinding;
}
