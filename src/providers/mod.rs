// External profile data providers
//
// Commands that show live data (`projects`, `stats`, `cp`) go through the
// `ProfileProvider` trait. Every failure (network error, non-success status,
// malformed payload) is a plain `Err`; callers do not distinguish them.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub mod codeforces;
pub mod github;
pub mod types;

pub use codeforces::CodeforcesProvider;
pub use github::GithubProvider;
pub use types::{
    LanguageCount, LookupKind, ProfileData, ProfileQuery, RatingSummary, RepoSummary,
};

use crate::config::ApiConfig;

/// Trait for profile data providers
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    /// Fetch data for a query. No retries.
    async fn fetch(&self, query: &ProfileQuery) -> Result<ProfileData>;

    /// Provider name for logs (e.g., "github")
    fn name(&self) -> &str;
}

/// The provider set the event loop dispatches lookups to
#[derive(Clone)]
pub struct Providers {
    pub stats: Arc<dyn ProfileProvider>,
    pub rating: Arc<dyn ProfileProvider>,
}

impl Providers {
    /// Build the HTTP providers from configuration
    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        let timeout = Duration::from_secs(api.timeout_secs);
        Ok(Self {
            stats: Arc::new(GithubProvider::new(&api.github_base_url, timeout)?),
            rating: Arc::new(CodeforcesProvider::new(&api.codeforces_base_url, timeout)?),
        })
    }

    /// Provider responsible for a lookup kind
    pub fn for_kind(&self, kind: LookupKind) -> Arc<dyn ProfileProvider> {
        match kind {
            LookupKind::Projects | LookupKind::Stats => Arc::clone(&self.stats),
            LookupKind::Rating => Arc::clone(&self.rating),
        }
    }
}

/// Build the shared HTTP client used by the providers
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    use anyhow::Context;

    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("crtterm/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}
