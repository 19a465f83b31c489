// Lookup queries and the profile data providers return

use serde::{Deserialize, Serialize};

/// Which external lookup a command performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupKind {
    /// Most recently updated repositories (`projects`)
    Projects,
    /// Repository count per language (`stats`)
    Stats,
    /// Competitive programming rank and rating (`cp`)
    Rating,
}

impl LookupKind {
    /// Command name, also the cache key suffix (`api_cache_<name>`)
    pub fn command_name(&self) -> &'static str {
        match self {
            LookupKind::Projects => "projects",
            LookupKind::Stats => "stats",
            LookupKind::Rating => "cp",
        }
    }
}

/// A lookup against one provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileQuery {
    pub kind: LookupKind,
    pub handle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub description: Option<String>,
    pub stars: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCount {
    pub language: String,
    pub repos: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub handle: String,
    pub rank: Option<String>,
    pub rating: Option<i64>,
    pub max_rating: Option<i64>,
}

/// Provider result, one variant per lookup kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileData {
    Repositories(Vec<RepoSummary>),
    Languages(Vec<LanguageCount>),
    Rating(RatingSummary),
}
