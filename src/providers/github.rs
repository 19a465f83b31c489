// GitHub REST provider: recent repositories and language summary

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::types::{LanguageCount, LookupKind, ProfileData, ProfileQuery, RepoSummary};
use super::ProfileProvider;

const RECENT_REPOS: usize = 4;
const STATS_PAGE_SIZE: usize = 100;
const TOP_LANGUAGES: usize = 5;

#[derive(Debug, Deserialize)]
struct Repo {
    name: String,
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    language: Option<String>,
}

pub struct GithubProvider {
    client: Client,
    base_url: String,
}

impl GithubProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: super::http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn list_repos(&self, handle: &str, params: &[(&str, String)]) -> Result<Vec<Repo>> {
        let url = format!("{}/users/{}/repos", self.base_url, handle);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/vnd.github+json")
            .query(params)
            .send()
            .await
            .context("Failed to reach GitHub API")?;

        let status = response.status();
        if !status.is_success() {
            bail!("GitHub API request failed with status {}", status);
        }

        response
            .json()
            .await
            .context("Failed to parse GitHub repository list")
    }
}

/// Repositories per language, most used first, top five
pub fn summarize_languages<'a>(languages: impl IntoIterator<Item = &'a str>) -> Vec<LanguageCount> {
    let mut counts: Vec<LanguageCount> = Vec::new();
    for language in languages {
        match counts.iter_mut().find(|c| c.language == language) {
            Some(entry) => entry.repos += 1,
            None => counts.push(LanguageCount {
                language: language.to_string(),
                repos: 1,
            }),
        }
    }
    // Stable sort: ties keep first-seen order
    counts.sort_by(|a, b| b.repos.cmp(&a.repos));
    counts.truncate(TOP_LANGUAGES);
    counts
}

#[async_trait]
impl ProfileProvider for GithubProvider {
    async fn fetch(&self, query: &ProfileQuery) -> Result<ProfileData> {
        match query.kind {
            LookupKind::Projects => {
                let repos = self
                    .list_repos(
                        &query.handle,
                        &[
                            ("sort", "updated".to_string()),
                            ("per_page", RECENT_REPOS.to_string()),
                        ],
                    )
                    .await?;

                Ok(ProfileData::Repositories(
                    repos
                        .into_iter()
                        .take(RECENT_REPOS)
                        .map(|repo| RepoSummary {
                            name: repo.name,
                            description: repo.description,
                            stars: repo.stargazers_count,
                        })
                        .collect(),
                ))
            }
            LookupKind::Stats => {
                let repos = self
                    .list_repos(&query.handle, &[("per_page", STATS_PAGE_SIZE.to_string())])
                    .await?;

                Ok(ProfileData::Languages(summarize_languages(
                    repos.iter().filter_map(|repo| repo.language.as_deref()),
                )))
            }
            LookupKind::Rating => bail!("GitHub provider does not serve rating lookups"),
        }
    }

    fn name(&self) -> &str {
        "github"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_languages_orders_by_count() {
        let summary = summarize_languages(["Python", "Rust", "Rust", "C", "Python", "Rust"]);
        let pairs: Vec<_> = summary.iter().map(|c| (c.language.as_str(), c.repos)).collect();
        assert_eq!(pairs, vec![("Rust", 3), ("Python", 2), ("C", 1)]);
    }

    #[test]
    fn test_summarize_languages_keeps_top_five_and_first_seen_ties() {
        let summary = summarize_languages(["A", "B", "C", "D", "E", "F", "F"]);
        let names: Vec<_> = summary.iter().map(|c| c.language.as_str()).collect();
        assert_eq!(names, vec!["F", "A", "B", "C", "D"]);
    }

    #[test]
    fn test_provider_creation() {
        let provider =
            GithubProvider::new("https://api.github.com/", Duration::from_secs(5)).unwrap();
        assert_eq!(provider.base_url, "https://api.github.com");
        assert_eq!(provider.name(), "github");
    }
}
