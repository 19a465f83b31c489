// Codeforces provider: rank and rating via `user.info`

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::types::{LookupKind, ProfileData, ProfileQuery, RatingSummary};
use super::ProfileProvider;

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    status: String,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    result: Vec<UserInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfo {
    handle: String,
    rank: Option<String>,
    rating: Option<i64>,
    max_rating: Option<i64>,
}

pub struct CodeforcesProvider {
    client: Client,
    base_url: String,
}

impl CodeforcesProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: super::http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ProfileProvider for CodeforcesProvider {
    async fn fetch(&self, query: &ProfileQuery) -> Result<ProfileData> {
        if query.kind != LookupKind::Rating {
            bail!("Codeforces provider only serves rating lookups");
        }

        let url = format!("{}/api/user.info", self.base_url);
        tracing::debug!("GET {} (handle {})", url, query.handle);

        // Codeforces reports failures in the body, so the status code is not checked
        let body: UserInfoResponse = self
            .client
            .get(&url)
            .query(&[("handles", query.handle.as_str())])
            .send()
            .await
            .context("Failed to reach Codeforces API")?
            .json()
            .await
            .context("Failed to parse Codeforces response")?;

        if body.status != "OK" {
            bail!(
                "Codeforces API returned status {}: {}",
                body.status,
                body.comment.unwrap_or_default()
            );
        }

        let user = body
            .result
            .into_iter()
            .next()
            .context("Codeforces response contained no users")?;

        Ok(ProfileData::Rating(RatingSummary {
            handle: user.handle,
            rank: user.rank,
            rating: user.rating,
            max_rating: user.max_rating,
        }))
    }

    fn name(&self) -> &str {
        "codeforces"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_info_parsing() {
        let body: UserInfoResponse = serde_json::from_str(
            r#"{"status":"OK","result":[{"handle":"tourist","rank":"legendary grandmaster","rating":3800,"maxRating":4000}]}"#,
        )
        .unwrap();

        assert_eq!(body.status, "OK");
        assert_eq!(body.result[0].max_rating, Some(4000));
    }

    #[test]
    fn test_unrated_user_parsing() {
        let body: UserInfoResponse =
            serde_json::from_str(r#"{"status":"OK","result":[{"handle":"newbie"}]}"#).unwrap();

        assert_eq!(body.result[0].rank, None);
        assert_eq!(body.result[0].rating, None);
    }

    #[tokio::test]
    async fn test_wrong_kind_rejected() {
        let provider =
            CodeforcesProvider::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let query = ProfileQuery {
            kind: LookupKind::Stats,
            handle: "x".to_string(),
        };
        assert!(provider.fetch(&query).await.is_err());
    }
}
