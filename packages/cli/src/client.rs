use anyhow::{Context, Result};
use common::ContestStatus;
use reqwest::StatusCode;
use serde::Deserialize;

/// Contest fields the viewer needs. Timestamps are kept as received so a
/// malformed value degrades to placeholders instead of failing the request.
#[derive(Debug, Clone, Deserialize)]
pub struct ContestRecord {
    pub id: i32,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub status_override: Option<ContestStatus>,
    #[serde(default)]
    pub participants: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContestProblemRecord {
    pub label: String,
    pub problem_title: String,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    /// `Ok(None)` when the server answers 404.
    pub async fn get_contest(&self, id: i32) -> Result<Option<ContestRecord>> {
        let res = self
            .http
            .get(self.url(&format!("/contests/{id}")))
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.base_url))?;

        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let res = res
            .error_for_status()
            .with_context(|| format!("Failed to fetch contest {id}"))?;
        let contest = res
            .json()
            .await
            .context("Unexpected contest response")?;
        Ok(Some(contest))
    }

    pub async fn get_contest_problems(&self, id: i32) -> Result<Vec<ContestProblemRecord>> {
        let res = self
            .http
            .get(self.url(&format!("/contests/{id}/problems")))
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.base_url))?
            .error_for_status()
            .with_context(|| format!("Failed to fetch problems of contest {id}"))?;
        res.json().await.context("Unexpected problem list response")
    }
}
