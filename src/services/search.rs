// SPDX-License-Identifier: MIT

//! Web-search lookup for legal sources.
//!
//! With an API key configured, queries a Brave-style JSON search API
//! under a bounded timeout. Without one, the client serves only the
//! curated statute sources. Curated sources are always appended (deduped
//! by URL) so every answer carries official citations.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound for one search round trip.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(8);

/// How many provider results to request.
const SEARCH_RESULT_COUNT: u32 = 5;

/// One cited source in an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLink {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
}

/// Web-search client.
#[derive(Clone)]
pub struct WebSearchClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WebSearchClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Search for sources relevant to a legal query.
    pub async fn search(
        &self,
        query: &str,
        use_case: Option<&str>,
    ) -> Result<Vec<SourceLink>, AppError> {
        let mut sources = if self.api_key.is_empty() {
            Vec::new()
        } else {
            self.provider_search(query).await?
        };

        for curated in curated_sources(use_case) {
            if !sources.iter().any(|s| s.url == curated.url) {
                sources.push(curated);
            }
        }

        Ok(sources)
    }

    async fn provider_search(&self, query: &str) -> Result<Vec<SourceLink>, AppError> {
        let url = format!("{}/res/v1/web/search", self.base_url);

        let request = async {
            let response = self
                .http
                .get(&url)
                .header("X-Subscription-Token", &self.api_key)
                .query(&[
                    ("q", query.to_string()),
                    ("count", SEARCH_RESULT_COUNT.to_string()),
                ])
                .send()
                .await
                .map_err(|e| AppError::Upstream(format!("Search request failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(AppError::Upstream(format!("HTTP {}: {}", status, body)));
            }

            response
                .json::<WebSearchResponse>()
                .await
                .map_err(|e| AppError::Upstream(format!("Malformed search response: {}", e)))
        };

        let parsed = tokio::time::timeout(SEARCH_TIMEOUT, request)
            .await
            .map_err(|_| {
                AppError::UpstreamTimeout(format!("Search exceeded {}s", SEARCH_TIMEOUT.as_secs()))
            })??;

        Ok(parsed
            .web
            .map(|w| w.results)
            .unwrap_or_default()
            .into_iter()
            .map(|r| SourceLink {
                title: r.title,
                url: r.url,
                snippet: r.description,
                source_type: Some("Web".to_string()),
            })
            .collect())
    }
}

/// Curated official sources, plus the statute matching the use case.
pub fn curated_sources(use_case: Option<&str>) -> Vec<SourceLink> {
    let mut sources = vec![
        curated("India Code - Central Acts", "https://www.indiacode.nic.in/", "Gov"),
        curated("Ministry of Law & Justice", "https://lawmin.gov.in/", "Gov"),
    ];

    match use_case {
        Some("traffic") => sources.push(curated(
            "Motor Vehicles Act, 1988",
            "https://www.indiacode.nic.in/handle/123456789/1798",
            "Act",
        )),
        Some("consumer") => sources.push(curated(
            "Consumer Protection Act, 2019",
            "https://consumeraffairs.nic.in/",
            "Act",
        )),
        Some("police") => sources.push(curated(
            "Code of Criminal Procedure, 1973",
            "https://www.indiacode.nic.in/handle/123456789/1611",
            "Act",
        )),
        _ => {}
    }

    sources
}

fn curated(title: &str, url: &str, source_type: &str) -> SourceLink {
    SourceLink {
        title: title.to_string(),
        url: url.to_string(),
        snippet: None,
        source_type: Some(source_type.to_string()),
    }
}

#[derive(Deserialize)]
struct WebSearchResponse {
    web: Option<WebResults>,
}

#[derive(Deserialize)]
struct WebResults {
    #[serde(default)]
    results: Vec<WebResult>,
}

#[derive(Deserialize)]
struct WebResult {
    title: String,
    url: String,
    description: Option<String>,
}
