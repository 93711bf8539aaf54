// SPDX-License-Identifier: MIT

//! Curated legal library search.
//!
//! A small in-process corpus of central acts with a case-insensitive
//! substring filter; there is no persistence behind it.

use axum::{extract::Query, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/v1/library/search", get(search))
}

#[derive(Deserialize)]
struct LibraryQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LibraryItem {
    pub id: &'static str,
    pub title: &'static str,
    pub snippet: &'static str,
    pub url: &'static str,
    pub source_type: &'static str,
    pub tags: &'static [&'static str],
}

#[derive(Serialize)]
pub struct LibraryResponse {
    pub results: Vec<LibraryItem>,
}

async fn search(Query(params): Query<LibraryQuery>) -> Json<LibraryResponse> {
    Json(LibraryResponse {
        results: filter_corpus(&params.q),
    })
}

fn filter_corpus(q: &str) -> Vec<LibraryItem> {
    let needle = q.trim().to_lowercase();
    corpus()
        .into_iter()
        .filter(|item| {
            needle.is_empty()
                || item.title.to_lowercase().contains(&needle)
                || item.snippet.to_lowercase().contains(&needle)
        })
        .collect()
}

fn corpus() -> Vec<LibraryItem> {
    vec![
        LibraryItem {
            id: "1",
            title: "Motor Vehicles Act, 1988",
            snippet: "The Motor Vehicles Act regulates all aspects of road transport vehicles, \
                      licensing, permits, and traffic offences.",
            url: "https://www.indiacode.nic.in/handle/123456789/1798",
            source_type: "Act",
            tags: &["traffic", "transport"],
        },
        LibraryItem {
            id: "2",
            title: "Consumer Protection Act, 2019",
            snippet: "An Act to provide for protection of the interests of consumers and timely \
                      settlement of consumer disputes.",
            url: "https://consumeraffairs.nic.in/",
            source_type: "Act",
            tags: &["consumer", "rights"],
        },
        LibraryItem {
            id: "3",
            title: "Code of Criminal Procedure, 1973",
            snippet: "Procedure for the administration of criminal law: FIRs, arrests, bail, and \
                      trial process.",
            url: "https://www.indiacode.nic.in/handle/123456789/1611",
            source_type: "Act",
            tags: &["police", "criminal"],
        },
        LibraryItem {
            id: "4",
            title: "Right to Information Act, 2005",
            snippet: "Sets out the practical regime for citizens to secure access to information \
                      held by public authorities.",
            url: "https://rti.gov.in/",
            source_type: "Act",
            tags: &["rti", "governance"],
        },
        LibraryItem {
            id: "5",
            title: "Information Technology Act, 2000",
            snippet: "Legal recognition of electronic records and signatures, and offences \
                      relating to computer systems.",
            url: "https://www.indiacode.nic.in/handle/123456789/1999",
            source_type: "Act",
            tags: &["cyber", "it"],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_returns_whole_corpus() {
        assert_eq!(filter_corpus("").len(), corpus().len());
        assert_eq!(filter_corpus("   ").len(), corpus().len());
    }

    #[test]
    fn test_filter_is_case_insensitive_over_title_and_snippet() {
        let by_title = filter_corpus("MOTOR vehicles");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].id, "1");

        let by_snippet = filter_corpus("consumer disputes");
        assert_eq!(by_snippet.len(), 1);
        assert_eq!(by_snippet[0].id, "2");
    }

    #[test]
    fn test_no_match_returns_empty() {
        assert!(filter_corpus("maritime salvage").is_empty());
    }
}
