// SPDX-License-Identifier: MIT

//! Services module - upstream providers and answer post-processing.

pub mod answer;
pub mod llm;
pub mod search;

pub use answer::StructuredAnswer;
pub use llm::LlmClient;
pub use search::{SourceLink, WebSearchClient};
