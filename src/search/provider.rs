//! Search provider implementation using daedra
//!
//! Wraps the daedra crate, which uses DuckDuckGo as the search backend.

use crate::search::SearchProvider;
use crate::types::{ResearchError, Result, SearchHit};
use async_trait::async_trait;

/// Web search provider powered by daedra.
pub struct DaedraProvider;

impl DaedraProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DaedraProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for DaedraProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let search_args = daedra::SearchArgs {
            query: query.to_string(),
            options: Some(daedra::SearchOptions {
                num_results: limit,
                ..Default::default()
            }),
        };

        match daedra::tools::search::perform_search(&search_args).await {
            Ok(response) => Ok(response
                .data
                .iter()
                .map(|r| SearchHit {
                    url: r.url.clone(),
                    title: r.title.clone(),
                    snippet: r.description.clone(),
                })
                .collect()),
            Err(e) => Err(ResearchError::Search(format!("search failed: {e}"))),
        }
    }
}
