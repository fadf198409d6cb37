//! Web search collaborator
//!
//! [`SearchProvider`] is the seam between the evidence aggregator and the
//! outside web. [`WebSearch`] implements it with the daedra crate, which uses
//! DuckDuckGo as the search backend and converts fetched pages to markdown.

use crate::types::{AppError, Result, Snippet};
use async_trait::async_trait;
use tracing::debug;

/// Title used when a search hit comes back without one
const UNTITLED: &str = "No Title";

/// Search backend consumed by the evidence aggregator.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Return up to `max_results` snippets for `query`, in backend rank order
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Snippet>>;

    /// Fetch a page and return its readable text
    async fn scrape(&self, url: &str) -> Result<String>;
}

/// DuckDuckGo-backed search powered by daedra
#[derive(Debug, Clone, Default)]
pub struct WebSearch;

impl WebSearch {
    pub fn new() -> Self {
        Self
    }
}

/// Build a snippet from a raw hit, dropping hits without a body
pub(crate) fn snippet_from_hit(title: &str, url: &str, body: &str) -> Option<Snippet> {
    if body.trim().is_empty() {
        return None;
    }
    let title = if title.trim().is_empty() {
        UNTITLED
    } else {
        title
    };
    Some(Snippet::new(url, title, body))
}

#[async_trait]
impl SearchProvider for WebSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Snippet>> {
        debug!(query, max_results, "Searching the web");

        let search_args = daedra::SearchArgs {
            query: query.to_string(),
            options: Some(daedra::SearchOptions {
                num_results: max_results,
                ..Default::default()
            }),
        };

        let response = daedra::tools::search::perform_search(&search_args)
            .await
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        let snippets: Vec<Snippet> = response
            .data
            .iter()
            .filter_map(|r| snippet_from_hit(&r.title, &r.url, &r.description))
            .take(max_results)
            .collect();

        debug!(query, found = snippets.len(), "Search finished");
        Ok(snippets)
    }

    /// Collaborator entry point for callers that need a full page; the
    /// research workflow itself answers from search snippets only.
    async fn scrape(&self, url: &str) -> Result<String> {
        let fetch_args = daedra::VisitPageArgs {
            url: url.to_string(),
            include_images: false,
            selector: None,
        };

        daedra::tools::fetch::fetch_page(&fetch_args)
            .await
            .map(|page| page.content)
            .map_err(|e| AppError::Search(format!("Failed to fetch page: {}", e)))
    }
}
