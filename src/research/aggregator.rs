use crate::research::search::SearchProvider;
use crate::types::{AppError, Result, Snippet, Source};
use std::collections::HashSet;
use std::fmt::Write;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Evidence gathered for one run: the writer's context document plus the
/// numbered sources the client renders as citation targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evidence {
    /// `[Source n]` blocks in id order; empty when nothing was found
    pub context: String,
    pub sources: Vec<Source>,
}

impl Evidence {
    /// Deduplicate per-query results by URL and number the survivors.
    ///
    /// Iteration is query position first, then rank within the query, so ids
    /// only depend on the order of `results`, never on completion timing.
    pub fn assemble(results: Vec<Vec<Snippet>>) -> Self {
        let mut seen = HashSet::new();
        let sources: Vec<Source> = results
            .into_iter()
            .flatten()
            .filter(|snippet| seen.insert(snippet.url.clone()))
            .enumerate()
            .map(|(index, snippet)| Source::from_snippet(index + 1, snippet))
            .collect();

        let mut context = String::new();
        for source in &sources {
            // writing into a String cannot fail
            let _ = write!(
                context,
                "[Source {}]\nURL: {}\nTitle: {}\nSnippet: {}\n\n",
                source.id, source.url, source.title, source.content
            );
        }

        Self { context, sources }
    }

    pub fn is_empty(&self) -> bool {
        self.context.is_empty()
    }
}

/// Fans a set of sub-queries out to the search provider and assembles the
/// deduplicated evidence once every search has returned.
pub struct EvidenceAggregator {
    search: Arc<dyn SearchProvider>,
    max_results: usize,
}

impl EvidenceAggregator {
    pub fn new(search: Arc<dyn SearchProvider>, max_results: usize) -> Self {
        Self {
            search,
            max_results,
        }
    }

    /// Run one search per query concurrently and assemble the results.
    ///
    /// A failed search contributes no snippets and does not affect its
    /// siblings. A search task that panics fails the whole aggregation.
    /// Dropping the returned future aborts every in-flight search.
    pub async fn aggregate(&self, queries: &[String]) -> Result<Evidence> {
        let mut set = JoinSet::new();

        for (position, query) in queries.iter().enumerate() {
            let search = Arc::clone(&self.search);
            let query = query.clone();
            let max_results = self.max_results;

            set.spawn(async move {
                let snippets = match search.search(&query, max_results).await {
                    Ok(snippets) => snippets,
                    Err(e) => {
                        warn!(query = %query, error = %e, "Sub-search failed, continuing without it");
                        Vec::new()
                    }
                };
                (position, snippets)
            });
        }

        let mut results = vec![Vec::new(); queries.len()];
        while let Some(joined) = set.join_next().await {
            let (position, snippets) = joined
                .map_err(|e| AppError::Internal(format!("Search task failed: {}", e)))?;
            debug!(position, found = snippets.len(), "Sub-search returned");
            results[position] = snippets;
        }

        let evidence = Evidence::assemble(results);
        info!(
            queries = queries.len(),
            sources = evidence.sources.len(),
            "Evidence assembled"
        );
        Ok(evidence)
    }
}
