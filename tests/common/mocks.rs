//! Mock collaborators for testing.
//!
//! The workflow only sees the [`LLMClient`] and [`SearchProvider`] traits, so
//! these mocks let every phase be driven without network access.

use insight::llm::{LLMClient, TextStream};
use insight::research::SearchProvider;
use insight::types::{AppError, Result, Snippet};
use async_trait::async_trait;
use futures::{StreamExt, stream};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock LLM client with a scripted planner reply and scripted answer increments.
///
/// # Examples
///
/// ```ignore
/// // Plans two queries and answers in two increments
/// let llm = MockLLMClient::new(r#"["a", "b"]"#, &["Hello ", "world."]);
///
/// // Same, but the answer stream fails after its increments
/// let llm = MockLLMClient::new(r#"["a"]"#, &["Part one. "]).failing_stream();
/// ```
pub struct MockLLMClient {
    plan: String,
    increments: Vec<String>,
    fail_generate: bool,
    fail_stream_after: bool,
    stall_stream: bool,
    panic_generate: bool,
    panic_stream: bool,
    stream_calls: AtomicUsize,
}

impl MockLLMClient {
    pub fn new(plan: &str, increments: &[&str]) -> Self {
        Self {
            plan: plan.to_string(),
            increments: increments.iter().map(|s| s.to_string()).collect(),
            fail_generate: false,
            fail_stream_after: false,
            stall_stream: false,
            panic_generate: false,
            panic_stream: false,
            stream_calls: AtomicUsize::new(0),
        }
    }

    /// The planner call returns an error
    pub fn failing_generate(mut self) -> Self {
        self.fail_generate = true;
        self
    }

    /// The answer stream yields its increments, then an error
    pub fn failing_stream(mut self) -> Self {
        self.fail_stream_after = true;
        self
    }

    /// The answer stream yields its increments, then never completes
    pub fn stalled_stream(mut self) -> Self {
        self.stall_stream = true;
        self
    }

    /// The planner call panics
    pub fn panicking_generate(mut self) -> Self {
        self.panic_generate = true;
        self
    }

    /// Opening the answer stream panics
    pub fn panicking_stream(mut self) -> Self {
        self.panic_stream = true;
        self
    }

    /// How many times the writer opened a stream
    pub fn stream_calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        if self.panic_generate {
            panic!("mock planner panicked");
        }
        if self.fail_generate {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(self.plan.clone())
    }

    async fn stream(&self, _prompt: &str) -> Result<TextStream> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_stream {
            panic!("mock writer panicked");
        }
        let items: Vec<Result<String>> = self.increments.iter().cloned().map(Ok).collect();
        let head = stream::iter(items);

        if self.fail_stream_after {
            let tail = stream::iter(vec![Err(AppError::LLM("connection reset".to_string()))]);
            return Ok(Box::pin(head.chain(tail)));
        }
        if self.stall_stream {
            return Ok(Box::pin(head.chain(stream::pending::<Result<String>>())));
        }
        Ok(Box::pin(head))
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Mock search provider answering from a fixed table of query → hits.
///
/// Unknown queries return no hits. Individual queries can be made to fail,
/// panic or respond after a delay.
#[derive(Default)]
pub struct MockSearchProvider {
    results: HashMap<String, Vec<Snippet>>,
    failing: HashSet<String>,
    panicking: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
}

impl MockSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, query: &str, hits: Vec<Snippet>) -> Self {
        self.results.insert(query.to_string(), hits);
        self
    }

    pub fn with_failure(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    pub fn with_panic(mut self, query: &str) -> Self {
        self.panicking.insert(query.to_string());
        self
    }

    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Snippet>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if self.panicking.contains(query) {
            panic!("mock search panicked on {query}");
        }
        if self.failing.contains(query) {
            return Err(AppError::Search(format!("Mock search failure for {query}")));
        }

        Ok(self
            .results
            .get(query)
            .map(|hits| hits.iter().take(max_results).cloned().collect())
            .unwrap_or_default())
    }

    async fn scrape(&self, url: &str) -> Result<String> {
        Ok(format!("Scraped content of {url}"))
    }
}

/// Hit whose title and content are derived from the URL
pub fn hit(url: &str) -> Snippet {
    Snippet::new(url, format!("Title {url}"), format!("Content {url}"))
}
