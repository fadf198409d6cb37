use crate::llm::LLMClient;
use crate::utils::citations::CitationBuffer;
use crate::workflows::events::Event;
use async_stream::stream;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tracing::{debug, error};

/// Writer agent that streams a cited markdown answer from the gathered evidence.
pub struct WriterAgent {
    llm: Arc<dyn LLMClient>,
}

impl WriterAgent {
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }

    fn prompt(query: &str, context: &str) -> String {
        format!(
            r#"You are an expert AI assistant. Your task is to answer the user's query based *only* on the provided sources.
Do not use any prior knowledge.

User Query: "{query}"

Provided Sources (Snippets):
---
{context}
---

Instructions:
1.  Read the User Query and the Provided Sources.
2.  Synthesize a comprehensive answer to the query.
3.  Every factual claim **MUST** carry a citation.
4.  Cite sources as markdown links in the exact form [n](#citation-n), where n is the number of the [Source n] tag, e.g. [1](#citation-1). Cite several sources as [1](#citation-1)[2](#citation-2).
5.  If the snippets do not contain enough information to answer the query, state that clearly.
6.  Do not make up information.
7.  Your answer must be in Markdown format."#
        )
    }

    /// Stream the answer as `chunk` events, ending with one `error` event if
    /// the provider fails.
    ///
    /// The stream is lazy and single-pass: nothing is requested from the
    /// provider until it is first polled, and calling `write` again issues a
    /// new provider call. Citation markup is normalized across increment
    /// boundaries before it is emitted.
    pub fn write(&self, query: &str, context: &str) -> impl Stream<Item = Event> + Send + 'static {
        let llm = Arc::clone(&self.llm);
        let prompt = Self::prompt(query, context);

        stream! {
            let mut increments = match llm.stream(&prompt).await {
                Ok(increments) => increments,
                Err(e) => {
                    error!(error = %e, "Writer failed to open provider stream");
                    yield Event::error(format!("Error during AI generation: {}", e));
                    return;
                }
            };

            let mut citations = CitationBuffer::new();
            while let Some(increment) = increments.next().await {
                match increment {
                    Ok(text) => {
                        if let Some(ready) = citations.push(&text) {
                            yield Event::chunk(ready);
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "Writer stream failed");
                        if let Some(rest) = citations.finish() {
                            yield Event::chunk(rest);
                        }
                        yield Event::error(format!("Error during AI generation: {}", e));
                        return;
                    }
                }
            }

            if let Some(rest) = citations.finish() {
                yield Event::chunk(rest);
            }
            debug!("Writer stream finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::TextStream;
    use crate::types::{AppError, Result};
    use crate::workflows::events::EventKind;
    use async_trait::async_trait;
    use futures::stream;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Streams fixed increments, optionally failing after them
    struct ScriptedLLM {
        increments: Vec<&'static str>,
        fail_after: bool,
        calls: AtomicUsize,
    }

    impl ScriptedLLM {
        fn new(increments: Vec<&'static str>, fail_after: bool) -> Self {
            Self {
                increments,
                fail_after,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LLMClient for ScriptedLLM {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(String::new())
        }

        async fn stream(&self, _prompt: &str) -> Result<TextStream> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut items: Vec<Result<String>> = self
                .increments
                .iter()
                .map(|s| Ok(s.to_string()))
                .collect();
            if self.fail_after {
                items.push(Err(AppError::LLM("connection reset".to_string())));
            }
            Ok(Box::pin(stream::iter(items)))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_write_normalizes_each_chunk() {
        let llm = Arc::new(ScriptedLLM::new(vec!["Rust is safe [1]. ", "It is fast [2, 3]."], false));
        let writer = WriterAgent::new(llm);

        let events: Vec<Event> = writer.write("q", "ctx").collect().await;
        assert_eq!(
            events,
            vec![
                Event::chunk("Rust is safe [1](#citation-1). "),
                Event::chunk("It is fast [2](#citation-2)[3](#citation-3)."),
            ]
        );
    }

    #[tokio::test]
    async fn test_write_ends_with_single_error() {
        let llm = Arc::new(ScriptedLLM::new(vec!["One. ", "Two."], true));
        let writer = WriterAgent::new(llm);

        let events: Vec<Event> = writer.write("q", "ctx").collect().await;
        let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Chunk, EventKind::Chunk, EventKind::Error]);
        assert!(events[2].payload.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_write_is_lazy_and_restarts_provider_call() {
        let llm = Arc::new(ScriptedLLM::new(vec!["text"], false));
        let writer = WriterAgent::new(Arc::clone(&llm) as Arc<dyn LLMClient>);

        let stream = writer.write("q", "ctx");
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
        let _: Vec<Event> = stream.collect().await;
        let _: Vec<Event> = writer.write("q", "ctx").collect().await;
        assert_eq!(llm.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_prompt_embeds_query_and_context() {
        let prompt = WriterAgent::prompt("what is rust", "[Source 1]\nURL: a\n");
        assert!(prompt.contains("User Query: \"what is rust\""));
        assert!(prompt.contains("[Source 1]\nURL: a"));
        assert!(prompt.contains("[n](#citation-n)"));
    }
}
