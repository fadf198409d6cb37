use crate::llm::LLMClient;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of parsing the planner model's reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanParse {
    /// A JSON list of non-empty strings
    Queries(Vec<String>),
    /// Anything else: prose, a JSON object, mixed-type list, empty list
    Malformed,
}

/// Planner agent that turns one user question into a few web-search queries.
///
/// Never fails: on a provider error or an unusable reply it falls back to
/// searching for the question itself.
pub struct PlannerAgent {
    llm: Arc<dyn LLMClient>,
    max_queries: usize,
}

impl PlannerAgent {
    /// Creates a planner capped at `max_queries` sub-queries.
    pub fn new(llm: Arc<dyn LLMClient>, max_queries: usize) -> Self {
        Self {
            llm,
            max_queries: max_queries.max(1),
        }
    }

    fn prompt(query: &str) -> String {
        format!(
            r#"You are an expert search query planner.
Based on the user's query: "{query}"

Please generate a list of 2-3 concise search queries that will help answer the user's question.

Return your answer ONLY as a JSON list.
Example: ["query 1", "query 2", "query 3"]"#
        )
    }

    /// Parse the model output, tolerating markdown code fences around the JSON
    pub fn parse_plan(output: &str) -> PlanParse {
        let cleaned = output
            .trim()
            .replace("```json", "")
            .replace("```", "");

        let Ok(serde_json::Value::Array(items)) =
            serde_json::from_str::<serde_json::Value>(cleaned.trim())
        else {
            return PlanParse::Malformed;
        };

        let queries: Option<Vec<String>> = items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                _ => None,
            })
            .collect();

        match queries {
            Some(queries) if !queries.is_empty() => PlanParse::Queries(queries),
            _ => PlanParse::Malformed,
        }
    }

    /// Plan the searches for `query`; always returns at least one entry.
    pub async fn plan(&self, query: &str) -> Vec<String> {
        let response = match self.llm.generate(&Self::prompt(query)).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Planner call failed, defaulting to user query");
                return vec![query.to_string()];
            }
        };
        debug!(raw = %response.trim(), "Planner raw response");

        match Self::parse_plan(&response) {
            PlanParse::Queries(mut queries) => {
                queries.truncate(self.max_queries);
                info!(queries = ?queries, "Planner generated queries");
                queries
            }
            PlanParse::Malformed => {
                warn!("Planner response was not a list of strings, defaulting to user query");
                vec![query.to_string()]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clean_list() {
        assert_eq!(
            PlannerAgent::parse_plan(r#"["rust async", "tokio runtime"]"#),
            PlanParse::Queries(vec!["rust async".to_string(), "tokio runtime".to_string()])
        );
    }

    #[test]
    fn test_parse_fenced_list() {
        let output = "```json\n[\"a\", \"b\"]\n```";
        assert_eq!(
            PlannerAgent::parse_plan(output),
            PlanParse::Queries(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_parse_prose_is_malformed() {
        assert_eq!(
            PlannerAgent::parse_plan("Here are some queries: rust, tokio"),
            PlanParse::Malformed
        );
    }

    #[test]
    fn test_parse_mixed_list_is_malformed() {
        assert_eq!(PlannerAgent::parse_plan(r#"["a", 2]"#), PlanParse::Malformed);
    }

    #[test]
    fn test_parse_object_is_malformed() {
        assert_eq!(
            PlannerAgent::parse_plan(r#"{"queries": ["a"]}"#),
            PlanParse::Malformed
        );
    }

    #[test]
    fn test_parse_empty_list_is_malformed() {
        assert_eq!(PlannerAgent::parse_plan("[]"), PlanParse::Malformed);
    }

    #[test]
    fn test_prompt_embeds_query() {
        let prompt = PlannerAgent::prompt("why is the sky blue");
        assert!(prompt.contains("\"why is the sky blue\""));
        assert!(prompt.contains("JSON list"));
    }
}
