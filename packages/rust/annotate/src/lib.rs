//! Semantic-annotation client for keyword extraction.
//!
//! Thin client for a TextRazor-compatible annotation API. The service
//! returns classified topics and recognized entities for a text; we keep
//! the top topic labels plus the high-relevance entity ids and hand back
//! their deduplicated union. Upstream failures surface verbatim so the
//! request layer can report the annotation service's own status.

use std::collections::BTreeSet;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use copyscan_shared::{AnnotateConfig, CopyscanError, Result};

/// Request timeout for annotation calls.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How many topic labels to keep, in response order.
const MAX_TOPICS: usize = 10;

/// How many qualifying entity ids to keep, in response order.
const MAX_ENTITIES: usize = 10;

/// Minimum relevance score (exclusive) for an entity to qualify.
const MIN_ENTITY_RELEVANCE: f64 = 0.8;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AnnotationEnvelope {
    #[serde(default)]
    response: AnnotationBody,
}

#[derive(Debug, Default, Deserialize)]
struct AnnotationBody {
    #[serde(default)]
    topics: Vec<Topic>,
    #[serde(default)]
    entities: Vec<Entity>,
}

#[derive(Debug, Deserialize)]
struct Topic {
    label: String,
}

#[derive(Debug, Deserialize)]
struct Entity {
    #[serde(rename = "entityId")]
    entity_id: String,
    #[serde(rename = "relevanceScore", default)]
    relevance_score: f64,
}

// ---------------------------------------------------------------------------
// AnnotateClient
// ---------------------------------------------------------------------------

/// Client for the semantic-annotation API.
#[derive(Debug, Clone)]
pub struct AnnotateClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl AnnotateClient {
    /// Create a new annotation client. The API key is resolved by the
    /// caller (from the env var the config names) and injected here.
    pub fn new(config: &AnnotateConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| CopyscanError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Extract keywords from `text`: up to the top ten topic labels plus up
    /// to ten entity ids with relevance above 0.8, deduplicated.
    pub async fn extract_keywords(&self, text: &str) -> Result<BTreeSet<String>> {
        let form = [
            ("text", text),
            ("extractors", "topics,entities"),
            ("classifiers", "textrazor_newscodes"),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-textrazor-key", &self.api_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| CopyscanError::upstream_transport(format!("annotation request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CopyscanError::upstream(status.as_u16(), body));
        }

        let envelope: AnnotationEnvelope = response.json().await.map_err(|e| {
            CopyscanError::upstream_transport(format!("failed to parse annotation response: {e}"))
        })?;

        let keywords = select_keywords(envelope.response);
        debug!(count = keywords.len(), "keywords extracted");
        Ok(keywords)
    }
}

/// Reduce an annotation body to the keyword set.
fn select_keywords(body: AnnotationBody) -> BTreeSet<String> {
    let mut keywords = BTreeSet::new();

    for topic in body.topics.into_iter().take(MAX_TOPICS) {
        keywords.insert(topic.label);
    }

    let relevant = body
        .entities
        .into_iter()
        .filter(|entity| entity.relevance_score > MIN_ENTITY_RELEVANCE);
    for entity in relevant.take(MAX_ENTITIES) {
        keywords.insert(entity.entity_id);
    }

    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(endpoint: &str) -> AnnotateClient {
        let config = AnnotateConfig {
            endpoint: endpoint.to_string(),
            api_key_env: "TEXTRAZOR_API_KEY".into(),
        };
        AnnotateClient::new(&config, "test-key".into()).unwrap()
    }

    fn topic(label: &str) -> Topic {
        Topic {
            label: label.to_string(),
        }
    }

    fn entity(id: &str, relevance: f64) -> Entity {
        Entity {
            entity_id: id.to_string(),
            relevance_score: relevance,
        }
    }

    #[test]
    fn keywords_are_a_deduplicated_union() {
        let body = AnnotationBody {
            topics: vec![topic("Climate"), topic("Energy")],
            entities: vec![entity("Climate", 0.95), entity("Solar power", 0.9)],
        };
        let keywords = select_keywords(body);
        assert_eq!(keywords.len(), 3);
        assert!(keywords.contains("Climate"));
        assert!(keywords.contains("Energy"));
        assert!(keywords.contains("Solar power"));
    }

    #[test]
    fn topics_are_capped_at_ten() {
        let body = AnnotationBody {
            topics: (0..15).map(|i| topic(&format!("topic-{i:02}"))).collect(),
            entities: vec![],
        };
        let keywords = select_keywords(body);
        assert_eq!(keywords.len(), 10);
        assert!(keywords.contains("topic-09"));
        assert!(!keywords.contains("topic-10"));
    }

    #[test]
    fn entities_filter_by_relevance_before_the_cap() {
        let mut entities: Vec<Entity> = (0..12).map(|i| entity(&format!("low-{i}"), 0.5)).collect();
        entities.extend((0..12).map(|i| entity(&format!("high-{i:02}"), 0.9)));

        let body = AnnotationBody {
            topics: vec![],
            entities,
        };
        let keywords = select_keywords(body);
        // Low-relevance entities never consume cap slots.
        assert_eq!(keywords.len(), 10);
        assert!(keywords.contains("high-00"));
        assert!(keywords.contains("high-09"));
        assert!(!keywords.contains("high-10"));
    }

    #[test]
    fn relevance_threshold_is_exclusive() {
        let body = AnnotationBody {
            topics: vec![],
            entities: vec![entity("exactly", 0.8), entity("above", 0.81)],
        };
        let keywords = select_keywords(body);
        assert!(!keywords.contains("exactly"));
        assert!(keywords.contains("above"));
    }

    #[tokio::test]
    async fn extract_keywords_sends_key_and_parses_response() {
        let server = wiremock::MockServer::start().await;
        let body = serde_json::json!({
            "response": {
                "topics": [
                    {"label": "Renewable Energy", "score": 0.97},
                    {"label": "Economics", "score": 0.82}
                ],
                "entities": [
                    {"entityId": "Solar power", "relevanceScore": 0.93},
                    {"entityId": "Coal", "relevanceScore": 0.4}
                ]
            }
        });

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/"))
            .and(wiremock::matchers::header("x-textrazor-key", "test-key"))
            .and(wiremock::matchers::body_string_contains("textrazor_newscodes"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let keywords = client.extract_keywords("solar is eating coal's lunch").await.unwrap();

        assert_eq!(keywords.len(), 3);
        assert!(keywords.contains("Renewable Energy"));
        assert!(keywords.contains("Economics"));
        assert!(keywords.contains("Solar power"));
        assert!(!keywords.contains("Coal"));
    }

    #[tokio::test]
    async fn missing_response_body_yields_no_keywords() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"time": 0.012})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let keywords = client.extract_keywords("anything").await.unwrap();
        assert!(keywords.is_empty());
    }

    #[tokio::test]
    async fn upstream_error_surfaces_with_status() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(
                wiremock::ResponseTemplate::new(401).set_body_string("bad api key"),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.extract_keywords("anything").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("401"), "got: {message}");
        assert!(message.contains("bad api key"), "got: {message}");
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_failure() {
        let client = test_client("http://127.0.0.1:1");
        let err = client.extract_keywords("anything").await.unwrap_err();
        assert!(err.to_string().contains("annotation request failed"));
    }
}
