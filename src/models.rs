use serde::{Deserialize, Deserializer, Serialize};

/// A news item returned by `POST /fetch-news`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Article {
    pub title: String,
    pub source_name: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub source_name: String,
    pub similarity_score: f64,
    #[serde(default)]
    pub content_preview: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchResponse {
    pub total_results: u64,
    pub results: Vec<SearchResult>,
}

// `total_results` is optional on the wire; when missing it is the number of results.
impl<'de> Deserialize<'de> for SearchResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wire {
            #[serde(default)]
            total_results: Option<u64>,
            #[serde(default, deserialize_with = "null_as_default")]
            results: Vec<SearchResult>,
        }

        let wire = Wire::deserialize(deserializer)?;
        Ok(Self {
            total_results: wire
                .total_results
                .unwrap_or(wire.results.len() as u64),
            results: wire.results,
        })
    }
}

/// A citation attached to a generated answer.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Source {
    pub title: String,
    #[serde(alias = "source_name", default)]
    pub source: String,
    #[serde(default)]
    pub relevance: f64,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AnswerResponse {
    pub answer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Stats {
    #[serde(alias = "total_articles_in_rag", default, deserialize_with = "null_as_default")]
    pub total_articles_stored: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_articles_in_vectordb: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchNewsRequest {
    pub category: Option<String>,
    pub country: String,
    pub page_size: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub top_k: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AskRequest {
    pub question: String,
    pub top_k: Option<i64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stats_accepts_backend_alias_and_missing_fields() {
        let stats: Stats = serde_json::from_value(json!({ "total_articles_in_rag": 12 })).unwrap();
        assert_eq!(stats.total_articles_stored, 12);
        assert_eq!(stats.total_articles_in_vectordb, 0);

        let stats: Stats = serde_json::from_value(json!({
            "total_articles_stored": null,
            "total_articles_in_vectordb": 4
        }))
        .unwrap();
        assert_eq!(stats.total_articles_stored, 0);
        assert_eq!(stats.total_articles_in_vectordb, 4);
    }

    #[test]
    fn search_response_defaults_total_to_result_count() {
        let response: SearchResponse = serde_json::from_value(json!({
            "query": "rust",
            "results": [
                { "id": "a", "title": "A", "source_name": "S", "url": "u", "similarity_score": 0.5, "content_preview": "p" }
            ]
        }))
        .unwrap();
        assert_eq!(response.total_results, 1);
        assert_eq!(response.results[0].title, "A");
    }

    #[test]
    fn answer_sources_accept_null_and_source_name() {
        let answer: AnswerResponse =
            serde_json::from_value(json!({ "answer": "42", "sources": null })).unwrap();
        assert!(answer.sources.is_empty());

        let answer: AnswerResponse = serde_json::from_value(json!({
            "question": "why",
            "answer": "because",
            "sources": [{ "title": "T", "url": "u", "source_name": "Wire" }]
        }))
        .unwrap();
        assert_eq!(answer.sources[0].source, "Wire");
        assert_eq!(answer.sources[0].relevance, 0.0);
    }

    #[test]
    fn empty_optionals_serialize_as_null() {
        let body = serde_json::to_value(FetchNewsRequest {
            category: None,
            country: "us".into(),
            page_size: Some(10),
        })
        .unwrap();
        assert_eq!(body, json!({ "category": null, "country": "us", "page_size": 10 }));
    }
}
