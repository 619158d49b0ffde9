//! Form fields as posted by the page, and their coercion into request bodies.

use crate::models::{AskRequest, FetchNewsRequest, SearchRequest};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchNewsForm {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, rename = "pageSize")]
    pub page_size: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default, rename = "searchQuery")]
    pub query: String,
    #[serde(default, rename = "topK")]
    pub top_k: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
    #[serde(default, rename = "sourcesCount")]
    pub sources_count: String,
}

impl FetchNewsForm {
    pub fn to_request(&self) -> FetchNewsRequest {
        FetchNewsRequest {
            category: non_empty(&self.category),
            country: self.country.clone(),
            page_size: parse_int(&self.page_size),
        }
    }
}

impl SearchForm {
    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            query: self.query.clone(),
            top_k: parse_int(&self.top_k),
        }
    }
}

impl AskForm {
    pub fn to_request(&self) -> AskRequest {
        AskRequest {
            question: self.question.clone(),
            top_k: parse_int(&self.sources_count),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Leading-integer coercion: `" 12abc"` -> 12, `"-3"` -> -3, `"abc"` -> `None`.
pub fn parse_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
