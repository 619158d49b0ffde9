//! Element builders: response items to result fragments. Pure functions.

use crate::dom::{Element, Node};
use crate::models::{AnswerResponse, Article, SearchResult};
use chrono::DateTime;

pub const NO_DESCRIPTION: &str = "No description available";

/// `0.823` -> `"82.3%"`.
pub fn format_percent(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// RFC 3339 timestamps become `YYYY-MM-DD HH:MM UTC`; anything else is shown as given.
pub fn format_published(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed
            .naive_utc()
            .format("%Y-%m-%d %H:%M UTC")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

fn link(url: &str, label: &str) -> Element {
    Element::new("a")
        .attr("href", url)
        .attr("target", "_blank")
        .attr("rel", "noopener")
        .class("result-url")
        .text(label)
}

pub fn article_element(article: &Article) -> Node {
    let mut meta = Element::new("div")
        .class("result-meta")
        .child(Element::new("span").class("result-source").text(&article.source_name));
    if let Some(published) = article.published_at.as_deref() {
        meta = meta.child(
            Element::new("span")
                .class("result-date")
                .text(format_published(published)),
        );
    }
    if let Some(author) = article.author.as_deref().filter(|a| !a.is_empty()) {
        meta = meta.child(Element::new("span").class("result-author").text(author));
    }

    let description = article
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_DESCRIPTION);

    Element::new("div")
        .class("result-item")
        .child(Element::new("div").class("result-title").text(&article.title))
        .child(meta)
        .child(Element::new("div").class("result-content").text(description))
        .child(link(&article.url, "Read full article"))
        .into()
}

pub fn search_result_element(result: &SearchResult) -> Node {
    Element::new("div")
        .class("result-item")
        .child(Element::new("div").class("result-title").text(&result.title))
        .child(
            Element::new("div")
                .class("result-meta")
                .child(Element::new("span").class("result-source").text(&result.source_name))
                .child(
                    Element::new("span")
                        .class("result-score")
                        .text(format!("Relevance: {}", format_percent(result.similarity_score))),
                ),
        )
        .child(
            Element::new("div")
                .class("result-content")
                .text(&result.content_preview),
        )
        .child(link(&result.url, "Read full article"))
        .into()
}

pub fn answer_element(answer: &AnswerResponse) -> Node {
    let mut block = Element::new("div")
        .class("answer-box")
        .child(Element::new("div").class("answer-text").text(&answer.answer));

    if !answer.sources.is_empty() {
        let mut sources = Element::new("div")
            .class("sources")
            .child(Element::new("div").class("sources-title").text("Sources:"));
        for (idx, source) in answer.sources.iter().enumerate() {
            sources = sources.child(
                Element::new("div")
                    .class("source-item")
                    .child(Element::new("strong").text(format!("{}. {}", idx + 1, source.title)))
                    .child(Element::new("small").text(format!(
                        "{} | Relevance: {}",
                        source.source,
                        format_percent(source.relevance)
                    )))
                    .child(link(&source.url, "Read article")),
            );
        }
        block = block.child(sources);
    }

    block.into()
}

pub fn success_banner(message: impl Into<String>) -> Node {
    Element::new("div").class("success").text(message).into()
}

pub fn error_banner(message: &str) -> Node {
    Element::new("div")
        .class("error")
        .text(format!("Error: {message}"))
        .into()
}
