//! Readable-text extraction: given a fetched page, pull out the main
//! article text, title, and excerpt, discarding navigation and other
//! boilerplate.

use nr_core::text::clean_text;
use scraper::{ElementRef, Html, Selector};

const BOILERPLATE: &[&str] = &["nav", "aside", "footer", "header", "form", "figure"];

/// Containers tried in order before falling back to every paragraph on the
/// page.
const CONTAINERS: &[&str] = &["article", "main", "div[itemprop='articleBody']", "#content"];

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedContent {
    pub title: String,
    pub excerpt: String,
    pub text: String,
}

/// Extract the readable portion of an HTML document. `None` when nothing
/// that looks like article text is found.
pub fn extract_readable(html: &str) -> Option<ExtractedContent> {
    let document = Html::parse_document(html);

    let paragraphs = CONTAINERS
        .iter()
        .map(|container| container_paragraphs(&document, container))
        .find(|paragraphs| !paragraphs.is_empty())
        .unwrap_or_else(|| body_paragraphs(&document));

    if paragraphs.is_empty() {
        return None;
    }

    let text = paragraphs.join("\n\n");
    let title = extract_title(&document);
    let excerpt = extract_excerpt(&document)
        .unwrap_or_else(|| paragraphs.first().cloned().unwrap_or_default());

    Some(ExtractedContent {
        title,
        excerpt,
        text,
    })
}

fn container_paragraphs(document: &Html, container: &str) -> Vec<String> {
    let selector = Selector::parse(&format!("{container} p")).unwrap();
    document
        .select(&selector)
        .filter(|p| !inside_boilerplate(p))
        .map(|p| clean_text(&p.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect()
}

fn body_paragraphs(document: &Html) -> Vec<String> {
    container_paragraphs(document, "body")
}

fn inside_boilerplate(paragraph: &ElementRef) -> bool {
    paragraph.ancestors().any(|node| {
        node.value()
            .as_element()
            .map(|el| BOILERPLATE.contains(&el.name()))
            .unwrap_or(false)
    })
}

fn extract_title(document: &Html) -> String {
    let og_title = Selector::parse("meta[property='og:title']").unwrap();
    if let Some(content) = document
        .select(&og_title)
        .next()
        .and_then(|el| el.value().attr("content"))
    {
        let title = clean_text(content);
        if !title.is_empty() {
            return title;
        }
    }

    for selector in ["h1", "title"] {
        let selector = Selector::parse(selector).unwrap();
        if let Some(el) = document.select(&selector).next() {
            let title = clean_text(&el.text().collect::<String>());
            if !title.is_empty() {
                return title;
            }
        }
    }

    String::new()
}

fn extract_excerpt(document: &Html) -> Option<String> {
    for selector in [
        "meta[name='description']",
        "meta[property='og:description']",
    ] {
        let selector = Selector::parse(selector).unwrap();
        if let Some(content) = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
        {
            let excerpt = clean_text(content);
            if !excerpt.is_empty() {
                return Some(excerpt);
            }
        }
    }
    None
}
