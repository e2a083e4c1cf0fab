//! Pulls the readable body out of an article page for the in-app reader.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use super::DEFAULT_ARTICLE_TITLE;

const EXCERPT_CHARS: usize = 200;

const BOILERPLATE: &[&str] = &["nav", "header", "footer", "aside", "form", "script", "style"];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static OG_TITLE: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[property="og:title"]"#));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"meta[name="description"], meta[property="og:description"]"#)
});
static CONTAINERS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["article", "main", r#"[role="main"]"#]
        .into_iter()
        .map(selector)
        .collect()
});
static BLOCKS: LazyLock<Selector> = LazyLock::new(|| selector("p, h2, h3, h4, pre"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadableArticle {
    pub title: String,
    /// Sanitized HTML of the kept blocks.
    pub content: String,
    pub text_content: String,
    /// Characters in `text_content`.
    pub length: usize,
    pub excerpt: String,
}

/// Keeps paragraphs, subheadings and code blocks from the page's main container,
/// skipping navigation and other chrome. Falls back to the whole document when
/// there is no `article` or `main` element.
pub fn extract_readable(html: &str) -> ReadableArticle {
    let document = Html::parse_document(html);

    let root = CONTAINERS
        .iter()
        .find_map(|container| document.select(container).next())
        .unwrap_or_else(|| document.root_element());

    let blocks: Vec<(ElementRef, String)> = root
        .select(&BLOCKS)
        .filter(|block| !in_boilerplate(*block))
        .map(|block| (block, normalized_text(block)))
        .filter(|(_, text)| !text.is_empty())
        .collect();

    let content = blocks
        .iter()
        .map(|(block, _)| block.html())
        .collect::<Vec<_>>()
        .join("\n");

    let text_content = blocks
        .iter()
        .map(|(_, text)| text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let excerpt = meta_content(&document, &DESCRIPTION)
        .or_else(|| {
            blocks
                .iter()
                .find(|(block, _)| PARAGRAPH.matches(block))
                .map(|(_, text)| text.chars().take(EXCERPT_CHARS).collect())
        })
        .unwrap_or_default();

    ReadableArticle {
        title: title(&document),
        length: text_content.chars().count(),
        content,
        text_content,
        excerpt,
    }
}

fn title(document: &Html) -> String {
    meta_content(document, &OG_TITLE)
        .or_else(|| first_text(document, &TITLE))
        .or_else(|| first_text(document, &HEADING))
        .unwrap_or_else(|| DEFAULT_ARTICLE_TITLE.to_string())
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .filter_map(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .find(|content| !content.is_empty())
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(normalized_text)
        .find(|text| !text.is_empty())
}

fn normalized_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn in_boilerplate(element: ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| BOILERPLATE.contains(&ancestor.value().name()))
}
