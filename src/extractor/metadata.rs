use scraper::{ElementRef, Html, Selector};

use crate::extractor::model::PageMetadata;

/// Where each field is looked for, most specific first. A `meta` selector
/// yields its `content` attribute, `time` yields `datetime`, anything else
/// its text.
const TITLE_SOURCES: &[&str] = &["meta[property='og:title']", "title", "h1"];
const DESCRIPTION_SOURCES: &[&str] = &[
    "meta[name='description']",
    "meta[property='og:description']",
    "meta[name='twitter:description']",
];
const AUTHOR_SOURCES: &[&str] = &[
    "meta[name='author']",
    "meta[property='article:author']",
    "[rel='author']",
    ".byline",
];
const DATE_SOURCES: &[&str] = &[
    "meta[property='article:published_time']",
    "meta[name='date']",
    "meta[itemprop='datePublished']",
    "time[datetime]",
];

pub fn extract_metadata(document: &Html) -> PageMetadata {
    PageMetadata {
        title: first_value(document, TITLE_SOURCES),
        description: first_value(document, DESCRIPTION_SOURCES),
        author: first_value(document, AUTHOR_SOURCES),
        date: first_value(document, DATE_SOURCES),
    }
}

fn first_value(document: &Html, sources: &[&str]) -> String {
    sources
        .iter()
        .filter_map(|source| Selector::parse(source).ok())
        .flat_map(|selector| {
            document
                .select(&selector)
                .filter_map(element_value)
                .collect::<Vec<_>>()
        })
        .next()
        .unwrap_or_default()
}

fn element_value(element: ElementRef<'_>) -> Option<String> {
    let value = match element.value().name() {
        "meta" => element.value().attr("content").map(str::to_string),
        "time" => element.value().attr("datetime").map(str::to_string),
        _ => Some(element.text().collect::<Vec<_>>().join(" ")),
    }?;
    let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_open_graph_and_meta_tags() {
        let html = r#"<html><head>
            <title>Fallback Title</title>
            <meta property="og:title" content="  Open Graph Title ">
            <meta name="description" content="A page about things.">
            <meta name="author" content="Ada Lovelace">
            <meta property="article:published_time" content="2024-05-01T10:00:00Z">
        </head><body><h1>Heading</h1></body></html>"#;

        let metadata = extract_metadata(&Html::parse_document(html));
        assert_eq!(metadata.title, "Open Graph Title");
        assert_eq!(metadata.description, "A page about things.");
        assert_eq!(metadata.author, "Ada Lovelace");
        assert_eq!(metadata.date, "2024-05-01T10:00:00Z");
    }

    #[test]
    fn falls_back_to_markup_and_defaults_to_empty() {
        let html = r#"<html><head><title> Plain   Title </title></head>
            <body><span rel="author">Grace</span><time datetime="2023-01-02">Jan 2</time></body></html>"#;

        let metadata = extract_metadata(&Html::parse_document(html));
        assert_eq!(metadata.title, "Plain Title");
        assert_eq!(metadata.description, "");
        assert_eq!(metadata.author, "Grace");
        assert_eq!(metadata.date, "2023-01-02");
    }
}
