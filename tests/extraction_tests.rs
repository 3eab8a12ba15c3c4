use newsgrab::content::{ClassificationPipeline, ContentExtractor, ContentItem, DocumentTree};
use newsgrab::error::Error;
use newsgrab::feed::{FeedParser, PageFetcher, StaticSource};
use newsgrab::harvest::Harvester;
use newsgrab::post::{PostAssembler, PreviewMetadata};
use proptest::prelude::*;
use std::io::Cursor;

use test_data::*;

/// End-to-end tests: HTML in, posts out.

fn extractor() -> ContentExtractor {
    ContentExtractor::new().unwrap()
}

fn fragment(html: &str) -> Vec<ContentItem> {
    extractor().extract_fragment(html, BASE_URI).unwrap()
}

fn link(url: &str, text: &str) -> ContentItem {
    ContentItem::Link { url: url.to_string(), text: Some(text.to_string()) }
}

fn image(url: &str, alt: Option<&str>) -> ContentItem {
    ContentItem::Image { url: url.to_string(), alt: alt.map(str::to_string) }
}

#[test]
fn test_quote_yields_single_item() {
    assert_eq!(fragment(SCENARIO_QUOTE), vec![ContentItem::quote("–quote text continues–")]);
}

#[test]
fn test_heading_merges_span() {
    assert_eq!(fragment(SCENARIO_HEADING), vec![ContentItem::heading("TitlePart", 2)]);
}

#[test]
fn test_paragraph_link_is_single_link() {
    assert_eq!(fragment(SCENARIO_LINK), vec![link("https://news.example.com/x", "label")]);
}

#[test]
fn test_lead_image_and_duplicate() {
    let items = fragment(SCENARIO_IMAGES);
    let post = PostAssembler::new("scenario")
        .assemble(PreviewMetadata::new("Images", BASE_URI).with_description("Given"), items)
        .unwrap();

    assert_eq!(post.lead_image.as_deref(), Some("https://news.example.com/politics/a.jpg"));
    assert_eq!(post.items, vec![ContentItem::text("Between")]);
}

#[test]
fn test_auto_description_with_trailing_link() {
    let items = fragment(SCENARIO_DESCRIPTION);
    let post = PostAssembler::new("scenario")
        .assemble(PreviewMetadata::new("Description", BASE_URI), items)
        .unwrap();

    assert_eq!(post.description, "First. Second. Third. Read more");
    assert_eq!(post.items, vec![link("https://news.example.com/more", "Read more")]);
}

#[test]
fn test_empty_title_is_rejected() {
    let items = fragment(SCENARIO_DESCRIPTION);
    let result = PostAssembler::new("scenario").assemble(PreviewMetadata::new("", BASE_URI), items);

    assert!(matches!(result, Err(Error::InvalidTitle(_))));
}

#[test]
fn test_full_article_page_items() {
    let items = extractor().extract_page(ARTICLE_PAGE, BASE_URI).unwrap();

    assert_eq!(
        items,
        vec![
            image("https://news.example.com/media/council.jpg", Some("Council chamber")),
            ContentItem::text("The city council approved the budget on Tuesday evening."),
            ContentItem::text("The vote was seven to two."),
            ContentItem::heading("Reaction from residents", 2),
            ContentItem::quote("– We waited years for this –"),
            link("https://news.example.com/politics/budget-details", "Full budget details"),
            image("https://news.example.com/media/council.jpg", None),
            image("https://news.example.com/media/chart.png", Some("Chart")),
            ContentItem::Video { platform_id: "dQw4w9WgXcQ".to_string() },
        ]
    );
}

#[test]
fn test_full_article_page_post() {
    let items = extractor().extract_page(ARTICLE_PAGE, BASE_URI).unwrap();
    let post = PostAssembler::new("news")
        .assemble(PreviewMetadata::new("Council approves budget", BASE_URI), items)
        .unwrap();

    assert_eq!(post.lead_image.as_deref(), Some("https://news.example.com/media/council.jpg"));
    assert_eq!(
        post.description,
        "The city council approved the budget on Tuesday evening. The vote was seven to two. \
         Reaction from residents – We waited years for this – Full budget details"
    );
    assert_eq!(
        post.items,
        vec![
            link("https://news.example.com/politics/budget-details", "Full budget details"),
            image("https://news.example.com/media/chart.png", Some("Chart")),
        ]
    );
}

#[test]
fn test_purified_content_never_surfaces() {
    let items = extractor().extract_page(ARTICLE_PAGE, BASE_URI).unwrap();

    for item in &items {
        let text = item.text_content().unwrap_or_default();
        assert!(!text.contains("Search"));
        assert!(!text.contains("Line item"));
        assert!(!text.contains("Share"));
        assert!(!text.contains("Home"));
    }
}

#[test]
fn test_page_without_container_uses_body() {
    let items = extractor().extract_page(BARE_PAGE, BASE_URI).unwrap();

    assert_eq!(
        items,
        vec![
            ContentItem::text("Only paragraph."),
            link("https://other.example.org/x", "Elsewhere"),
        ]
    );
}

#[tokio::test]
async fn test_atom_inline_content_harvest() {
    let previews = FeedParser::new().parse_feed(Cursor::new(ATOM_FEED.as_bytes())).unwrap();
    let source = StaticSource::new("science", previews);
    let harvester = Harvester::new(PageFetcher::new(), extractor());

    let report = harvester.harvest(&source, 10).await.unwrap();

    assert!(report.failures.is_empty());
    let post = &report.posts[0];
    assert_eq!(post.title, "Telescope sees first light");
    assert_eq!(post.description, "The new telescope is online.");
    assert_eq!(
        post.lead_image.as_deref(),
        Some("https://science.example.com/img/first-light.jpg")
    );
    assert_eq!(post.items, vec![ContentItem::text("Engineers cheered.")]);
    assert_eq!(post.published_at, "2024-03-16 11:00:00");
}

#[test]
fn test_long_article_keeps_every_section() {
    let html = long_article(50);
    let items = extractor().extract_page(&html, BASE_URI).unwrap();

    let headings = items.iter().filter(|i| matches!(i, ContentItem::Heading { .. })).count();
    let quotes = items.iter().filter(|i| matches!(i, ContentItem::Quote { .. })).count();
    let links = items.iter().filter(|i| i.is_link()).count();
    let images = items.iter().filter(|i| i.is_image()).count();

    assert_eq!((headings, quotes, links, images), (10, 10, 10, 10));
    assert_eq!(items.len(), 50);
}

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn classify_body(html: &str) -> Vec<ContentItem> {
    let tree = DocumentTree::parse(html);
    let body = tree.body().unwrap();
    ClassificationPipeline::new().unwrap().classify(&tree, body, BASE_URI)
}

proptest! {
    #[test]
    fn prop_formatting_merges_into_one_text_item(
        words in prop::collection::vec((word(), any::<bool>()), 1..12)
    ) {
        let html = words
            .iter()
            .map(|(w, bold)| if *bold { format!("<b>{}</b>", w) } else { w.clone() })
            .collect::<Vec<_>>()
            .join(" ");
        let expected = words.iter().map(|(w, _)| w.as_str()).collect::<Vec<_>>().join(" ");

        let items = classify_body(&format!("<p>{}</p>", html));

        prop_assert_eq!(items, vec![ContentItem::text(&expected)]);
    }

    #[test]
    fn prop_classification_is_repeatable(
        blocks in prop::collection::vec((0u8..4, word(), word()), 0..10)
    ) {
        let html: String = blocks
            .iter()
            .map(|(kind, a, b)| match kind {
                0 => format!("<p>{} <i>{}</i></p>", a, b),
                1 => format!("<h3>{}<span>{}</span></h3>", a, b),
                2 => format!("<p><a href=\"/{}\">{}</a></p>", a, b),
                _ => format!("<blockquote>{} {}</blockquote>", a, b),
            })
            .collect();

        let first = classify_body(&html);
        let second = classify_body(&html);

        prop_assert_eq!(first.len(), blocks.len());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_description_is_never_empty(
        title in "[A-Za-z][A-Za-z ]{0,20}",
        texts in prop::collection::vec("[a-z ]{0,30}", 0..8),
        length in 1usize..300
    ) {
        let items = texts.iter().map(|t| ContentItem::text(t)).collect();
        let post = PostAssembler::new("prop")
            .with_description_length(length)
            .assemble(PreviewMetadata::new(title, BASE_URI), items)
            .unwrap();

        prop_assert!(!post.description.trim().is_empty());
    }
}
