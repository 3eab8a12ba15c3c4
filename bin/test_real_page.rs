use anyhow::Context;
use newsgrab::content::ContentExtractor;
use newsgrab::feed::PageFetcher;
use newsgrab::post::{PostAssembler, PreviewMetadata};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://www.rust-lang.org/".to_string());

    println!("Testing extraction with real URL: {}", url);

    let fetcher = PageFetcher::new();
    let html = fetcher
        .fetch_page(&url)
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;
    println!("✓ Downloaded {} bytes", html.len());

    let extractor = ContentExtractor::new()?;
    let items = extractor
        .extract_page(&html, &url)
        .context("Failed to extract content")?;
    println!("✓ Extracted {} items", items.len());

    for (i, item) in items.iter().take(10).enumerate() {
        let preview = item.text_content().unwrap_or_default();
        let truncated: String = preview.chars().take(80).collect();
        println!("  {:>2}. {:?}: {}", i + 1, item.kind(), truncated);
    }

    let post = PostAssembler::new("real-page")
        .assemble(PreviewMetadata::new("Real page", url.clone()), items)
        .context("Failed to assemble post")?;

    println!("\nDescription: {}", post.description);
    if let Some(image) = &post.lead_image {
        println!("Lead image: {}", image);
    }
    println!("Items after assembly: {}", post.items.len());

    Ok(())
}
