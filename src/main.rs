use pagelens::screenshot;
use pagelens::{AnnotationConfig, BrowserTrait, ChromeBrowser, Config, DomProcessor};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = Config::default();
    let mut browser = ChromeBrowser::new();
    browser.launch(&config).await?;
    let tab = browser.new_tab().await?;

    info!("Navigating to example.com");
    browser.navigate(&tab, "https://example.com").await?;

    let processor = DomProcessor::new(config.extraction.clone());
    let map = processor.extract_element_map(&browser, &tab, None).await?;
    info!(
        "Found {} interactive elements ({} candidates seen)",
        map.len(),
        map.stats.total_elements
    );

    // The token rendering is what an LLM driver would receive.
    println!("{}", map.to_token_string(config.extraction.max_token_elements));

    screenshot::save_annotated(
        &browser,
        &tab,
        &map,
        &AnnotationConfig::llm_style(),
        "annotated.png",
    )
    .await?;
    info!("Annotated screenshot saved to annotated.png");

    // A second extraction against the first map marks elements that
    // appeared in between.
    let second = processor
        .extract_element_map(&browser, &tab, Some(&map))
        .await?;
    let new_count = second.elements.iter().filter(|e| e.is_new).count();
    info!(
        "Second extraction: {} elements, {} new since the first map",
        second.len(),
        new_count
    );

    browser.close().await?;
    Ok(())
}
