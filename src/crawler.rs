use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use rusqlite::Connection;
use tracing::{info, warn};

use crate::extract::{categories, listing, product};
use crate::fetch;

pub const BASE_URL: &str = "https://shop.supervalu.ie";

/// Counters reported after a full pass.
pub struct RunStats {
    pub categories: usize,
    pub product_urls: usize,
    pub pages_ok: usize,
    pub pages_failed: usize,
    pub inserted: usize,
}

/// One full crawl pass: root → category pages → product pages.
///
/// Stages run strictly in order; each stage's URL set is accumulated in full
/// before the next stage starts. A page that fails to fetch is logged and
/// skipped, so one bad page never aborts its stage. A store fault (duplicate
/// product name included) propagates and ends the run.
pub async fn run(
    conn: &Connection,
    client: &Client,
    base_url: &str,
    limit: Option<usize>,
) -> Result<RunStats> {
    let root = fetch::fetch_html(client, base_url).await?;
    let category_urls = categories::extract_categories(&root, base_url);
    info!("Found {} category links", category_urls.len());

    let mut product_urls: Vec<String> = Vec::new();
    for url in &category_urls {
        match fetch::fetch_html(client, url).await {
            Ok(doc) => product_urls.extend(listing::extract_item_urls(&doc)),
            Err(e) => warn!("Skipping category {}: {}", url, e),
        }
    }
    info!("Found {} product links", product_urls.len());

    if let Some(n) = limit {
        product_urls.truncate(n);
    }

    let pb = ProgressBar::new(product_urls.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut stats = RunStats {
        categories: category_urls.len(),
        product_urls: product_urls.len(),
        pages_ok: 0,
        pages_failed: 0,
        inserted: 0,
    };

    let fetch_image = |url: String| async move { fetch::fetch_bytes(client, &url).await };

    for url in &product_urls {
        match fetch::fetch_html(client, url).await {
            Ok(doc) => {
                stats.inserted += product::process_product_page(conn, fetch_image, &doc).await?;
                stats.pages_ok += 1;
            }
            Err(e) => {
                warn!("Skipping product page {}: {}", url, e);
                stats.pages_failed += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "Crawl finished: {} pages ok, {} failed, {} products inserted",
        stats.pages_ok, stats.pages_failed, stats.inserted
    );
    Ok(stats)
}

// ── Tests ──
