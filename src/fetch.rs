use anyhow::{Context, Result};
use reqwest::Client;
use scraper::Html;

// The site rejects unidentified clients, so every request presents a
// browser User-Agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/86.0.4240.198 Safari/537.36";

pub fn client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Fetch a page and parse it into a queryable document.
pub async fn fetch_html(client: &Client, url: &str) -> Result<Html> {
    let body = client
        .get(url)
        .send()
        .await?
        .text()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;
    Ok(Html::parse_document(&body))
}

/// Fetch a raw body (image payloads).
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    let bytes = client
        .get(url)
        .send()
        .await?
        .bytes()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;
    Ok(bytes.to_vec())
}
