use std::future::Future;
use std::sync::LazyLock;

use anyhow::{anyhow, Result};
use chrono::Utc;
use rusqlite::Connection;
use scraper::{ElementRef, Html, Selector};
use tracing::{error, warn};

use crate::db::{self, Product};

static PRODUCT_DETAILS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.ProductDetails--1sb8xji.jrwVWG").unwrap());

// The site uses two mutually exclusive image layouts; only one matches on
// any given page.
static MAIN_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.PdpMainImage--kopilf.flXmdr img[src]").unwrap());
static ALT_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.PdpImage--7pr6pv.dNwcTc img[src]").unwrap());

static NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2.PdpInfoTitle--1qi97uk.sZrqX").unwrap());
static PRICE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.PdpMainPrice--4c0ljm.bBOazG").unwrap());
static SKU: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.ProductNumber--jhh79i.iNtHsC").unwrap());
static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.PdpDescriptionWrapper--7s9nb3.cEhkaI").unwrap());

const SKU_LABEL: &str = "Product Number: ";

#[derive(Debug)]
pub struct ProductFields {
    pub name: String,
    pub price: String,
    pub sku: String,
    pub description: String,
}

/// Image source URLs found in a product-details container, one per layout
/// tier. Preference is always `primary` first.
#[derive(Debug, Default, PartialEq)]
pub struct ImageCandidates {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

pub fn image_candidates(container: ElementRef) -> ImageCandidates {
    let src = |sel: &Selector| {
        container
            .select(sel)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string)
    };
    ImageCandidates {
        primary: src(&MAIN_IMAGE),
        secondary: src(&ALT_IMAGE),
    }
}

/// Two-tier image fallback: take the first tier whose URL exists and whose
/// fetch succeeds. A failed tier is logged and skipped; both tiers failing
/// leaves the product without an image. No fault escapes this function.
pub async fn resolve_image<F, Fut>(fetch: F, candidates: &ImageCandidates) -> Option<Vec<u8>>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Vec<u8>>>,
{
    let tiers = [
        ("main", &candidates.primary),
        ("secondary", &candidates.secondary),
    ];
    for (tier, url) in tiers {
        let Some(url) = url else { continue };
        match fetch(url.clone()).await {
            Ok(bytes) => return Some(bytes),
            Err(e) => warn!("{} image fetch failed for {}: {}", tier, url, e),
        }
    }
    None
}

fn text_of(container: ElementRef, sel: &Selector, what: &str) -> Result<String> {
    let node = container
        .select(sel)
        .next()
        .ok_or_else(|| anyhow!("Missing {} node", what))?;
    Ok(node.text().collect::<String>().trim().to_string())
}

/// Read the mandatory text fields from one product-details container.
/// A missing marker is an error; the page-level guard in
/// [`process_product_page`] decides what that costs.
pub fn extract_fields(container: ElementRef) -> Result<ProductFields> {
    let name = text_of(container, &NAME, "product name")?;
    let price = text_of(container, &PRICE, "product price")?;
    let sku_raw = text_of(container, &SKU, "product number")?;
    let sku = sku_raw
        .strip_prefix(SKU_LABEL)
        .unwrap_or(&sku_raw)
        .to_string();
    let description = text_of(container, &DESCRIPTION, "product description")?;
    Ok(ProductFields {
        name,
        price,
        sku,
        description,
    })
}

/// Process every product-details container on one page: resolve the image,
/// read the mandatory fields, insert the record with a fresh timestamp.
/// Returns the number of products inserted.
///
/// On an extraction fault the fault is logged and the remaining containers
/// on this page are abandoned; the caller moves on to the next URL. This
/// page-wide containment matches the site crawler this replaces. A store
/// fault propagates and ends the run.
pub async fn process_product_page<F, Fut>(conn: &Connection, fetch: F, doc: &Html) -> Result<usize>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Vec<u8>>>,
{
    let mut inserted = 0;
    for container in doc.select(&PRODUCT_DETAILS) {
        let image = resolve_image(&fetch, &image_candidates(container)).await;

        let fields = match extract_fields(container) {
            Ok(fields) => fields,
            Err(e) => {
                error!("Product extraction failed, skipping rest of page: {}", e);
                break;
            }
        };

        db::insert_product(
            conn,
            &Product {
                name: fields.name,
                sku: fields.sku,
                price: fields.price,
                description: fields.description,
                image,
                created_at: Utc::now(),
            },
        )?;
        inserted += 1;
    }
    Ok(inserted)
}

// ── Tests ──
