use std::sync::LazyLock;

use scraper::{Html, Selector};

static LISTING_CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.ColListing--1fk1zey.iowyBD").unwrap());
static PRODUCT_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.ProductCardHiddenLink--v3c62m.dGWlVm").unwrap());

/// Collect product-detail URLs from a category listing page.
///
/// Unlike the category menu, card hrefs are already absolute in the source
/// markup, so they are taken as-is.
pub fn extract_item_urls(doc: &Html) -> Vec<String> {
    let mut urls = Vec::new();
    for card in doc.select(&LISTING_CARD) {
        for link in card.select(&PRODUCT_LINK) {
            if let Some(href) = link.value().attr("href") {
                urls.push(href.to_string());
            }
        }
    }
    urls
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hrefs_are_taken_as_is() {
        let html = Html::parse_document(
            r#"
            <div class="ColListing--1fk1zey iowyBD">
                <a class="ProductCardHiddenLink--v3c62m dGWlVm"
                   href="https://shop.example.ie/product/milk-1l">Milk</a>
            </div>
            <div class="ColListing--1fk1zey iowyBD">
                <a class="ProductCardHiddenLink--v3c62m dGWlVm"
                   href="https://shop.example.ie/product/bread-800g">Bread</a>
            </div>
            "#,
        );
        assert_eq!(
            extract_item_urls(&html),
            vec![
                "https://shop.example.ie/product/milk-1l".to_string(),
                "https://shop.example.ie/product/bread-800g".to_string(),
            ]
        );
    }

    #[test]
    fn no_matching_cards_yields_empty() {
        let html = Html::parse_document("<html><body></body></html>");
        assert!(extract_item_urls(&html).is_empty());
    }

    #[test]
    fn links_outside_cards_are_ignored() {
        let html = Html::parse_document(
            r#"
            <a class="ProductCardHiddenLink--v3c62m dGWlVm" href="https://x/loose">loose</a>
            <div class="ColListing--1fk1zey iowyBD">
                <a class="ProductCardHiddenLink--v3c62m dGWlVm" href="https://x/carded">carded</a>
            </div>
            "#,
        );
        assert_eq!(extract_item_urls(&html), vec!["https://x/carded".to_string()]);
    }
}
