use std::sync::LazyLock;

use scraper::{Html, Selector};

static CATEGORY_MENU: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.MegaMenuHiddenCategoryListWrapper--11chaob.eFolqZ").unwrap()
});
static CATEGORY_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.CategoryHiddenLink--1qv7ebj.dYGUuu").unwrap());

/// Collect category URLs from the root page's hidden mega-menu.
///
/// Hrefs in the menu are site-relative, so each is resolved against
/// `base_url`. Document order is preserved and duplicates are kept; an empty
/// result just means the markers matched nothing, not an error.
pub fn extract_categories(doc: &Html, base_url: &str) -> Vec<String> {
    let mut urls = Vec::new();
    for menu in doc.select(&CATEGORY_MENU) {
        for link in menu.select(&CATEGORY_LINK) {
            if let Some(href) = link.value().attr("href") {
                urls.push(format!("{}{}", base_url, href));
            }
        }
    }
    urls
}

// ── Tests ──
