//! Selector-based extraction, one module per crawl stage:
//! root page → category links → product links → product details.

pub mod categories;
pub mod listing;
pub mod product;
