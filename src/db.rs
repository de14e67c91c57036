use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;

const DB_PATH: &str = "data/products.sqlite";

/// One scraped catalog entry. Built by the product extractor, inserted once,
/// then dropped; the store is the sole durable owner.
pub struct Product {
    pub name: String,
    pub sku: String,
    pub price: String,
    pub description: String,
    pub image: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
}

pub fn connect() -> Result<Connection> {
    if let Some(dir) = std::path::Path::new(DB_PATH).parent() {
        std::fs::create_dir_all(dir)?;
    }
    connect_at(DB_PATH)
}

pub fn connect_at(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS products (
            product_id  INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT UNIQUE NOT NULL,
            sku         TEXT NOT NULL,
            price       TEXT NOT NULL,
            description TEXT NOT NULL,
            image       BLOB,
            created_at  TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}

/// Insert one product. `name` carries the UNIQUE constraint, so inserting a
/// duplicate surfaces the constraint violation to the caller. Each insert
/// commits before returning.
pub fn insert_product(conn: &Connection, product: &Product) -> Result<()> {
    conn.execute(
        "INSERT INTO products (name, sku, price, description, image, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            product.name,
            product.sku,
            product.price,
            product.description,
            product.image,
            product.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

// ── Overview ──

pub struct ProductSummary {
    pub product_id: i64,
    pub name: String,
    pub sku: String,
    pub price: String,
    pub has_image: bool,
    pub created_at: String,
}

pub fn fetch_products(conn: &Connection, limit: usize) -> Result<Vec<ProductSummary>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT product_id, name, sku, price, image IS NOT NULL, created_at
         FROM products ORDER BY product_id LIMIT {}",
        limit
    ))?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ProductSummary {
                product_id: row.get(0)?,
                name: row.get(1)?,
                sku: row.get(2)?,
                price: row.get(3)?,
                has_image: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub with_image: usize,
    pub latest: Option<String>,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let total: usize = conn.query_row("SELECT COUNT(*) FROM products", [], |r| r.get(0))?;
    let with_image: usize = conn.query_row(
        "SELECT COUNT(*) FROM products WHERE image IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    let latest: Option<String> =
        conn.query_row("SELECT MAX(created_at) FROM products", [], |r| r.get(0))?;
    Ok(Stats {
        total,
        with_image,
        latest,
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn sample(name: &str) -> Product {
        Product {
            name: name.to_string(),
            sku: "0001".to_string(),
            price: "€1.50".to_string(),
            description: "Fresh milk".to_string(),
            image: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn schema_init_is_idempotent() {
        let conn = test_conn();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
    }

    #[test]
    fn insert_and_read_back() {
        let conn = test_conn();
        let mut p = sample("Milk 1L");
        p.image = Some(vec![0x89, 0x50, 0x4e, 0x47]);
        insert_product(&conn, &p).unwrap();

        let rows = fetch_products(&conn, 10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Milk 1L");
        assert_eq!(rows[0].price, "€1.50");
        assert!(rows[0].has_image);
        assert_eq!(rows[0].product_id, 1);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let conn = test_conn();
        insert_product(&conn, &sample("Milk 1L")).unwrap();

        // Same name with different details still violates uniqueness
        let mut dup = sample("Milk 1L");
        dup.sku = "9999".to_string();
        dup.price = "€2.00".to_string();
        assert!(insert_product(&conn, &dup).is_err());

        let stats = get_stats(&conn).unwrap();
        assert_eq!(stats.total, 1);
    }

    #[test]
    fn stats_count_images() {
        let conn = test_conn();
        insert_product(&conn, &sample("Milk 1L")).unwrap();
        let mut with_img = sample("Bread 800g");
        with_img.image = Some(vec![1, 2, 3]);
        insert_product(&conn, &with_img).unwrap();

        let stats = get_stats(&conn).unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.with_image, 1);
        assert!(stats.latest.is_some());
    }
}
