mod crawler;
mod db;
mod extract;
mod fetch;

use std::time::Instant;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "grocery_scraper", about = "Grocery shop catalog scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// One full crawl pass: categories, listings, product pages
    Run {
        /// Max product pages to visit (default: all discovered)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show store statistics
    Stats,
    /// Stored products overview table
    Products {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { limit } => {
            println!("Starting product catalog crawl");
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let client = fetch::client()?;
            let stats = crawler::run(&conn, &client, crawler::BASE_URL, limit).await?;
            println!(
                "Done: {} categories, {} product links, {} pages ok ({} failed), {} products inserted.",
                stats.categories,
                stats.product_urls,
                stats.pages_ok,
                stats.pages_failed,
                stats.inserted
            );
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Products:   {}", s.total);
            println!("With image: {}", s.with_image);
            println!("No image:   {}", s.total - s.with_image);
            if let Some(latest) = s.latest {
                println!("Latest:     {}", latest);
            }
            Ok(())
        }
        Commands::Products { limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let rows = db::fetch_products(&conn, limit)?;
            if rows.is_empty() {
                println!("No products stored. Run 'run' first.");
                return Ok(());
            }

            println!(
                "{:>4} | {:<32} | {:>10} | {:<14} | {:<5} | {}",
                "#", "Name", "Price", "SKU", "Image", "Created"
            );
            println!("{}", "-".repeat(100));
            for r in &rows {
                println!(
                    "{:>4} | {:<32} | {:>10} | {:<14} | {:<5} | {}",
                    r.product_id,
                    truncate(&r.name, 32),
                    truncate(&r.price, 10),
                    truncate(&r.sku, 14),
                    if r.has_image { "yes" } else { "-" },
                    r.created_at
                );
            }
            println!("\n{} products", rows.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
