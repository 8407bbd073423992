use anyhow::{Context, Result};

use consonance_etl::{open_catalog, Config};

pub fn show_catalog_stats(config: &Config, json: bool) -> Result<()> {
    let catalog = open_catalog(config).context("Failed to load catalog")?;
    let report = catalog.report();

    if json {
        let value = serde_json::json!({
            "path": config.catalog_path,
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("\n📊 Consonance Catalog\n");
    println!("  File: {}", config.catalog_path.display());
    println!("  Rows read: {}", report.rows_read);
    println!("  Dropped (missing name or tags): {}", report.dropped_incomplete);
    println!("  Dropped (duplicate name): {}", report.dropped_duplicate);
    println!("  Artists kept: {}", report.kept);
    println!("  Distinct tags: {}", report.vocabulary_size);

    Ok(())
}
