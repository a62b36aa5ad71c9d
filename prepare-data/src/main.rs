use std::path::{Path, PathBuf};

use anyhow::Context;
use series::table::{CsvTable, TableProvider};

const EXPORTS_DIR: &str = "../assets/exports";
const TABLES_DIR: &str = "../assets/tables";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("Looking for spreadsheet exports in {EXPORTS_DIR}");

    let mut exports = Vec::new();
    let mut read_dir = tokio::fs::read_dir(EXPORTS_DIR)
        .await
        .with_context(|| format!("Could not open {EXPORTS_DIR}"))?;
    while let Some(entry) = read_dir.next_entry().await? {
        let path = entry.path();
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        {
            exports.push(path);
        }
    }
    exports.sort();

    println!("Converting {} exports", exports.len());
    let mut handles = Vec::new();
    for export in exports {
        handles.push((export.clone(), tokio::spawn(convert(export))));
    }

    let mut failures = 0;
    for (export, handle) in handles {
        match handle.await {
            Ok(Ok(rows)) => println!("Wrote the {rows} rows of {}", export.display()),
            Ok(Err(e)) => {
                failures += 1;
                eprintln!("Could not convert {}: {e:#}", export.display());
            }
            Err(e) => {
                failures += 1;
                eprintln!("The conversion of {} crashed: {e}", export.display());
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} exports could not be converted");
    }
    Ok(())
}

async fn convert(export: PathBuf) -> anyhow::Result<usize> {
    let bytes = tokio::fs::read(&export).await?;
    let rows = CsvTable::from_text(decode(&bytes)).rows()?;

    let stem = export
        .file_stem()
        .context("The export has no file name")?;
    let path = Path::new(TABLES_DIR).join(stem).with_extension("json");
    tokio::fs::write(&path, serde_json::to_string_pretty(&rows)?).await?;
    Ok(rows.len())
}

/// Exports are UTF-8 (possibly with a BOM) or, from older Excel versions, Windows-1252.
fn decode(bytes: &[u8]) -> String {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if !had_errors {
        return text.into_owned();
    }
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    text.into_owned()
}
