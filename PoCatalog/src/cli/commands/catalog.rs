//! CLI commands for single PO files

use std::path::{Path, PathBuf};

use crate::formats::po::read_po;

/// Parse one file and print a summary, or the whole catalog as JSON.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn parse(path: &Path, strict: bool, json: bool) -> anyhow::Result<()> {
    let catalog = read_po(path, strict)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!("File: {}", path.display());
    let code = catalog.language_code();
    if !code.is_empty() {
        println!("Language-Code: {code}");
    }
    println!("Header fields: {}", catalog.metadata.len());
    println!("Entries: {}", catalog.entries.len());
    if !catalog.context.is_empty() {
        println!("Contexts:");
        for (name, entries) in &catalog.context {
            println!("  {name}: {} entries", entries.len());
        }
    }
    Ok(())
}

/// Strictly parse every file, printing `OK` or the first error of each.
///
/// # Errors
/// Returns an error if any file failed.
pub fn check(paths: &[PathBuf]) -> anyhow::Result<()> {
    let mut failed = 0;
    for path in paths {
        match read_po(path, true) {
            Ok(catalog) => println!("OK    {} ({} entries)", path.display(), catalog.len()),
            Err(e) => {
                failed += 1;
                println!("FAIL  {}: {e}", path.display());
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} files failed", paths.len());
    }
    Ok(())
}
