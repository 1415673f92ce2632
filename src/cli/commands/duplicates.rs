//! Duplicate file search command.

use std::io;
use std::path::Path;

use crate::duplicates::find_duplicates_with;
use crate::events::LockedWriter;
use crate::scanner::display_name;

/// Print each group of files with identical content inside `dir`.
pub fn cmd_duplicates(dir: &Path) -> anyhow::Result<()> {
    let progress = LockedWriter::new(io::stderr());
    let groups = find_duplicates_with(dir, &progress)?;

    if groups.is_empty() {
        println!("No duplicates found in {}", dir.display());
        return Ok(());
    }

    println!("Found {} group(s) of duplicates:", groups.len());
    for group in &groups {
        println!();
        println!("{}", group.hash);
        for path in &group.paths {
            println!("  {}", display_name(path));
        }
    }
    Ok(())
}
