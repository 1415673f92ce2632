//! Embedded image maintenance commands.

use std::fs;

use anyhow::Context;

use crate::tags::{ImageSelector, LoftyBackend, TagBackend};

use super::ImagesAction;

pub fn cmd_images(action: &ImagesAction) -> anyhow::Result<()> {
    match action {
        ImagesAction::Export { file, output, name } => {
            let tagged = LoftyBackend.open(file)?;
            let data = tagged.image(name.as_deref())?;
            fs::write(output, &data)
                .with_context(|| format!("Failed to write image to {}", output.display()))?;
            println!("Exported {} bytes to {}", data.len(), output.display());
        }
        ImagesAction::Remove { file, name, all } => {
            let selector = match (name, all) {
                (_, true) => ImageSelector::All,
                (Some(name), false) => ImageSelector::Named(name),
                (None, false) => anyhow::bail!("Either --name or --all is required"),
            };
            let mut tagged = LoftyBackend.open(file)?;
            tagged.delete_image(selector)?;
            println!("Removed images from {}", file.display());
        }
    }
    Ok(())
}
