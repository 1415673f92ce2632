//! Image and album association commands.

use std::path::{self, PathBuf};

use crate::associations::AssociationKind;
use crate::config::Config;
use crate::error::Error;
use crate::tagger::{DirectoryAssociation, NewAssociation};

use super::{AssocAction, open_tagger};

pub fn cmd_assoc(config: Config, kind: AssociationKind, action: &AssocAction) -> anyhow::Result<()> {
    let mut tagger = open_tagger(config);

    match action {
        AssocAction::List => {
            for association in tagger.list_associations(kind) {
                println!("{association}");
            }
            return Ok(());
        }
        AssocAction::Add { artist, key, value } => {
            let association = match kind {
                AssociationKind::Image => NewAssociation::Image {
                    artist: artist.clone(),
                    name: key.clone(),
                    // Stored paths must survive a change of working directory
                    path: path::absolute(PathBuf::from(value))?,
                },
                AssociationKind::Album => NewAssociation::Album {
                    artist: artist.clone(),
                    title: key.clone(),
                    album: value.clone(),
                },
            };
            tagger.add_association(association);
            println!("Added {kind} association: {artist} - {key} - {value}");
        }
        AssocAction::Delete { artist, key } => {
            match tagger.delete_association(kind, artist, key) {
                Ok(true) => println!("Deleted {kind} association: {artist} - {key}"),
                Ok(false) | Err(Error::AssociationNotFound { .. }) => {
                    println!("No {kind} association for {artist} - {key}");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
        }
        AssocAction::Associate { dir, key } => {
            let target = match kind {
                AssociationKind::Image => DirectoryAssociation::Image { name: key.clone() },
                AssociationKind::Album => DirectoryAssociation::Album { album: key.clone() },
            };
            let added = tagger.associate(dir, &target)?;
            println!("Added {added} {kind} association(s)");
        }
        AssocAction::Import { file } => {
            tagger.update_associations(kind, file)?;
            println!("Imported {kind} associations from {}", file.display());
        }
        AssocAction::Clear => {
            tagger.clear_associations(kind);
            println!("Cleared {kind} associations");
        }
    }

    tagger.save_associations(kind)?;
    Ok(())
}
