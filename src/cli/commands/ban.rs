//! Ban list maintenance commands.

use crate::config::Config;

use super::{BanAction, open_tagger};

pub fn cmd_ban(config: Config, action: &BanAction) -> anyhow::Result<()> {
    let mut tagger = open_tagger(config);

    match action {
        BanAction::List => {
            for fragment in tagger.ban_list().iter() {
                println!("{fragment}");
            }
        }
        BanAction::Add { fragment } => {
            tagger.ban_list_mut().ban(fragment.as_str());
            tagger.save_ban_list()?;
            println!("Banned: {fragment}");
        }
        BanAction::Remove { fragment } => {
            if tagger.ban_list_mut().pardon(fragment) {
                tagger.save_ban_list()?;
                println!("Removed: {fragment}");
            } else {
                println!("Not banned: {fragment}");
            }
        }
    }
    Ok(())
}
