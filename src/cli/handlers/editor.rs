use std::path::Path;

use crate::cli::commands::{RecoveryArgs, ThemeArgs};
use crate::cli::output::*;
use crate::io::{config_io, recovery};
use crate::model::config::THEMES;

pub fn cmd_theme(
    args: ThemeArgs,
    config_dir: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let theme = match &args.name {
        Some(name) => {
            let theme = config_io::set_theme(config_dir, name)?;
            log::info!("theme set to {}", theme);
            theme.to_string()
        }
        None => config_io::read_config_from(config_dir).ui.theme,
    };

    if json {
        let out = ThemeJson {
            theme,
            available: if args.list { THEMES.to_vec() } else { Vec::new() },
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if args.list {
        for line in format_theme_list(&theme, THEMES) {
            println!("{}", line);
        }
    } else {
        println!("{}", theme);
    }
    Ok(())
}

pub fn cmd_recovery(
    args: RecoveryArgs,
    config_dir: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut entries = recovery::read_recovery_entries(config_dir);
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }

    if json {
        let out: Vec<_> = entries.iter().map(recovery_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("no unsaved documents in the recovery log");
        return Ok(());
    }
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            println!();
        }
        for line in format_recovery_entry(entry) {
            println!("{}", line);
        }
    }
    Ok(())
}
