//! easynotes - A terminal note-taking app with a rich-text editor.
//!
//! # Usage
//!
//! ```bash
//! easynotes
//! easynotes --color yellow --no-confirm
//! easynotes --theme light --save
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use easynotes::app::App;
use easynotes::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, save_config_flags,
};
use easynotes::store::NoteColor;
use easynotes::ui::style::Theme;

/// A terminal note-taking app with a rich-text editor
#[derive(Parser, Debug)]
#[command(name = "easynotes", version, about, long_about = None)]
struct Cli {
    /// Default color for new notes (#rrggbb, #rgb or a palette name)
    #[arg(long, value_name = "COLOR")]
    color: Option<NoteColor>,

    /// Start with the notes list hidden
    #[arg(long)]
    no_sidebar: bool,

    /// Delete notes without asking for confirmation
    #[arg(long)]
    no_confirm: bool,

    /// Color theme; auto (the default) reads COLORFGBG
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Write logs to a file (also EASYNOTES_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults in the global config
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in the global config
    #[arg(long)]
    clear: bool,
}

/// Logs go to a file when one is configured, since the TUI owns the
/// terminal. Otherwise only warnings reach stderr, before startup.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_env("EASYNOTES_LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new("easynotes=debug"));
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
                )
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        color: cli.color,
        no_sidebar: cli.no_sidebar,
        no_confirm: cli.no_confirm,
        theme: cli.theme,
        log_file: cli.log_file.clone(),
    };

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let log_file = effective
        .log_file
        .clone()
        .or_else(|| std::env::var_os("EASYNOTES_LOG").map(PathBuf::from));
    init_logging(log_file.as_deref())?;
    tracing::debug!(?effective, "effective flags");

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
        tracing::info!(path = %global_path.display(), "saved defaults");
    }

    let theme = Theme::for_mode(effective.theme.unwrap_or(ThemeMode::Auto));

    // Run the application
    let mut app = App::new()
        .with_default_color(effective.color.unwrap_or(NoteColor::WHITE))
        .with_sidebar_visible(!effective.no_sidebar)
        .with_confirm_delete(!effective.no_confirm)
        .with_theme(theme)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
