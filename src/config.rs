use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::store::NoteColor;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub color: Option<NoteColor>,
    pub no_sidebar: bool,
    pub no_confirm: bool,
    pub theme: Option<ThemeMode>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: switches are OR-ed, options take `other`'s
    /// value when it has one.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            color: other.color.or(self.color),
            no_sidebar: self.no_sidebar || other.no_sidebar,
            no_confirm: self.no_confirm || other.no_confirm,
            theme: other.theme.or(self.theme),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("easynotes").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("easynotes")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("easynotes").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("easynotes")
                .join("config");
        }
    }

    PathBuf::from(".easynotesrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".easynotesrc")
}

/// Read flag tokens from a config file. A missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write `flags` as a config file, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# easynotes defaults (saved with --save)".to_string());
    if let Some(color) = flags.color {
        let value = color
            .name()
            .map_or_else(|| color.to_string(), str::to_string);
        lines.push(format!("--color {value}"));
    }
    if flags.no_sidebar {
        lines.push("--no-sidebar".to_string());
    }
    if flags.no_confirm {
        lines.push("--no-confirm".to_string());
    }
    if let Some(theme) = flags.theme {
        lines.push(format!("--theme {}", theme.as_str()));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove a saved config file if present.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick known flags out of a token list, skipping anything else.
///
/// Values that fail to parse are dropped with a warning rather than
/// failing startup.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--no-sidebar" {
            flags.no_sidebar = true;
        } else if token == "--no-confirm" {
            flags.no_confirm = true;
        } else if token == "--color" {
            if let Some(next) = tokens.get(i + 1) {
                flags.color = parse_color(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--color=") {
            flags.color = parse_color(value);
        } else if token == "--theme" {
            if let Some(next) = tokens.get(i + 1) {
                flags.theme = parse_theme(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--theme=") {
            flags.theme = parse_theme(value);
        } else if token == "--log-file" {
            if let Some(next) = tokens.get(i + 1) {
                flags.log_file = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--log-file=") {
            flags.log_file = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

fn parse_color(s: &str) -> Option<NoteColor> {
    s.parse()
        .inspect_err(|err| tracing::warn!(value = s, %err, "ignoring config color"))
        .ok()
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "auto" => Some(ThemeMode::Auto),
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}
