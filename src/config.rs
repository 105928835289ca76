//! Saved defaults ("rc files").
//!
//! A config file holds command-line flags, one or more per line. Blank lines
//! and lines starting with `#` are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Theme picked with `--dark` or `--light`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeChoice {
    Dark,
    Light,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub dark: bool,
    pub light: bool,
    pub no_pager: bool,
    pub no_color: bool,
    pub perf: bool,
    pub render_debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`.
    ///
    /// Booleans are OR-ed together, except the theme: if `other` names a
    /// theme it replaces whatever `self` had.
    pub fn union(&self, other: &Self) -> Self {
        let (dark, light) = if other.dark || other.light {
            (other.dark, other.light)
        } else {
            (self.dark, self.light)
        };
        Self {
            dark,
            light,
            no_pager: self.no_pager || other.no_pager,
            no_color: self.no_color || other.no_color,
            perf: self.perf || other.perf,
            render_debug_log: other
                .render_debug_log
                .clone()
                .or_else(|| self.render_debug_log.clone()),
        }
    }

    /// The chosen theme, or `None` when neither or both were given.
    pub const fn theme_choice(&self) -> Option<ThemeChoice> {
        match (self.dark, self.light) {
            (true, false) => Some(ThemeChoice::Dark),
            (false, true) => Some(ThemeChoice::Light),
            _ => None,
        }
    }

    /// True when both `--dark` and `--light` are set.
    pub const fn has_theme_conflict(&self) -> bool {
        self.dark && self.light
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("incipit").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("incipit")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("incipit").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("incipit")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".incipitrc")
}

/// Read flags from a config file. A missing file yields the defaults.
///
/// # Errors
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

/// Write flags to a config file, creating its directory if needed.
///
/// # Errors
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# incipit defaults (saved with --save)".to_string()];
    match flags.theme_choice() {
        Some(ThemeChoice::Dark) => lines.push("--dark".to_string()),
        Some(ThemeChoice::Light) => lines.push("--light".to_string()),
        None => {}
    }
    if flags.no_pager {
        lines.push("--no-pager".to_string());
    }
    if flags.no_color {
        lines.push("--no-color".to_string());
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.render_debug_log {
        lines.push(format!("--render-debug-log {}", path.display()));
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

/// Remove a config file if it exists.
///
/// # Errors
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the known flags out of a token list. Unknown tokens (including the
/// program name and the file argument) are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--dark" => flags.dark = true,
            "--light" => flags.light = true,
            "--no-pager" => flags.no_pager = true,
            "--no-color" => flags.no_color = true,
            "--perf" => flags.perf = true,
            "--render-debug-log" => {
                if let Some(next) = tokens.get(i + 1) {
                    flags.render_debug_log = Some(PathBuf::from(next));
                    i += 1;
                }
            }
            _ => {
                if let Some(value) = token.strip_prefix("--render-debug-log=") {
                    flags.render_debug_log = Some(PathBuf::from(value));
                }
            }
        }
        i += 1;
    }
    flags
}
