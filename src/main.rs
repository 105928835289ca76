//! Incipit - A terminal pager for markdown.
//!
//! # Usage
//!
//! ```bash
//! incipit README.md
//! incipit --light README.md
//! incipit --no-pager README.md > out.txt
//! ```

use std::io::{ErrorKind, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use incipit::app::App;
use incipit::config::{
    ConfigFlags, ThemeChoice, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use incipit::document::render_markdown;
use incipit::perf;
use incipit::theme::{Theme, no_color_requested};

/// Width used when writing straight to stdout.
const PLAIN_OUTPUT_WIDTH: u16 = 80;

/// A terminal pager for markdown
#[derive(Parser, Debug)]
#[command(name = "incipit", version, about, long_about = None)]
struct Cli {
    /// Markdown file to view
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Use the dark theme (default)
    #[arg(long)]
    dark: bool,

    /// Use the light theme
    #[arg(long)]
    light: bool,

    /// Print the rendered document instead of opening the pager
    #[arg(long)]
    no_pager: bool,

    /// Render without colors
    #[arg(long)]
    no_color: bool,

    /// Enable performance logging
    #[arg(long)]
    perf: bool,

    /// Write pager debug events to a file
    #[arg(long, value_name = "PATH", env = "INCIPIT_RENDER_DEBUG_LOG")]
    render_debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
        // --help and --version
        Err(err) => err.exit(),
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("incipit: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli_flags = parse_flag_tokens(&raw_args);
    if cli_flags.has_theme_conflict() {
        anyhow::bail!("--dark and --light are mutually exclusive");
    }
    let effective = effective_flags(cli, &cli_flags)?;

    perf::set_enabled(effective.perf);
    if let Err(err) = perf::set_debug_log_path(effective.render_debug_log.as_deref()) {
        tracing::warn!(
            path = %effective
                .render_debug_log
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            %err,
            "failed to initialize render debug log"
        );
    }

    let source = read_document(&cli.file)?;
    let no_color_env = std::env::var("NO_COLOR").ok();
    let theme = Theme::resolve(
        effective.theme_choice() == Some(ThemeChoice::Light),
        effective.no_color || no_color_requested(no_color_env.as_deref()),
    );
    tracing::debug!(%theme, file = %cli.file.display(), "starting");

    if effective.no_pager || !std::io::stdout().is_terminal() {
        let rendered = render_markdown(&source, theme, PLAIN_OUTPUT_WIDTH);
        write_plain(&mut std::io::stdout().lock(), &rendered)
            .context("Failed to write to stdout")?;
        return Ok(());
    }

    App::new(cli.file.clone(), source)
        .with_theme(theme)
        .run()
        .context("Application error")
}

/// Global and local rc files, then the command line on top.
fn effective_flags(cli: &Cli, cli_flags: &ConfigFlags) -> Result<ConfigFlags> {
    let global_path = global_config_path();
    let local_path = local_override_path();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let mut effective = file_flags.union(cli_flags);
    // The env var is not among the raw tokens.
    if effective.render_debug_log.is_none() {
        effective.render_debug_log.clone_from(&cli.render_debug_log);
    }
    Ok(effective)
}

/// Write the rendered document. A reader that went away (`| head`) is not
/// an error.
fn write_plain(out: &mut impl Write, rendered: &str) -> std::io::Result<()> {
    match out.write_all(rendered.as_bytes()).and_then(|()| out.flush()) {
        Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

fn read_document(path: &Path) -> Result<String> {
    let _scope = perf::scope("app.read_file");
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
