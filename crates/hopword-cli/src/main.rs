//! hopword CLI entry point.

mod args;
mod term;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use hopword_core::config::{NavConfig, NavSettings};
use hopword_core::cursor::BufferCursor;
use hopword_core::labels::LabelAlphabet;
use hopword_core::overlay::TextRenderer;
use hopword_core::protocol::JumpReport;
use hopword_core::session::{NavSession, ScriptedKeys};
use hopword_core::word::Viewport;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Commands, JumpArgs, ViewArgs, WordsArgs};
use crate::term::{TerminalGuard, TerminalKeys, TerminalRenderer};

fn main() {
    // Logs go to stderr; stdout carries the UI and JSON output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Jump(args) => run_jump(args),
        Commands::Words(args) => run_words(args),
        Commands::Config(args) => {
            let config = NavConfig::load(args.config.as_deref())?;
            config.validate()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Commands::Examples => {
            println!("{}", crate::args::EXAMPLES_TEXT);
            Ok(())
        }
    }
}

/// Read the viewport slice of a file, along with the file's line count.
fn read_viewport(view: &ViewArgs, default_height: usize) -> anyhow::Result<(Viewport, usize)> {
    let text = std::fs::read_to_string(&view.file)
        .with_context(|| format!("Failed to read {}", view.file.display()))?;
    let height = view.height.unwrap_or(default_height);
    let viewport = Viewport::from_text(&text, view.top, height);
    Ok((viewport, text.lines().count()))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<NavConfig> {
    NavConfig::load(path).context("Failed to load configuration")
}

/// Apply command-line overrides on top of the loaded configuration.
fn jump_settings(args: &JumpArgs) -> anyhow::Result<NavSettings> {
    let mut config = load_config(args.config.config.as_deref())?;

    if let Some(labels) = &args.labels {
        // Validated here so the error names the flag's value
        LabelAlphabet::from_chars(labels)?;
        config.labels = labels.chars().map(String::from).collect();
    }
    if !args.matchers.is_empty() {
        config.matchers = args.matchers.clone();
    }
    if args.no_auto_jump {
        config.auto_jump = false;
    }
    if args.no_highlight {
        config.disable_match_highlight = true;
    }

    Ok(config.validate()?)
}

fn run_jump(args: JumpArgs) -> anyhow::Result<()> {
    let settings = jump_settings(&args)?;
    let default_height = match args.keys {
        Some(_) => usize::MAX,
        // Last row holds the prompt
        None => usize::from(term::screen_size().1.saturating_sub(1)),
    };
    let (viewport, total_lines) = read_viewport(&args.view, default_height)?;
    let mut cursor = BufferCursor::new(args.cursor).with_last_line(total_lines);
    debug!(
        "Viewport covers lines {}..={} of {}",
        viewport.first_line,
        viewport.last_line(),
        total_lines
    );

    let (outcome, frames) = match &args.keys {
        Some(keys) => {
            let mut keys = ScriptedKeys::parse(keys)?;
            let mut renderer = TextRenderer::new(viewport.clone());
            let outcome = NavSession::start(&settings, &viewport, &mut renderer, &mut cursor)
                .run(&mut keys)?;
            let frames = args.frames.then(|| renderer.into_frames());
            (outcome, frames)
        }
        None => {
            let renderer = TerminalRenderer::new(viewport.clone());
            let _guard = TerminalGuard::enter().context("Failed to set up the terminal")?;
            let outcome = NavSession::start(&settings, &viewport, renderer, &mut cursor)
                .run(&mut TerminalKeys)?;
            (outcome, None)
        }
    };

    if let Some(target) = outcome.target() {
        debug!("Jumped to {:?} via label {}", target.text, target.label);
    }

    let report = JumpReport {
        outcome,
        cursor: cursor.position(),
        jump_back: cursor.jump_back_mark(),
        frames,
    };
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

fn run_words(args: WordsArgs) -> anyhow::Result<()> {
    let settings = load_config(args.config.config.as_deref())?.validate()?;
    let (viewport, _) = read_viewport(&args.view, usize::MAX)?;
    let words = settings.extractor.extract(&viewport);
    println!("{}", serde_json::to_string_pretty(&words)?);
    Ok(())
}
