//! CLI argument parsing with clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hopword_core::word::Position;

/// Jump to any visible word in a couple of keystrokes.
///
/// Type a few characters of the word you want; every match gets a one-key
/// label. Press the label to move the cursor there. Labels stay put while
/// you keep typing.
#[derive(Debug, Parser)]
#[command(name = "hopword", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Label words in a file and jump to one
    #[command(after_long_help = "\
Keys:
  Printable characters  Extend the input (or pick a label)
  Backspace             Remove the last input character
  Ctrl+W                Clear the input
  Enter                 Jump to the first target
  Escape                Cancel

Scripted runs (--keys) print a JSON report instead of drawing.

Examples:
  hopword jump src/main.rs                          # Interactive, whole screen
  hopword jump src/main.rs --top 40 --height 20     # Lines 40..59 only
  hopword jump notes.txt --keys \"f o Enter\"         # Scripted: type fo, take first
  hopword jump notes.txt --keys \"f o a\" --frames    # Include every drawn frame
  hopword jump notes.txt --labels jkl --matcher linear")]
    Jump(JumpArgs),

    /// Print the words that would be candidates
    #[command(after_help = "\
Examples:
  hopword words src/main.rs                  # Whole file
  hopword words src/main.rs --top 10 -n 5    # Lines 10..14")]
    Words(WordsArgs),

    /// Print the effective configuration
    Config(ConfigArgs),

    /// Show an end-to-end usage example
    Examples,
}

#[derive(Debug, clap::Args)]
pub struct ViewArgs {
    /// File whose text is shown
    pub file: PathBuf,

    /// First visible line (1-based)
    #[arg(long, default_value_t = 1, value_name = "LINE")]
    pub top: usize,

    /// Number of visible lines [default: terminal height, or all lines when scripted]
    #[arg(short = 'n', long, value_name = "LINES")]
    pub height: Option<usize>,
}

#[derive(Debug, clap::Args)]
pub struct JumpArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Cursor position before the jump, as LINE:COL
    #[arg(long, value_parser = parse_position, default_value = "1:1")]
    pub cursor: Position,

    /// Run non-interactively with these keys (e.g. "f o Enter")
    #[arg(short, long)]
    pub keys: Option<String>,

    /// Label characters, overriding the configuration (e.g. "asdf")
    #[arg(long)]
    pub labels: Option<String>,

    /// Match engine to use, highest priority first (repeatable)
    #[arg(short, long = "matcher", value_name = "NAME")]
    pub matchers: Vec<String>,

    /// Never jump before a label or Enter is pressed
    #[arg(long)]
    pub no_auto_jump: bool,

    /// Do not highlight matched characters
    #[arg(long)]
    pub no_highlight: bool,

    /// Include every drawn frame in the scripted report
    #[arg(long, requires = "keys")]
    pub frames: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, clap::Args)]
pub struct WordsArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    /// Configuration file [default: $HOPWORD_CONFIG, then the user config dir]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

fn parse_position(s: &str) -> Result<Position, String> {
    let (line, col) = s
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COL, got '{}'", s))?;
    let line: usize = line
        .trim()
        .parse()
        .map_err(|e| format!("invalid line '{}': {}", line, e))?;
    let col: usize = col
        .trim()
        .parse()
        .map_err(|e| format!("invalid column '{}': {}", col, e))?;
    if line == 0 || col == 0 {
        return Err("line and column are 1-based".to_string());
    }
    Ok(Position::new(line, col))
}

/// End-to-end example text for the `examples` command.
pub const EXAMPLES_TEXT: &str = r#"End-to-end example: Jump around a small file

# 1. Create a file
printf 'let foo = food;\nfn far() {}\n' > /tmp/hop.txt

# 2. See which words can be targets
hopword words /tmp/hop.txt

# 3. Type "f", then "o": foo and food stay, each with a label
hopword jump /tmp/hop.txt --keys "f o" --frames

# 4. Pick the second one by its label
hopword jump /tmp/hop.txt --keys "f o s"
#    => {"outcome":"jumped","target":{"text":"food",...},"cursor":{"line":1,"col":11},...}

# 5. Enter takes the first target; Escape cancels
hopword jump /tmp/hop.txt --keys "f Enter"
hopword jump /tmp/hop.txt --keys "f Escape"

# 6. Interactive mode draws over the terminal
hopword jump /tmp/hop.txt

# Labels come from the config file's "labels" list or --labels:
hopword jump /tmp/hop.txt --labels jkl --keys "f o k"
"#;
