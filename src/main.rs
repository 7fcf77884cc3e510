//! sweeptui: Minesweeper in the terminal.

mod app;
mod error;
mod game;
mod grab;
mod grid;
mod input;
mod logging;
mod session;
mod terminal;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};
use game::{BOARD_HEIGHT, BOARD_MINES, BOARD_WIDTH, Minesweeper};
use std::path::PathBuf;
use std::time::Instant;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref(), &args.log_level)?;
    tracing::info!(?args, "starting");

    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "theme not loaded, using defaults");
        theme::Theme::default_for_palette(args.palette)
    });
    let game = Minesweeper::new(BOARD_WIDTH, BOARD_HEIGHT, BOARD_MINES, args.seed)?;
    let mut app = App::new(game, theme, Instant::now());
    app.run()
}

/// Minesweeper in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "sweeptui",
    version,
    about = "Minesweeper in the terminal.",
    long_about = "sweeptui is a terminal Minesweeper on a 32x16 board with 100 mines. \
        The first cell you clear is always safe, and so are its neighbours.\n\n\
        CONTROLS:\n  W A S D  Move the cursor   J  Clear a cell   K  Flag a cell\n  \
        N        New game           P  Pause          Q  Quit   ?  Help\n\n\
        Clearing an uncovered number whose flags are all placed clears the rest of its \
        neighbours. Use --theme to load a btop-style theme (e.g. onedark.theme)."
)]
pub struct Args {
    /// Seed for mine placement. Random if not set.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Write a log to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level or filter directive. SWEEPTUI_LOG takes precedence.
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["sweeptui"]).unwrap();
        assert_eq!(args.seed, None);
        assert_eq!(args.palette, Palette::Normal);
        assert_eq!(args.log_level, "info");
        assert!(args.log_file.is_none());
    }

    #[test]
    fn test_palette_aliases() {
        let args = Args::try_parse_from(["sweeptui", "--palette", "contrast", "--seed", "9"])
            .unwrap();
        assert_eq!(args.palette, Palette::HighContrast);
        assert_eq!(args.seed, Some(9));
    }
}
