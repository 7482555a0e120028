use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use hexamine::render::Canvas;
use hexamine::tui::{self, Action};
use hexamine::{Board, Difficulty, FlagCycle, GameConfig, GameState};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hexamine", about = "Minesweeper on a hexagonal board", version)]
struct Args {
    /// Launch TUI mode
    #[arg(long)]
    tui: bool,
    /// Board preset
    #[arg(long, value_enum, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,
    /// Board width, must be odd (overrides the preset)
    #[arg(long)]
    width: Option<u32>,
    /// Board height (overrides the preset)
    #[arg(long)]
    height: Option<u32>,
    /// Number of mines (overrides the preset)
    #[arg(long)]
    mines: Option<u32>,
    /// Cycle flags without question marks
    #[arg(long)]
    no_question_marks: bool,
    /// Seed (0 = random)
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Write logs to this file (the only log sink in TUI mode)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> hexamine::Result<GameConfig> {
        let preset = self.difficulty.config();
        let flag_cycle = if self.no_question_marks { FlagCycle::Simple } else { FlagCycle::WithQuestion };
        let config = GameConfig::new(
            self.width.unwrap_or(preset.width),
            self.height.unwrap_or(preset.height),
            self.mines.unwrap_or(preset.mines),
        )?;
        Ok(config.with_flag_cycle(flag_cycle))
    }
}

fn init_logging(log_file: Option<&PathBuf>, tui: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match log_file {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None if !tui => tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init(),
        None => {}
    }
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  o x y   - open the tile at column x, row y (as labelled); on an open tile, chord");
    println!("  f x y   - cycle flag / question mark at x, y");
    println!("  q       - quit");
    println!("  h/help  - show this help");
}

fn parse_cell(parts: &[&str]) -> Option<(u16, u16)> {
    let x = parts.get(1)?.parse().ok()?;
    let y = parts.get(2)?.parse().ok()?;
    Some((x, y))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref(), args.tui)?;
    let config = args.config().context("invalid board configuration")?;
    tracing::debug!(?config, seed = args.seed, "starting game");

    if args.tui {
        return tui::run_tui(config, args.seed);
    }

    let mut board = Board::new(config, args.seed)?;
    let canvas = Canvas::fit(&board);

    println!(
        "HexaMine {}x{} ({} tiles) with {} mines{}",
        config.width,
        config.height,
        config.total_tiles(),
        config.mines,
        if args.seed != 0 { format!(" (seed {})", args.seed) } else { String::new() }
    );
    print_help();

    let mut input = String::new();
    loop {
        println!("\n{}", canvas.render(&board));
        println!("Mines left: {}", board.estimated_mines_remaining());
        match board.state() {
            GameState::Lost => { println!("Boom! You hit a mine. Game over."); break; }
            GameState::Won => { println!("Congratulations! You cleared the board!"); break; }
            GameState::Ready | GameState::Playing => {}
        }

        print!("> ");
        let _ = io::stdout().flush();
        input.clear();
        if io::stdin().read_line(&mut input)? == 0 { break; }
        let line = input.trim();
        if line.is_empty() { continue; }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let action = match parts[0].to_lowercase().as_str() {
            "q" | "quit" | "exit" => break,
            "h" | "help" => { print_help(); continue; }
            "o" | "open" => Action::Open,
            "f" | "flag" => Action::Flag,
            other => { println!("Unknown command '{}'. Type 'h' for help.", other); continue; }
        };
        let Some((x, y)) = parse_cell(&parts) else { println!("Usage: {} x y", parts[0]); continue; };
        let Some(coord) = canvas.pick(&board, x, y) else { println!("No tile at column {}, row {}", x, y); continue; };
        tui::play(&mut board, action, coord)?;
    }
    Ok(())
}
