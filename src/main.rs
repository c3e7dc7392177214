//! Bossworks - Arena viewer
//!
//! Runs one boss encounter against the sandbox collaborators in the
//! terminal.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use bossworks::data::export_default_tunings;
use bossworks::ui::{App, Session};
use bossworks::{BossKind, BossTunings, Difficulty};

/// Target frames per second for the encounter loop
const TARGET_FPS: u64 = 60;
const FRAME_TIME: Duration = Duration::from_millis(1000 / TARGET_FPS);

#[derive(Parser, Debug)]
#[command(name = "bossworks")]
#[command(about = "Run a boss encounter in the terminal")]
#[command(version)]
struct Args {
    /// Boss to fight
    #[arg(value_enum, default_value_t = BossKind::Eldritch, ignore_case = true)]
    boss: BossKind,

    /// Boss health and regeneration scaling
    #[arg(short, long, value_enum, default_value_t = Difficulty::Normal, ignore_case = true)]
    difficulty: Difficulty,

    /// Write encounter events to this file as JSON lines
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Write the default tunings to DIR/bosses.ron and exit
    #[arg(long, value_name = "DIR")]
    export_tunings: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(dir) = &args.export_tunings {
        let path = export_default_tunings(dir)?;
        println!("Wrote default tunings to {}", path.display());
        return Ok(());
    }

    // Log to a file so the TUI stays clean
    if let Ok(log_file) = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("bossworks.log")
    {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .init();
    }

    log::info!("Starting Bossworks v{}", env!("CARGO_PKG_VERSION"));

    let tunings = BossTunings::load_or_default(Path::new("."));
    let trace: Option<Box<dyn Write>> = match &args.trace {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("could not create trace file {}", path.display()))?;
            Some(Box::new(BufWriter::new(file)))
        }
        None => None,
    };
    let session = Session::new(args.boss, args.difficulty, &tunings, trace)?;
    let mut app = App::new(session);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        log::error!("Viewer exited with error: {}", e);
        eprintln!("Error: {}", e);
    }

    log::info!("Bossworks shut down cleanly");
    result
}

/// Main encounter loop
fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let delta = frame_start.duration_since(last_frame);
        last_frame = frame_start;

        if event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events, not releases
                if key.kind == KeyEventKind::Press {
                    match app.handle_input(key) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => log::warn!("Input handling error: {}", e),
                    }
                }
            }
        }

        app.update(delta.as_secs_f32())?;

        terminal.draw(|frame| {
            app.render(frame);
        })?;

        // Frame rate limiting
        let frame_time = frame_start.elapsed();
        if frame_time < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - frame_time);
        }
    }

    Ok(())
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
        let args = Args::try_parse_from(["bossworks"]).expect("defaults should parse");
        assert_eq!(args.boss, BossKind::Eldritch);
        assert_eq!(args.difficulty, Difficulty::Normal);
        assert!(args.trace.is_none());
    }

    #[test]
    fn test_boss_and_flags() {
        let args = Args::try_parse_from(["bossworks", "egg", "--difficulty", "very-hard", "--trace", "out.jsonl"])
            .expect("should parse");
        assert_eq!(args.boss, BossKind::Conservatory);
        assert_eq!(args.difficulty, Difficulty::VeryHard);
        assert_eq!(args.trace, Some(PathBuf::from("out.jsonl")));
    }

    #[test]
    fn test_unknown_boss_is_rejected() {
        assert!(Args::try_parse_from(["bossworks", "dragon"]).is_err());
    }
}
