mod display;

use std::fs::{File, OpenOptions};
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal, ExecutableCommand, QueueableCommand,
};
use log::{debug, info};
use rand::thread_rng;

use ball_game::compute::{handle_event, init_state, tick};
use ball_game::consts::FPS;
use ball_game::entities::{GameEvent, Key};
use ball_game::surface::Canvas;

const FRAME: Duration = Duration::from_millis(1000 / FPS); // 25 FPS

const TITLE: &str = "Ball Game";

// ── Input translation ─────────────────────────────────────────────────────────

/// Map a terminal event onto the game's input vocabulary.  Pointer
/// positions are converted from cells to logical units via `canvas`.
fn translate(ev: &Event, canvas: &Canvas) -> Option<GameEvent> {
    match *ev {
        Event::Key(KeyEvent { code, kind: KeyEventKind::Press, modifiers, .. }) => match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(GameEvent::Quit),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(GameEvent::Quit)
            }
            KeyCode::Char('r') | KeyCode::Char('R') => Some(GameEvent::Key(Key::Reset)),
            KeyCode::Char(' ') => Some(GameEvent::Key(Key::TogglePause)),
            KeyCode::Enter => Some(GameEvent::Key(Key::Restart)),
            _ => None,
        },
        Event::Mouse(MouseEvent { kind, column, row, .. }) => {
            let (x, y) = canvas.cell_to_logical(column, row);
            match kind {
                MouseEventKind::Down(MouseButton::Left) => Some(GameEvent::PointerDown { x, y }),
                MouseEventKind::Up(MouseButton::Left) => Some(GameEvent::PointerUp { x, y }),
                _ => None,
            }
        }
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits or the input thread goes away.
///
/// Each frame drains all pending input, advances the simulation once,
/// renders, then sleeps out the rest of the frame budget.
fn game_loop<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let mut state = init_state(&mut rng);

    let (cols, rows) = terminal::size()?;
    let mut canvas = Canvas::for_terminal(cols, rows);

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        loop {
            match rx.try_recv() {
                Ok(Event::Resize(cols, rows)) => {
                    debug!("terminal resized to {}x{}", cols, rows);
                    canvas = Canvas::for_terminal(cols, rows);
                    out.queue(terminal::Clear(terminal::ClearType::All))?;
                }
                Ok(ev) => match translate(&ev, &canvas) {
                    Some(GameEvent::Quit) => return Ok(()),
                    Some(game_event) => state = handle_event(&state, &game_event, &mut rng),
                    None => {}
                },
                Err(TryRecvError::Empty) => break,
                // Reader thread died: the terminal is gone.
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }

        state = tick(&state, &mut rng);

        display::render(out, &mut canvas, &state)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Append mode: earlier sessions' logs are kept.
fn open_log(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// stdout belongs to the game screen, so logs go to a file.
fn init_logging() -> anyhow::Result<PathBuf> {
    let path = std::env::temp_dir().join("ball_game.log");
    let file = open_log(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(path)
}

fn setup_terminal<W: Write>(out: &mut W) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(terminal::SetTitle(TITLE))?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;
    Ok(())
}

fn restore_terminal<W: Write>(out: &mut W) {
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Dedicate a thread exclusively to blocking event reads, sending them
/// through a channel so the game loop never has to block on I/O.
fn spawn_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });
    rx
}

/// Raw mode and mouse capture must be on before the reader starts, or the
/// first events arrive in cooked mode.
fn start_session<W, S, R>(out: &mut W, setup: S, spawn: R) -> std::io::Result<mpsc::Receiver<Event>>
where
    S: FnOnce(&mut W) -> std::io::Result<()>,
    R: FnOnce() -> mpsc::Receiver<Event>,
{
    setup(out)?;
    Ok(spawn())
}

fn main() -> anyhow::Result<()> {
    let log_path = init_logging()?;
    info!("{} starting, logging to {}", TITLE, log_path.display());

    let mut out = BufWriter::new(stdout());

    let result = start_session(&mut out, setup_terminal, spawn_reader)
        .and_then(|rx| game_loop(&mut out, &rx));

    // Always restore the terminal
    restore_terminal(&mut out);

    info!("{} exiting", TITLE);
    result.context("terminal session failed")
}
