use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        MouseButton, MouseEventKind,
    },
    execute, terminal,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::{self, Write, stdout};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use flappy_power::audio::Sounds;
use flappy_power::render::{self, PixelBuf};
use flappy_power::storage::{self, BestScoreStore};
use flappy_power::{GameConfig, GameEvent, GameSession, Mode};

/// Render cadence (~30 fps). The simulation steps at its own fixed rate.
const FRAME: Duration = Duration::from_millis(33);

enum Action {
    Flap,
    TogglePause,
    Quit,
    Resize(u16, u16),
}

fn map_event(ev: Event) -> Option<Action> {
    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => Some(Action::Flap),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::TogglePause),
            _ => None,
        },
        Event::Mouse(m) if m.kind == MouseEventKind::Down(MouseButton::Left) => {
            Some(Action::Flap)
        }
        Event::Resize(c, r) => Some(Action::Resize(c, r)),
        _ => None,
    }
}

fn open_store() -> Option<BestScoreStore> {
    match BestScoreStore::open_default() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(error = %e, "best score will not be saved");
            None
        }
    }
}

fn run(out: &mut impl Write) -> io::Result<()> {
    let mut rng = StdRng::from_entropy();
    let store = open_store();
    let best = store.as_ref().map_or(0, BestScoreStore::load);

    let mut game = GameSession::new(GameConfig::default(), best, &mut rng)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let sounds = Sounds::open();

    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);

    let mut tick: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            match map_event(event::read()?) {
                Some(Action::Quit) => return Ok(()),
                Some(Action::Flap) => {
                    if game.flap(&mut rng) {
                        sounds.flap();
                    }
                }
                Some(Action::TogglePause) => {
                    game.toggle_pause();
                }
                Some(Action::Resize(c, r)) => buf.resize(c as usize, r as usize * 2),
                None => {}
            }
        }

        let now = Instant::now();
        for ev in game.advance(now - last, &mut rng) {
            sounds.event(&ev);
            if let GameEvent::NewBest { best } = ev {
                if let Some(store) = &store {
                    if let Err(e) = store.save(best) {
                        warn!(error = %e, best, "could not save best score");
                    }
                }
            }
        }
        last = now;

        if matches!(game.mode(), Mode::Idle | Mode::Playing) {
            tick += 1;
        }
        render::draw(&game, tick, &mut buf);
        buf.render(out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

fn main() -> io::Result<()> {
    match storage::data_dir() {
        Ok(dir) => {
            if let Err(e) = flappy_power::logging::init(&dir) {
                eprintln!("logging disabled: {e}");
            }
        }
        Err(e) => eprintln!("logging disabled: {e}"),
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )?;

    let result = run(&mut out);

    execute!(
        out,
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode()?;

    if let Err(e) = &result {
        error!(error = %e, "exited with error");
    }
    info!("bye");
    result
}
