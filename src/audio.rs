//! Sound effects.
//!
//! Every effect is a short run of sine tones appended to a detached sink, so
//! playback never blocks the frame loop.

use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::warn;

use crate::powerup::PowerupKind;
use crate::session::GameEvent;

/// (frequency Hz, length ms, gain)
type Note = (f32, u64, f32);

const FLAP: &[Note] = &[(520.0, 40, 0.08), (700.0, 30, 0.06)];
const SCORE: &[Note] = &[(880.0, 60, 0.08), (1320.0, 90, 0.08)];
const SHIELD_UP: &[Note] = &[(440.0, 60, 0.1), (660.0, 60, 0.1), (990.0, 120, 0.1)];
const SLOW_DOWN: &[Note] = &[(990.0, 80, 0.1), (660.0, 80, 0.1), (330.0, 160, 0.1)];
const EXPIRED: &[Note] = &[(300.0, 80, 0.05)];
/// Falling sweep, roughly 400 Hz down to 80 Hz over half a second.
const DEATH: &[Note] = &[
    (400.0, 80, 0.15),
    (300.0, 80, 0.12),
    (200.0, 100, 0.09),
    (120.0, 110, 0.06),
    (80.0, 130, 0.03),
];

pub struct Sounds {
    stream: Option<OutputStream>,
}

impl Sounds {
    /// Open the default output device. Without one the game runs silent.
    pub fn open() -> Self {
        match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => Self {
                stream: Some(stream),
            },
            Err(e) => {
                warn!(error = %e, "no audio output, sound disabled");
                Self::muted()
            }
        }
    }

    pub fn muted() -> Self {
        Self { stream: None }
    }

    fn play(&self, notes: &[Note]) {
        let Some(stream) = &self.stream else {
            return;
        };
        let sink = Sink::connect_new(stream.mixer());
        for &(freq, ms, gain) in notes {
            sink.append(
                SineWave::new(freq)
                    .take_duration(Duration::from_millis(ms))
                    .amplify(gain),
            );
        }
        sink.detach();
    }

    pub fn flap(&self) {
        self.play(FLAP);
    }

    pub fn event(&self, event: &GameEvent) {
        match event {
            GameEvent::Scored { .. } => self.play(SCORE),
            GameEvent::PowerupCollected(PowerupKind::Shield) => self.play(SHIELD_UP),
            GameEvent::PowerupCollected(PowerupKind::SlowTime) => self.play(SLOW_DOWN),
            GameEvent::PowerupExpired(_) => self.play(EXPIRED),
            GameEvent::Crashed { .. } => self.play(DEATH),
            GameEvent::NewBest { .. } => {}
        }
    }
}
