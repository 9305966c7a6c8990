//! Half-block pixel rendering of a session.
//!
//! The simulation runs on a fixed logical canvas; everything here scales it
//! to whatever the terminal offers (two pixels per character cell).

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

use crate::bird::Bird;
use crate::powerup::PowerupKind;
use crate::session::{GameSession, Mode};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }

    fn to_crossterm(self) -> CColor {
        CColor::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const SHIELD: Rgb = Rgb(0, 255, 255);
const SLOW: Rgb = Rgb(255, 255, 0);
const PANEL: Rgb = Rgb(220, 195, 120);
const PANEL_EDGE: Rgb = Rgb(210, 185, 110);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);

fn powerup_color(kind: PowerupKind) -> Rgb {
    match kind {
        PowerupKind::Shield => SHIELD,
        PowerupKind::SlowTime => SLOW,
    }
}

// ── Pixel buffer ────────────────────────────────────────────────────────────

pub struct PixelBuf {
    w: usize,
    /// Pixel rows: terminal rows * 2.
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h.max(0) {
            for dx in 0..w.max(0) {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    fn fill_ellipse(&mut self, cx: i32, cy: i32, rx: i32, ry: i32, c: Rgb) {
        let (rx, ry) = (rx.max(1), ry.max(1));
        for dy in -ry..=ry {
            for dx in -rx..=rx {
                let (fx, fy) = (dx as f64 / rx as f64, dy as f64 / ry as f64);
                if fx * fx + fy * fy <= 1.0 {
                    self.set(cx + dx, cy + dy, c);
                }
            }
        }
    }

    /// One-pixel outline of an ellipse.
    fn ring(&mut self, cx: i32, cy: i32, rx: i32, ry: i32, c: Rgb) {
        let (rx, ry) = (rx.max(1), ry.max(1));
        let steps = ((rx + ry) * 4).max(16);
        for i in 0..steps {
            let a = i as f64 / steps as f64 * std::f64::consts::TAU;
            let x = cx + (a.cos() * rx as f64).round() as i32;
            let y = cy + (a.sin() * ry as f64).round() as i32;
            self.set(x, y, c);
        }
    }

    fn darken(&mut self) {
        for p in &mut self.px {
            *p = p.dim();
        }
    }

    /// Emit the buffer as `▀` cells: foreground is the upper pixel,
    /// background the lower one. Colour changes are only sent when needed.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg: Option<Rgb> = None;
        let mut prev_bg: Option<Rgb> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if prev_bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(bot.to_crossterm()))?;
                    prev_bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                    continue;
                }
                if prev_fg != Some(top) {
                    queue!(out, style::SetForegroundColor(top.to_crossterm()))?;
                    prev_fg = Some(top);
                }
                queue!(out, style::Print('\u{2580}'))?;
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                prev_fg = None;
                prev_bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

// ── 3x5 bitmap digits ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

fn draw_digit(buf: &mut PixelBuf, x: i32, y: i32, d: u8, fg: Rgb) {
    let glyph = &DIGITS[d as usize];
    for row in 0..5 {
        for col in 0..3 {
            if glyph[row * 3 + col] == 1 {
                let px = x + col as i32;
                let py = y + row as i32;
                buf.set(px + 1, py + 1, SHADOW);
                buf.set(px, py, fg);
            }
        }
    }
}

/// Pixel width of `n` drawn with `draw_number`.
fn number_width(n: u32) -> i32 {
    n.to_string().len() as i32 * 4 - 1
}

/// Draw `n` starting at `x` (left aligned).
fn draw_number(buf: &mut PixelBuf, x: i32, y: i32, n: u32, fg: Rgb) {
    for (i, ch) in n.to_string().bytes().enumerate() {
        draw_digit(buf, x + i as i32 * 4, y, ch - b'0', fg);
    }
}

fn draw_number_centered(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb) {
    draw_number(buf, cx - number_width(n) / 2, y, n, fg);
}

// ── Scene ───────────────────────────────────────────────────────────────────

/// Maps canvas units onto buffer pixels.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    sx: f64,
    sy: f64,
}

impl Viewport {
    fn new(buf: &PixelBuf, session: &GameSession) -> Self {
        let c = session.config();
        Self {
            sx: buf.width() as f64 / c.canvas_width,
            sy: buf.height() as f64 / c.canvas_height,
        }
    }

    fn x(&self, v: f64) -> i32 {
        (v * self.sx).floor() as i32
    }

    fn y(&self, v: f64) -> i32 {
        (v * self.sy).floor() as i32
    }

    fn w(&self, v: f64) -> i32 {
        ((v * self.sx).round() as i32).max(1)
    }

    fn h(&self, v: f64) -> i32 {
        ((v * self.sy).round() as i32).max(1)
    }
}

/// Draw a full frame. `tick` counts rendered frames and drives the
/// background scroll and wing animation.
pub fn draw(session: &GameSession, tick: u64, buf: &mut PixelBuf) {
    if buf.width() == 0 || buf.height() < 2 {
        return;
    }
    let vp = Viewport::new(buf, session);

    draw_sky(buf);
    draw_hills(buf, &vp, session, tick);
    if session.mode() != Mode::Idle {
        draw_pipes(buf, &vp, session);
        draw_powerups(buf, &vp, session);
    }
    draw_bird(buf, &vp, session, tick);
    draw_hud(buf, session);

    match session.mode() {
        Mode::Idle => draw_title(buf),
        Mode::Paused => draw_paused(buf),
        Mode::GameOver => draw_game_over(buf, session),
        Mode::Playing => {}
    }
}

fn draw_sky(buf: &mut PixelBuf) {
    let h = buf.height();
    for y in 0..h {
        let t = (y * 256 / h.max(1)) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in 0..buf.width() {
            buf.set(x as i32, y as i32, c);
        }
    }
}

fn draw_hills(buf: &mut PixelBuf, vp: &Viewport, session: &GameSession, tick: u64) {
    // The backdrop drifts at half the scroll speed.
    let offset = tick as f64 * session.scroll_speed() / 2.0 * vp.sx;
    let base = buf.height() as i32;
    let scale = vp.sy * 10.0;
    for x in 0..buf.width() as i32 {
        let fx = (x as f64 + offset * 0.5) * 0.04;
        let h = (fx.sin() * 6.0 + (fx * 1.7).sin() * 3.0 + 10.0) * scale;
        for y in (base - h as i32)..base {
            buf.set(x, y, HILL_FAR);
        }
    }
    for x in 0..buf.width() as i32 {
        let fx = (x as f64 + offset) * 0.06;
        let h = (fx.sin() * 4.0 + (fx * 2.3).sin() * 2.0 + 6.0) * scale;
        for y in (base - h as i32)..base {
            buf.set(x, y, HILL_NEAR);
        }
    }
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

fn draw_pipes(buf: &mut PixelBuf, vp: &Viewport, session: &GameSession) {
    let config = session.config();
    let pw = vp.w(config.pipe_width);
    let cap_extra = (pw / 8).max(1);
    let cap_h = vp.h(24.0).max(2);
    let bottom = buf.height() as i32;

    for o in &session.obstacles {
        let top = o.top_pipe(config);
        let lower = o.bottom_pipe(config);
        let px = vp.x(top.left());
        let gap_top = vp.y(top.bottom());
        let gap_bot = vp.y(lower.top());

        for x in 0..pw {
            let c = pipe_shade(x, pw);
            for y in 0..gap_top {
                buf.set(px + x, y, c);
            }
            for y in gap_bot..bottom {
                buf.set(px + x, y, c);
            }
        }

        // Caps facing the gap
        let cap_w = pw + cap_extra * 2;
        for x in 0..cap_w {
            let c = pipe_shade(x, cap_w);
            let cx = px - cap_extra + x;
            for y in (gap_top - cap_h)..gap_top {
                buf.set(cx, y, c);
            }
            for y in gap_bot..(gap_bot + cap_h) {
                buf.set(cx, y, c);
            }
            buf.set(cx, gap_top - 1, CAP_DARK);
            buf.set(cx, gap_bot, CAP_DARK);
        }
    }
}

fn draw_powerups(buf: &mut PixelBuf, vp: &Viewport, session: &GameSession) {
    for p in &session.powerups.active {
        let r = p.size / 2.0;
        buf.fill_ellipse(
            vp.x(p.x + r),
            vp.y(p.y + r),
            vp.w(r),
            vp.h(r),
            powerup_color(p.kind),
        );
    }
}

fn draw_bird(buf: &mut PixelBuf, vp: &Viewport, session: &GameSession, tick: u64) {
    let bird = &session.bird;
    let x = vp.x(bird.x);
    let y = vp.y(bird.y);
    let w = vp.w(bird.width);
    let h = vp.h(bird.height);

    buf.fill_rect(x, y, w, h, BIRD_Y);
    buf.fill_rect(x + 1, y, (w - 2).max(1), (h / 4).max(1), BIRD_HI);

    // Wing: up, level, down
    let wing_h = (h / 3).max(1);
    let wing_y = match Bird::sprite_frame(tick) {
        0 => y + h / 4 - wing_h / 2,
        1 => y + h / 2 - wing_h / 2,
        _ => y + h * 3 / 4 - wing_h / 2,
    };
    buf.fill_rect(x + 1, wing_y, (w / 3).max(1), wing_h, BIRD_WING);

    let eye = (w / 6).max(1);
    let ex = x + w - eye * 2;
    let ey = y + (h / 5).max(1);
    buf.fill_rect(ex, ey, eye + 1, eye, BIRD_EYE);
    buf.set(ex + eye, ey + eye - 1, BIRD_PUPIL);

    let beak_w = (w / 4).max(1);
    buf.fill_rect(x + w, y + h / 2, beak_w, (h / 4).max(1), BIRD_BEAK);

    if bird.has_shield {
        let r = bird.width.max(bird.height);
        buf.ring(
            vp.x(bird.x + bird.width / 2.0),
            vp.y(bird.y + bird.height / 2.0),
            vp.w(r),
            vp.h(r),
            SHIELD,
        );
    }
}

fn draw_hud(buf: &mut PixelBuf, session: &GameSession) {
    let w = buf.width() as i32;
    draw_number_centered(buf, w / 2, 2, session.score, WHITE);

    let best_x = w - number_width(session.best_score) - 3;
    draw_number(buf, best_x, 2, session.best_score, BIRD_Y);

    // Remaining time of each running effect as a shrinking bar
    let mut bar_y = 2;
    for kind in PowerupKind::ALL {
        if let Some(left) = session.effects.remaining(kind, session.frame) {
            let total = match kind {
                PowerupKind::Shield => session.config().steps_for(session.config().shield_duration),
                PowerupKind::SlowTime => {
                    session.config().steps_for(session.config().slow_time_duration)
                }
            };
            let len = (left as f64 / total.max(1) as f64 * 20.0).ceil() as i32;
            buf.fill_rect(2, bar_y, len, 2, powerup_color(kind));
            bar_y += 4;
        }
    }
}

fn draw_panel(buf: &mut PixelBuf, w: i32, h: i32) -> (i32, i32) {
    let px = buf.width() as i32 / 2 - w / 2;
    let py = buf.height() as i32 / 2 - h / 2;
    buf.fill_rect(px - 1, py - 1, w + 2, h + 2, SHADOW);
    buf.fill_rect(px, py, w, h, PANEL_EDGE);
    buf.fill_rect(px + 1, py + 1, w - 2, h - 2, PANEL);
    (px, py)
}

fn draw_title(buf: &mut PixelBuf) {
    let cx = buf.width() as i32 / 2;
    let cy = buf.height() as i32 / 4;
    let char_w = (buf.width() as i32 / 20).clamp(3, 8);
    let char_h = char_w * 3 / 2;
    let letters = 6;
    let sx = cx - letters * char_w / 2;
    for i in 0..letters {
        let bx = sx + i * char_w;
        buf.fill_rect(bx, cy, char_w - 1, char_h, BIRD_Y);
        buf.fill_rect(bx, cy, char_w - 1, 1, BIRD_HI);
    }
    // One dot per power-up kind under the title
    let dy = cy + char_h + 4;
    buf.fill_ellipse(cx - 4, dy, 2, 2, SHIELD);
    buf.fill_ellipse(cx + 4, dy, 2, 2, SLOW);
}

fn draw_paused(buf: &mut PixelBuf) {
    buf.darken();
    let (px, py) = draw_panel(buf, 16, 14);
    buf.fill_rect(px + 4, py + 3, 3, 8, WHITE);
    buf.fill_rect(px + 9, py + 3, 3, 8, WHITE);
}

fn draw_game_over(buf: &mut PixelBuf, session: &GameSession) {
    buf.darken();
    let cx = buf.width() as i32 / 2;
    let (_, py) = draw_panel(buf, 30, 20);
    draw_number_centered(buf, cx, py + 4, session.score, WHITE);
    draw_number_centered(buf, cx, py + 12, session.best_score, BIRD_Y);
}
