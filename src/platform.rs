/// Narrow interfaces to the platform services the game loop calls.
///
/// The simulation never owns a device.  Per frame the loop drains input,
/// issues draw calls in a fixed order, fires sound cues and waits on the
/// pacer.

use std::thread;
use std::time::{Duration, Instant};

use crate::error::PlatformError;
use crate::geometry::Rect;
use crate::sprites::{SoundId, SpriteId};

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    Confirm,
    Fire,
    /// Anything the key map does not recognise.  Always a no-op.
    Other,
}

/// Continuous key state sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
}

pub trait InputSource {
    /// Next pending discrete event, or `None` once the queue is drained.
    fn next_event(&mut self) -> Result<Option<InputEvent>, PlatformError>;

    fn held(&self) -> HeldKeys;
}

// ── Rendering ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Anchor point in world pixels.  With `Align::Right` the text ends at `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextPos {
    pub x: i32,
    pub y: i32,
    pub align: Align,
}

pub trait Renderer {
    fn clear(&mut self) -> Result<(), PlatformError>;
    fn draw_sprite(&mut self, footprint: Rect, sprite: SpriteId) -> Result<(), PlatformError>;
    fn draw_text(&mut self, text: &str, size: FontSize, at: TextPos) -> Result<(), PlatformError>;
    fn present(&mut self) -> Result<(), PlatformError>;
}

// ── Audio ─────────────────────────────────────────────────────────────────────

/// Fire-and-forget playback.  Implementations swallow their own failures.
pub trait Audio {
    fn play(&mut self, sound: SoundId);
}

impl<A: Audio + ?Sized> Audio for Box<A> {
    fn play(&mut self, sound: SoundId) {
        (**self).play(sound);
    }
}

pub struct Mute;

impl Audio for Mute {
    fn play(&mut self, _sound: SoundId) {}
}

// ── Pacing ────────────────────────────────────────────────────────────────────

pub trait Pacer {
    /// Block until the current frame's budget at `target_rate` Hz is spent.
    fn tick(&mut self, target_rate: u32);
}

/// Sleeps away whatever is left of each frame.
pub struct FrameClock {
    frame_start: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        FrameClock {
            frame_start: Instant::now(),
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Pacer for FrameClock {
    fn tick(&mut self, target_rate: u32) {
        let budget = Duration::from_secs(1) / target_rate.max(1);
        let elapsed = self.frame_start.elapsed();
        if elapsed < budget {
            thread::sleep(budget - elapsed);
        }
        self.frame_start = Instant::now();
    }
}
