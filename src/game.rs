/// Frame orchestration.
///
/// One frame: drain input events → sample held keys → (PLAYING only)
/// step the world and run the end check → play queued sound cues →
/// render → present.  `run` repeats that at a fixed rate until quit.

use rand::Rng;
use tracing::{debug, info};

use crate::compute::World;
use crate::config::GameConfig;
use crate::error::PlatformError;
use crate::geometry::WIDTH;
use crate::platform::{
    Align, Audio, FontSize, HeldKeys, InputEvent, InputSource, Pacer, Renderer, TextPos,
};
use crate::stage::Stage;

const SCORE_POS: TextPos = TextPos { x: WIDTH - 20, y: 20, align: Align::Right };
const SHIELD_POS: TextPos = TextPos { x: 20, y: 20, align: Align::Left };
const BANNER_POS: TextPos = TextPos { x: 128, y: 204, align: Align::Left };
const HINT_POS: TextPos = TextPos { x: 132, y: 320, align: Align::Left };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

pub struct Game<R: Rng> {
    pub world: World,
    pub stage: Stage,
    rng: R,
}

impl<R: Rng> Game<R> {
    pub fn new(config: &GameConfig, rng: R) -> Self {
        Game::with_world(World::new(config.collision), rng)
    }

    /// Start from an arbitrary world, still on the title stage.
    pub fn with_world(world: World, rng: R) -> Self {
        Game {
            world,
            stage: Stage::Start,
            rng,
        }
    }

    // ── Input ────────────────────────────────────────────────────────────────

    /// Map one discrete event onto the current stage.  Quit is global.
    pub fn handle_event(&mut self, event: InputEvent) -> FrameOutcome {
        match (event, self.stage) {
            (InputEvent::Quit, _) => return FrameOutcome::Quit,
            (InputEvent::Confirm | InputEvent::Fire, Stage::Start) => {
                self.stage = self.stage.on_confirm();
            }
            (InputEvent::Fire, Stage::Playing) => {
                self.world.ship_shoot();
            }
            _ => {}
        }
        FrameOutcome::Continue
    }

    /// Left wins when both directions are held.
    pub fn apply_held(&mut self, held: HeldKeys) {
        if self.stage != Stage::Playing {
            return;
        }
        if held.left {
            self.world.move_ship_left();
        } else if held.right {
            self.world.move_ship_right();
        }
    }

    // ── Simulation ──────────────────────────────────────────────────────────

    /// Step the world and evaluate the end condition.  A no-op outside PLAYING.
    pub fn update(&mut self) {
        if self.stage != Stage::Playing {
            return;
        }
        self.world.step(&mut self.rng);
        self.stage = self.stage.check_end(&self.world);
    }

    // ── Rendering ───────────────────────────────────────────────────────────

    pub fn render(&self, out: &mut impl Renderer) -> Result<(), PlatformError> {
        out.clear()?;

        let w = &self.world;
        for p in w.lasers.iter().chain(w.bombs.iter()) {
            out.draw_sprite(p.rect, p.sprite)?;
        }
        if let Some(ship) = w.ship() {
            out.draw_sprite(ship.rect, ship.sprite)?;
        }
        for m in w.mobs() {
            out.draw_sprite(m.rect, m.sprite)?;
        }
        for p in &w.powerups {
            out.draw_sprite(p.rect, p.sprite)?;
        }

        out.draw_text(&w.score().to_string(), FontSize::Large, SCORE_POS)?;
        let shield = w.ship().map_or(0, |s| s.shield);
        out.draw_text(&format!("Shield: {shield}"), FontSize::Medium, SHIELD_POS)?;

        if let Some(banner) = self.stage.banner() {
            out.draw_text(banner, FontSize::ExtraLarge, BANNER_POS)?;
        }
        if self.stage == Stage::Start {
            out.draw_text("Press SPACE to start", FontSize::Small, HINT_POS)?;
        }

        out.present()
    }

    // ── Whole frame ─────────────────────────────────────────────────────────

    /// Run one complete frame.  A quit event still lets the rest of the
    /// frame finish; the caller stops before the next one.
    pub fn frame(
        &mut self,
        input: &mut impl InputSource,
        out: &mut impl Renderer,
        audio: &mut impl Audio,
    ) -> Result<FrameOutcome, PlatformError> {
        let mut outcome = FrameOutcome::Continue;
        while let Some(event) = input.next_event()? {
            if self.handle_event(event) == FrameOutcome::Quit {
                outcome = FrameOutcome::Quit;
            }
        }

        self.apply_held(input.held());

        let before = self.stage;
        self.update();
        if self.stage != before {
            debug!(from = %before, to = %self.stage, frame = self.world.frame, "stage changed");
            if self.stage.is_terminal() {
                info!(stage = %self.stage, score = self.world.score(), "game over");
            }
        }

        for sound in self.world.take_sounds() {
            audio.play(sound);
        }

        self.render(out)?;
        Ok(outcome)
    }
}

/// Drive frames at `config.fps` until a quit event.  Returns the final stage.
pub fn run<R: Rng>(
    game: &mut Game<R>,
    config: &GameConfig,
    input: &mut impl InputSource,
    out: &mut impl Renderer,
    audio: &mut impl Audio,
    pacer: &mut impl Pacer,
) -> Result<Stage, PlatformError> {
    info!(fps = config.fps, collision = ?config.collision, "game loop started");
    loop {
        let outcome = game.frame(input, out, audio)?;
        pacer.tick(config.fps);
        if outcome == FrameOutcome::Quit {
            info!(stage = %game.stage, score = game.world.score(), "quit");
            return Ok(game.stage);
        }
    }
}
