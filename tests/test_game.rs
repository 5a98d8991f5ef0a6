use std::collections::VecDeque;

use space_war::collision::CollisionMode;
use space_war::compute::World;
use space_war::config::GameConfig;
use space_war::entities::*;
use space_war::error::PlatformError;
use space_war::game::{run, FrameOutcome, Game};
use space_war::geometry::Rect;
use space_war::platform::*;
use space_war::sprites::{SoundId, SpriteId};
use space_war::stage::Stage;

use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Fake platform ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct ScriptedInput {
    pending: VecDeque<InputEvent>,
    held: HeldKeys,
}

impl ScriptedInput {
    fn push(&mut self, ev: InputEvent) {
        self.pending.push_back(ev);
    }
}

impl InputSource for ScriptedInput {
    fn next_event(&mut self) -> Result<Option<InputEvent>, PlatformError> {
        Ok(self.pending.pop_front())
    }

    fn held(&self) -> HeldKeys {
        self.held
    }
}

#[derive(Debug, PartialEq)]
enum Call {
    Clear,
    Sprite(SpriteId, Rect),
    Text(String, FontSize),
    Present,
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
}

impl Recorder {
    fn last_frame(&self) -> &[Call] {
        let start = self.calls.iter().rposition(|c| *c == Call::Clear).unwrap_or(0);
        &self.calls[start..]
    }

    fn texts(&self) -> Vec<String> {
        self.last_frame()
            .iter()
            .filter_map(|c| match c {
                Call::Text(s, _) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for Recorder {
    fn clear(&mut self) -> Result<(), PlatformError> {
        self.calls.push(Call::Clear);
        Ok(())
    }

    fn draw_sprite(&mut self, footprint: Rect, sprite: SpriteId) -> Result<(), PlatformError> {
        self.calls.push(Call::Sprite(sprite, footprint));
        Ok(())
    }

    fn draw_text(&mut self, text: &str, size: FontSize, _at: TextPos) -> Result<(), PlatformError> {
        self.calls.push(Call::Text(text.to_string(), size));
        Ok(())
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        self.calls.push(Call::Present);
        Ok(())
    }
}

#[derive(Default)]
struct Speaker {
    played: Vec<SoundId>,
}

impl Audio for Speaker {
    fn play(&mut self, sound: SoundId) {
        self.played.push(sound);
    }
}

#[derive(Default)]
struct CountingPacer {
    ticks: u32,
    last_rate: u32,
}

impl Pacer for CountingPacer {
    fn tick(&mut self, target_rate: u32) {
        self.ticks += 1;
        self.last_rate = target_rate;
    }
}

struct Rig {
    game: Game<StdRng>,
    input: ScriptedInput,
    out: Recorder,
    audio: Speaker,
}

impl Rig {
    fn new(world: World) -> Self {
        Rig {
            game: Game::with_world(world, StdRng::seed_from_u64(42)),
            input: ScriptedInput::default(),
            out: Recorder::default(),
            audio: Speaker::default(),
        }
    }

    fn frame(&mut self) -> FrameOutcome {
        self.game
            .frame(&mut self.input, &mut self.out, &mut self.audio)
            .unwrap()
    }

    fn send(&mut self, ev: InputEvent) -> FrameOutcome {
        self.input.push(ev);
        self.frame()
    }
}

/// Stationary formation so scenarios are reproducible.
fn still_world(mob_spots: &[(i32, i32)]) -> World {
    let mut w = World::new(CollisionMode::Mask);
    w.fleet.mobs = mob_spots.iter().map(|&(x, y)| Mob::new(&w.sheet, x, y)).collect();
    w.fleet.speed = 0;
    w.powerups.clear();
    w
}

fn bomb_on_ship(w: &World) -> Projectile {
    let ship = w.ship().unwrap();
    let mut bomb = Projectile::new(&w.sheet, ProjectileKind::Bomb);
    bomb.rect.set_centerx(ship.rect.centerx());
    bomb.rect.set_centery(ship.rect.centery());
    bomb
}

// ── Stage flow ────────────────────────────────────────────────────────────────

#[test]
fn title_screen_waits_for_confirm() {
    let mut rig = Rig::new(still_world(&[(0, 300)]));
    for _ in 0..5 {
        rig.frame();
    }
    assert_eq!(rig.game.stage, Stage::Start);
    assert_eq!(rig.game.world.frame, 0); // nothing simulated
    assert!(rig.out.texts().contains(&"Space War!".to_string()));

    rig.send(InputEvent::Confirm);
    assert_eq!(rig.game.stage, Stage::Playing);
    assert_eq!(rig.game.world.frame, 1);
    assert!(!rig.out.texts().contains(&"Space War!".to_string()));
}

#[test]
fn fire_also_starts_the_game() {
    let mut rig = Rig::new(still_world(&[(0, 300)]));
    rig.send(InputEvent::Fire);
    assert_eq!(rig.game.stage, Stage::Playing);
    assert!(rig.game.world.lasers.is_empty()); // the press started, it did not shoot
}

#[test]
fn quit_is_global_and_finishes_the_frame() {
    let mut rig = Rig::new(still_world(&[(0, 300)]));
    assert_eq!(rig.send(InputEvent::Quit), FrameOutcome::Quit);
    assert_eq!(rig.out.calls.last(), Some(&Call::Present));

    let mut rig = Rig::new(still_world(&[(0, 300)]));
    rig.send(InputEvent::Confirm);
    rig.input.push(InputEvent::Quit);
    rig.input.push(InputEvent::Fire);
    assert_eq!(rig.frame(), FrameOutcome::Quit);
    assert_eq!(rig.game.world.lasers.len(), 1);
}

#[test]
fn unrecognised_events_do_nothing() {
    let mut rig = Rig::new(still_world(&[(0, 300)]));
    assert_eq!(rig.send(InputEvent::Other), FrameOutcome::Continue);
    assert_eq!(rig.game.stage, Stage::Start);
    rig.send(InputEvent::Confirm);
    rig.send(InputEvent::Other);
    assert!(rig.game.world.lasers.is_empty());
}

// ── Held keys ─────────────────────────────────────────────────────────────────

#[test]
fn left_wins_when_both_held() {
    let mut rig = Rig::new(still_world(&[(0, 300)]));
    rig.send(InputEvent::Confirm);
    let x0 = rig.game.world.ship().unwrap().rect.x;

    rig.input.held = HeldKeys { left: true, right: true };
    rig.frame();
    assert_eq!(rig.game.world.ship().unwrap().rect.x, x0 - SHIP_SPEED);

    rig.input.held = HeldKeys { left: false, right: true };
    rig.frame();
    assert_eq!(rig.game.world.ship().unwrap().rect.x, x0);
}

#[test]
fn held_keys_ignored_on_title_screen() {
    let mut rig = Rig::new(still_world(&[(0, 300)]));
    let x0 = rig.game.world.ship().unwrap().rect.x;
    rig.input.held = HeldKeys { left: true, right: false };
    rig.frame();
    assert_eq!(rig.game.world.ship().unwrap().rect.x, x0);
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn laser_flies_off_the_top() {
    let mut rig = Rig::new(still_world(&[(0, 300)]));
    rig.send(InputEvent::Confirm);

    rig.game.handle_event(InputEvent::Fire);
    let ship = rig.game.world.ship().unwrap().rect;
    assert_eq!(rig.game.world.lasers.len(), 1);
    let laser = rig.game.world.lasers[0].rect;
    assert_eq!(laser.centerx(), ship.centerx());
    assert_eq!(laser.centery(), ship.top());

    // bottom starts at top + 12 = 606 and leaves once it is below 0
    let mut frames = 0;
    while !rig.game.world.lasers.is_empty() {
        rig.frame();
        frames += 1;
        assert!(frames <= 200, "laser never left");
    }
    assert_eq!(frames, 606 / LASER_SPEED + 1);
    assert_eq!(rig.game.stage, Stage::Playing);
    assert!(rig.audio.played.contains(&SoundId::Shoot));
}

#[test]
fn shooting_a_mob_scores_100() {
    let mut w = still_world(&[(100, 100), (300, 100), (500, 100)]);
    let target = w.mobs()[1].rect.centerx();
    w.player.ship.as_mut().unwrap().rect.set_centerx(target);
    let mut rig = Rig::new(w);
    rig.send(InputEvent::Confirm);
    rig.send(InputEvent::Fire);

    let mut frames = 0;
    while rig.game.world.mobs().len() == 3 {
        rig.frame();
        frames += 1;
        assert!(frames <= 200, "laser never connected");
    }
    let xs: Vec<i32> = rig.game.world.mobs().iter().map(|m| m.rect.x).collect();
    assert_eq!(xs, vec![100, 500]);
    assert_eq!(rig.game.world.score(), 100);
    assert!(rig.game.world.lasers.is_empty());
    assert!(rig.audio.played.contains(&SoundId::MobDestroyed));
    assert!(rig.out.texts().contains(&"100".to_string()));
}

#[test]
fn three_bombs_in_three_frames_lose() {
    let mut rig = Rig::new(still_world(&[(0, 300)]));
    rig.send(InputEvent::Confirm);

    for expected in [2, 1] {
        let bomb = bomb_on_ship(&rig.game.world);
        rig.game.world.bombs.push(bomb);
        rig.frame();
        assert_eq!(rig.game.world.ship().unwrap().shield, expected);
        assert_eq!(rig.game.stage, Stage::Playing);
    }

    let bomb = bomb_on_ship(&rig.game.world);
    rig.game.world.bombs.push(bomb);
    rig.frame();
    assert!(rig.game.world.ship().is_none());
    assert_eq!(rig.game.stage, Stage::Lose);
    assert!(rig.out.texts().contains(&"You lose!".to_string()));
    assert!(!rig
        .out
        .last_frame()
        .iter()
        .any(|c| matches!(c, Call::Sprite(SpriteId::Ship, _))));
}

#[test]
fn last_mob_down_wins_on_that_frame() {
    let mut rig = Rig::new(still_world(&[(0, 300)]));
    rig.send(InputEvent::Confirm);

    let mob = rig.game.world.mobs()[0].rect;
    let mut laser = Projectile::new(&rig.game.world.sheet, ProjectileKind::Laser);
    laser.rect.set_centerx(mob.centerx());
    laser.rect.set_centery(mob.centery());
    rig.game.world.lasers.push(laser);
    assert_eq!(rig.game.stage, Stage::Playing);

    rig.frame();
    assert!(rig.game.world.mobs().is_empty());
    assert_eq!(rig.game.stage, Stage::Win);

    // Terminal: no more simulation
    let frame = rig.game.world.frame;
    rig.send(InputEvent::Confirm);
    rig.frame();
    assert_eq!(rig.game.world.frame, frame);
    assert_eq!(rig.game.stage, Stage::Win);
}

// ── Rendering ─────────────────────────────────────────────────────────────────

#[test]
fn draw_order_is_fixed() {
    let mut w = still_world(&[(0, 300)]);
    w.powerups.push(PowerUp::shield(&w.sheet, 700, 200));
    let mut bomb = Projectile::new(&w.sheet, ProjectileKind::Bomb);
    bomb.rect.x = 800;
    bomb.rect.y = 100;
    w.bombs.push(bomb);
    let mut rig = Rig::new(w);
    rig.send(InputEvent::Confirm);
    rig.send(InputEvent::Fire);

    let sprites: Vec<SpriteId> = rig
        .out
        .last_frame()
        .iter()
        .filter_map(|c| match c {
            Call::Sprite(id, _) => Some(*id),
            _ => None,
        })
        .collect();
    let first_bomb = sprites.iter().position(|&s| s == SpriteId::Bomb).unwrap();
    let laser = sprites.iter().position(|&s| s == SpriteId::Laser).unwrap();
    let ship = sprites.iter().position(|&s| s == SpriteId::Ship).unwrap();
    let mob = sprites.iter().position(|&s| s == SpriteId::Mob).unwrap();
    let powerup = sprites.iter().position(|&s| s == SpriteId::ShieldPowerUp).unwrap();
    assert!(laser < first_bomb);
    assert!(first_bomb < ship && ship < mob && mob < powerup);

    let frame = rig.out.last_frame();
    assert_eq!(frame.first(), Some(&Call::Clear));
    assert_eq!(frame.last(), Some(&Call::Present));
    assert!(matches!(frame[frame.len() - 2], Call::Text(_, _)));
}

#[test]
fn hud_shows_score_and_shield() {
    let mut rig = Rig::new(still_world(&[(0, 300)]));
    rig.send(InputEvent::Confirm);
    let frame = rig.out.last_frame();
    assert!(frame.contains(&Call::Text("0".to_string(), FontSize::Large)));
    assert!(frame.contains(&Call::Text("Shield: 3".to_string(), FontSize::Medium)));
}

// ── run ───────────────────────────────────────────────────────────────────────

#[test]
fn run_paces_every_frame_until_quit() {
    let config = GameConfig { seed: Some(1), ..GameConfig::default() };
    let mut game = Game::new(&config, StdRng::seed_from_u64(1));
    let mut input = ScriptedInput::default();
    input.push(InputEvent::Confirm);
    input.push(InputEvent::Quit);
    let mut out = Recorder::default();
    let mut audio = Speaker::default();
    let mut pacer = CountingPacer::default();

    let stage = run(&mut game, &config, &mut input, &mut out, &mut audio, &mut pacer).unwrap();
    assert_eq!(stage, Stage::Playing);
    assert_eq!(pacer.ticks, 1);
    assert_eq!(pacer.last_rate, 60);
}
