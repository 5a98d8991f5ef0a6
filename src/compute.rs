/// Simulation world and the per-frame update rules.
///
/// `World` owns every entity collection.  `World::step` advances one tick
/// in a fixed order: ship, lasers, bombs, formation, mobs, power-ups.  The
/// ship resolves bomb and power-up hits before the formation moves, so it
/// sees the previous frame's positions.  Each pass marks entities dead and
/// compacts its collection at the end; nothing dead is updated again.

use rand::Rng;
use tracing::{debug, info};

use crate::collision::{collide_and_kill, compact, hits, CollisionMode};
use crate::entities::{
    Lifecycle, Mob, PlayerSlot, PowerUp, Projectile, Ship, MOB_SCORE,
};
use crate::fleet::Fleet;
use crate::geometry::{HEIGHT, WIDTH};
use crate::sprites::{SoundId, SpriteSheet};

/// Gap between the ship's bottom edge and the floor at spawn.
const SHIP_FLOOR_GAP: i32 = 30;
const MOB_SPAWNS: [(i32, i32); 3] = [(100, 100), (300, 100), (500, 100)];
/// The single shield power-up starts far above the screen and falls in.
const POWERUP_SPAWN: (i32, i32) = (200, -2000);

#[derive(Clone, Debug)]
pub struct World {
    pub sheet: SpriteSheet,
    pub collision: CollisionMode,
    pub player: PlayerSlot,
    pub lasers: Vec<Projectile>,
    pub bombs: Vec<Projectile>,
    pub fleet: Fleet,
    pub powerups: Vec<PowerUp>,
    /// Sound cues raised since the last `take_sounds`.
    pub sounds: Vec<SoundId>,
    pub frame: u64,
}

// ── Constructors ─────────────────────────────────────────────────────────────

impl World {
    /// The opening layout: ship at bottom centre, three mobs, one power-up.
    pub fn new(collision: CollisionMode) -> Self {
        let mut world = World::empty(collision);

        let mut ship = Ship::new(&world.sheet);
        ship.rect.set_centerx(WIDTH / 2);
        ship.rect.set_bottom(HEIGHT - SHIP_FLOOR_GAP);
        world.player.ship = Some(ship);

        world.fleet.mobs = MOB_SPAWNS
            .iter()
            .map(|&(x, y)| Mob::new(&world.sheet, x, y))
            .collect();

        let (px, py) = POWERUP_SPAWN;
        world.powerups.push(PowerUp::shield(&world.sheet, px, py));
        world
    }

    /// No ship, no mobs, no projectiles.  Useful for building scenarios.
    pub fn empty(collision: CollisionMode) -> Self {
        World {
            sheet: SpriteSheet::new(),
            collision,
            player: PlayerSlot::default(),
            lasers: Vec::new(),
            bombs: Vec::new(),
            fleet: Fleet::new(Vec::new()),
            powerups: Vec::new(),
            sounds: Vec::new(),
            frame: 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.player.score
    }

    pub fn ship(&self) -> Option<&Ship> {
        self.player.ship.as_ref()
    }

    pub fn mobs(&self) -> &[Mob] {
        &self.fleet.mobs
    }

    pub fn take_sounds(&mut self) -> Vec<SoundId> {
        std::mem::take(&mut self.sounds)
    }
}

// ── Input-driven actions ────────────────────────────────────────────────────

impl World {
    pub fn move_ship_left(&mut self) {
        if let Some(ship) = self.player.ship.as_mut() {
            ship.move_left();
        }
    }

    pub fn move_ship_right(&mut self) {
        if let Some(ship) = self.player.ship.as_mut() {
            ship.move_right();
        }
    }

    /// One laser per call; no cooldown.  A destroyed ship cannot fire.
    pub fn ship_shoot(&mut self) -> bool {
        let Some(ship) = self.player.ship.as_ref() else {
            return false;
        };
        self.lasers.push(ship.shoot(&self.sheet));
        self.sounds.push(SoundId::Shoot);
        debug!(lasers = self.lasers.len(), "pew");
        true
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

impl World {
    /// Advance the simulation by one frame.  All randomness comes through
    /// `rng` so callers control determinism.
    pub fn step(&mut self, rng: &mut impl Rng) {
        self.frame += 1;
        self.update_ship();
        update_projectiles(&mut self.lasers);
        update_projectiles(&mut self.bombs);
        self.update_fleet(rng);
        self.update_mobs();
        self.update_powerups();
    }

    /// Clamp to the side walls, collect power-ups, take bomb hits, and
    /// leave the slot empty once the shield is gone.
    pub fn update_ship(&mut self) {
        let Some(ship) = self.player.ship.as_mut() else {
            return;
        };

        if ship.rect.left() < 0 {
            ship.rect.set_left(0);
        } else if ship.rect.right() > WIDTH {
            ship.rect.set_right(WIDTH);
        }

        for i in hits(&self.sheet, self.collision, &*ship, &self.powerups) {
            self.powerups[i].apply(ship);
            self.sounds.push(SoundId::PowerUp);
            debug!(shield = ship.shield, "shield restored");
        }
        compact(&mut self.powerups);

        let bomb_hits = collide_and_kill(&self.sheet, self.collision, &*ship, &mut self.bombs);
        for _ in 0..bomb_hits {
            ship.shield = ship.shield.saturating_sub(1);
            self.sounds.push(SoundId::ShieldHit);
            debug!(shield = ship.shield, "oof");
        }
        compact(&mut self.bombs);

        if ship.shield == 0 {
            self.player.ship = None;
            info!(score = self.player.score, "ship destroyed");
        }
    }

    pub fn update_fleet(&mut self, rng: &mut impl Rng) {
        if self
            .fleet
            .update(&self.sheet, &mut self.bombs, rng)
            .is_some()
        {
            self.sounds.push(SoundId::BombDrop);
        }
    }

    /// Each mob checks the lasers; any hit consumes the touching lasers,
    /// scores once and removes the mob.
    pub fn update_mobs(&mut self) {
        for mob in self.fleet.mobs.iter_mut().filter(|m| m.is_alive()) {
            let n = collide_and_kill(&self.sheet, self.collision, &*mob, &mut self.lasers);
            if n > 0 {
                mob.kill();
                self.player.score += MOB_SCORE;
                self.sounds.push(SoundId::MobDestroyed);
                info!(score = self.player.score, "boom");
            }
        }
        compact(&mut self.lasers);
        compact(&mut self.fleet.mobs);
    }

    pub fn update_powerups(&mut self) {
        for p in self.powerups.iter_mut().filter(|p| p.is_alive()) {
            p.rect.y += p.speed;
            if p.rect.top() > HEIGHT {
                p.kill();
            }
        }
        compact(&mut self.powerups);
    }
}

/// Move every projectile one step and cull the ones whose trailing edge has
/// left the field: lasers past the top, bombs past the bottom.
pub fn update_projectiles(group: &mut Vec<Projectile>) {
    for p in group.iter_mut().filter(|p| p.is_alive()) {
        update_projectile(p);
    }
    compact(group);
}

pub fn update_projectile(p: &mut Projectile) {
    p.rect.y += p.velocity();
    let gone = if p.velocity() < 0 {
        p.rect.bottom() < 0
    } else {
        p.rect.top() > HEIGHT
    };
    if gone {
        p.kill();
    }
}
