/// All game entity types: data plus the trivial movement helpers.
/// Per-frame update rules live in `compute`, formation logic in `fleet`.

use crate::geometry::Rect;
use crate::sprites::{SpriteId, SpriteSheet};

pub const SHIP_SPEED: i32 = 3;
pub const SHIP_SHIELD: u32 = 3;
pub const LASER_SPEED: i32 = 5;
pub const BOMB_SPEED: i32 = 3;
pub const POWERUP_SPEED: i32 = 6;
/// Score awarded per mob destroyed.
pub const MOB_SCORE: u32 = 100;

// ── Shared capabilities ───────────────────────────────────────────────────────

/// Anything with a footprint and an image that collision can test.
pub trait Body {
    fn rect(&self) -> Rect;
    fn sprite(&self) -> SpriteId;
}

/// Mark-dead / compact lifecycle.  Dead entities stay in their collection
/// until the end of the pass that killed them and are never revived.
pub trait Lifecycle {
    fn is_alive(&self) -> bool;
    fn kill(&mut self);
}

macro_rules! impl_entity {
    ($ty:ty) => {
        impl Body for $ty {
            fn rect(&self) -> Rect {
                self.rect
            }

            fn sprite(&self) -> SpriteId {
                self.sprite
            }
        }

        impl Lifecycle for $ty {
            fn is_alive(&self) -> bool {
                self.alive
            }

            fn kill(&mut self) {
                self.alive = false;
            }
        }
    };
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Ship {
    pub rect: Rect,
    pub sprite: SpriteId,
    pub speed: i32,
    pub shield: u32,
    /// Carried for a double-shot upgrade; nothing reads it yet.
    pub shoots_double: bool,
    pub alive: bool,
}

impl Ship {
    pub fn new(sheet: &SpriteSheet) -> Self {
        let (w, h) = sheet.size(SpriteId::Ship);
        Ship {
            rect: Rect::new(0, 0, w, h),
            sprite: SpriteId::Ship,
            speed: SHIP_SPEED,
            shield: SHIP_SHIELD,
            shoots_double: false,
            alive: true,
        }
    }

    /// No bounds check here; the clamp happens in the ship's update.
    pub fn move_left(&mut self) {
        self.rect.x -= self.speed;
    }

    pub fn move_right(&mut self) {
        self.rect.x += self.speed;
    }

    /// A laser centred on the ship's top edge.
    pub fn shoot(&self, sheet: &SpriteSheet) -> Projectile {
        let mut laser = Projectile::new(sheet, ProjectileKind::Laser);
        laser.rect.set_centerx(self.rect.centerx());
        laser.rect.set_centery(self.rect.top());
        laser
    }
}

/// The singleton player slot.  The score outlives the ship.
#[derive(Clone, Debug, Default)]
pub struct PlayerSlot {
    pub ship: Option<Ship>,
    pub score: u32,
}

impl PlayerSlot {
    pub fn is_empty(&self) -> bool {
        self.ship.is_none()
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    /// Player laser, travels up.
    Laser,
    /// Mob bomb, travels down.
    Bomb,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub rect: Rect,
    pub sprite: SpriteId,
    pub kind: ProjectileKind,
    pub speed: i32,
    pub alive: bool,
}

impl Projectile {
    pub fn new(sheet: &SpriteSheet, kind: ProjectileKind) -> Self {
        let (sprite, speed) = match kind {
            ProjectileKind::Laser => (SpriteId::Laser, LASER_SPEED),
            ProjectileKind::Bomb => (SpriteId::Bomb, BOMB_SPEED),
        };
        let (w, h) = sheet.size(sprite);
        Projectile {
            rect: Rect::new(0, 0, w, h),
            sprite,
            kind,
            speed,
            alive: true,
        }
    }

    /// Signed vertical step per frame.
    pub fn velocity(&self) -> i32 {
        match self.kind {
            ProjectileKind::Laser => -self.speed,
            ProjectileKind::Bomb => self.speed,
        }
    }
}

// ── Mobs ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Mob {
    pub rect: Rect,
    pub sprite: SpriteId,
    pub alive: bool,
}

impl Mob {
    pub fn new(sheet: &SpriteSheet, x: i32, y: i32) -> Self {
        let (w, h) = sheet.size(SpriteId::Mob);
        Mob {
            rect: Rect::new(x, y, w, h),
            sprite: SpriteId::Mob,
            alive: true,
        }
    }

    /// A bomb centred on the mob's bottom edge.
    pub fn drop_bomb(&self, sheet: &SpriteSheet) -> Projectile {
        let mut bomb = Projectile::new(sheet, ProjectileKind::Bomb);
        bomb.rect.set_centerx(self.rect.centerx());
        bomb.rect.set_centery(self.rect.bottom());
        bomb
    }
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Restores the ship's shield to full.
    Shield,
}

#[derive(Clone, Debug)]
pub struct PowerUp {
    pub rect: Rect,
    pub sprite: SpriteId,
    pub kind: PowerUpKind,
    pub speed: i32,
    pub alive: bool,
}

impl PowerUp {
    pub fn shield(sheet: &SpriteSheet, x: i32, y: i32) -> Self {
        let (w, h) = sheet.size(SpriteId::ShieldPowerUp);
        PowerUp {
            rect: Rect::new(x, y, w, h),
            sprite: SpriteId::ShieldPowerUp,
            kind: PowerUpKind::Shield,
            speed: POWERUP_SPEED,
            alive: true,
        }
    }

    /// Apply the effect to `ship` and consume the power-up.
    pub fn apply(&mut self, ship: &mut Ship) {
        match self.kind {
            PowerUpKind::Shield => ship.shield = SHIP_SHIELD,
        }
        self.kill();
    }
}

impl_entity!(Ship);
impl_entity!(Projectile);
impl_entity!(Mob);
impl_entity!(PowerUp);
