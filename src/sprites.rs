/// Sprite images and sound handles.
///
/// Images are built in code from character art: `#` is an opaque pixel
/// block, anything else is transparent.  Each art cell expands to a
/// `scale × scale` block so the masks match the pixel world.

// ── Handles ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Ship,
    Laser,
    Mob,
    Bomb,
    ShieldPowerUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundId {
    Shoot,
    BombDrop,
    MobDestroyed,
    ShieldHit,
    PowerUp,
}

// ── Art ───────────────────────────────────────────────────────────────────────

const SHIP_ART: &[&str] = &[
    ".....##.....",
    ".....##.....",
    "....####....",
    "....####....",
    "...######...",
    ".##.####.##.",
    "############",
    "############",
    ".##......##.",
];

const MOB_ART: &[&str] = &[
    "############",
    "############",
    ".##########.",
    "..########..",
    "...######...",
    "....####....",
    "....####....",
    ".....##.....",
    ".....##.....",
];

const BOLT_ART: &[&str] = &["##", "##", "##", "##", "##", "##", "##", "##"];

const POWERUP_ART: &[&str] = &["..##..", ".####.", "######", "######", ".####.", "..##.."];

// ── Mask ──────────────────────────────────────────────────────────────────────

/// Per-pixel opacity bitmap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: i32,
    height: i32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn from_art(art: &[&str], scale: i32) -> Self {
        let cols = art.iter().map(|row| row.chars().count()).max().unwrap_or(0) as i32;
        let rows = art.len() as i32;
        let width = cols * scale;
        let height = rows * scale;
        let mut bits = vec![false; (width * height) as usize];

        for (ry, row) in art.iter().enumerate() {
            for (rx, ch) in row.chars().enumerate() {
                if ch != '#' {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = rx as i32 * scale + dx;
                        let py = ry as i32 * scale + dy;
                        bits[(py * width + px) as usize] = true;
                    }
                }
            }
        }

        Mask { width, height, bits }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Opacity at local pixel `(x, y)`; out-of-range reads are transparent.
    pub fn is_set(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        self.bits[(y * self.width + x) as usize]
    }
}

// ── Sheet ─────────────────────────────────────────────────────────────────────

/// Every image the game draws, keyed by `SpriteId`.
#[derive(Clone, Debug)]
pub struct SpriteSheet {
    ship: Mask,
    laser: Mask,
    mob: Mask,
    bomb: Mask,
    shield_powerup: Mask,
}

impl SpriteSheet {
    pub fn new() -> Self {
        SpriteSheet {
            ship: Mask::from_art(SHIP_ART, 4),
            laser: Mask::from_art(BOLT_ART, 3),
            mob: Mask::from_art(MOB_ART, 4),
            bomb: Mask::from_art(BOLT_ART, 3),
            shield_powerup: Mask::from_art(POWERUP_ART, 4),
        }
    }

    pub fn mask(&self, id: SpriteId) -> &Mask {
        match id {
            SpriteId::Ship => &self.ship,
            SpriteId::Laser => &self.laser,
            SpriteId::Mob => &self.mob,
            SpriteId::Bomb => &self.bomb,
            SpriteId::ShieldPowerUp => &self.shield_powerup,
        }
    }

    /// `(width, height)` of the image, i.e. the footprint a new entity gets.
    pub fn size(&self, id: SpriteId) -> (i32, i32) {
        let m = self.mask(id);
        (m.width(), m.height())
    }
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self::new()
    }
}
