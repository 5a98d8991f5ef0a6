/// The enemy formation: lateral sweep, edge reversal and bomb selection.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::entities::{Lifecycle, Mob, Projectile};
use crate::geometry::WIDTH;
use crate::sprites::SpriteSheet;

pub const FLEET_SPEED: i32 = 5;
pub const FLEET_DROP_SPEED: i32 = 20;
/// One-in-N chance per frame that some mob drops a bomb.  Lower is faster.
pub const FLEET_BOMB_RATE: u32 = 60;

#[derive(Clone, Debug)]
pub struct Fleet {
    /// Exactly the live mobs; dead ones are compacted away each frame.
    pub mobs: Vec<Mob>,
    pub speed: i32,
    pub moving_right: bool,
    /// Vertical step for `move_down`.  The sweep does not call it.
    pub drop_speed: i32,
    pub bomb_rate: u32,
}

impl Fleet {
    pub fn new(mobs: Vec<Mob>) -> Self {
        Fleet {
            mobs,
            speed: FLEET_SPEED,
            moving_right: true,
            drop_speed: FLEET_DROP_SPEED,
            bomb_rate: FLEET_BOMB_RATE,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mobs.is_empty()
    }

    /// Shift every mob one step in the current direction.  If any mob
    /// touched a side wall the direction flips for the next call; this
    /// call's movement is already applied.  Returns whether it flipped.
    pub fn move_mobs(&mut self) -> bool {
        let mut hits_edge = false;

        for m in self.mobs.iter_mut().filter(|m| m.is_alive()) {
            if self.moving_right {
                m.rect.x += self.speed;
                if m.rect.right() >= WIDTH {
                    hits_edge = true;
                }
            } else {
                m.rect.x -= self.speed;
                if m.rect.left() <= 0 {
                    hits_edge = true;
                }
            }
        }

        if hits_edge {
            self.reverse();
        }
        hits_edge
    }

    pub fn reverse(&mut self) {
        self.moving_right = !self.moving_right;
    }

    pub fn move_down(&mut self) {
        for m in &mut self.mobs {
            m.rect.y += self.drop_speed;
        }
    }

    /// Bernoulli trial with p = 1 / `bomb_rate`; on success a uniformly
    /// chosen live mob drops a bomb into `bombs`.  Returns the bomber's index.
    pub fn choose_bomber(
        &self,
        sheet: &SpriteSheet,
        bombs: &mut Vec<Projectile>,
        rng: &mut impl Rng,
    ) -> Option<usize> {
        let roll = rng.gen_range(0..self.bomb_rate.max(1));
        let live: Vec<usize> = self
            .mobs
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_alive())
            .map(|(i, _)| i)
            .collect();

        if live.is_empty() || roll != 0 {
            return None;
        }

        let bomber = *live.choose(rng)?;
        bombs.push(self.mobs[bomber].drop_bomb(sheet));
        debug!(bomber, "bomb dropped");
        Some(bomber)
    }

    /// One formation tick: sweep, then maybe bomb.
    pub fn update(
        &mut self,
        sheet: &SpriteSheet,
        bombs: &mut Vec<Projectile>,
        rng: &mut impl Rng,
    ) -> Option<usize> {
        self.move_mobs();
        self.choose_bomber(sheet, bombs, rng)
    }
}
