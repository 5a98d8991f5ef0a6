/// Hit testing between entities and entity collections.
///
/// Resolution is asymmetric: the ship tests against bombs and power-ups,
/// each mob tests against lasers.  Projectiles never test against anything
/// themselves, so a hit is resolved exactly once.

use std::str::FromStr;

use crate::entities::{Body, Lifecycle};
use crate::sprites::SpriteSheet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CollisionMode {
    /// Pixel-accurate: the footprints overlap and some pixel is opaque in both images.
    #[default]
    Mask,
    /// Footprint overlap only.
    BoundingBox,
}

impl FromStr for CollisionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mask" => Ok(CollisionMode::Mask),
            "bbox" | "box" | "rect" => Ok(CollisionMode::BoundingBox),
            other => Err(format!("unknown collision mode `{other}` (expected mask or bbox)")),
        }
    }
}

/// Do `a` and `b` touch?
pub fn collide<A: Body + ?Sized, B: Body + ?Sized>(
    sheet: &SpriteSheet,
    mode: CollisionMode,
    a: &A,
    b: &B,
) -> bool {
    let ra = a.rect();
    let rb = b.rect();
    let Some(overlap) = ra.intersection(&rb) else {
        return false;
    };
    if mode == CollisionMode::BoundingBox {
        return true;
    }

    let ma = sheet.mask(a.sprite());
    let mb = sheet.mask(b.sprite());
    for y in overlap.top()..overlap.bottom() {
        for x in overlap.left()..overlap.right() {
            if ma.is_set(x - ra.x, y - ra.y) && mb.is_set(x - rb.x, y - rb.y) {
                return true;
            }
        }
    }
    false
}

/// Indices of the live members of `group` that `subject` touches.
pub fn hits<S, T>(sheet: &SpriteSheet, mode: CollisionMode, subject: &S, group: &[T]) -> Vec<usize>
where
    S: Body + ?Sized,
    T: Body + Lifecycle,
{
    group
        .iter()
        .enumerate()
        .filter(|(_, member)| member.is_alive() && collide(sheet, mode, subject, *member))
        .map(|(i, _)| i)
        .collect()
}

/// Kill every live member of `group` that `subject` touches and return how
/// many died.  Dead members stay in place until `compact` runs.
pub fn collide_and_kill<S, T>(
    sheet: &SpriteSheet,
    mode: CollisionMode,
    subject: &S,
    group: &mut [T],
) -> usize
where
    S: Body + ?Sized,
    T: Body + Lifecycle,
{
    let hit = hits(sheet, mode, subject, group);
    for &i in &hit {
        group[i].kill();
    }
    hit.len()
}

/// Drop dead entries.  Run once at the end of each update pass.
pub fn compact<T: Lifecycle>(group: &mut Vec<T>) {
    group.retain(|e| e.is_alive());
}
