/// Coarse game mode: title, playing, won, lost.

use std::fmt;

use tracing::info;

use crate::compute::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Start,
    Playing,
    Win,
    Lose,
}

impl Stage {
    /// START advances to PLAYING; every other stage ignores confirm.
    pub fn on_confirm(self) -> Stage {
        match self {
            Stage::Start => {
                info!("stage: start -> playing");
                Stage::Playing
            }
            other => other,
        }
    }

    /// End-of-frame check.  Only PLAYING can end; an empty formation wins
    /// even if the ship went down on the same frame.
    pub fn check_end(self, world: &World) -> Stage {
        if self != Stage::Playing {
            return self;
        }
        if world.fleet.is_empty() {
            info!(score = world.score(), "stage: playing -> win");
            Stage::Win
        } else if world.player.is_empty() {
            info!(score = world.score(), "stage: playing -> lose");
            Stage::Lose
        } else {
            self
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Win | Stage::Lose)
    }

    /// Overlay headline for this stage, if it has one.
    pub fn banner(self) -> Option<&'static str> {
        match self {
            Stage::Start => Some("Space War!"),
            Stage::Playing => None,
            Stage::Win => Some("You win!"),
            Stage::Lose => Some("You lose!"),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Start => write!(f, "start"),
            Stage::Playing => write!(f, "playing"),
            Stage::Win => write!(f, "win"),
            Stage::Lose => write!(f, "lose"),
        }
    }
}
