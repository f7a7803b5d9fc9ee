/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and logging.

use crate::domain::assets::Sfx;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    Jump,
    CoinCollected { index: usize },
    /// Hero overlapped a crawling spider; emitted whatever the outcome.
    SpiderContact { index: usize },
    SpiderStomped { index: usize },
    /// Death animation finished; the spider left the visible set.
    SpiderRemoved { index: usize },
    /// Level restarted from its descriptor.
    HeroKilled,
}

impl GameEvent {
    /// Sound cue for this event, if it has one.
    pub fn sfx(self) -> Option<Sfx> {
        match self {
            GameEvent::Jump => Some(Sfx::Jump),
            GameEvent::CoinCollected { .. } => Some(Sfx::Coin),
            GameEvent::SpiderContact { .. } => Some(Sfx::Stomp),
            GameEvent::SpiderStomped { .. }
            | GameEvent::SpiderRemoved { .. }
            | GameEvent::HeroKilled => None,
        }
    }
}
