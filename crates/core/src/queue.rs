//! Upcoming-piece queue fed by the bag.

use crate::rng::Bag;
use crate::types::{PieceKind, QUEUE_LOOKAHEAD};

/// Fixed window of the next [`QUEUE_LOOKAHEAD`] kinds. Every pop shifts the
/// window and draws one kind from the [`Bag`] into the last slot, so the
/// window is always full.
#[derive(Debug, Clone)]
pub struct PieceQueue {
    bag: Bag,
    upcoming: [PieceKind; QUEUE_LOOKAHEAD],
}

impl PieceQueue {
    pub fn new(seed: u32) -> Self {
        let mut bag = Bag::new(seed);
        let upcoming = std::array::from_fn(|_| bag.next());
        Self { bag, upcoming }
    }

    /// Take the front kind and draw a replacement at the back.
    pub fn pop(&mut self) -> PieceKind {
        let kind = self.upcoming[0];
        self.upcoming.rotate_left(1);
        self.upcoming[QUEUE_LOOKAHEAD - 1] = self.bag.next();
        kind
    }

    /// The upcoming kinds, front first.
    pub fn preview(&self) -> [PieceKind; QUEUE_LOOKAHEAD] {
        self.upcoming
    }

    pub fn seed(&self) -> u32 {
        self.bag.seed()
    }
}
