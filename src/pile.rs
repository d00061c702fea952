use super::card::{Card, Rank, SUITS_PER_RANK};

/// Number of cards a pile holds once its rank is consolidated.
pub const PILE_CAPACITY: usize = SUITS_PER_RANK;

/// One of the fifteen piles. Cards are ordered bottom to top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pile {
    pub id: usize,
    cards: Vec<Card>,
    is_empty_slot: bool,
}

impl Pile {
    pub fn new(id: usize, is_empty_slot: bool) -> Pile {
        Pile {
            id,
            cards: Vec::with_capacity(PILE_CAPACITY),
            is_empty_slot,
        }
    }

    pub fn from_cards(id: usize, cards: Vec<Card>, is_empty_slot: bool) -> Pile {
        Pile {
            id,
            cards,
            is_empty_slot,
        }
    }

    /// Whether this pile was designated empty at deal time. Only the deal
    /// looks at this; play rules go by the card count.
    pub fn is_empty_slot(&self) -> bool {
        self.is_empty_slot
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn top_rank(&self) -> Option<Rank> {
        self.top().map(|c| c.rank)
    }

    pub fn take_top(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn put_on_top(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn has_room(&self) -> bool {
        self.cards.len() < PILE_CAPACITY
    }

    /// Exactly four cards, all the same rank.
    pub fn is_complete(&self) -> bool {
        match self.cards.split_first() {
            Some((first, rest)) if self.cards.len() == PILE_CAPACITY => {
                rest.iter().all(|c| c.rank == first.rank)
            }
            _ => false,
        }
    }
}
