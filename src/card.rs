use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

pub const SUITS_PER_RANK: usize = 4;
pub const RANK_COUNT: usize = 13;
pub const DECK_SIZE: usize = SUITS_PER_RANK * RANK_COUNT;

#[derive(Eq, Hash, Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

#[derive(Eq, Hash, Clone, Copy, PartialEq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

/// A playing card. The `id` is derived from suit and rank, so two cards with
/// the same face always compare equal.
#[derive(Eq, Hash, Clone, Copy, PartialEq, Debug)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

pub struct Deck {}

impl Suit {
    pub fn symbol(&self) -> &'static str {
        match *self {
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
            Suit::Spades => "♠",
        }
    }

    /// Lowercase name used in card ids and the save format.
    pub fn name(&self) -> &'static str {
        match *self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
        }
    }

    pub fn from_name(name: &str) -> Option<Suit> {
        Suit::all().into_iter().find(|s| s.name() == name)
    }

    pub fn index(&self) -> u8 {
        match *self {
            Suit::Hearts => 0,
            Suit::Diamonds => 1,
            Suit::Clubs => 2,
            Suit::Spades => 3,
        }
    }

    pub fn all() -> [Suit; 4] {
        [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades]
    }
}

impl Rank {
    pub fn symbol(&self) -> &'static str {
        match *self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    /// Face value, 1 for an ace through 13 for a king.
    pub fn value(&self) -> u8 {
        *self as u8 + 1
    }

    pub fn from_value(value: u8) -> Option<Rank> {
        match value {
            1..=13 => Some(Rank::all()[value as usize - 1]),
            _ => None,
        }
    }

    pub fn all() -> [Rank; RANK_COUNT] {
        [
            Rank::Ace,
            Rank::Two,
            Rank::Three,
            Rank::Four,
            Rank::Five,
            Rank::Six,
            Rank::Seven,
            Rank::Eight,
            Rank::Nine,
            Rank::Ten,
            Rank::Jack,
            Rank::Queen,
            Rank::King,
        ]
    }
}

impl TryFrom<u8> for Rank {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rank::from_value(value).ok_or_else(|| format!("invalid card value {value}"))
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> u8 {
        rank.value()
    }
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Card {
        Card { suit, rank }
    }

    /// Stable identifier such as `"hearts-1"` for the ace of hearts.
    pub fn id(&self) -> String {
        format!("{}-{}", self.suit.name(), self.rank.value())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

impl Deck {
    pub fn standard() -> Vec<Card> {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::all() {
            for rank in Rank::all() {
                cards.push(Card::new(suit, rank));
            }
        }
        cards
    }

    pub fn shuffled() -> Vec<Card> {
        let mut cards = Deck::standard();
        cards.shuffle(&mut rand::rng());
        cards
    }

    /// Same permutation for the same seed, for reproducible deals.
    pub fn shuffled_with_seed(seed: u64) -> Vec<Card> {
        let mut cards = Deck::standard();
        cards.shuffle(&mut StdRng::seed_from_u64(seed));
        cards
    }
}
