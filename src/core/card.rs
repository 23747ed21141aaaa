//! Card model: suits, ranks, and the 32-card Baloot deck.
//!
//! Cards are plain `Copy` values. Two encodings are supported:
//! - the display label (`"10H"`, `"QS"`), used for humans;
//! - the two-character code (`"TH"`, `"QS"`), used in recorded games.
//!
//! Parsing accepts either form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::MalformedInput;

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    #[serde(rename = "H")]
    Hearts,
    #[serde(rename = "S")]
    Spades,
    #[serde(rename = "D")]
    Diamonds,
    #[serde(rename = "C")]
    Clubs,
}

impl Suit {
    /// All suits in canonical deck order.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Spades, Suit::Diamonds, Suit::Clubs];

    /// Single-letter code.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
        }
    }

    /// Parse a single-letter code.
    #[must_use]
    pub fn from_code(code: char) -> Option<Suit> {
        Suit::ALL.into_iter().find(|s| s.code() == code)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Suit {
    type Err = MalformedInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Suit::from_code(c).ok_or_else(|| MalformedInput::UnknownSuit(s.to_string())),
            _ => Err(MalformedInput::UnknownSuit(s.to_string())),
        }
    }
}

/// Card rank, declared in natural order (7 lowest, ace highest).
///
/// The natural order is what sequences (projects) use. Trick-taking strength
/// is not this order: it comes from the configured rank ladders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
}

impl Rank {
    /// All ranks in natural order.
    pub const ALL: [Rank; 8] = [
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }

    /// Single-character code (`T` for ten).
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    /// Position in natural order (0 for seven, 7 for ace).
    #[must_use]
    pub const fn natural_index(self) -> u8 {
        self as u8
    }

    fn parse(s: &str) -> Option<Rank> {
        if s == "10" {
            return Some(Rank::Ten);
        }
        let mut chars = s.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        Rank::ALL.into_iter().find(|r| r.code() == c)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A playing card.
///
/// Serialized as its code string (`"TH"`), so snapshots stay readable.
///
/// Note: `Ord` sorts by suit then natural rank, for stable hand display only.
/// Trick resolution never uses it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Card {
    suit: Suit,
    rank: Rank,
}

impl Card {
    /// Create a card.
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    #[must_use]
    pub const fn rank(self) -> Rank {
        self.rank
    }

    #[must_use]
    pub const fn suit(self) -> Suit {
        self.suit
    }

    /// Display label, e.g. `"10H"`.
    #[must_use]
    pub fn label(self) -> String {
        format!("{}{}", self.rank.label(), self.suit.code())
    }

    /// Two-character code, e.g. `"TH"`.
    #[must_use]
    pub fn code(self) -> String {
        let mut s = String::with_capacity(2);
        s.push(self.rank.code());
        s.push(self.suit.code());
        s
    }

    /// The 32-card deck in canonical order (suit-major, natural rank).
    ///
    /// ```
    /// use baloot_engine::core::Card;
    ///
    /// let deck = Card::deck();
    /// assert_eq!(deck.len(), 32);
    /// assert_eq!(deck[0].code(), "7H");
    /// ```
    #[must_use]
    pub fn deck() -> Vec<Card> {
        Suit::ALL
            .into_iter()
            .flat_map(|suit| Rank::ALL.into_iter().map(move |rank| Card::new(rank, suit)))
            .collect()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.code())
    }
}

impl FromStr for Card {
    type Err = MalformedInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || MalformedInput::UnknownCard(s.to_string());

        let split = s.char_indices().last().map(|(i, _)| i).ok_or_else(unknown)?;
        let (rank_part, suit_part) = s.split_at(split);

        let rank = Rank::parse(rank_part).ok_or_else(unknown)?;
        let suit = suit_part
            .chars()
            .next()
            .and_then(Suit::from_code)
            .ok_or_else(unknown)?;

        Ok(Card::new(rank, suit))
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.code()
    }
}

impl TryFrom<String> for Card {
    type Error = MalformedInput;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_labels_and_codes() {
        let ten = Card::new(Rank::Ten, Suit::Hearts);
        assert_eq!(ten.label(), "10H");
        assert_eq!(ten.code(), "TH");
        assert_eq!(format!("{}", ten), "10H");

        let queen = Card::new(Rank::Queen, Suit::Spades);
        assert_eq!(queen.label(), "QS");
        assert_eq!(queen.code(), "QS");
    }

    #[test]
    fn test_parse_accepts_both_ten_forms() {
        let expected = Card::new(Rank::Ten, Suit::Clubs);
        assert_eq!("TC".parse::<Card>().unwrap(), expected);
        assert_eq!("10C".parse::<Card>().unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "X", "1H", "7X", "QSS", "11H", "KH "] {
            assert_eq!(
                bad.parse::<Card>(),
                Err(MalformedInput::UnknownCard(bad.to_string())),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_deck_is_unique_and_complete() {
        let deck = Card::deck();
        let unique: FxHashSet<_> = deck.iter().copied().collect();

        assert_eq!(deck.len(), 32);
        assert_eq!(unique.len(), 32);
        for card in &deck {
            assert_eq!(card.code().parse::<Card>().unwrap(), *card);
        }
    }

    #[test]
    fn test_suit_from_str() {
        assert_eq!("D".parse::<Suit>().unwrap(), Suit::Diamonds);
        assert!("DD".parse::<Suit>().is_err());
        assert!("Z".parse::<Suit>().is_err());
    }

    #[test]
    fn test_card_serializes_as_code() {
        let card = Card::new(Rank::Ten, Suit::Diamonds);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "\"TD\"");

        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);

        assert!(serde_json::from_str::<Card>("\"ZZ\"").is_err());
    }
}
