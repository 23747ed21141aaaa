//! Wire format for saved rounds.
//!
//! Records mirror the JSON documents that presentation layers store:
//! - `ActionRecord`: `{ "type": "PLAY_CARD", "player": 2, "payload": { "card": "TH" } }`
//! - `InitialRecord`: the deal, tagged by `start_phase`
//! - `GameRecord`: version, initial record, and action log
//!
//! Cards, suits, and modes travel as strings and are validated on conversion,
//! so a bad record surfaces as `MalformedInput` rather than a serde error deep
//! inside a document.

use serde::{Deserialize, Serialize};

use super::{ReplayError, Timeline};
use crate::core::{
    Action, Bid, Card, ContractChoice, Deal, GameState, MalformedInput, Mode, PlayingDeal, Seat,
    SeatMap, Suit,
};
use crate::rules::RulesEngine;

/// Current record format version.
pub const RECORD_VERSION: u32 = 1;

const PASS: &str = "PASS";
const BID_SUN: &str = "BID_SUN";
const BID_ASHKAL: &str = "BID_ASHKAL";
const BID_HOKM: &str = "BID_HOKM";
const BID_HOKM_THANI: &str = "BID_HOKM_THANI";
const FINALIZE_CONTRACT: &str = "FINALIZE_CONTRACT";
const PLAY_CARD: &str = "PLAY_CARD";

const MODE_SUN: &str = "SUN";
const MODE_HOKM: &str = "HOKM";

/// Optional action fields. Which ones are required depends on the type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trump_suit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_taker: Option<u8>,
}

/// One logged action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<u8>,
    #[serde(default)]
    pub payload: ActionPayload,
}

impl From<&Action> for ActionRecord {
    fn from(action: &Action) -> Self {
        let mut payload = ActionPayload::default();
        let kind = match *action {
            Action::Pass { .. } => PASS,
            Action::Bid { bid, .. } => match bid {
                Bid::Hokm => BID_HOKM,
                Bid::HokmThani => BID_HOKM_THANI,
                Bid::Sun => BID_SUN,
                Bid::Ashkal => BID_ASHKAL,
            },
            Action::FinalizeContract { contract, .. } => {
                let (mode, trump) = mode_to_wire(contract.mode);
                payload.mode = Some(mode.to_string());
                payload.trump_suit = trump;
                payload.floor_taker = Some(contract.floor_taker.0);
                FINALIZE_CONTRACT
            }
            Action::PlayCard { card, .. } => {
                payload.card = Some(card.code());
                PLAY_CARD
            }
        };

        Self {
            kind: kind.to_string(),
            player: Some(action.player().0),
            payload,
        }
    }
}

impl TryFrom<&ActionRecord> for Action {
    type Error = MalformedInput;

    fn try_from(record: &ActionRecord) -> Result<Self, Self::Error> {
        let kind: &'static str = match record.kind.as_str() {
            PASS => PASS,
            BID_SUN => BID_SUN,
            BID_ASHKAL => BID_ASHKAL,
            BID_HOKM => BID_HOKM,
            BID_HOKM_THANI => BID_HOKM_THANI,
            FINALIZE_CONTRACT => FINALIZE_CONTRACT,
            PLAY_CARD => PLAY_CARD,
            other => return Err(MalformedInput::UnknownActionKind(other.to_string())),
        };
        let missing = |field| MalformedInput::MissingField { kind, field };

        let player = seat(record.player.ok_or_else(|| missing("player"))?)?;
        let payload = &record.payload;
        let bid = |bid| Action::Bid { player, bid };

        let action = match kind {
            PASS => Action::Pass { player },
            BID_SUN => bid(Bid::Sun),
            BID_ASHKAL => bid(Bid::Ashkal),
            BID_HOKM => bid(Bid::Hokm),
            BID_HOKM_THANI => bid(Bid::HokmThani),
            FINALIZE_CONTRACT => {
                let mode = payload.mode.as_deref().ok_or_else(|| missing("mode"))?;
                let mode = mode_from_wire(mode, payload.trump_suit.as_deref(), kind)?;
                let floor_taker = seat(payload.floor_taker.ok_or_else(|| missing("floor_taker"))?)?;
                Action::FinalizeContract {
                    player,
                    contract: ContractChoice::new(mode, floor_taker),
                }
            }
            _ => {
                let card = payload.card.as_deref().ok_or_else(|| missing("card"))?;
                Action::PlayCard {
                    player,
                    card: card.parse()?,
                }
            }
        };
        Ok(action)
    }
}

/// The deal a round starts from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "start_phase", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InitialRecord {
    /// Five cards per seat, floor card, and stock; the round opens with
    /// bidding.
    Bidding {
        dealer: u8,
        hands: [Vec<String>; 4],
        floor_card: String,
        stock: Vec<String>,
    },
    /// Full hands and a known contract; the round opens with the first trick.
    Playing {
        dealer: u8,
        leader: u8,
        declarer: u8,
        contract_mode: String,
        #[serde(default)]
        trump_suit: Option<String>,
        hands: [Vec<String>; 4],
    },
}

impl InitialRecord {
    /// Record a bidding deal.
    #[must_use]
    pub fn from_deal(deal: &Deal) -> Self {
        InitialRecord::Bidding {
            dealer: deal.dealer.0,
            hands: hands_to_wire(&deal.hands),
            floor_card: deal.floor_card.code(),
            stock: deal.stock.iter().map(|c| c.code()).collect(),
        }
    }

    /// Record a playing deal.
    #[must_use]
    pub fn from_playing_deal(deal: &PlayingDeal) -> Self {
        let (mode, trump) = mode_to_wire(deal.mode);
        InitialRecord::Playing {
            dealer: deal.dealer.0,
            leader: deal.leader.0,
            declarer: deal.declarer.0,
            contract_mode: mode.to_string(),
            trump_suit: trump,
            hands: hands_to_wire(&deal.hands),
        }
    }

    /// Validate and build the opening snapshot.
    pub fn to_state(&self) -> Result<GameState, MalformedInput> {
        match self {
            InitialRecord::Bidding {
                dealer,
                hands,
                floor_card,
                stock,
            } => GameState::from_deal(&Deal {
                dealer: seat(*dealer)?,
                hands: hands_from_wire(hands)?,
                floor_card: floor_card.parse()?,
                stock: cards_from_wire(stock)?,
            }),
            InitialRecord::Playing {
                dealer,
                leader,
                declarer,
                contract_mode,
                trump_suit,
                hands,
            } => GameState::from_playing_deal(&PlayingDeal {
                dealer: seat(*dealer)?,
                leader: seat(*leader)?,
                declarer: seat(*declarer)?,
                mode: mode_from_wire(contract_mode, trump_suit.as_deref(), "PLAYING")?,
                hands: hands_from_wire(hands)?,
            }),
        }
    }
}

/// A saved round: initial deal plus action log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub version: u32,
    pub initial: InitialRecord,
    #[serde(default)]
    pub actions: Vec<ActionRecord>,
}

impl GameRecord {
    #[must_use]
    pub fn new(initial: InitialRecord) -> Self {
        Self {
            version: RECORD_VERSION,
            initial,
            actions: Vec::new(),
        }
    }

    /// A copy with one more action appended.
    #[must_use]
    pub fn with_action(&self, action: &Action) -> Self {
        let mut next = self.clone();
        next.actions.push(action.into());
        next
    }

    /// Decode the action log.
    pub fn decode_actions(&self) -> Result<Vec<Action>, MalformedInput> {
        self.actions.iter().map(Action::try_from).collect()
    }

    /// Validate the record and replay it.
    ///
    /// Records written by another format version are rejected before any
    /// field is read.
    pub fn replay<R: RulesEngine + ?Sized>(&self, rules: &R) -> Result<Timeline, ReplayError> {
        if self.version != RECORD_VERSION {
            return Err(MalformedInput::UnsupportedVersion(self.version).into());
        }
        let initial = self.initial.to_state()?;
        let actions = self.decode_actions()?;
        Timeline::build(rules, initial, &actions)
    }
}

fn seat(index: u8) -> Result<Seat, MalformedInput> {
    let seat = Seat::new(index);
    if seat.is_valid() {
        Ok(seat)
    } else {
        Err(MalformedInput::BadSeat(index))
    }
}

fn mode_to_wire(mode: Mode) -> (&'static str, Option<String>) {
    match mode {
        Mode::Sun => (MODE_SUN, None),
        Mode::Hokm(suit) => (MODE_HOKM, Some(suit.to_string())),
    }
}

fn mode_from_wire(
    mode: &str,
    trump_suit: Option<&str>,
    kind: &'static str,
) -> Result<Mode, MalformedInput> {
    match (mode, trump_suit) {
        (MODE_SUN, None) => Ok(Mode::Sun),
        (MODE_SUN, Some(_)) => Err(MalformedInput::SunWithTrump),
        (MODE_HOKM, Some(suit)) => Ok(Mode::Hokm(suit.parse::<Suit>()?)),
        (MODE_HOKM, None) => Err(MalformedInput::MissingField {
            kind,
            field: "trump_suit",
        }),
        (other, _) => Err(MalformedInput::UnknownMode(other.to_string())),
    }
}

fn cards_from_wire(codes: &[String]) -> Result<Vec<Card>, MalformedInput> {
    codes.iter().map(|c| c.parse()).collect()
}

fn hands_to_wire(hands: &SeatMap<Vec<Card>>) -> [Vec<String>; 4] {
    [0u8, 1, 2, 3].map(|i| hands[Seat::new(i)].iter().map(|c| c.code()).collect())
}

fn hands_from_wire(hands: &[Vec<String>; 4]) -> Result<SeatMap<Vec<Card>>, MalformedInput> {
    let mut out: SeatMap<Vec<Card>> = SeatMap::default();
    for (i, codes) in hands.iter().enumerate() {
        out[Seat::new(i as u8)] = cards_from_wire(codes)?;
    }
    Ok(out)
}
