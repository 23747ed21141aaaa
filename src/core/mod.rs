//! Core engine types: cards, seats, actions, deals, snapshots, configuration.
//!
//! Everything here is plain data. The rules that move a snapshot forward live
//! in `crate::rules`.

pub mod action;
pub mod card;
pub mod config;
pub mod deal;
pub mod error;
pub mod rng;
pub mod seat;
pub mod state;

pub use action::{Action, Bid, ContractChoice, Mode};
pub use card::{Card, Rank, Suit};
pub use config::{ConfigError, OpeningLeader, RankLadder, RulesConfig, TrumpRules};
pub use deal::{Deal, PlayingDeal, CARDS_BEFORE_AUCTION};
pub use error::{ApplyError, IllegalReason, MalformedInput};
pub use rng::GameRng;
pub use seat::{Seat, SeatMap, Team, SEATS};
pub use state::{
    Auction, AuctionStage, BiddingRound, CompletedTrick, Contract, GameState, InvariantViolation,
    Phase, Play, StandingBid, Trick,
};
