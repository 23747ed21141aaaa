//! The auction: bids, passes, and the declarer's contract choice.
//!
//! Bidding starts right of the dealer and each seat acts once per round.
//! In the first round a seat may take Hokm in the floor suit (only while no
//! bid stands), bid Sun, or pass. If all four pass, a second round opens in
//! which Hokm may name any other suit. Sun and Ashkal close the auction at
//! once; otherwise it closes at the end of a round in which a bid stands.
//! Two rounds of passes throw the deal in.

use smallvec::SmallVec;
use tracing::debug;

use crate::core::{
    Action, Auction, AuctionStage, Bid, BiddingRound, Contract, ContractChoice, GameState, Mode,
    OpeningLeader, Phase, RulesConfig, Seat, StandingBid, Suit, SEATS,
};

/// Whether `seat` may bid Ashkal. Only the last two seats to bid may.
fn may_bid_ashkal(seat: Seat, dealer: Seat, config: &RulesConfig) -> bool {
    config.allow_ashkal && (seat == dealer || seat == dealer.offset(3))
}

/// Legal bids and passes for the current player while bidding is open.
pub(crate) fn legal_calls(
    state: &GameState,
    auction: &Auction,
    round: BiddingRound,
    config: &RulesConfig,
) -> Vec<Action> {
    let player = state.current_player();
    let mut actions = vec![Action::Pass { player }];

    if auction.standing.is_none() {
        let bid = match round {
            BiddingRound::First => Bid::Hokm,
            BiddingRound::Second => Bid::HokmThani,
        };
        actions.push(Action::Bid { player, bid });
    }

    let sun_standing = auction.standing.is_some_and(|s| s.bid.is_sun_level());
    if !sun_standing {
        actions.push(Action::Bid { player, bid: Bid::Sun });
        if may_bid_ashkal(player, state.dealer(), config) {
            actions.push(Action::Bid {
                player,
                bid: Bid::Ashkal,
            });
        }
    }

    actions
}

/// Contract choices open to the winner of the auction.
///
/// ```
/// use baloot_engine::core::{Bid, Mode, Seat, StandingBid, Suit};
/// use baloot_engine::rules::contract_choices;
///
/// let standing = StandingBid { bidder: Seat::new(1), bid: Bid::Ashkal };
/// let choices = contract_choices(standing, Suit::Hearts);
///
/// assert_eq!(choices.len(), 1);
/// assert_eq!(choices[0].mode, Mode::Sun);
/// assert_eq!(choices[0].floor_taker, Seat::new(3));
/// ```
#[must_use]
pub fn contract_choices(standing: StandingBid, floor_suit: Suit) -> SmallVec<[ContractChoice; 3]> {
    let bidder = standing.bidder;
    match standing.bid {
        Bid::Hokm => SmallVec::from_elem(ContractChoice::new(Mode::Hokm(floor_suit), bidder), 1),
        Bid::HokmThani => Suit::ALL
            .iter()
            .filter(|&&s| s != floor_suit)
            .map(|&s| ContractChoice::new(Mode::Hokm(s), bidder))
            .collect(),
        Bid::Sun => SmallVec::from_elem(ContractChoice::new(Mode::Sun, bidder), 1),
        Bid::Ashkal => SmallVec::from_elem(ContractChoice::new(Mode::Sun, bidder.partner()), 1),
    }
}

/// Legal finalize actions once the auction has closed.
pub(crate) fn legal_finalizations(state: &GameState, auction: &Auction) -> Vec<Action> {
    let (Some(standing), Some(floor)) = (auction.standing, state.floor_card()) else {
        return Vec::new();
    };
    contract_choices(standing, floor.suit())
        .into_iter()
        .map(|contract| Action::FinalizeContract {
            player: standing.bidder,
            contract,
        })
        .collect()
}

/// Apply a legal bid or pass.
pub(crate) fn apply_call(
    state: &GameState,
    auction: &Auction,
    seat: Seat,
    bid: Option<Bid>,
) -> GameState {
    let mut next = state.clone();
    let mut auction = *auction;

    if let Some(bid) = bid {
        auction.standing = Some(StandingBid { bidder: seat, bid });
    }
    auction.turns_taken += 1;

    let round_over = auction.turns_taken as usize == SEATS;
    let sun_called = bid.is_some_and(Bid::is_sun_level);

    if sun_called || (round_over && auction.standing.is_some()) {
        if let Some(standing) = auction.standing {
            auction.stage = AuctionStage::AwaitingContract;
            next.current_player = standing.bidder;
            debug!(bidder = %standing.bidder, bid = %standing.bid, "auction closed");
        }
    } else if round_over {
        match auction.stage {
            AuctionStage::Open(BiddingRound::First) => {
                auction.stage = AuctionStage::Open(BiddingRound::Second);
                auction.turns_taken = 0;
                next.current_player = seat.next();
                debug!("all passed, second bidding round");
            }
            _ => {
                auction.stage = AuctionStage::AllPassed;
                next.current_player = seat.next();
                debug!(dealer = %state.dealer(), "all passed twice, deal thrown in");
            }
        }
    } else {
        next.current_player = seat.next();
    }

    next.auction = Some(auction);
    next
}

/// Apply a legal contract choice: hand out the floor card and the stock and
/// start play.
pub(crate) fn apply_finalize(
    state: &GameState,
    declarer: Seat,
    choice: ContractChoice,
    config: &RulesConfig,
) -> GameState {
    let mut next = state.clone();

    if let Some(floor) = next.floor_card.take() {
        next.hands[choice.floor_taker].push_back(floor);
    }

    // Top every hand up to full size, dealing around from right of the dealer.
    let full = next.full_hand_size();
    for seat in next.dealer.next().from_here() {
        while next.hands[seat].len() < full {
            let Some(card) = next.stock.pop_front() else {
                break;
            };
            next.hands[seat].push_back(card);
        }
    }

    next.contract = Some(Contract {
        mode: choice.mode,
        declarer,
        floor_taker: choice.floor_taker,
    });
    next.auction = None;
    next.phase = Phase::Playing;
    next.current_player = match config.opening_leader {
        OpeningLeader::FloorTaker => choice.floor_taker,
        OpeningLeader::RightOfDealer => next.dealer.next(),
    };

    debug!(
        mode = %choice.mode,
        declarer = %declarer,
        floor_taker = %choice.floor_taker,
        leader = %next.current_player,
        "contract finalized"
    );
    next
}
