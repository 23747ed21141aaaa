//! Seat identification, partnerships, and per-seat data storage.
//!
//! ## Seat
//!
//! Type-safe seat identifier for the four players at the table. Seats are
//! 0-based and play proceeds in increasing order, wrapping from 3 to 0.
//!
//! ## Team
//!
//! Partners sit opposite each other: seats 0 and 2 form team 0, seats 1 and 3
//! form team 1.
//!
//! ## SeatMap
//!
//! Fixed four-entry storage indexed by `Seat`. Backed by an array, so cloning
//! a `SeatMap` of persistent vectors only bumps reference counts.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of players at a Baloot table.
pub const SEATS: usize = 4;

/// Seat identifier, `0..=3`.
///
/// The inner value is public so wire data can be carried through unchecked;
/// the transition function rejects out-of-range seats as malformed input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Seat(pub u8);

impl Seat {
    /// Create a new seat.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this seat exists at a four-player table.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        (self.0 as usize) < SEATS
    }

    /// The seat that acts after this one.
    ///
    /// ```
    /// use baloot_engine::core::Seat;
    ///
    /// assert_eq!(Seat::new(0).next(), Seat::new(1));
    /// assert_eq!(Seat::new(3).next(), Seat::new(0));
    /// ```
    #[must_use]
    pub const fn next(self) -> Self {
        self.offset(1)
    }

    /// The seat `steps` places after this one in turn order.
    #[must_use]
    pub const fn offset(self, steps: u8) -> Self {
        Self(((self.0 as usize + steps as usize) % SEATS) as u8)
    }

    /// The seat sitting opposite (same team).
    #[must_use]
    pub const fn partner(self) -> Self {
        self.offset(2)
    }

    /// The team this seat plays for.
    #[must_use]
    pub const fn team(self) -> Team {
        Team(self.0 % 2)
    }

    /// Iterate over all four seats in order.
    pub fn all() -> impl Iterator<Item = Seat> {
        (0..SEATS as u8).map(Seat)
    }

    /// Iterate over all four seats in turn order starting at `self`.
    pub fn from_here(self) -> impl Iterator<Item = Seat> {
        (0..SEATS as u8).map(move |step| self.offset(step))
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// A partnership: team 0 holds seats 0 and 2, team 1 holds seats 1 and 3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Team(u8);

impl Team {
    /// Seats 0 and 2.
    pub const EVEN: Team = Team(0);
    /// Seats 1 and 3.
    pub const ODD: Team = Team(1);

    /// Raw team index (0 or 1).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The two seats of this team.
    #[must_use]
    pub const fn members(self) -> [Seat; 2] {
        [Seat(self.0), Seat(self.0 + 2)]
    }

    /// The opposing team.
    #[must_use]
    pub const fn opponent(self) -> Team {
        Team(1 - self.0)
    }

    /// Both teams.
    pub fn both() -> [Team; 2] {
        [Team::EVEN, Team::ODD]
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team {}", self.0)
    }
}

/// Per-seat data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use baloot_engine::core::{Seat, SeatMap};
///
/// let mut tricks: SeatMap<u8> = SeatMap::with_value(0);
/// tricks[Seat::new(2)] += 1;
///
/// assert_eq!(tricks[Seat::new(2)], 1);
/// assert_eq!(tricks.iter().map(|(_, n)| *n).sum::<u8>(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: [T; SEATS],
}

impl<T> SeatMap<T> {
    /// Create a new SeatMap with values from a factory function.
    pub fn new(factory: impl Fn(Seat) -> T) -> Self {
        Self {
            data: [
                factory(Seat(0)),
                factory(Seat(1)),
                factory(Seat(2)),
                factory(Seat(3)),
            ],
        }
    }

    /// Create from an array indexed by seat.
    pub fn from_array(data: [T; SEATS]) -> Self {
        Self { data }
    }

    /// Create a new SeatMap with all entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, seat: Seat) -> &T {
        &self.data[seat.index()]
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, seat: Seat) -> &mut T {
        &mut self.data[seat.index()]
    }

    /// Iterate over (Seat, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (Seat(i as u8), v))
    }

    /// Iterate over the values in seat order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Map every entry to a new value.
    pub fn map<U>(&self, f: impl Fn(Seat, &T) -> U) -> SeatMap<U> {
        SeatMap::new(|seat| f(seat, &self.data[seat.index()]))
    }
}

impl<T: Default> Default for SeatMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        self.get(seat)
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        self.get_mut(seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_basics() {
        let s0 = Seat::new(0);
        let s3 = Seat::new(3);

        assert_eq!(s0.index(), 0);
        assert_eq!(s3.next(), s0);
        assert_eq!(s0.partner(), Seat::new(2));
        assert_eq!(format!("{}", s3), "Seat 3");
        assert!(!Seat::new(4).is_valid());
    }

    #[test]
    fn test_seat_from_here_wraps() {
        let order: Vec<_> = Seat::new(2).from_here().collect();
        assert_eq!(order, vec![Seat::new(2), Seat::new(3), Seat::new(0), Seat::new(1)]);
    }

    #[test]
    fn test_teams() {
        assert_eq!(Seat::new(0).team(), Team::EVEN);
        assert_eq!(Seat::new(2).team(), Team::EVEN);
        assert_eq!(Seat::new(1).team(), Team::ODD);
        assert_eq!(Seat::new(3).team(), Team::ODD);

        assert_eq!(Team::ODD.members(), [Seat::new(1), Seat::new(3)]);
        assert_eq!(Team::EVEN.opponent(), Team::ODD);
    }

    #[test]
    fn test_seat_map_new() {
        let map: SeatMap<i32> = SeatMap::new(|s| s.index() as i32 * 10);

        assert_eq!(map[Seat::new(0)], 0);
        assert_eq!(map[Seat::new(1)], 10);
        assert_eq!(map[Seat::new(3)], 30);
    }

    #[test]
    fn test_seat_map_mutation_and_map() {
        let mut map: SeatMap<i32> = SeatMap::default();
        map[Seat::new(1)] = 7;

        let doubled = map.map(|_, v| v * 2);
        assert_eq!(doubled[Seat::new(1)], 14);
        assert_eq!(doubled[Seat::new(0)], 0);
    }

    #[test]
    fn test_seat_map_serialization() {
        let map: SeatMap<u8> = SeatMap::new(|s| s.0 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: SeatMap<u8> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
