//! Value types shared by every stage of a tournament.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque competitor identifier assigned by whatever store owns the players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitorId(pub u32);

impl fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TournamentId(pub u32);

impl fmt::Display for TournamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a competitor as it appears in pairings and brackets.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entrant {
    pub id: CompetitorId,
    pub name: String,
}

impl Entrant {
    pub fn new(id: CompetitorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A competitor's standing at the start of a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorSnapshot {
    pub id: CompetitorId,
    pub name: String,
    pub wins: u32,
    pub matches_played: u32,
    /// Accumulated points, supplied by the store. Pairing ignores it; the
    /// qualifier cutoff uses it for the opponent-strength tie-break.
    #[serde(default)]
    pub points: u32,
}

impl CompetitorSnapshot {
    pub fn new(id: CompetitorId, name: impl Into<String>, wins: u32, matches_played: u32) -> Self {
        Self {
            id,
            name: name.into(),
            wins,
            matches_played,
            points: 0,
        }
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    pub fn entrant(&self) -> Entrant {
        Entrant::new(self.id, self.name.clone())
    }
}

/// The losing side of a match record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opponent {
    Competitor(CompetitorId),
    /// No opponent: the winner received a bye.
    Bye,
}

impl Opponent {
    pub fn competitor(self) -> Option<CompetitorId> {
        match self {
            Opponent::Competitor(id) => Some(id),
            Opponent::Bye => None,
        }
    }
}

/// A reported match. Append-only once written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub tournament: TournamentId,
    pub round: u32,
    pub date: DateTime<Utc>,
    pub winner: CompetitorId,
    pub loser: Opponent,
}

impl MatchRecord {
    pub fn new(
        tournament: TournamentId,
        round: u32,
        winner: CompetitorId,
        loser: CompetitorId,
    ) -> Self {
        Self {
            tournament,
            round,
            date: Utc::now(),
            winner,
            loser: Opponent::Competitor(loser),
        }
    }

    pub fn bye(tournament: TournamentId, round: u32, winner: CompetitorId) -> Self {
        Self {
            tournament,
            round,
            date: Utc::now(),
            winner,
            loser: Opponent::Bye,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.loser == Opponent::Bye
    }

    pub fn involves(&self, id: CompetitorId) -> bool {
        self.winner == id || self.loser == Opponent::Competitor(id)
    }

    /// The other participant, if `id` took part and the match was not a bye.
    pub fn opponent_of(&self, id: CompetitorId) -> Option<CompetitorId> {
        let loser = self.loser.competitor()?;
        if self.winner == id {
            Some(loser)
        } else if loser == id {
            Some(self.winner)
        } else {
            None
        }
    }
}

/// Marker granting pairing priority in rounds after a bye.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByeCredit {
    pub competitor: CompetitorId,
    pub round_awarded: u32,
}

/// Two entrants meeting in a round. Order carries no meaning in Swiss
/// rounds; in bracket rounds `first` is the better seed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub first: Entrant,
    pub second: Entrant,
}

impl Pairing {
    pub fn new(first: Entrant, second: Entrant) -> Self {
        Self { first, second }
    }

    pub fn ids(&self) -> [CompetitorId; 2] {
        [self.first.id, self.second.id]
    }

    pub fn involves(&self, id: CompetitorId) -> bool {
        self.first.id == id || self.second.id == id
    }

    pub fn is_between(&self, a: CompetitorId, b: CompetitorId) -> bool {
        (self.first.id == a && self.second.id == b) || (self.first.id == b && self.second.id == a)
    }

    /// The entrant facing `id`, if `id` is in this pairing.
    pub fn opponent_of(&self, id: CompetitorId) -> Option<&Entrant> {
        if self.first.id == id {
            Some(&self.second)
        } else if self.second.id == id {
            Some(&self.first)
        } else {
            None
        }
    }
}

impl fmt::Display for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) vs {} ({})",
            self.first.name, self.first.id, self.second.name, self.second.id
        )
    }
}
