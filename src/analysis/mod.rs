// Matchup analysis engine. The two policies (tank, playoff race) share the
// mood/cheer surface and the point-range relevance filter; everything else
// lives in the policy modules.

pub mod playoffs;
pub mod simulation;
pub mod tank;

use std::fmt;

use crate::model::{Game, Info, Team, TeamRef};

/// Default point gap beyond which another team stops being relevant.
pub const DEFAULT_REACH: u32 = 10;

// ---------------------------------------------------------------------------
// Mood and cheer
// ---------------------------------------------------------------------------

/// Discrete satisfaction rating of a completed game against its ideal
/// outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Mood {
    Worst,
    Bad,
    Neutral,
    Good,
    Great,
    NotRelevant,
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mood::Worst => "Worst",
            Mood::Bad => "Bad",
            Mood::Neutral => "Neutral",
            Mood::Good => "Good",
            Mood::Great => "Great",
            Mood::NotRelevant => "Not relevant",
        };
        write!(f, "{label}")
    }
}

/// Tonight's rooting interest: the team to cheer for, and whether the best
/// case is the game reaching overtime (two in-range rivals splitting
/// points).
#[derive(Debug, Clone)]
pub struct Cheer {
    pub team: TeamRef,
    pub overtime: bool,
}

// ---------------------------------------------------------------------------
// Matchup capability
// ---------------------------------------------------------------------------

/// What both policy matchups expose to the renderer. All derived state is
/// frozen when the matchup is built; `cheer` and `mood` are pure reads.
pub trait Matchup {
    fn game(&self) -> &Game;

    /// The team whose win most benefits the reference team. Frozen at
    /// construction from the standings snapshot of the matchup's slate.
    fn ideal_winner(&self) -> &TeamRef;

    fn cheer(&self) -> Cheer;

    /// Mood of a completed game.
    ///
    /// Panics when the wrapped game has no final score; calling this on
    /// tonight's slate is a caller bug.
    fn mood(&self) -> Mood;
}

// ---------------------------------------------------------------------------
// Relevance filter
// ---------------------------------------------------------------------------

/// Whether `other` is within analytical reach of `reference`: itself,
/// trailing or tied, or within `reach` points either direction. Checks use
/// the snapshot matching the slate (`past` for last night's results).
pub fn team_in_range(
    info: &Info,
    reference: &Team,
    other: &Team,
    reach: u32,
    past: bool,
) -> bool {
    if reference == other {
        return true;
    }
    let my_points = info.standing(reference, past).points;
    let other_points = info.standing(other, past).points;
    other_points <= my_points || my_points.abs_diff(other_points) <= reach
}

/// Kickoff time as rendered in the report tables.
pub(crate) fn kickoff(game: &Game) -> String {
    game.time.format("%H:%M").to_string()
}
