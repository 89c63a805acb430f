// Tank-policy analysis: which results and games help the reference team
// finish lower in the standings and improve its draft lottery odds.
//
// The ideal winner always denotes the team we want to WIN. When the
// reference team plays, that is the opponent.

use tracing::debug;

use super::{kickoff, team_in_range, Cheer, Mood};
use crate::model::{Game, Info, Standing, Team, TeamRef};

// ---------------------------------------------------------------------------
// Matchup
// ---------------------------------------------------------------------------

/// A relevant game with its tank-policy verdict frozen in.
#[derive(Debug, Clone)]
pub struct Matchup {
    pub game: Game,
    pub ideal_winner: TeamRef,
    /// Both participants are independently within reach of the reference
    /// team. Signals the overtime-bonus scenario: two rivals splitting
    /// points beats either taking two.
    pub both_in_range: bool,
    pub my_team_involved: bool,
    /// Kickoff time, "HH:MM".
    pub time: String,
}

impl super::Matchup for Matchup {
    fn game(&self) -> &Game {
        &self.game
    }

    fn ideal_winner(&self) -> &TeamRef {
        &self.ideal_winner
    }

    fn cheer(&self) -> Cheer {
        Cheer {
            team: self.ideal_winner.clone(),
            overtime: self.both_in_range && !self.my_team_involved,
        }
    }

    fn mood(&self) -> Mood {
        let winner = self.game.winner().unwrap_or_else(|| {
            panic!(
                "mood of an unfinished game: {} at {}",
                self.game.away.code, self.game.home.code
            )
        });
        let overtime = self.game.score.map(|s| s.overtime).unwrap_or(false);
        let ideal_won = **winner == *self.ideal_winner;

        if self.my_team_involved {
            if ideal_won {
                // The reference team lost. A regulation loss banks nothing;
                // an overtime loss still hands us a point.
                if overtime {
                    Mood::Good
                } else {
                    Mood::Great
                }
            } else {
                // The reference team won. Worst case it also dragged an
                // in-range rival into overtime, gifting them a point.
                if self.both_in_range && overtime {
                    Mood::Worst
                } else {
                    Mood::Bad
                }
            }
        } else if ideal_won {
            if self.both_in_range && overtime {
                Mood::Great
            } else {
                Mood::Good
            }
        } else if self.both_in_range && overtime {
            // The ideal side lost but still got its overtime point.
            Mood::Bad
        } else {
            Mood::Worst
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Tank analysis for one reference team over one snapshot: last night's
/// relevant results, tonight's relevant games, and the in-range slice of
/// the standings.
#[derive(Debug)]
pub struct Analysis<'a> {
    info: &'a Info,
    pub my_team: TeamRef,
    pub reach: u32,
    pub my_result: Option<Matchup>,
    pub results: Vec<Matchup>,
    pub my_game: Option<Matchup>,
    pub games: Vec<Matchup>,
    pub standings: Vec<Standing>,
}

impl<'a> Analysis<'a> {
    pub fn new(info: &'a Info, my_team: TeamRef, reach: u32) -> Self {
        let (my_result, results) = compute_matchups(info, &my_team, reach, &info.results, true);
        let (my_game, games) = compute_matchups(info, &my_team, reach, &info.games, false);
        let standings = info
            .standings
            .iter()
            .filter(|s| team_in_range(info, &my_team, &s.team, reach, false))
            .cloned()
            .collect();

        Analysis {
            info,
            my_team,
            reach,
            my_result,
            results,
            my_game,
            games,
            standings,
        }
    }

    pub fn is_team_in_range(&self, other: &Team) -> bool {
        team_in_range(self.info, &self.my_team, other, self.reach, false)
    }

    pub fn is_game_relevant(&self, game: &Game) -> bool {
        is_game_relevant(self.info, &self.my_team, self.reach, game, false)
    }
}

fn is_game_relevant(info: &Info, my_team: &Team, reach: u32, game: &Game, past: bool) -> bool {
    game.involves(my_team)
        || team_in_range(info, my_team, &game.home, reach, past)
        || team_in_range(info, my_team, &game.away, reach, past)
}

/// Split a slate into the reference team's own matchup and everything else,
/// preserving schedule order.
fn compute_matchups(
    info: &Info,
    my_team: &TeamRef,
    reach: u32,
    games: &[Game],
    past: bool,
) -> (Option<Matchup>, Vec<Matchup>) {
    let mut mine = None;
    let mut others = Vec::new();

    for game in games {
        if !is_game_relevant(info, my_team, reach, game, past) {
            debug!(
                away = %game.away.code,
                home = %game.home.code,
                "skipping out-of-range game"
            );
            continue;
        }
        let m = matchup_from_game(info, my_team, reach, game, past);
        if game.involves(my_team) {
            mine = Some(m);
        } else {
            others.push(m);
        }
    }

    (mine, others)
}

fn matchup_from_game(
    info: &Info,
    my_team: &TeamRef,
    reach: u32,
    game: &Game,
    past: bool,
) -> Matchup {
    let my_team_involved = game.involves(my_team);
    let both_in_range = team_in_range(info, my_team, &game.home, reach, past)
        && team_in_range(info, my_team, &game.away, reach, past);

    let ideal_winner = if my_team_involved {
        // We want to lose, so the opponent should win.
        game.opponent_of(my_team)
            .expect("involved game has an opponent")
            .clone()
    } else {
        lower_seeded(info, game, past).clone()
    };

    Matchup {
        game: game.clone(),
        ideal_winner,
        both_in_range,
        my_team_involved,
        time: kickoff(game),
    }
}

/// The participant with the lower point total. Ties break to fewer wins,
/// then to the away side.
fn lower_seeded<'g>(info: &Info, game: &'g Game, past: bool) -> &'g TeamRef {
    let home = info.standing(&game.home, past);
    let away = info.standing(&game.away, past);
    if (home.points, home.wins) < (away.points, away.wins) {
        &game.home
    } else {
        &game.away
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
