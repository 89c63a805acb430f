// Monte-Carlo season completion. Estimates playoff odds by replaying the
// rest of the schedule thousands of times from each team's observed
// win/loss/OT frequencies, and picks the single-game outcome that most
// raises the reference team's odds.
//
// Trials run strictly sequentially over one reusable scratch buffer; the
// buffer is restored from the original lines before every trial.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::model::{Game, Standing, Team, TeamRef};

pub const DEFAULT_TRIALS: u32 = 5000;

const SEASON_GAMES: u32 = 82;
const PLAYOFF_SPOTS: usize = 8;

// ---------------------------------------------------------------------------
// Outcomes and odds
// ---------------------------------------------------------------------------

/// One simulated game from a team's perspective. Point values keep the
/// league formula `points == 2 * wins + ot` true for simulated lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Win,
    Loss,
    Ot,
}

impl Outcome {
    fn points(self) -> u32 {
        match self {
            Outcome::Win => 2,
            Outcome::Loss => 0,
            Outcome::Ot => 1,
        }
    }

    fn wins(self) -> u32 {
        (self == Outcome::Win) as u32
    }

    fn losses(self) -> u32 {
        (self == Outcome::Loss) as u32
    }

    fn ot(self) -> u32 {
        (self == Outcome::Ot) as u32
    }
}

/// Per-team outcome frequencies drawn from the season so far.
#[derive(Debug, Clone, Copy)]
struct Odds {
    win: f64,
    loss: f64,
    ot: f64,
}

impl Odds {
    fn from_line(line: &SimStanding) -> Odds {
        if line.games_played == 0 {
            // No record yet: coin-flip season.
            return Odds {
                win: 1.0,
                loss: 1.0,
                ot: 1.0,
            };
        }
        let gp = f64::from(line.games_played);
        Odds {
            win: f64::from(line.wins) / gp,
            loss: f64::from(line.losses) / gp,
            ot: f64::from(line.ot) / gp,
        }
    }

    fn draw(&self, rng: &mut impl Rng) -> Outcome {
        let roll = rng.gen::<f64>() * (self.win + self.loss + self.ot);
        if roll < self.win {
            Outcome::Win
        } else if roll < self.win + self.loss {
            Outcome::Loss
        } else {
            Outcome::Ot
        }
    }
}

// ---------------------------------------------------------------------------
// Season simulation
// ---------------------------------------------------------------------------

/// A standings line reduced to the fields the simulation mutates.
#[derive(Debug, Clone)]
struct SimStanding {
    team: TeamRef,
    games_played: u32,
    points: u32,
    wins: u32,
    losses: u32,
    ot: u32,
}

impl SimStanding {
    fn from_standing(s: &Standing) -> Self {
        SimStanding {
            team: s.team.clone(),
            games_played: s.games_played,
            points: s.points,
            wins: s.wins,
            losses: s.losses,
            ot: s.ot,
        }
    }

    fn apply(&mut self, outcome: Outcome) {
        self.games_played += 1;
        self.points += outcome.points();
        self.wins += outcome.wins();
        self.losses += outcome.losses();
        self.ot += outcome.ot();
    }
}

struct SeasonSim {
    orig: Vec<SimStanding>,
    work: Vec<SimStanding>,
    playoff_teams: HashSet<u32>,
}

impl SeasonSim {
    fn new(lines: Vec<SimStanding>) -> Self {
        SeasonSim {
            work: lines.clone(),
            orig: lines,
            playoff_teams: HashSet::new(),
        }
    }

    /// Restore the scratch buffer from the original lines. Must run before
    /// each trial so no trial observes another's mutations.
    fn reset(&mut self) {
        for (orig, work) in self.orig.iter().zip(self.work.iter_mut()) {
            work.games_played = orig.games_played;
            work.points = orig.points;
            work.wins = orig.wins;
            work.losses = orig.losses;
            work.ot = orig.ot;
        }
        self.playoff_teams.clear();
    }

    /// Play one trial: every team finishes its 82 games, divisions send
    /// their top three, conferences fill out to eight.
    fn run(&mut self, rng: &mut impl Rng) {
        self.reset();

        for line in &mut self.work {
            let odds = Odds::from_line(line);
            while line.games_played < SEASON_GAMES {
                line.apply(odds.draw(rng));
            }
        }

        let mut divisions: HashMap<&str, Vec<&SimStanding>> = HashMap::new();
        let mut conferences: HashMap<&str, Vec<&SimStanding>> = HashMap::new();
        for line in &self.work {
            divisions
                .entry(line.team.division.as_str())
                .or_default()
                .push(line);
            conferences
                .entry(line.team.conference.as_str())
                .or_default()
                .push(line);
        }

        let by_record =
            |a: &&SimStanding, b: &&SimStanding| (b.points, b.wins).cmp(&(a.points, a.wins));
        for list in divisions.values_mut() {
            list.sort_by(by_record);
        }
        for list in conferences.values_mut() {
            list.sort_by(by_record);
        }

        let mut filled: HashMap<&str, usize> = HashMap::new();
        for list in divisions.values() {
            for line in list.iter().take(3) {
                self.playoff_teams.insert(line.team.id);
                *filled.entry(line.team.conference.as_str()).or_insert(0) += 1;
            }
        }

        for (conf, list) in &conferences {
            let mut taken = filled.get(conf).copied().unwrap_or(0);
            for line in list {
                if taken >= PLAYOFF_SPOTS {
                    break;
                }
                if self.playoff_teams.insert(line.team.id) {
                    taken += 1;
                }
            }
        }
    }

    fn made_playoffs(&self, team: &Team) -> bool {
        self.playoff_teams.contains(&team.id)
    }
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// Reusable simulation harness with a fixed trial count. Seed it for
/// reproducible recommendations.
pub struct Simulator {
    trials: u32,
    rng: StdRng,
}

impl Simulator {
    pub fn new(trials: u32) -> Self {
        Simulator {
            trials,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(trials: u32, seed: u64) -> Self {
        Simulator {
            trials,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fraction of trials in which `team` makes the playoffs, in [0, 1].
    pub fn playoff_probability(&mut self, team: &Team, standings: &[Standing]) -> f64 {
        let lines = standings.iter().map(SimStanding::from_standing).collect();
        self.estimate(team, lines)
    }

    /// The participant whose win leaves `my_team` with the better simulated
    /// playoff odds. Ties go to the away side (a road win takes two points
    /// off a conference host).
    pub fn ideal_winner(&mut self, my_team: &Team, game: &Game, standings: &[Standing]) -> TeamRef {
        let home_win = self.estimate(my_team, branch(standings, &game.home, &game.away));
        let away_win = self.estimate(my_team, branch(standings, &game.away, &game.home));
        debug!(
            away = %game.away.code,
            home = %game.home.code,
            away_win,
            home_win,
            "simulated playoff odds per outcome"
        );
        if home_win > away_win {
            game.home.clone()
        } else {
            game.away.clone()
        }
    }

    fn estimate(&mut self, team: &Team, lines: Vec<SimStanding>) -> f64 {
        let mut sim = SeasonSim::new(lines);
        let mut made = 0u32;
        for _ in 0..self.trials {
            sim.run(&mut self.rng);
            if sim.made_playoffs(team) {
                made += 1;
            }
        }
        f64::from(made) / f64::from(self.trials)
    }
}

/// Copy of the standings with one hypothetical regulation game applied.
fn branch(standings: &[Standing], winner: &Team, loser: &Team) -> Vec<SimStanding> {
    let mut lines: Vec<SimStanding> = standings.iter().map(SimStanding::from_standing).collect();
    for line in &mut lines {
        if *line.team == *winner {
            line.apply(Outcome::Win);
        } else if *line.team == *loser {
            line.apply(Outcome::Loss);
        }
    }
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
