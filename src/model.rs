// League snapshot model: teams, standings, games, and the Info bundle the
// analysis engine runs against.
//
// Everything here is built once per run from fetched data and treated as
// read-only afterwards. Derived values (record string, 82-game projection,
// a result's winner) are computed at construction and never recomputed.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate};
use thiserror::Error;

/// Teams are shared between the snapshot, games, and derived matchups.
pub type TeamRef = Arc<Team>;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("tied score {score}-{score} in {away} at {home}; final games cannot tie")]
    TiedScore {
        home: String,
        away: String,
        score: u32,
    },

    #[error("result {away} at {home} has no final score")]
    UnscoredResult { home: String, away: String },

    #[error("no {snapshot} standing for team `{code}`")]
    MissingStanding {
        code: String,
        snapshot: &'static str,
    },

    #[error("game participant `{code}` is not part of the snapshot's team list")]
    UnknownTeam { code: String },
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// A league team. Equality and hashing go by `id` only; every other field is
/// display metadata that may differ between data sources.
#[derive(Debug, Clone)]
pub struct Team {
    pub id: u32,
    /// Short code, e.g. "MTL".
    pub code: String,
    /// Nickname, e.g. "Canadiens".
    pub name: String,
    /// Location, e.g. "Montréal".
    pub location: String,
    /// Full name, e.g. "Montréal Canadiens".
    pub fullname: String,
    pub division: String,
    pub conference: String,
    /// Fan subreddit used by the report renderer, when configured.
    pub subreddit: Option<String>,
}

impl PartialEq for Team {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Team {}

impl Hash for Team {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fullname)
    }
}

// ---------------------------------------------------------------------------
// Standing
// ---------------------------------------------------------------------------

/// One team's line in a standings snapshot.
///
/// `record`, `projection`, and `point_percent` are derived in `new` and
/// frozen. `seed` starts unset; the playoff classifier assigns per-list
/// seeds on its own copies.
#[derive(Debug, Clone)]
pub struct Standing {
    pub team: TeamRef,
    /// League-wide rank, 1-based.
    pub place: u32,
    pub games_played: u32,
    pub points: u32,
    pub wins: u32,
    pub losses: u32,
    pub ot: u32,
    /// Regulation + overtime wins, the standings tiebreaker metric.
    pub row: u32,
    /// Rolling last-10 record, "W-L-OT" or "N/A".
    pub last10: String,
    /// First-overall lottery odds in percent, 0.0 when the rank is beyond
    /// the configured table.
    pub odds: f64,
    pub seed: Option<u32>,
    pub record: String,
    /// Points pace over an 82-game season, rounded.
    pub projection: u32,
    pub point_percent: String,
}

impl Standing {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        team: TeamRef,
        place: u32,
        games_played: u32,
        points: u32,
        wins: u32,
        losses: u32,
        ot: u32,
        row: u32,
        last10: String,
        odds: f64,
    ) -> Self {
        debug_assert_eq!(
            points,
            2 * wins + ot,
            "league points formula violated for {}",
            team.code
        );

        let record = format!("{wins}-{losses}-{ot}");
        let (projection, point_percent) = if games_played == 0 {
            (0, "0.000".to_string())
        } else {
            let gp = f64::from(games_played);
            (
                (f64::from(points) / gp * 82.0).round() as u32,
                format!("{:.3}", f64::from(points) / (gp * 2.0)),
            )
        };

        Standing {
            team,
            place,
            games_played,
            points,
            wins,
            losses,
            ot,
            row,
            last10,
            odds,
            seed: None,
            record,
            projection,
            point_percent,
        }
    }

    /// Copy of this line with a per-list seed assigned.
    pub fn with_seed(&self, seed: u32) -> Standing {
        let mut line = self.clone();
        line.seed = Some(seed);
        line
    }
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// Final score of a completed game. Scores are never equal; the overtime
/// flag records how the tie was broken, not who won.
#[derive(Debug, Clone, Copy)]
pub struct Score {
    pub home: u32,
    pub away: u32,
    pub overtime: bool,
}

/// A scheduled game, or a completed one when `score` is set.
#[derive(Debug, Clone)]
pub struct Game {
    pub time: DateTime<Local>,
    pub home: TeamRef,
    pub away: TeamRef,
    pub score: Option<Score>,
}

impl Game {
    pub fn scheduled(time: DateTime<Local>, home: TeamRef, away: TeamRef) -> Self {
        Game {
            time,
            home,
            away,
            score: None,
        }
    }

    pub fn completed(
        time: DateTime<Local>,
        home: TeamRef,
        away: TeamRef,
        home_score: u32,
        away_score: u32,
        overtime: bool,
    ) -> Result<Self, ModelError> {
        if home_score == away_score {
            return Err(ModelError::TiedScore {
                home: home.code.clone(),
                away: away.code.clone(),
                score: home_score,
            });
        }
        Ok(Game {
            time,
            home,
            away,
            score: Some(Score {
                home: home_score,
                away: away_score,
                overtime,
            }),
        })
    }

    /// The winning side of a completed game; `None` while unplayed.
    pub fn winner(&self) -> Option<&TeamRef> {
        self.score.map(|s| {
            if s.home > s.away {
                &self.home
            } else {
                &self.away
            }
        })
    }

    pub fn involves(&self, team: &Team) -> bool {
        *self.home == *team || *self.away == *team
    }

    /// The other participant, when `team` plays in this game.
    pub fn opponent_of(&self, team: &Team) -> Option<&TeamRef> {
        if *self.home == *team {
            Some(&self.away)
        } else if *self.away == *team {
            Some(&self.home)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Info snapshot
// ---------------------------------------------------------------------------

/// Everything the analysis engine consumes for one run: the current and
/// previous-day standings, last night's results, and tonight's schedule.
///
/// `new` validates that every participant of every game has a standing in
/// both snapshots, so the lookup methods can be infallible afterwards.
#[derive(Debug)]
pub struct Info {
    pub date: NaiveDate,
    pub past_date: NaiveDate,
    pub teams: Vec<TeamRef>,
    pub standings: Vec<Standing>,
    pub past_standings: Vec<Standing>,
    /// Tonight's schedule, unscored.
    pub games: Vec<Game>,
    /// Last night's completed games.
    pub results: Vec<Game>,

    by_id: HashMap<u32, TeamRef>,
    by_code: HashMap<String, TeamRef>,
    current_index: HashMap<u32, usize>,
    past_index: HashMap<u32, usize>,
}

impl Info {
    pub fn new(
        date: NaiveDate,
        teams: Vec<TeamRef>,
        standings: Vec<Standing>,
        past_standings: Vec<Standing>,
        games: Vec<Game>,
        results: Vec<Game>,
    ) -> Result<Self, ModelError> {
        let by_id: HashMap<u32, TeamRef> = teams.iter().map(|t| (t.id, t.clone())).collect();
        let by_code: HashMap<String, TeamRef> = teams
            .iter()
            .map(|t| (t.code.to_lowercase(), t.clone()))
            .collect();
        let current_index = index_standings(&standings);
        let past_index = index_standings(&past_standings);

        for game in games.iter().chain(results.iter()) {
            for team in [&game.home, &game.away] {
                if !by_id.contains_key(&team.id) {
                    return Err(ModelError::UnknownTeam {
                        code: team.code.clone(),
                    });
                }
                if !current_index.contains_key(&team.id) {
                    return Err(ModelError::MissingStanding {
                        code: team.code.clone(),
                        snapshot: "current",
                    });
                }
                if !past_index.contains_key(&team.id) {
                    return Err(ModelError::MissingStanding {
                        code: team.code.clone(),
                        snapshot: "previous-day",
                    });
                }
            }
        }

        for result in &results {
            if result.score.is_none() {
                return Err(ModelError::UnscoredResult {
                    home: result.home.code.clone(),
                    away: result.away.code.clone(),
                });
            }
        }

        Ok(Info {
            date,
            past_date: date - chrono::Duration::days(1),
            teams,
            standings,
            past_standings,
            games,
            results,
            by_id,
            by_code,
            current_index,
            past_index,
        })
    }

    pub fn team_by_id(&self, id: u32) -> Option<&TeamRef> {
        self.by_id.get(&id)
    }

    pub fn team_by_code(&self, code: &str) -> Option<&TeamRef> {
        self.by_code.get(&code.to_lowercase())
    }

    /// Standing for `team` in the current or previous-day snapshot.
    ///
    /// Panics when the team has no line in that snapshot. Construction
    /// validates coverage for every game participant, so hitting the panic
    /// means the caller asked about a team from outside this snapshot.
    pub fn standing(&self, team: &Team, past: bool) -> &Standing {
        let (index, list, label) = if past {
            (&self.past_index, &self.past_standings, "previous-day")
        } else {
            (&self.current_index, &self.standings, "current")
        };
        match index.get(&team.id) {
            Some(&i) => &list[i],
            None => panic!("no {label} standing for team `{}`", team.code),
        }
    }
}

fn index_standings(standings: &[Standing]) -> HashMap<u32, usize> {
    standings
        .iter()
        .enumerate()
        .map(|(i, s)| (s.team.id, i))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn team(id: u32, code: &str) -> TeamRef {
        Arc::new(Team {
            id,
            code: code.to_string(),
            name: code.to_string(),
            location: "Test".to_string(),
            fullname: format!("Test {code}"),
            division: "Atlantic".to_string(),
            conference: "Eastern".to_string(),
            subreddit: None,
        })
    }

    /// Standing with a record that satisfies the league points formula.
    fn standing(team: &TeamRef, place: u32, points: u32, games_played: u32) -> Standing {
        let wins = points / 2;
        let ot = points % 2;
        let losses = games_played - wins - ot;
        Standing::new(
            team.clone(),
            place,
            games_played,
            points,
            wins,
            losses,
            ot,
            wins,
            "5-4-1".to_string(),
            0.0,
        )
    }

    fn game_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2018, 2, 10, 19, 0, 0).unwrap()
    }

    #[test]
    fn team_equality_by_id_only() {
        let a = team(8, "MTL");
        let mut other = (*team(8, "MTL")).clone();
        other.code = "XXX".to_string();
        other.fullname = "Someone Else".to_string();
        assert_eq!(*a, other);

        let b = team(9, "MTL");
        assert_ne!(*a, *b);
    }

    #[test]
    fn standing_derives_record_and_projection() {
        let t = team(1, "BUF");
        // 41 games, 15 wins, 5 OT losses -> 35 points.
        let s = Standing::new(
            t, 31, 41, 35, 15, 21, 5, 12, "3-6-1".to_string(), 18.5,
        );
        assert_eq!(s.record, "15-21-5");
        // 35 / 41 * 82 = 70
        assert_eq!(s.projection, 70);
        // 35 / 82 = 0.4268...
        assert_eq!(s.point_percent, "0.427");
        assert!(s.seed.is_none());
    }

    #[test]
    fn standing_with_zero_games() {
        let t = team(1, "BUF");
        let s = Standing::new(t, 1, 0, 0, 0, 0, 0, 0, "N/A".to_string(), 0.0);
        assert_eq!(s.projection, 0);
        assert_eq!(s.point_percent, "0.000");
    }

    #[test]
    fn with_seed_does_not_touch_the_original() {
        let t = team(1, "TBL");
        let s = standing(&t, 1, 80, 50);
        let seeded = s.with_seed(2);
        assert_eq!(seeded.seed, Some(2));
        assert!(s.seed.is_none());
    }

    #[test]
    fn winner_is_higher_score() {
        let home = team(1, "MTL");
        let away = team(2, "BOS");
        let g = Game::completed(game_time(), home.clone(), away.clone(), 5, 2, false).unwrap();
        assert_eq!(g.winner().unwrap().id, home.id);

        let g = Game::completed(game_time(), home, away.clone(), 2, 3, true).unwrap();
        assert_eq!(g.winner().unwrap().id, away.id);
    }

    #[test]
    fn tied_score_is_rejected() {
        let home = team(1, "MTL");
        let away = team(2, "BOS");
        let err = Game::completed(game_time(), home, away, 3, 3, true).unwrap_err();
        assert!(matches!(err, ModelError::TiedScore { .. }));
    }

    #[test]
    fn scheduled_game_has_no_winner() {
        let g = Game::scheduled(game_time(), team(1, "MTL"), team(2, "BOS"));
        assert!(g.winner().is_none());
        assert!(g.score.is_none());
    }

    #[test]
    fn opponent_of_participants() {
        let home = team(1, "MTL");
        let away = team(2, "BOS");
        let g = Game::scheduled(game_time(), home.clone(), away.clone());
        assert_eq!(g.opponent_of(&home).unwrap().id, away.id);
        assert_eq!(g.opponent_of(&away).unwrap().id, home.id);
        assert!(g.opponent_of(&team(3, "TOR")).is_none());
    }

    #[test]
    fn info_lookups() {
        let mtl = team(1, "MTL");
        let bos = team(2, "BOS");
        let standings = vec![standing(&bos, 1, 60, 40), standing(&mtl, 2, 50, 40)];
        let past = vec![standing(&bos, 1, 58, 39), standing(&mtl, 2, 50, 39)];
        let info = Info::new(
            NaiveDate::from_ymd_opt(2018, 2, 10).unwrap(),
            vec![mtl.clone(), bos.clone()],
            standings,
            past,
            vec![],
            vec![],
        )
        .unwrap();

        assert_eq!(info.past_date, NaiveDate::from_ymd_opt(2018, 2, 9).unwrap());
        assert_eq!(info.team_by_code("mtl").unwrap().id, 1);
        assert_eq!(info.team_by_code("MTL").unwrap().id, 1);
        assert!(info.team_by_code("wpg").is_none());
        assert_eq!(info.team_by_id(2).unwrap().code, "BOS");

        assert_eq!(info.standing(&mtl, false).points, 50);
        assert_eq!(info.standing(&bos, true).points, 58);
    }

    #[test]
    fn info_rejects_participant_without_standing() {
        let mtl = team(1, "MTL");
        let bos = team(2, "BOS");
        let tor = team(3, "TOR");
        let standings = vec![standing(&mtl, 1, 50, 40), standing(&bos, 2, 48, 40)];
        let past = standings.clone();
        let err = Info::new(
            NaiveDate::from_ymd_opt(2018, 2, 10).unwrap(),
            vec![mtl, bos, tor.clone()],
            standings,
            past,
            vec![Game::scheduled(game_time(), tor, team(1, "MTL"))],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::MissingStanding { .. }));
    }

    #[test]
    fn info_rejects_unscored_result() {
        let mtl = team(1, "MTL");
        let bos = team(2, "BOS");
        let standings = vec![standing(&mtl, 1, 50, 40), standing(&bos, 2, 48, 40)];
        let past = standings.clone();
        let err = Info::new(
            NaiveDate::from_ymd_opt(2018, 2, 10).unwrap(),
            vec![mtl.clone(), bos.clone()],
            standings,
            past,
            vec![],
            vec![Game::scheduled(game_time(), mtl, bos)],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::UnscoredResult { .. }));
    }
}
