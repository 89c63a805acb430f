// Playoff-race analysis: conference/division aware. The reference team
// wants points, so conference rivals should lose; which rival depends on
// where the reference team currently sits (its outlook).

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use super::simulation::Simulator;
use super::{kickoff, Cheer, Mood};
use crate::model::{Game, Info, Standing, Team, TeamRef};

// ---------------------------------------------------------------------------
// Outlook
// ---------------------------------------------------------------------------

/// The reference team's current bracket position. Selects the sub-rule for
/// games between two conference teams that don't involve the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outlook {
    /// Top three of its division.
    Top,
    /// First or second in the wildcard pool.
    Wildcard,
    /// Rest of the wildcard pool.
    Outside,
}

impl fmt::Display for Outlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outlook::Top => "Top 3",
            Outlook::Wildcard => "Wild card",
            Outlook::Outside => "Outside",
        };
        write!(f, "{label}")
    }
}

// ---------------------------------------------------------------------------
// Matchup
// ---------------------------------------------------------------------------

/// A relevant game with its playoff-race verdict frozen in.
#[derive(Debug, Clone)]
pub struct Matchup {
    pub game: Game,
    pub ideal_winner: TeamRef,
    pub my_team_involved: bool,
    /// The non-ideal participant is a conference rival, so an overtime
    /// finish still hands the conference a point.
    pub other_in_conference: bool,
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
            overtime: false,
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

        if ideal_won {
            // An overtime win still leaves a conference rival with a point.
            if self.other_in_conference && overtime {
                Mood::Good
            } else {
                Mood::Great
            }
        } else if self.my_team_involved && overtime {
            // We lost, but banked the overtime point.
            Mood::Bad
        } else {
            Mood::Worst
        }
    }
}

/// One projected first-round pairing.
#[derive(Debug, Clone)]
pub struct PlayoffPairing {
    pub high: Standing,
    pub low: Standing,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Playoff-race analysis for one reference team over one snapshot: seeded
/// divisional and wildcard standings, the projected bracket, and the
/// relevant slates.
#[derive(Debug)]
pub struct Analysis<'a> {
    info: &'a Info,
    pub my_team: TeamRef,
    pub reach: u32,
    pub my_outlook: Outlook,
    /// Top three of the reference team's division, seeded 1..3.
    pub own_division: Vec<Standing>,
    /// Top three of the sibling division, seeded 1..3.
    pub other_division: Vec<Standing>,
    /// Remaining conference teams in standings order, seeded 1..N.
    pub wildcard: Vec<Standing>,
    pub playoffs_matchups: Vec<PlayoffPairing>,
    pub my_result: Option<Matchup>,
    pub results: Vec<Matchup>,
    pub my_game: Option<Matchup>,
    pub games: Vec<Matchup>,

    conference_ids: HashSet<u32>,
    division_ids: HashSet<u32>,
    top_ids: HashSet<u32>,
    wildcard_ids: HashSet<u32>,
}

impl<'a> Analysis<'a> {
    pub fn new(info: &'a Info, my_team: TeamRef, reach: u32) -> Self {
        Self::with_simulator(info, my_team, reach, None)
    }

    /// Like `new`, but lets a season simulator pick the ideal winner for
    /// tonight's games between two conference teams. The simulator works on
    /// its own scratch copies; the snapshot stays untouched and the picks
    /// are frozen into the matchups as usual.
    pub fn with_simulator(
        info: &'a Info,
        my_team: TeamRef,
        reach: u32,
        mut simulator: Option<&mut Simulator>,
    ) -> Self {
        // Partition the conference into seeded lists, standings order by
        // (points, wins).
        let mut conference: Vec<&Standing> = info
            .standings
            .iter()
            .filter(|s| s.team.conference == my_team.conference)
            .collect();
        conference.sort_by(|a, b| (b.points, b.wins).cmp(&(a.points, a.wins)));

        let mut own_division: Vec<Standing> = Vec::new();
        let mut other_division: Vec<Standing> = Vec::new();
        let mut wildcard: Vec<Standing> = Vec::new();
        for line in &conference {
            let target = if line.team.division == my_team.division {
                &mut own_division
            } else {
                &mut other_division
            };
            if target.len() < 3 {
                let seed = target.len() as u32 + 1;
                target.push(line.with_seed(seed));
            } else {
                let seed = wildcard.len() as u32 + 1;
                wildcard.push(line.with_seed(seed));
            }
        }

        let conference_ids: HashSet<u32> = conference.iter().map(|s| s.team.id).collect();
        let division_ids: HashSet<u32> = conference
            .iter()
            .filter(|s| s.team.division == my_team.division)
            .map(|s| s.team.id)
            .collect();
        let top_ids: HashSet<u32> = own_division
            .iter()
            .chain(other_division.iter())
            .map(|s| s.team.id)
            .collect();
        let wildcard_ids: HashSet<u32> = wildcard.iter().take(2).map(|s| s.team.id).collect();

        let my_outlook = if own_division.iter().any(|s| *s.team == *my_team) {
            Outlook::Top
        } else if wildcard_ids.contains(&my_team.id) {
            Outlook::Wildcard
        } else {
            Outlook::Outside
        };
        debug!(team = %my_team.code, outlook = %my_outlook, "computed outlook");

        let playoffs_matchups = bracket(&own_division, &other_division, &wildcard);

        let mut analysis = Analysis {
            info,
            my_team,
            reach,
            my_outlook,
            own_division,
            other_division,
            wildcard,
            playoffs_matchups,
            my_result: None,
            results: Vec::new(),
            my_game: None,
            games: Vec::new(),
            conference_ids,
            division_ids,
            top_ids,
            wildcard_ids,
        };

        let (my_result, results) = analysis.compute_matchups(&info.results, true, None);
        let (my_game, games) =
            analysis.compute_matchups(&info.games, false, simulator.as_deref_mut());
        analysis.my_result = my_result;
        analysis.results = results;
        analysis.my_game = my_game;
        analysis.games = games;
        analysis
    }

    /// Relevant when the reference team plays, or when a conference team
    /// within reach does.
    pub fn is_game_relevant(&self, game: &Game, past: bool) -> bool {
        if game.involves(&self.my_team) {
            return true;
        }
        let my_points = self.info.standing(&self.my_team, past).points;
        let in_reach = |team: &TeamRef| {
            self.conference_ids.contains(&team.id)
                && self
                    .info
                    .standing(team, past)
                    .points
                    .abs_diff(my_points)
                    <= self.reach
        };
        in_reach(&game.home) || in_reach(&game.away)
    }

    fn compute_matchups(
        &self,
        games: &[Game],
        past: bool,
        mut simulator: Option<&mut Simulator>,
    ) -> (Option<Matchup>, Vec<Matchup>) {
        let mut mine = None;
        let mut others = Vec::new();

        for game in games {
            if !self.is_game_relevant(game, past) {
                debug!(
                    away = %game.away.code,
                    home = %game.home.code,
                    "skipping out-of-range game"
                );
                continue;
            }
            let m = self.matchup_from_game(game, past, simulator.as_deref_mut());
            if game.involves(&self.my_team) {
                mine = Some(m);
            } else {
                others.push(m);
            }
        }

        (mine, others)
    }

    fn matchup_from_game(
        &self,
        game: &Game,
        past: bool,
        simulator: Option<&mut Simulator>,
    ) -> Matchup {
        let my_team_involved = game.involves(&self.my_team);
        let mut other_in_conference = false;

        let ideal_winner = if my_team_involved {
            let opponent = game
                .opponent_of(&self.my_team)
                .expect("involved game has an opponent");
            other_in_conference = self.conference_ids.contains(&opponent.id);
            self.my_team.clone()
        } else {
            let home_in = self.conference_ids.contains(&game.home.id);
            let away_in = self.conference_ids.contains(&game.away.id);
            if home_in && away_in {
                match simulator {
                    Some(sim) if !past => {
                        sim.ideal_winner(&self.my_team, game, &self.info.standings)
                    }
                    _ => self.ideal_conference_winner(game, past),
                }
            } else {
                // Exactly one side is a conference rival; its loss helps us.
                other_in_conference = true;
                if away_in {
                    game.home.clone()
                } else if home_in {
                    game.away.clone()
                } else {
                    unreachable!(
                        "relevance filter admitted a game with no conference participant: {} at {}",
                        game.away.code, game.home.code
                    )
                }
            }
        };

        Matchup {
            game: game.clone(),
            ideal_winner,
            my_team_involved,
            other_in_conference,
            time: kickoff(game),
        }
    }

    /// Ideal winner between two conference teams, by outlook.
    fn ideal_conference_winner(&self, game: &Game, past: bool) -> TeamRef {
        let home_in_division = self.division_ids.contains(&game.home.id);
        let away_in_division = self.division_ids.contains(&game.away.id);

        match self.my_outlook {
            Outlook::Top => {
                if home_in_division == away_in_division {
                    // Both direct division rivals, or neither: push the
                    // closer one down.
                    self.furthest_team(game, past).clone()
                } else if away_in_division {
                    game.home.clone()
                } else {
                    game.away.clone()
                }
            }
            Outlook::Wildcard => {
                let home_in_race = !self.top_ids.contains(&game.home.id);
                let away_in_race = !self.top_ids.contains(&game.away.id);
                if home_in_race && away_in_race {
                    self.furthest_team(game, past).clone()
                } else if home_in_race {
                    game.home.clone()
                } else if away_in_race {
                    game.away.clone()
                } else if away_in_division {
                    game.home.clone()
                } else if home_in_division {
                    game.away.clone()
                } else {
                    self.furthest_team(game, past).clone()
                }
            }
            Outlook::Outside => self.furthest_team(game, past).clone(),
        }
    }

    /// The participant whose point total is further from the reference
    /// team's. Ties resolve to the home side.
    fn furthest_team<'g>(&self, game: &'g Game, past: bool) -> &'g TeamRef {
        let my_points = self.info.standing(&self.my_team, past).points;
        let home_gap = self.info.standing(&game.home, past).points.abs_diff(my_points);
        let away_gap = self.info.standing(&game.away, past).points.abs_diff(my_points);
        if away_gap > home_gap {
            &game.away
        } else {
            &game.home
        }
    }

    pub fn is_top_team(&self, team: &Team) -> bool {
        self.top_ids.contains(&team.id)
    }

    pub fn is_wildcard_team(&self, team: &Team) -> bool {
        self.wildcard_ids.contains(&team.id)
    }
}

/// Projected first round: the stronger division leader draws the second
/// wildcard, the other leader the first, and each division pairs its 2nd
/// and 3rd seeds. Empty when the conference can't fill the bracket yet.
fn bracket(
    own_division: &[Standing],
    other_division: &[Standing],
    wildcard: &[Standing],
) -> Vec<PlayoffPairing> {
    if own_division.len() < 3 || other_division.len() < 3 || wildcard.len() < 2 {
        return Vec::new();
    }

    let own_leader = &own_division[0];
    let other_leader = &other_division[0];
    let (top, second) =
        if (own_leader.points, own_leader.wins) >= (other_leader.points, other_leader.wins) {
            (own_leader, other_leader)
        } else {
            (other_leader, own_leader)
        };

    vec![
        PlayoffPairing {
            high: top.clone(),
            low: wildcard[1].clone(),
        },
        PlayoffPairing {
            high: second.clone(),
            low: wildcard[0].clone(),
        },
        PlayoffPairing {
            high: own_division[1].clone(),
            low: own_division[2].clone(),
        },
        PlayoffPairing {
            high: other_division[1].clone(),
            low: other_division[2].clone(),
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Matchup as _;
    use chrono::{Local, NaiveDate, TimeZone};
    use std::sync::Arc;

    fn team(id: u32, code: &str, division: &str, conference: &str) -> TeamRef {
        Arc::new(Team {
            id,
            code: code.to_string(),
            name: code.to_string(),
            location: "Test".to_string(),
            fullname: format!("Test {code}"),
            division: division.to_string(),
            conference: conference.to_string(),
            subreddit: None,
        })
    }

    fn standing(team: &TeamRef, place: u32, points: u32) -> Standing {
        let wins = points / 2;
        let ot = points % 2;
        Standing::new(
            team.clone(),
            place,
            55,
            points,
            wins,
            55 - wins - ot,
            ot,
            wins,
            "5-4-1".to_string(),
            0.0,
        )
    }

    fn game_time() -> chrono::DateTime<Local> {
        Local.with_ymd_and_hms(2018, 2, 10, 19, 0, 0).unwrap()
    }

    /// Eastern conference: Atlantic {TBL 100, BOS 90, TOR 85, MTL 60,
    /// DET 55}, Metropolitan {WSH 95, CBJ 88, NYI 80, NYR 75, PHI 58}.
    /// Western conference: {MIN 92, CHI 70} for out-of-conference games.
    /// Wildcard pool: NYR (1), MTL (2), PHI (3), DET (4).
    struct League {
        info: Info,
        teams: std::collections::HashMap<&'static str, TeamRef>,
    }

    fn league() -> League {
        let rows: &[(&str, &str, &str, u32)] = &[
            ("TBL", "Atlantic", "East", 100),
            ("BOS", "Atlantic", "East", 90),
            ("TOR", "Atlantic", "East", 85),
            ("MTL", "Atlantic", "East", 60),
            ("DET", "Atlantic", "East", 55),
            ("WSH", "Metropolitan", "East", 95),
            ("CBJ", "Metropolitan", "East", 88),
            ("NYI", "Metropolitan", "East", 80),
            ("NYR", "Metropolitan", "East", 75),
            ("PHI", "Metropolitan", "East", 58),
            ("MIN", "Central", "West", 92),
            ("CHI", "Central", "West", 70),
        ];

        let mut teams = std::collections::HashMap::new();
        let mut standings = Vec::new();
        let mut ordered: Vec<_> = rows.to_vec();
        ordered.sort_by(|a, b| b.3.cmp(&a.3));
        for (place, (code, division, conference, points)) in ordered.into_iter().enumerate() {
            let t = team(place as u32 + 1, code, division, conference);
            standings.push(standing(&t, place as u32 + 1, points));
            teams.insert(code, t);
        }

        let info = Info::new(
            NaiveDate::from_ymd_opt(2018, 2, 10).unwrap(),
            teams.values().cloned().collect(),
            standings.clone(),
            standings,
            vec![],
            vec![],
        )
        .unwrap();
        League { info, teams }
    }

    impl League {
        fn team(&self, code: &str) -> TeamRef {
            self.teams[code].clone()
        }

        fn game(&self, away: &str, home: &str) -> Game {
            Game::scheduled(game_time(), self.team(home), self.team(away))
        }
    }

    // -- setup: lists, seeds, outlook --

    #[test]
    fn conference_is_partitioned_into_seeded_lists() {
        let league = league();
        let a = Analysis::new(&league.info, league.team("MTL"), 1000);

        let codes = |list: &[Standing]| -> Vec<String> {
            list.iter().map(|s| s.team.code.clone()).collect()
        };
        assert_eq!(codes(&a.own_division), ["TBL", "BOS", "TOR"]);
        assert_eq!(codes(&a.other_division), ["WSH", "CBJ", "NYI"]);
        assert_eq!(codes(&a.wildcard), ["NYR", "MTL", "PHI", "DET"]);

        assert_eq!(a.own_division[0].seed, Some(1));
        assert_eq!(a.own_division[2].seed, Some(3));
        assert_eq!(a.wildcard[0].seed, Some(1));
        assert_eq!(a.wildcard[3].seed, Some(4));
    }

    #[test]
    fn outlook_by_bracket_position() {
        let league = league();
        assert_eq!(
            Analysis::new(&league.info, league.team("TBL"), 1000).my_outlook,
            Outlook::Top
        );
        assert_eq!(
            Analysis::new(&league.info, league.team("NYR"), 1000).my_outlook,
            Outlook::Wildcard
        );
        assert_eq!(
            Analysis::new(&league.info, league.team("MTL"), 1000).my_outlook,
            Outlook::Wildcard
        );
        let a = Analysis::new(&league.info, league.team("PHI"), 1000);
        assert_eq!(a.my_outlook, Outlook::Outside);
        assert!(a.is_top_team(&league.team("TBL")));
        assert!(a.is_top_team(&league.team("NYI")));
        assert!(a.is_wildcard_team(&league.team("NYR")));
        assert!(a.is_wildcard_team(&league.team("MTL")));
        assert!(!a.is_wildcard_team(&league.team("PHI")));
    }

    #[test]
    fn bracket_pairs_leaders_with_wildcards() {
        let league = league();
        let a = Analysis::new(&league.info, league.team("MTL"), 1000);
        let pairs: Vec<(String, String)> = a
            .playoffs_matchups
            .iter()
            .map(|p| (p.high.team.code.clone(), p.low.team.code.clone()))
            .collect();
        // TBL (100) outranks WSH (95): TBL draws the second wildcard.
        assert_eq!(pairs[0], ("TBL".to_string(), "MTL".to_string()));
        assert_eq!(pairs[1], ("WSH".to_string(), "NYR".to_string()));
        assert_eq!(pairs[2], ("BOS".to_string(), "TOR".to_string()));
        assert_eq!(pairs[3], ("CBJ".to_string(), "NYI".to_string()));
    }

    // -- relevance --

    #[test]
    fn relevance_requires_a_conference_team_within_reach() {
        let league = league();
        let a = Analysis::new(&league.info, league.team("MTL"), 10);
        // NYR (75) is 15 ahead of MTL (60): out of reach.
        assert!(!a.is_game_relevant(&league.game("NYR", "WSH"), false));
        // PHI (58) is 2 away: in reach.
        assert!(a.is_game_relevant(&league.game("PHI", "WSH"), false));
        // MIN vs CHI: no conference team at all.
        assert!(!a.is_game_relevant(&league.game("MIN", "CHI"), false));
        // The reference team's own game is always relevant.
        assert!(a.is_game_relevant(&league.game("MTL", "TBL"), false));
    }

    // -- ideal winner --

    #[test]
    fn ideal_winner_when_involved_is_my_team() {
        let league = league();
        let game = Game::scheduled(game_time(), league.team("MTL"), league.team("BOS"));
        let standings = league.info.standings.clone();
        let info = Info::new(
            league.info.date,
            league.teams.values().cloned().collect(),
            standings.clone(),
            standings,
            vec![game],
            vec![],
        )
        .unwrap();
        let a = Analysis::new(&info, league.team("MTL"), 1000);
        let mine = a.my_game.expect("reference team plays tonight");
        assert_eq!(mine.ideal_winner.code, "MTL");
        assert!(mine.my_team_involved);
        assert!(mine.other_in_conference);
    }

    #[test]
    fn one_team_outside_conference_should_win() {
        let league = league();
        let a = Analysis::new(&league.info, league.team("MTL"), 1000);
        // DET (East) hosts MIN (West): the western team should win.
        let m = a.matchup_from_game(&league.game("MIN", "DET"), false, None);
        assert_eq!(m.ideal_winner.code, "MIN");
        assert!(m.other_in_conference);
    }

    #[test]
    fn outside_outlook_wants_the_furthest_team() {
        let league = league();
        let a = Analysis::new(&league.info, league.team("PHI"), 1000);
        assert_eq!(a.my_outlook, Outlook::Outside);
        // PHI is at 58. BOS (90) vs TOR (85): BOS is further.
        let m = a.matchup_from_game(&league.game("TOR", "BOS"), false, None);
        assert_eq!(m.ideal_winner.code, "BOS");
    }

    #[test]
    fn top_outlook_in_division_rivals_further_team_wins() {
        let league = league();
        let a = Analysis::new(&league.info, league.team("TBL"), 1000);
        assert_eq!(a.my_outlook, Outlook::Top);
        // TBL at 100. TOR (85) hosts BOS (90): TOR is further (15 vs 10),
        // so the closer rival BOS loses.
        let m = a.matchup_from_game(&league.game("BOS", "TOR"), false, None);
        assert_eq!(m.ideal_winner.code, "TOR");
    }

    #[test]
    fn top_outlook_prefers_the_non_division_team() {
        let league = league();
        let a = Analysis::new(&league.info, league.team("TBL"), 1000);
        // WSH (Metro) vs BOS (Atlantic): our division rival should lose.
        let m = a.matchup_from_game(&league.game("WSH", "BOS"), false, None);
        assert_eq!(m.ideal_winner.code, "WSH");
        let m = a.matchup_from_game(&league.game("BOS", "WSH"), false, None);
        assert_eq!(m.ideal_winner.code, "WSH");
    }

    #[test]
    fn top_outlook_both_outside_division_falls_back_to_distance() {
        let league = league();
        let a = Analysis::new(&league.info, league.team("TBL"), 1000);
        // CBJ (88) vs NYI (80), TBL at 100: NYI is further (20 vs 12).
        let m = a.matchup_from_game(&league.game("CBJ", "NYI"), false, None);
        assert_eq!(m.ideal_winner.code, "NYI");
    }

    #[test]
    fn wildcard_outlook_prefers_the_race_team() {
        let league = league();
        let a = Analysis::new(&league.info, league.team("NYR"), 1000);
        assert_eq!(a.my_outlook, Outlook::Wildcard);
        // NYI is a top team, MTL is in the race: MTL should win.
        let m = a.matchup_from_game(&league.game("MTL", "NYI"), false, None);
        assert_eq!(m.ideal_winner.code, "MTL");
    }

    #[test]
    fn wildcard_outlook_two_race_teams_use_distance() {
        let league = league();
        let a = Analysis::new(&league.info, league.team("NYR"), 1000);
        // MTL (60) hosts PHI (58), NYR at 75: PHI is further (17 vs 15).
        let m = a.matchup_from_game(&league.game("PHI", "MTL"), false, None);
        assert_eq!(m.ideal_winner.code, "PHI");
    }

    #[test]
    fn wildcard_outlook_two_top_teams_prefers_non_division() {
        let league = league();
        let a = Analysis::new(&league.info, league.team("MTL"), 1000);
        assert_eq!(a.my_outlook, Outlook::Wildcard);
        // BOS (Atlantic, ours) vs WSH (Metro): the Metro side should win.
        let m = a.matchup_from_game(&league.game("WSH", "BOS"), false, None);
        assert_eq!(m.ideal_winner.code, "WSH");
        // Two top Metro teams: fall back to distance. WSH (95) vs CBJ (88),
        // MTL at 60: WSH is further.
        let m = a.matchup_from_game(&league.game("CBJ", "WSH"), false, None);
        assert_eq!(m.ideal_winner.code, "WSH");
    }

    #[test]
    fn furthest_tie_resolves_to_home() {
        // Three-team conference with the participants equidistant from the
        // reference: REF at 80, HOM at 90, AWY at 70.
        let reference = team(1, "REF", "Atlantic", "East");
        let hom = team(2, "HOM", "Metropolitan", "East");
        let awy = team(3, "AWY", "Metropolitan", "East");
        let standings = vec![
            standing(&hom, 1, 90),
            standing(&reference, 2, 80),
            standing(&awy, 3, 70),
        ];
        let info = Info::new(
            NaiveDate::from_ymd_opt(2018, 2, 10).unwrap(),
            vec![reference.clone(), hom.clone(), awy.clone()],
            standings.clone(),
            standings,
            vec![],
            vec![],
        )
        .unwrap();
        let a = Analysis::new(&info, reference, 1000);
        let game = Game::scheduled(game_time(), hom, awy);
        assert_eq!(a.furthest_team(&game, false).code, "HOM");
    }

    // -- mood --

    #[test]
    fn mood_my_team_wins() {
        let league = league();
        let mtl = league.team("MTL");
        let bos = league.team("BOS");
        let make = |home_score, away_score, overtime, other_in_conference| Matchup {
            game: Game::completed(game_time(), mtl.clone(), bos.clone(), home_score, away_score, overtime)
                .unwrap(),
            ideal_winner: mtl.clone(),
            my_team_involved: true,
            other_in_conference,
            time: "19:00".to_string(),
        };

        assert_eq!(make(5, 2, false, true).mood(), Mood::Great);
        // OT win fed a conference rival a point.
        assert_eq!(make(5, 4, true, true).mood(), Mood::Good);
        // OT win over a non-conference team costs us nothing.
        assert_eq!(make(5, 4, true, false).mood(), Mood::Great);
        // Losses.
        assert_eq!(make(2, 5, false, true).mood(), Mood::Worst);
        assert_eq!(make(2, 3, true, true).mood(), Mood::Bad);
    }

    #[test]
    fn mood_out_of_town() {
        let league = league();
        let tor = league.team("TOR");
        let bos = league.team("BOS");
        let make = |home_score, away_score, overtime, other_in_conference| Matchup {
            game: Game::completed(game_time(), tor.clone(), bos.clone(), home_score, away_score, overtime)
                .unwrap(),
            ideal_winner: tor.clone(),
            my_team_involved: false,
            other_in_conference,
            time: "19:00".to_string(),
        };

        assert_eq!(make(5, 2, false, false).mood(), Mood::Great);
        assert_eq!(make(5, 4, true, true).mood(), Mood::Good);
        assert_eq!(make(2, 5, false, true).mood(), Mood::Worst);
        // Ideal team lost in OT and we weren't playing: still worst.
        assert_eq!(make(2, 3, true, true).mood(), Mood::Worst);
    }

    #[test]
    #[should_panic(expected = "mood of an unfinished game")]
    fn mood_panics_on_scheduled_game() {
        let league = league();
        let m = Matchup {
            game: league.game("BOS", "TOR"),
            ideal_winner: league.team("TOR"),
            my_team_involved: false,
            other_in_conference: false,
            time: "19:00".to_string(),
        };
        let _ = m.mood();
    }

    #[test]
    fn cheer_never_asks_for_overtime() {
        let league = league();
        let a = Analysis::new(&league.info, league.team("PHI"), 1000);
        let m = a.matchup_from_game(&league.game("TOR", "BOS"), false, None);
        let cheer = m.cheer();
        assert_eq!(cheer.team.code, m.ideal_winner.code);
        assert!(!cheer.overtime);
    }

    // -- simulator wiring --

    #[test]
    fn simulator_picks_are_frozen_into_tonights_matchups() {
        let league = league();
        let standings = league.info.standings.clone();
        let game = league.game("CBJ", "WSH");
        let info = Info::new(
            league.info.date,
            league.teams.values().cloned().collect(),
            standings.clone(),
            standings,
            vec![game.clone()],
            vec![],
        )
        .unwrap();

        let mut sim_a = Simulator::seeded(200, 9);
        let a = Analysis::with_simulator(&info, league.team("NYR"), 1000, Some(&mut sim_a));
        let pick = a.games[0].ideal_winner.code.clone();

        let mut sim_b = Simulator::seeded(200, 9);
        let expected = sim_b.ideal_winner(&league.team("NYR"), &game, &info.standings);
        assert_eq!(pick, expected.code);
    }
}
