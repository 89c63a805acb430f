// NHL stats API client: fetches teams, standings, and schedules, and
// assembles them into a validated model::Info snapshot.
//
// This is a plain I/O adapter. Data gaps the analysis tolerates (a rank
// beyond the lottery table, a missing last-10 record) degrade to defaults
// here; everything else propagates as an error.

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::LeagueData;
use crate::db::Cache;
use crate::model::{Game, Info, Standing, TeamRef};

const DEFAULT_BASE: &str = "https://statsapi.web.nhl.com/api/v1";

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    cache: Option<Cache>,
}

impl ApiClient {
    pub fn new(cache: Option<Cache>) -> Self {
        Self::with_base(DEFAULT_BASE, cache)
    }

    /// Client against a non-default base URL (tests, mirrors).
    pub fn with_base(base: impl Into<String>, cache: Option<Cache>) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base: base.into(),
            cache,
        }
    }

    /// GET `path_and_query` and decode the JSON body. Cacheable requests
    /// are served from and stored into the response cache.
    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str, cacheable: bool) -> Result<T> {
        let url = format!("{}{}", self.base, path_and_query);

        if cacheable {
            if let Some(cache) = &self.cache {
                if let Some(body) = cache.get(&url)? {
                    debug!(%url, "cache hit");
                    return serde_json::from_str(&body)
                        .with_context(|| format!("failed to decode cached response for {url}"));
                }
            }
        }

        debug!(%url, "fetching");
        let body = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("request to {url} returned an error status"))?
            .text()
            .await
            .with_context(|| format!("failed to read response body from {url}"))?;

        if cacheable {
            if let Some(cache) = &self.cache {
                cache.put(&url, &body)?;
            }
        }

        serde_json::from_str(&body).with_context(|| format!("failed to decode response from {url}"))
    }
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TeamsResponse {
    teams: Vec<TeamEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamEntry {
    id: u32,
    /// Full name, e.g. "Montréal Canadiens".
    name: String,
    abbreviation: String,
    team_name: String,
    location_name: String,
    division: NamedRef,
    conference: NamedRef,
}

#[derive(Debug, Deserialize)]
struct NamedRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct StandingsResponse {
    records: Vec<StandingsRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StandingsRecord {
    team_records: Vec<TeamRecordEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamRecordEntry {
    team: TeamIdRef,
    league_record: LeagueRecord,
    games_played: u32,
    points: u32,
    row: u32,
    records: Option<RecordsBlock>,
}

#[derive(Debug, Deserialize)]
struct TeamIdRef {
    id: u32,
}

#[derive(Debug, Deserialize)]
struct LeagueRecord {
    wins: u32,
    losses: u32,
    ot: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordsBlock {
    overall_records: Vec<TypedRecord>,
}

#[derive(Debug, Deserialize)]
struct TypedRecord {
    wins: u32,
    losses: u32,
    #[serde(default)]
    ot: u32,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct ScheduleResponse {
    #[serde(default)]
    dates: Vec<ScheduleDate>,
}

#[derive(Debug, Deserialize)]
struct ScheduleDate {
    games: Vec<ScheduleGame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleGame {
    game_date: DateTime<Utc>,
    status: GameStatus,
    teams: GameTeams,
    linescore: Option<Linescore>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameStatus {
    abstract_game_state: String,
}

#[derive(Debug, Deserialize)]
struct GameTeams {
    home: GameSide,
    away: GameSide,
}

#[derive(Debug, Deserialize)]
struct GameSide {
    team: TeamIdRef,
    score: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Linescore {
    periods: Vec<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Snapshot assembly
// ---------------------------------------------------------------------------

/// Fetch everything the analysis needs for `date`: teams, the standings for
/// `date` and the day before, last night's results, and tonight's schedule.
pub async fn fetch_info(client: &ApiClient, date: NaiveDate, league: &LeagueData) -> Result<Info> {
    let teams = fetch_teams(client, league).await?;
    let by_id: HashMap<u32, TeamRef> = teams.iter().map(|t| (t.id, t.clone())).collect();
    let past_date = date - chrono::Duration::days(1);

    let standings = fetch_standings(client, &by_id, date, league, false).await?;
    let past_standings = fetch_standings(client, &by_id, past_date, league, true).await?;
    let games = fetch_schedule(client, &by_id, date).await?;
    let results = fetch_results(client, &by_id, past_date).await?;

    info!(
        teams = teams.len(),
        games = games.len(),
        results = results.len(),
        %date,
        "league snapshot assembled"
    );

    Info::new(date, teams, standings, past_standings, games, results)
        .context("fetched snapshot failed validation")
}

/// Teams with league metadata, subreddits attached by full-name order.
async fn fetch_teams(client: &ApiClient, league: &LeagueData) -> Result<Vec<TeamRef>> {
    let response: TeamsResponse = client.get_json("/teams", true).await?;

    let mut entries = response.teams;
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    if entries.len() != league.subreddits.len() {
        warn!(
            teams = entries.len(),
            subreddits = league.subreddits.len(),
            "subreddit table does not match the league size; some teams render bare"
        );
    }

    let teams = entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            std::sync::Arc::new(crate::model::Team {
                id: entry.id,
                code: entry.abbreviation,
                name: entry.team_name,
                location: entry.location_name,
                fullname: entry.name,
                division: entry.division.name,
                conference: entry.conference.name,
                subreddit: league.subreddits.get(idx).cloned(),
            })
        })
        .collect();

    Ok(teams)
}

async fn fetch_standings(
    client: &ApiClient,
    by_id: &HashMap<u32, TeamRef>,
    date: NaiveDate,
    league: &LeagueData,
    cacheable: bool,
) -> Result<Vec<Standing>> {
    let path = format!(
        "/standings?standingsType=byLeague&expand=standings.record&date={date}"
    );
    let response: StandingsResponse = client.get_json(&path, cacheable).await?;
    let record = response
        .records
        .into_iter()
        .next()
        .with_context(|| format!("standings response for {date} carries no records"))?;

    let team_count = record.team_records.len();
    let mut standings = Vec::with_capacity(team_count);
    for (idx, entry) in record.team_records.into_iter().enumerate() {
        let place = idx as u32 + 1;
        let team = by_id
            .get(&entry.team.id)
            .with_context(|| format!("standings reference unknown team id {}", entry.team.id))?
            .clone();
        // Worst team first in the lottery table; ranks beyond it get 0.
        let odds = league
            .lottery_odds
            .get(team_count - place as usize)
            .copied()
            .unwrap_or(0.0);
        standings.push(Standing::new(
            team,
            place,
            entry.games_played,
            entry.points,
            entry.league_record.wins,
            entry.league_record.losses,
            entry.league_record.ot,
            entry.row,
            last10(&entry.records),
            odds,
        ));
    }

    Ok(standings)
}

fn last10(records: &Option<RecordsBlock>) -> String {
    records
        .as_ref()
        .and_then(|block| block.overall_records.iter().find(|r| r.kind == "lastTen"))
        .map(|r| format!("{}-{}-{}", r.wins, r.losses, r.ot))
        .unwrap_or_else(|| "N/A".to_string())
}

/// Tonight's schedule. A day without games yields an empty list.
async fn fetch_schedule(
    client: &ApiClient,
    by_id: &HashMap<u32, TeamRef>,
    date: NaiveDate,
) -> Result<Vec<Game>> {
    let path = format!("/schedule?date={date}");
    let response: ScheduleResponse = client.get_json(&path, false).await?;

    let mut games = Vec::new();
    for entry in response.dates.into_iter().flat_map(|d| d.games) {
        let (time, home, away) = game_parts(by_id, &entry)?;
        games.push(Game::scheduled(time, home, away));
    }
    Ok(games)
}

/// Last night's completed games. Unfinished entries are skipped.
async fn fetch_results(
    client: &ApiClient,
    by_id: &HashMap<u32, TeamRef>,
    date: NaiveDate,
) -> Result<Vec<Game>> {
    let path = format!("/schedule?date={date}&expand=schedule.linescore");
    let response: ScheduleResponse = client.get_json(&path, true).await?;

    let mut results = Vec::new();
    for entry in response.dates.into_iter().flat_map(|d| d.games) {
        if entry.status.abstract_game_state != "Final" {
            warn!(
                state = %entry.status.abstract_game_state,
                "skipping unfinished game on the results slate"
            );
            continue;
        }
        let (time, home, away) = game_parts(by_id, &entry)?;
        let home_score = entry
            .teams
            .home
            .score
            .context("final game is missing the home score")?;
        let away_score = entry
            .teams
            .away
            .score
            .context("final game is missing the away score")?;
        let overtime = entry
            .linescore
            .as_ref()
            .map(|l| l.periods.len() > 3)
            .unwrap_or(false);
        results.push(
            Game::completed(time, home, away, home_score, away_score, overtime)
                .context("final game reported a tied score")?,
        );
    }
    Ok(results)
}

fn game_parts(
    by_id: &HashMap<u32, TeamRef>,
    entry: &ScheduleGame,
) -> Result<(DateTime<Local>, TeamRef, TeamRef)> {
    let home = by_id
        .get(&entry.teams.home.team.id)
        .with_context(|| format!("schedule references unknown team id {}", entry.teams.home.team.id))?
        .clone();
    let away = by_id
        .get(&entry.teams.away.team.id)
        .with_context(|| format!("schedule references unknown team id {}", entry.teams.away.team.id))?
        .clone();
    Ok((entry.game_date.with_timezone(&Local), home, away))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teams_response_decodes() {
        let body = r#"{
            "teams": [{
                "id": 8,
                "name": "Montréal Canadiens",
                "abbreviation": "MTL",
                "teamName": "Canadiens",
                "locationName": "Montréal",
                "division": {"name": "Atlantic"},
                "conference": {"name": "Eastern"}
            }]
        }"#;
        let decoded: TeamsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(decoded.teams.len(), 1);
        assert_eq!(decoded.teams[0].abbreviation, "MTL");
        assert_eq!(decoded.teams[0].division.name, "Atlantic");
    }

    #[test]
    fn standings_response_decodes_with_last10() {
        let body = r#"{
            "records": [{
                "teamRecords": [{
                    "team": {"id": 8},
                    "leagueRecord": {"wins": 20, "losses": 25, "ot": 6},
                    "gamesPlayed": 51,
                    "points": 46,
                    "row": 18,
                    "records": {
                        "overallRecords": [
                            {"wins": 3, "losses": 6, "ot": 1, "type": "lastTen"},
                            {"wins": 10, "losses": 12, "type": "home"}
                        ]
                    }
                }]
            }]
        }"#;
        let decoded: StandingsResponse = serde_json::from_str(body).unwrap();
        let entry = &decoded.records[0].team_records[0];
        assert_eq!(entry.points, 46);
        assert_eq!(last10(&entry.records), "3-6-1");
    }

    #[test]
    fn last10_defaults_when_absent() {
        assert_eq!(last10(&None), "N/A");
        let block = Some(RecordsBlock {
            overall_records: vec![],
        });
        assert_eq!(last10(&block), "N/A");
    }

    #[test]
    fn schedule_response_decodes_final_game() {
        let body = r#"{
            "dates": [{
                "games": [{
                    "gameDate": "2018-02-10T00:00:00Z",
                    "status": {"abstractGameState": "Final"},
                    "teams": {
                        "home": {"team": {"id": 8}, "score": 2},
                        "away": {"team": {"id": 6}, "score": 3}
                    },
                    "linescore": {"periods": [{}, {}, {}, {}]}
                }]
            }]
        }"#;
        let decoded: ScheduleResponse = serde_json::from_str(body).unwrap();
        let game = &decoded.dates[0].games[0];
        assert_eq!(game.status.abstract_game_state, "Final");
        assert_eq!(game.teams.home.score, Some(2));
        assert_eq!(game.linescore.as_ref().unwrap().periods.len(), 4);
    }

    #[test]
    fn schedule_response_tolerates_empty_day() {
        let decoded: ScheduleResponse = serde_json::from_str(r#"{"dates": []}"#).unwrap();
        assert!(decoded.dates.is_empty());
        let decoded: ScheduleResponse = serde_json::from_str("{}").unwrap();
        assert!(decoded.dates.is_empty());
    }
}
