//! Backend data model: league standings, matches, and news.
//!
//! The backend serves one JSON document (`/api/all`) with both leagues. It is
//! parsed zero-copy into the `Wire*` structs and then converted into the
//! owned, fixed-capacity types the UI holds on to. Conversion also applies
//! the fallbacks the backend occasionally needs (missing positions, missing
//! win/loss splits).

use heapless::{String, Vec};
use serde::Deserialize;
use thiserror_no_std::Error;

/// Teams per league table.
pub const MAX_TEAMS: usize = 14;

/// Matches kept across both leagues.
pub const MAX_MATCHES: usize = 40;

/// News items kept across both leagues.
pub const MAX_NEWS: usize = 20;

/// Owned team name, truncated to what a table row can show.
pub type TeamName = String<24>;

/// League tag carried by matches and news items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum League {
    #[default]
    Shl,
    Allsvenskan,
}

impl League {
    /// Short label used in badges and tabs.
    pub const fn label(self) -> &'static str {
        match self {
            League::Shl => "SHL",
            League::Allsvenskan => "HA",
        }
    }

    /// Full name shown on detail screens.
    pub const fn full_name(self) -> &'static str {
        match self {
            League::Shl => "SHL - Svenska Hockeyligan",
            League::Allsvenskan => "HockeyAllsvenskan",
        }
    }
}

/// One row of a league table.
#[derive(Debug, Clone, Default)]
pub struct Team {
    pub name: TeamName,
    pub position: u8,
    pub points: i16,
    pub played: i16,
    pub goal_diff: i16,
    pub wins: i16,
    pub ot_wins: i16,
    pub losses: i16,
    pub goals_for: i16,
    pub goals_against: i16,
}

/// Match progress as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Live,
    Finished,
}

impl MatchStatus {
    fn from_wire(s: &str) -> Self {
        match s {
            "live" => MatchStatus::Live,
            "finished" => MatchStatus::Finished,
            _ => MatchStatus::Upcoming,
        }
    }
}

/// A single match, scheduled or played.
#[derive(Debug, Clone)]
pub struct MatchInfo {
    pub home: TeamName,
    pub away: TeamName,
    /// None until the match has a score.
    pub home_score: Option<i16>,
    pub away_score: Option<i16>,
    /// Kick-off time as the backend formats it, e.g. "19:00".
    pub time: String<8>,
    pub status: MatchStatus,
    pub league: League,
}

/// A news headline with its summary text.
#[derive(Debug, Clone)]
pub struct NewsItem {
    pub title: String<64>,
    pub summary: String<240>,
    pub league: League,
}

/// Everything the panel shows, refreshed wholesale on each successful fetch.
#[derive(Debug, Clone, Default)]
pub struct PanelData {
    pub shl: Vec<Team, MAX_TEAMS>,
    pub allsvenskan: Vec<Team, MAX_TEAMS>,
    pub matches: Vec<MatchInfo, MAX_MATCHES>,
    pub news: Vec<NewsItem, MAX_NEWS>,
    /// True when any match in the payload reported live status; drives the
    /// faster fetch cadence.
    pub live_match: bool,
}

impl PanelData {
    /// Standings for one league.
    pub fn table(&self, league: League) -> &Vec<Team, MAX_TEAMS> {
        match league {
            League::Shl => &self.shl,
            League::Allsvenskan => &self.allsvenskan,
        }
    }

    /// Matches still to be decided (scheduled or in progress), in backend
    /// order. Live matches stay on the list so their score is visible.
    pub fn upcoming(&self) -> impl Iterator<Item = &MatchInfo> {
        self.matches
            .iter()
            .filter(|m| m.status != MatchStatus::Finished)
    }

    pub fn upcoming_count(&self) -> usize {
        self.upcoming().count()
    }
}

/// Copy as much of `s` as fits into a bounded string, on char boundaries.
pub fn truncated<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for ch in s.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
#[serde(bound(deserialize = "'de: 'a"))]
struct WirePayload<'a> {
    #[serde(default)]
    shl: Option<WireLeague<'a>>,
    #[serde(default)]
    allsvenskan: Option<WireLeague<'a>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(bound(deserialize = "'de: 'a"))]
struct WireLeague<'a> {
    #[serde(default)]
    standings: Vec<WireTeam<'a>, MAX_TEAMS>,
    #[serde(default)]
    matches: Vec<WireMatch<'a>, MAX_MATCHES>,
    #[serde(default)]
    news: Vec<WireNews<'a>, MAX_NEWS>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "'de: 'a"), rename_all = "camelCase")]
struct WireTeam<'a> {
    name: &'a str,
    #[serde(default)]
    position: u8,
    #[serde(default)]
    points: i16,
    #[serde(default)]
    played: i16,
    #[serde(default)]
    goal_diff: i16,
    #[serde(default)]
    wins: i16,
    #[serde(default)]
    draws: i16,
    #[serde(default)]
    losses: i16,
    #[serde(default)]
    goals_for: i16,
    #[serde(default)]
    goals_against: i16,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "'de: 'a"), rename_all = "camelCase")]
struct WireMatch<'a> {
    home_team: &'a str,
    away_team: &'a str,
    #[serde(default)]
    home_score: Option<i16>,
    #[serde(default)]
    away_score: Option<i16>,
    #[serde(default)]
    time: &'a str,
    #[serde(default)]
    status: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "'de: 'a"))]
struct WireNews<'a> {
    title: &'a str,
    #[serde(default)]
    summary: &'a str,
}

/// Failure to turn a backend response into [`PanelData`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed backend payload")]
    Json(#[from] serde_json_core::de::Error),
}

/// Parse the `/api/all` JSON document.
///
/// Missing leagues or sections are tolerated (the panel keeps showing empty
/// lists); a syntactically broken document is rejected as a whole so a
/// half-parsed fetch never replaces good data.
pub fn parse_payload(json: &str) -> Result<PanelData, ParseError> {
    let (wire, _rest) = serde_json_core::de::from_str::<WirePayload<'_>>(json)?;

    let mut data = PanelData::default();
    if let Some(league) = &wire.shl {
        convert_league(league, League::Shl, &mut data);
    }
    if let Some(league) = &wire.allsvenskan {
        convert_league(league, League::Allsvenskan, &mut data);
    }
    Ok(data)
}

fn convert_league(wire: &WireLeague<'_>, league: League, out: &mut PanelData) {
    let table = match league {
        League::Shl => &mut out.shl,
        League::Allsvenskan => &mut out.allsvenskan,
    };
    for (i, t) in wire.standings.iter().enumerate() {
        if table.push(convert_team(t, i)).is_err() {
            break;
        }
    }

    for m in &wire.matches {
        let status = MatchStatus::from_wire(m.status);
        if status == MatchStatus::Live {
            out.live_match = true;
        }
        let converted = MatchInfo {
            home: truncated(m.home_team),
            away: truncated(m.away_team),
            home_score: m.home_score,
            away_score: m.away_score,
            time: truncated(m.time),
            status,
            league,
        };
        if out.matches.push(converted).is_err() {
            break;
        }
    }

    for n in &wire.news {
        let converted = NewsItem {
            title: truncated(n.title),
            summary: truncated(n.summary),
            league,
        };
        if out.news.push(converted).is_err() {
            break;
        }
    }
}

fn convert_team(wire: &WireTeam<'_>, index: usize) -> Team {
    let mut team = Team {
        name: truncated(wire.name),
        position: wire.position,
        points: wire.points,
        played: wire.played,
        goal_diff: wire.goal_diff,
        wins: wire.wins,
        ot_wins: wire.draws,
        losses: wire.losses,
        goals_for: wire.goals_for,
        goals_against: wire.goals_against,
    };
    if team.position == 0 {
        team.position = (index + 1) as u8;
    }
    // Scrapers sometimes deliver points without the win/loss split; derive a
    // plausible one so the detail screen is never all zeroes.
    if team.wins == 0 && team.points > 0 {
        team.wins = team.points / 3;
        team.ot_wins = team.points % 3;
        team.losses = team.played - team.wins - team.ot_wins;
    }
    team
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "shl": {
            "standings": [
                {"name": "Skelleftea AIK", "position": 1, "points": 98, "played": 48,
                 "goalDiff": 52, "wins": 29, "draws": 5, "losses": 14,
                 "goalsFor": 160, "goalsAgainst": 108},
                {"name": "Fargestad BK", "points": 30, "played": 15,
                 "goalDiff": 10, "wins": 0, "draws": 0, "losses": 0,
                 "goalsFor": 50, "goalsAgainst": 40}
            ],
            "matches": [
                {"homeTeam": "Lulea HF", "awayTeam": "HV71", "homeScore": 3,
                 "awayScore": 2, "time": "19:00", "status": "live"},
                {"homeTeam": "Timra IK", "awayTeam": "Vaxjo Lakers",
                 "homeScore": null, "awayScore": null, "time": "15:15",
                 "status": "upcoming"}
            ],
            "news": [
                {"title": "Skelleftea tar serieledningen", "summary": "En stark tredje period."}
            ]
        },
        "allsvenskan": {
            "standings": [],
            "matches": [],
            "news": []
        }
    }"#;

    #[test]
    fn parses_full_payload() {
        let data = parse_payload(SAMPLE).unwrap();
        assert_eq!(data.shl.len(), 2);
        assert_eq!(data.matches.len(), 2);
        assert_eq!(data.news.len(), 1);
        assert!(data.live_match);

        let leader = &data.shl[0];
        assert_eq!(leader.name.as_str(), "Skelleftea AIK");
        assert_eq!(leader.points, 98);
        assert_eq!(leader.ot_wins, 5);
    }

    #[test]
    fn derives_missing_position_and_record() {
        let data = parse_payload(SAMPLE).unwrap();
        let second = &data.shl[1];
        // No position in the payload: falls back to table order.
        assert_eq!(second.position, 2);
        // No win/loss split: derived from points.
        assert_eq!(second.wins, 10);
        assert_eq!(second.ot_wins, 0);
        assert_eq!(second.losses, 5);
    }

    #[test]
    fn maps_match_status_and_scores() {
        let data = parse_payload(SAMPLE).unwrap();
        assert_eq!(data.matches[0].status, MatchStatus::Live);
        assert_eq!(data.matches[0].home_score, Some(3));
        assert_eq!(data.matches[1].status, MatchStatus::Upcoming);
        assert_eq!(data.matches[1].home_score, None);
        // Live and scheduled both count as upcoming; finished would not.
        assert_eq!(data.upcoming_count(), 2);
    }

    #[test]
    fn missing_sections_yield_empty_lists() {
        let data = parse_payload(r#"{"shl": {"standings": []}}"#).unwrap();
        assert!(data.shl.is_empty());
        assert!(data.allsvenskan.is_empty());
        assert!(!data.live_match);
    }

    #[test]
    fn broken_document_is_rejected() {
        assert!(parse_payload("{\"shl\": [").is_err());
    }

    #[test]
    fn long_names_are_truncated_on_char_boundaries() {
        let name: TeamName = truncated("Ett väldigt långt lagnamn från norr");
        assert!(name.len() <= 24);
        assert!(name.as_str().starts_with("Ett väldigt"));
    }
}
