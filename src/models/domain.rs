use serde::{Deserialize, Serialize};

/// Columns of the match feed, in the order the sheet publishes them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedColumn {
    Team1,
    Score1,
    Team2,
    Score2,
    Period,
    MatchId,
    Result,
    Winner,
    Loser,
    H1,
    H2,
    Color,
}

impl FeedColumn {
    /// Fixed positional layout of a feed row
    pub const ALL: [FeedColumn; 12] = [
        FeedColumn::Team1,
        FeedColumn::Score1,
        FeedColumn::Team2,
        FeedColumn::Score2,
        FeedColumn::Period,
        FeedColumn::MatchId,
        FeedColumn::Result,
        FeedColumn::Winner,
        FeedColumn::Loser,
        FeedColumn::H1,
        FeedColumn::H2,
        FeedColumn::Color,
    ];

    /// Expected number of fields per row
    pub const WIDTH: usize = Self::ALL.len();

    pub fn position(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            FeedColumn::Team1 => "Team1",
            FeedColumn::Score1 => "Score1",
            FeedColumn::Team2 => "Team2",
            FeedColumn::Score2 => "Score2",
            FeedColumn::Period => "Period",
            FeedColumn::MatchId => "MatchId",
            FeedColumn::Result => "Result",
            FeedColumn::Winner => "Winner",
            FeedColumn::Loser => "Loser",
            FeedColumn::H1 => "H1",
            FeedColumn::H2 => "H2",
            FeedColumn::Color => "Color",
        }
    }
}

/// One raw row of the match feed, fields in feed order
///
/// Fields are positional; a blank field is treated as null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub fields: Vec<String>,
}

impl RawRow {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Trimmed value of a column, `None` when missing or blank
    pub fn get(&self, column: FeedColumn) -> Option<&str> {
        self.fields
            .get(column.position())
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn width(&self) -> usize {
        self.fields.len()
    }
}

/// A validated match row with the layout columns already dropped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: i64,
    pub team1: String,
    pub score1: f64,
    pub team2: String,
    pub score2: f64,
    pub period: Option<String>,
    pub result: Option<String>,
    pub winner: Option<String>,
    pub loser: Option<String>,
}

impl MatchRecord {
    /// The match as seen from `team1`
    pub fn forward(&self) -> CanonicalMatch {
        CanonicalMatch {
            match_id: self.match_id,
            team_a: self.team1.clone(),
            score_a: self.score1,
            team_b: self.team2.clone(),
            score_b: self.score2,
            period: self.period.clone(),
            result: self.result.clone(),
            winner: self.winner.clone(),
            loser: self.loser.clone(),
        }
    }

    /// The match as seen from `team2`; text metadata is copied as-is
    pub fn swapped(&self) -> CanonicalMatch {
        CanonicalMatch {
            match_id: self.match_id,
            team_a: self.team2.clone(),
            score_a: self.score2,
            team_b: self.team1.clone(),
            score_b: self.score1,
            period: self.period.clone(),
            result: self.result.clone(),
            winner: self.winner.clone(),
            loser: self.loser.clone(),
        }
    }
}

/// Directional match record: `team_a` scored `score_a` against `team_b`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMatch {
    pub match_id: i64,
    pub team_a: String,
    pub score_a: f64,
    pub team_b: String,
    pub score_b: f64,
    pub period: Option<String>,
    pub result: Option<String>,
    pub winner: Option<String>,
    pub loser: Option<String>,
}

impl CanonicalMatch {
    /// Shorthand used by tests and benchmarks
    pub fn new(match_id: i64, team_a: &str, score_a: f64, team_b: &str, score_b: f64) -> Self {
        Self {
            match_id,
            team_a: team_a.to_string(),
            score_a,
            team_b: team_b.to_string(),
            score_b,
            period: None,
            result: None,
            winner: None,
            loser: None,
        }
    }
}
