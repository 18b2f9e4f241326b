//! Pitch-level event data
//!
//! This module provides the in-memory event table consumed by the reliability analysis,
//! and the CSV loader that builds it from a Statcast-style export.
//!
//! # Overview
//!
//! Each row of the table is one pitch. A pitch that ends a plate appearance carries a
//! terminal [`Outcome`] in the `events` column; pitches in the middle of a plate
//! appearance leave it empty. Balls put in play also carry a [`BattedBallType`].
//!
//! ```text
//! EventTable
//! ├─ columns: ColumnSet      (which logical columns the source provided)
//! └─ records: Vec<EventRecord>
//!     ├─ sequence key        (game_date, game_pk, at_bat_number, pitch_number)
//!     ├─ season              (game_year, or the year of game_date)
//!     ├─ identities          (batter, pitcher, player_name)
//!     └─ classifications     (events, description, bb_type, launch_speed)
//! ```
//!
//! # Column Presence
//!
//! Optional columns are tracked in [`EventTable::columns`] so that a statistic which
//! needs, say, `bb_type` can fail fast with a descriptive error when the source table
//! does not provide it, instead of silently treating every row as "no batted ball".
//!
//! # CSV Format
//!
//! ```text
//! game_date,game_pk,at_bat_number,pitch_number,batter,pitcher,events,description,bb_type
//! 2023-04-01,718001,1,1,660271,605141,,called_strike,
//! 2023-04-01,718001,1,2,660271,605141,single,hit_into_play,line_drive
//! ```
//!
//! Unknown headers are ignored and empty fields are read as null.
//!
//! # Examples
//!
//! ```
//! use saber_analysis::event::{Column, EventTable, Outcome};
//!
//! let csv = "\
//! game_date,game_pk,at_bat_number,batter,events
//! 2023-04-01,718001,1,660271,
//! 2023-04-01,718001,1,660271,home_run
//! ";
//!
//! let table = EventTable::from_csv_reader(csv.as_bytes()).unwrap();
//! assert_eq!(table.len(), 2);
//! assert!(table.has_column(Column::Events));
//! assert!(!table.has_column(Column::BbType));
//! assert_eq!(table.records()[1].events, Some(Outcome::HomeRun));
//! assert_eq!(table.records()[1].season, 2023);
//! ```

use std::{
    collections::BTreeSet,
    fmt,
    fs::File,
    io,
    path::{Path, PathBuf},
};

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};

/// Logical column of the event table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    GameDate,
    GameYear,
    GamePk,
    AtBatNumber,
    PitchNumber,
    Batter,
    Pitcher,
    PlayerName,
    Events,
    Description,
    BbType,
    LaunchSpeed,
}

/// Set of columns provided by an event source.
pub type ColumnSet = BTreeSet<Column>;

impl Column {
    pub const ALL: [Column; 12] = [
        Column::GameDate,
        Column::GameYear,
        Column::GamePk,
        Column::AtBatNumber,
        Column::PitchNumber,
        Column::Batter,
        Column::Pitcher,
        Column::PlayerName,
        Column::Events,
        Column::Description,
        Column::BbType,
        Column::LaunchSpeed,
    ];

    /// Columns every event table must provide (the chronological ordering keys).
    pub const REQUIRED: [Column; 3] = [Column::GameDate, Column::GamePk, Column::AtBatNumber];

    /// CSV header name of the column.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Column::GameDate => "game_date",
            Column::GameYear => "game_year",
            Column::GamePk => "game_pk",
            Column::AtBatNumber => "at_bat_number",
            Column::PitchNumber => "pitch_number",
            Column::Batter => "batter",
            Column::Pitcher => "pitcher",
            Column::PlayerName => "player_name",
            Column::Events => "events",
            Column::Description => "description",
            Column::BbType => "bb_type",
            Column::LaunchSpeed => "launch_speed",
        }
    }

    #[must_use]
    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.header() == header)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.header(), f)
    }
}

/// Terminal result of a plate appearance (`events` column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Single,
    Double,
    Triple,
    HomeRun,
    Walk,
    HitByPitch,
    Strikeout,
    StrikeoutDoublePlay,
    FieldOut,
    #[serde(other)]
    Other,
}

impl Outcome {
    /// Bases credited for slugging (0 for non-hits).
    #[must_use]
    pub fn total_bases(self) -> u8 {
        match self {
            Outcome::Single => 1,
            Outcome::Double => 2,
            Outcome::Triple => 3,
            Outcome::HomeRun => 4,
            _ => 0,
        }
    }

    #[must_use]
    pub fn is_hit(self) -> bool {
        self.total_bases() > 0
    }

    #[must_use]
    pub fn is_on_base(self) -> bool {
        self.is_hit() || matches!(self, Outcome::Walk | Outcome::HitByPitch)
    }

    #[must_use]
    pub fn is_strikeout(self) -> bool {
        matches!(self, Outcome::Strikeout | Outcome::StrikeoutDoublePlay)
    }

    /// Approximate at-bat flag.
    ///
    /// Counts hits, strikeouts and field outs. Other outs in play (double plays,
    /// fielder's choices, errors) and sacrifices are not distinguished and do not count.
    #[must_use]
    pub fn is_at_bat(self) -> bool {
        self.is_hit() || self.is_strikeout() || self == Outcome::FieldOut
    }
}

/// Result of a single pitch (`description` column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchDescription {
    Foul,
    FoulBunt,
    FoulTip,
    HitIntoPlay,
    SwingingStrike,
    SwingingStrikeBlocked,
    MissedBunt,
    #[serde(other)]
    Other,
}

impl PitchDescription {
    #[must_use]
    pub fn is_swing(self) -> bool {
        self != PitchDescription::Other
    }

    #[must_use]
    pub fn is_contact(self) -> bool {
        matches!(
            self,
            PitchDescription::Foul
                | PitchDescription::FoulBunt
                | PitchDescription::FoulTip
                | PitchDescription::HitIntoPlay
        )
    }
}

/// Batted-ball classification (`bb_type` column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattedBallType {
    GroundBall,
    LineDrive,
    FlyBall,
    Popup,
    #[serde(other)]
    Other,
}

/// Chronological ordering key of an event within a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceKey {
    pub game_date: NaiveDate,
    pub game_pk: u64,
    pub at_bat_number: u32,
    pub pitch_number: u32,
}

/// Unit of analysis: one player in one season.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerSeasonKey {
    pub season: i32,
    pub player: String,
}

impl fmt::Display for PlayerSeasonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.player, self.season)
    }
}

/// One pitch-level event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub game_date: NaiveDate,
    pub season: i32,
    pub game_pk: u64,
    pub at_bat_number: u32,
    /// Pitch index within the plate appearance (0 when the source has no pitch numbers)
    pub pitch_number: u32,
    pub batter: Option<String>,
    pub pitcher: Option<String>,
    pub player_name: Option<String>,
    pub events: Option<Outcome>,
    pub description: Option<PitchDescription>,
    pub bb_type: Option<BattedBallType>,
    pub launch_speed: Option<f64>,
}

impl EventRecord {
    /// Creates an event with only its ordering keys set.
    ///
    /// The season defaults to the year of `game_date`.
    #[must_use]
    pub fn new(game_date: NaiveDate, game_pk: u64, at_bat_number: u32) -> Self {
        Self {
            game_date,
            season: game_date.year(),
            game_pk,
            at_bat_number,
            pitch_number: 0,
            batter: None,
            pitcher: None,
            player_name: None,
            events: None,
            description: None,
            bb_type: None,
            launch_speed: None,
        }
    }

    #[must_use]
    pub fn sequence_key(&self) -> SequenceKey {
        SequenceKey {
            game_date: self.game_date,
            game_pk: self.game_pk,
            at_bat_number: self.at_bat_number,
            pitch_number: self.pitch_number,
        }
    }

    /// Whether this pitch ended a plate appearance.
    #[must_use]
    pub fn is_plate_appearance(&self) -> bool {
        self.events.is_some()
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("missing required column '{column}'")]
    MissingColumn { column: Column },
    #[display("failed to open events file: {}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[display("failed to read CSV header")]
    Header { source: csv::Error },
    #[display("failed to parse event record #{record}")]
    Record { record: usize, source: csv::Error },
}

/// Row layout of the CSV source.
#[derive(Debug, Deserialize)]
struct CsvEventRow {
    game_date: NaiveDate,
    #[serde(default)]
    game_year: Option<i32>,
    game_pk: u64,
    at_bat_number: u32,
    #[serde(default)]
    pitch_number: Option<u32>,
    #[serde(default)]
    batter: Option<String>,
    #[serde(default)]
    pitcher: Option<String>,
    #[serde(default)]
    player_name: Option<String>,
    #[serde(default)]
    events: Option<Outcome>,
    #[serde(default)]
    description: Option<PitchDescription>,
    #[serde(default)]
    bb_type: Option<BattedBallType>,
    #[serde(default)]
    launch_speed: Option<f64>,
}

impl From<CsvEventRow> for EventRecord {
    fn from(row: CsvEventRow) -> Self {
        Self {
            game_date: row.game_date,
            season: row.game_year.unwrap_or_else(|| row.game_date.year()),
            game_pk: row.game_pk,
            at_bat_number: row.at_bat_number,
            pitch_number: row.pitch_number.unwrap_or(0),
            batter: row.batter,
            pitcher: row.pitcher,
            player_name: row.player_name,
            events: row.events,
            description: row.description,
            bb_type: row.bb_type,
            launch_speed: row.launch_speed,
        }
    }
}

/// In-memory event table.
///
/// The table is read-only once built; the analysis borrows it and never mutates it.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    columns: ColumnSet,
    records: Vec<EventRecord>,
}

impl EventTable {
    #[must_use]
    pub fn new<I>(columns: I, records: Vec<EventRecord>) -> Self
    where
        I: IntoIterator<Item = Column>,
    {
        Self {
            columns: columns.into_iter().collect(),
            records,
        }
    }

    /// Reads a table from CSV data with a header row.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MissingColumn`] if one of [`Column::REQUIRED`] is absent
    /// from the header, and [`LoadError::Record`] for the first malformed row.
    pub fn from_csv_reader<R>(reader: R) -> Result<Self, LoadError>
    where
        R: io::Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = reader
            .headers()
            .map_err(|source| LoadError::Header { source })?
            .iter()
            .filter_map(Column::from_header)
            .collect::<ColumnSet>();

        if let Some(column) = Column::REQUIRED
            .into_iter()
            .find(|column| !columns.contains(column))
        {
            return Err(LoadError::MissingColumn { column });
        }

        let records = reader
            .deserialize::<CsvEventRow>()
            .enumerate()
            .map(|(i, row)| {
                row.map(EventRecord::from)
                    .map_err(|source| LoadError::Record {
                        record: i + 1,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { columns, records })
    }

    /// Reads a table from a CSV file.
    pub fn from_csv_path<P>(path: P) -> Result<Self, LoadError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_owned(),
            source,
        })?;
        Self::from_csv_reader(io::BufReader::new(file))
    }

    #[must_use]
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    #[must_use]
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Row indices in chronological order.
    ///
    /// Sorted by [`SequenceKey`]; rows with identical keys keep their table order,
    /// so the result is the same on every run over the same table.
    #[must_use]
    pub fn chronological_order(&self) -> Vec<usize> {
        let mut order = (0..self.records.len()).collect::<Vec<_>>();
        order.sort_by_key(|&i| self.records[i].sequence_key());
        order
    }
}
