//! Dataset summary of an event table.
//!
//! Used to sanity-check an export before running the reliability analysis: season
//! coverage, null rates of the columns the built-in statistics rely on, the most frequent
//! players, and how many plate appearances a typical batter-season has (which bounds the
//! thresholds worth analysing).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use saber_stats::descriptive::DescriptiveStats;
use serde::Serialize;

use crate::event::{EventTable, PlayerSeasonKey};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    pub total_events: usize,
    pub seasons: BTreeMap<i32, SeasonSummary>,
    pub null_counts: NullCounts,
    /// Most frequent `player_name` values with their event counts
    pub top_players: Vec<PlayerCount>,
    /// Plate appearances per batter-season
    pub plate_appearances_per_batter_season: Option<Distribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub events: usize,
    pub games: usize,
    pub plate_appearances: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NullCounts {
    pub events: usize,
    pub bb_type: usize,
    pub launch_speed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerCount {
    pub player_name: String,
    pub events: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl From<DescriptiveStats> for Distribution {
    fn from(stats: DescriptiveStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            median: stats.median,
            std_dev: stats.std_dev,
        }
    }
}

impl EventSummary {
    /// Summarizes `table`, listing the `top_n` most frequent players.
    ///
    /// Players with equal counts are listed in name order.
    #[must_use]
    pub fn from_table(table: &EventTable, top_n: usize) -> Self {
        let mut seasons: BTreeMap<i32, (SeasonSummary, BTreeSet<u64>)> = BTreeMap::new();
        let mut null_counts = NullCounts::default();
        let mut players: HashMap<&str, usize> = HashMap::new();
        let mut batter_seasons: BTreeMap<PlayerSeasonKey, usize> = BTreeMap::new();

        for event in table.records() {
            let (season, games) = seasons.entry(event.season).or_insert_with(|| {
                let summary = SeasonSummary {
                    events: 0,
                    games: 0,
                    plate_appearances: 0,
                    first_date: event.game_date,
                    last_date: event.game_date,
                };
                (summary, BTreeSet::new())
            });
            season.events += 1;
            season.first_date = season.first_date.min(event.game_date);
            season.last_date = season.last_date.max(event.game_date);
            games.insert(event.game_pk);

            if event.is_plate_appearance() {
                season.plate_appearances += 1;
                if let Some(batter) = &event.batter {
                    let key = PlayerSeasonKey {
                        season: event.season,
                        player: batter.clone(),
                    };
                    *batter_seasons.entry(key).or_default() += 1;
                }
            }

            null_counts.events += usize::from(event.events.is_none());
            null_counts.bb_type += usize::from(event.bb_type.is_none());
            null_counts.launch_speed += usize::from(event.launch_speed.is_none());

            if let Some(name) = &event.player_name {
                *players.entry(name).or_default() += 1;
            }
        }

        let seasons = seasons
            .into_iter()
            .map(|(year, (mut season, games))| {
                season.games = games.len();
                (year, season)
            })
            .collect();

        let mut top_players = players
            .into_iter()
            .map(|(name, events)| PlayerCount {
                player_name: name.to_owned(),
                events,
            })
            .collect::<Vec<_>>();
        top_players.sort_by(|a, b| {
            b.events
                .cmp(&a.events)
                .then_with(|| a.player_name.cmp(&b.player_name))
        });
        top_players.truncate(top_n);

        #[expect(clippy::cast_precision_loss)]
        let plate_appearances_per_batter_season =
            DescriptiveStats::new(batter_seasons.into_values().map(|pa| pa as f64))
                .map(Distribution::from);

        Self {
            total_events: table.len(),
            seasons,
            null_counts,
            top_players,
            plate_appearances_per_batter_season,
        }
    }
}
