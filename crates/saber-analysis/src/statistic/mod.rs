//! Per-event statistic definitions.
//!
//! A statistic is defined by three things:
//!
//! 1. **Subject** ([`Subject`]) - whose statistic it is (batter or pitcher), which decides
//!    the identity column used to form player-seasons
//! 2. **Eligibility** ([`StatisticDefinition::is_eligible()`]) - which events form the
//!    denominator population (e.g. only plate appearances, only batted balls)
//! 3. **Value** ([`StatisticDefinition::value()`]) - the numeric value an eligible event
//!    contributes (e.g. a 0/1 strikeout indicator, total bases)
//!
//! The mean of the values over a player-season's eligible events is the player's rate
//! for that statistic.
//!
//! # Extending
//!
//! [`StatisticDefinition`] is the extension point: the reliability analysis only talks to
//! the trait, so new statistics are added by implementing it (or by composing a
//! [`standard::StandardStatistic`] from the built-in selectors) and passing the definition
//! in, without touching the analysis loop.
//!
//! The built-in registry is [`standard::all_statistic_definitions()`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::{Column, EventRecord};

pub use self::standard::{
    Eligibility, StandardStatistic, UnknownStatisticError, ValueSelector,
    all_statistic_definitions, find_statistic_definitions,
};

pub mod standard;

/// Whose performance a statistic measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Batter,
    Pitcher,
}

impl Subject {
    /// Identity column of the subject.
    #[must_use]
    pub fn column(self) -> Column {
        match self {
            Subject::Batter => Column::Batter,
            Subject::Pitcher => Column::Pitcher,
        }
    }

    /// Identity of the subject of an event, if recorded.
    #[must_use]
    pub fn identity(self, event: &EventRecord) -> Option<&str> {
        match self {
            Subject::Batter => event.batter.as_deref(),
            Subject::Pitcher => event.pitcher.as_deref(),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Subject::Batter => "batter",
            Subject::Pitcher => "pitcher",
        };
        fmt::Display::fmt(s, f)
    }
}

pub trait StatisticDefinition: fmt::Debug + Send + Sync {
    /// Machine identifier (e.g. `k_rate`).
    #[must_use]
    fn id(&self) -> &str;
    /// Display name written to result tables (e.g. `Strikeout Rate`).
    #[must_use]
    fn name(&self) -> &str;
    /// Category written to result tables (e.g. `Offense`).
    #[must_use]
    fn category(&self) -> &str;
    #[must_use]
    fn subject(&self) -> Subject;
    /// Columns read by [`Self::is_eligible()`] and [`Self::value()`], excluding the
    /// subject's identity column.
    #[must_use]
    fn value_columns(&self) -> Vec<Column>;
    #[must_use]
    fn clone_boxed(&self) -> BoxedStatisticDefinition;
    #[must_use]
    fn is_eligible(&self, event: &EventRecord) -> bool;
    /// Value contributed by an eligible event.
    ///
    /// `None` excludes the event from the sample.
    #[must_use]
    fn value(&self, event: &EventRecord) -> Option<f64>;

    /// Every column the statistic needs, including the subject's identity column.
    #[must_use]
    fn required_columns(&self) -> Vec<Column> {
        let mut columns = vec![self.subject().column()];
        columns.extend(self.value_columns());
        columns.sort();
        columns.dedup();
        columns
    }

    /// Value of `event` if it belongs to this statistic's population.
    #[must_use]
    fn eligible_value(&self, event: &EventRecord) -> Option<f64> {
        if self.is_eligible(event) {
            self.value(event)
        } else {
            None
        }
    }
}

pub type BoxedStatisticDefinition = Box<dyn StatisticDefinition>;

impl Clone for BoxedStatisticDefinition {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl StatisticDefinition for BoxedStatisticDefinition {
    fn id(&self) -> &str {
        self.as_ref().id()
    }

    fn name(&self) -> &str {
        self.as_ref().name()
    }

    fn category(&self) -> &str {
        self.as_ref().category()
    }

    fn subject(&self) -> Subject {
        self.as_ref().subject()
    }

    fn value_columns(&self) -> Vec<Column> {
        self.as_ref().value_columns()
    }

    fn clone_boxed(&self) -> BoxedStatisticDefinition {
        self.as_ref().clone_boxed()
    }

    fn is_eligible(&self, event: &EventRecord) -> bool {
        self.as_ref().is_eligible(event)
    }

    fn value(&self, event: &EventRecord) -> Option<f64> {
        self.as_ref().value(event)
    }
}
