//! Built-in statistics composed from value selectors and eligibility filters.
//!
//! Every built-in statistic is a [`StandardStatistic`]: a [`ValueSelector`] that maps an
//! event to a number and an [`Eligibility`] filter that decides the denominator population.
//!
//! | Eligibility | Population | Used for |
//! |---|---|---|
//! | [`Eligibility::AllPitches`] | every pitch | Swing% |
//! | [`Eligibility::Swing`] | pitches swung at | Contact% |
//! | [`Eligibility::PlateAppearance`] | pitches that ended a PA | K, BB, HR rates, OBP |
//! | [`Eligibility::AtBat`] | approximate at-bats | AVG, SLG, ISO |
//! | [`Eligibility::BattedBall`] | balls in play | batted-ball mix |
//! | [`Eligibility::LaunchSpeedTracked`] | tracked batted balls | exit velocity |
//!
//! The at-bat filter is an approximation: it counts hits, strikeouts and field outs as
//! at-bats (see [`Outcome::is_at_bat()`]).

use std::fmt;

use crate::event::{BattedBallType, Column, EventRecord, Outcome};

use super::{BoxedStatisticDefinition, StatisticDefinition, Subject};

pub const OFFENSE: &str = "Offense";
pub const PITCHING: &str = "Pitching";

#[must_use]
pub fn all_statistic_definitions() -> Vec<BoxedStatisticDefinition> {
    use self::{Eligibility as E, ValueSelector as V};
    use super::Subject::{Batter, Pitcher};

    let bb = V::BattedBall;
    #[rustfmt::skip]
    let stats = [
        // plate discipline
        StandardStatistic::new("swing_pct", "Swing%", OFFENSE, Batter, V::Swing, E::AllPitches),
        StandardStatistic::new("contact_pct", "Contact%", OFFENSE, Batter, V::Contact, E::Swing),
        // plate appearance outcomes
        StandardStatistic::new("k_rate", "Strikeout Rate", OFFENSE, Batter, V::Strikeout, E::PlateAppearance),
        StandardStatistic::new("bb_rate", "Walk Rate", OFFENSE, Batter, V::Walk, E::PlateAppearance),
        StandardStatistic::new("hr_rate", "Home Run Rate", OFFENSE, Batter, V::HomeRun, E::PlateAppearance),
        StandardStatistic::new("avg", "AVG", OFFENSE, Batter, V::Hit, E::AtBat),
        StandardStatistic::new("obp", "OBP", OFFENSE, Batter, V::OnBase, E::PlateAppearance),
        StandardStatistic::new("slg", "SLG", OFFENSE, Batter, V::TotalBases, E::AtBat),
        StandardStatistic::new("iso", "ISO", OFFENSE, Batter, V::ExtraBases, E::AtBat),
        // batted balls
        StandardStatistic::new("ld_pct", "Line Drive%", OFFENSE, Batter, bb(BattedBallType::LineDrive), E::BattedBall),
        StandardStatistic::new("gb_pct", "Ground Ball%", OFFENSE, Batter, bb(BattedBallType::GroundBall), E::BattedBall),
        StandardStatistic::new("fb_pct", "Fly Ball%", OFFENSE, Batter, bb(BattedBallType::FlyBall), E::BattedBall),
        StandardStatistic::new("popup_pct", "Popup%", OFFENSE, Batter, bb(BattedBallType::Popup), E::BattedBall),
        StandardStatistic::new("exit_velocity", "Exit Velocity", OFFENSE, Batter, V::LaunchSpeed, E::LaunchSpeedTracked),
        // pitching
        StandardStatistic::new("k_per_pa", "K/PA", PITCHING, Pitcher, V::Strikeout, E::PlateAppearance),
        StandardStatistic::new("bb_per_pa", "BB/PA", PITCHING, Pitcher, V::Walk, E::PlateAppearance),
        StandardStatistic::new("hr_per_pa", "HR/PA", PITCHING, Pitcher, V::HomeRun, E::PlateAppearance),
        StandardStatistic::new("gb_pct_allowed", "GB%", PITCHING, Pitcher, bb(BattedBallType::GroundBall), E::BattedBall),
        StandardStatistic::new("fb_pct_allowed", "FB%", PITCHING, Pitcher, bb(BattedBallType::FlyBall), E::BattedBall),
    ];
    stats
        .into_iter()
        .map(|stat| Box::new(stat) as BoxedStatisticDefinition)
        .collect()
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown statistic '{id}'")]
pub struct UnknownStatisticError {
    pub id: String,
}

/// Resolves statistic ids against the built-in registry, in the requested order.
pub fn find_statistic_definitions<I, S>(
    ids: I,
) -> Result<Vec<BoxedStatisticDefinition>, UnknownStatisticError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let all = all_statistic_definitions();
    ids.into_iter()
        .map(|id| {
            let id = id.as_ref();
            all.iter()
                .find(|stat| stat.id() == id)
                .cloned()
                .ok_or_else(|| UnknownStatisticError { id: id.to_owned() })
        })
        .collect()
}

/// Maps an event to the value it contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSelector {
    /// 1 if the batter swung
    Swing,
    /// 1 if the batter made contact
    Contact,
    Strikeout,
    Walk,
    HomeRun,
    Hit,
    /// 1 for hits, walks and hit-by-pitches
    OnBase,
    /// 0-4 bases credited
    TotalBases,
    /// Bases beyond first on a hit (total bases minus hit), whose mean is ISO
    ExtraBases,
    /// 1 if the ball in play has the given type
    BattedBall(BattedBallType),
    /// Exit velocity in mph
    LaunchSpeed,
}

impl ValueSelector {
    #[must_use]
    pub fn column(self) -> Column {
        match self {
            ValueSelector::Swing | ValueSelector::Contact => Column::Description,
            ValueSelector::Strikeout
            | ValueSelector::Walk
            | ValueSelector::HomeRun
            | ValueSelector::Hit
            | ValueSelector::OnBase
            | ValueSelector::TotalBases
            | ValueSelector::ExtraBases => Column::Events,
            ValueSelector::BattedBall(_) => Column::BbType,
            ValueSelector::LaunchSpeed => Column::LaunchSpeed,
        }
    }

    #[must_use]
    pub fn select(self, event: &EventRecord) -> Option<f64> {
        let outcome = |f: fn(Outcome) -> bool| indicator(event.events.is_some_and(f));
        let value = match self {
            ValueSelector::Swing => indicator(event.description.is_some_and(|d| d.is_swing())),
            ValueSelector::Contact => {
                indicator(event.description.is_some_and(|d| d.is_contact()))
            }
            ValueSelector::Strikeout => outcome(Outcome::is_strikeout),
            ValueSelector::Walk => outcome(|o| o == Outcome::Walk),
            ValueSelector::HomeRun => outcome(|o| o == Outcome::HomeRun),
            ValueSelector::Hit => outcome(Outcome::is_hit),
            ValueSelector::OnBase => outcome(Outcome::is_on_base),
            ValueSelector::TotalBases => f64::from(event.events.map_or(0, Outcome::total_bases)),
            ValueSelector::ExtraBases => {
                f64::from(event.events.map_or(0, Outcome::total_bases).saturating_sub(1))
            }
            ValueSelector::BattedBall(ty) => indicator(event.bb_type == Some(ty)),
            ValueSelector::LaunchSpeed => return event.launch_speed.filter(|v| v.is_finite()),
        };
        Some(value)
    }
}

fn indicator(flag: bool) -> f64 {
    f64::from(u8::from(flag))
}

/// Decides which events belong to a statistic's population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    AllPitches,
    Swing,
    PlateAppearance,
    AtBat,
    BattedBall,
    LaunchSpeedTracked,
}

impl Eligibility {
    #[must_use]
    pub fn column(self) -> Option<Column> {
        match self {
            Eligibility::AllPitches => None,
            Eligibility::Swing => Some(Column::Description),
            Eligibility::PlateAppearance | Eligibility::AtBat => Some(Column::Events),
            Eligibility::BattedBall => Some(Column::BbType),
            Eligibility::LaunchSpeedTracked => Some(Column::LaunchSpeed),
        }
    }

    #[must_use]
    pub fn accepts(self, event: &EventRecord) -> bool {
        match self {
            Eligibility::AllPitches => true,
            Eligibility::Swing => event.description.is_some_and(|d| d.is_swing()),
            Eligibility::PlateAppearance => event.is_plate_appearance(),
            Eligibility::AtBat => event.events.is_some_and(Outcome::is_at_bat),
            Eligibility::BattedBall => event.bb_type.is_some(),
            Eligibility::LaunchSpeedTracked => event.launch_speed.is_some(),
        }
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Eligibility::AllPitches => "pitches",
            Eligibility::Swing => "swings",
            Eligibility::PlateAppearance => "plate appearances",
            Eligibility::AtBat => "at-bats",
            Eligibility::BattedBall => "batted balls",
            Eligibility::LaunchSpeedTracked => "tracked batted balls",
        };
        fmt::Display::fmt(s, f)
    }
}

/// Statistic composed from a value selector and an eligibility filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardStatistic {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub subject: Subject,
    pub value: ValueSelector,
    pub eligibility: Eligibility,
}

impl StandardStatistic {
    #[must_use]
    pub const fn new(
        id: &'static str,
        name: &'static str,
        category: &'static str,
        subject: Subject,
        value: ValueSelector,
        eligibility: Eligibility,
    ) -> Self {
        Self {
            id,
            name,
            category,
            subject,
            value,
            eligibility,
        }
    }
}

impl StatisticDefinition for StandardStatistic {
    fn id(&self) -> &str {
        self.id
    }

    fn name(&self) -> &str {
        self.name
    }

    fn category(&self) -> &str {
        self.category
    }

    fn subject(&self) -> Subject {
        self.subject
    }

    fn value_columns(&self) -> Vec<Column> {
        let mut columns = vec![self.value.column()];
        columns.extend(self.eligibility.column());
        columns
    }

    fn clone_boxed(&self) -> BoxedStatisticDefinition {
        Box::new(self.clone())
    }

    fn is_eligible(&self, event: &EventRecord) -> bool {
        self.eligibility.accepts(event)
    }

    fn value(&self, event: &EventRecord) -> Option<f64> {
        self.value.select(event)
    }
}
