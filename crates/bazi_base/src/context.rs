//! Evaluation context: one birth input, one configuration, one chart.

use bazi_time::{GeoLocation, NaiveDateTime, SolarTermSource, true_solar_time};
use chrono::Datelike;
use tracing::debug;

use crate::branch_relation::{PairRelations, chart_relations};
use crate::chart::{Chart, ZiHourMode};
use crate::error::BaziError;
use crate::luck::{DEFAULT_LUCK_PILLARS, Gender, LuckPillar, LuckStart, Sect, luck_start};
use crate::relation::{ChartFlow, chart_flow};
use crate::strength::{StrengthAssessment, assess};

/// Which computations use the solar-corrected moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrueSolarScope {
    /// Chart and luck cycle both use true solar time.
    All,
    /// Chart stays on standard time; only the luck offset is corrected.
    #[default]
    LuckOnly,
}

/// Evaluation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartConfig {
    /// `None` disables true-solar correction.
    pub true_solar: Option<TrueSolarScope>,
    pub sect: Sect,
    pub zi_hour: ZiHourMode,
    pub luck_pillar_count: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            true_solar: None,
            sect: Sect::default(),
            zi_hour: ZiHourMode::default(),
            luck_pillar_count: DEFAULT_LUCK_PILLARS,
        }
    }
}

/// Birth data as entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirthInput {
    /// Civil (UTC+8) wall-clock moment.
    pub moment: NaiveDateTime,
    pub gender: Option<Gender>,
    pub location: Option<GeoLocation>,
}

/// Luck start plus its decade pillars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LuckReport {
    pub start: LuckStart,
    pub pillars: Vec<LuckPillar>,
}

/// A chart evaluated under a configuration.
pub struct BirthContext<'a> {
    input: BirthInput,
    config: ChartConfig,
    corrected: Option<NaiveDateTime>,
    chart_moment: NaiveDateTime,
    chart: Chart,
    terms: &'a dyn SolarTermSource,
}

impl<'a> BirthContext<'a> {
    /// Correct the moment if requested and build the chart.
    pub fn evaluate(
        input: BirthInput,
        config: ChartConfig,
        terms: &'a dyn SolarTermSource,
    ) -> Result<Self, BaziError> {
        let corrected = match config.true_solar {
            Some(_) => {
                let location = input.location.as_ref().ok_or(BaziError::Precondition(
                    "true solar time requires a longitude",
                ))?;
                Some(true_solar_time(&input.moment, location)?)
            }
            None => None,
        };
        let chart_moment = match (config.true_solar, corrected) {
            (Some(TrueSolarScope::All), Some(t)) => t,
            _ => input.moment,
        };
        let chart = Chart::from_moment(&chart_moment, terms, config.zi_hour)?;
        debug!(
            standard = %input.moment,
            corrected = ?corrected,
            chart_moment = %chart_moment,
            "evaluated birth context"
        );
        Ok(Self {
            input,
            config,
            corrected,
            chart_moment,
            chart,
            terms,
        })
    }

    pub fn input(&self) -> &BirthInput {
        &self.input
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    /// Solar-corrected moment, when correction was requested.
    pub fn corrected(&self) -> Option<NaiveDateTime> {
        self.corrected
    }

    /// Moment the chart was built for.
    pub fn chart_moment(&self) -> NaiveDateTime {
        self.chart_moment
    }

    /// Moment the luck offset is measured from.
    pub fn luck_moment(&self) -> NaiveDateTime {
        self.corrected.unwrap_or(self.chart_moment)
    }

    pub fn strength(&self) -> StrengthAssessment {
        assess(&self.chart)
    }

    pub fn flow(&self) -> ChartFlow {
        chart_flow(&self.chart)
    }

    pub fn relations(&self) -> Vec<PairRelations> {
        chart_relations(&self.chart)
    }

    /// Luck cycle for the input's gender.
    pub fn luck(&self) -> Result<LuckReport, BaziError> {
        let gender = self
            .input
            .gender
            .ok_or(BaziError::Precondition("luck cycle requires a gender"))?;
        self.luck_for(gender)
    }

    /// Luck cycle for an explicit gender.
    pub fn luck_for(&self, gender: Gender) -> Result<LuckReport, BaziError> {
        let start = luck_start(
            &self.chart,
            self.chart_moment.year(),
            &self.luck_moment(),
            gender,
            self.config.sect,
            self.terms,
        )?;
        let pillars = start.pillars(self.config.luck_pillar_count);
        Ok(LuckReport { start, pillars })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazi_time::{SolarTermTable, civil_time, format_civil};

    fn terms() -> SolarTermTable {
        SolarTermTable::parse(
            "1986-03-06 05:12:00 惊蛰\n\
             1986-04-05 10:06:12 清明\n\
             1986-05-06 03:30:42 立夏\n",
        )
        .unwrap()
    }

    fn input(gender: Option<Gender>, location: Option<GeoLocation>) -> BirthInput {
        BirthInput {
            moment: civil_time(1986, 4, 6, 0, 20, 0).unwrap(),
            gender,
            location,
        }
    }

    fn handan() -> GeoLocation {
        GeoLocation::new(115.449444, Some(36.490278)).unwrap()
    }

    #[test]
    fn standard_time_by_default() {
        let t = terms();
        let ctx = BirthContext::evaluate(input(None, None), ChartConfig::default(), &t).unwrap();
        assert_eq!(ctx.chart().to_string(), "丙寅 壬辰 庚辰 丙子");
        assert_eq!(ctx.corrected(), None);
        assert_eq!(ctx.luck_moment(), ctx.chart_moment());
    }

    #[test]
    fn luck_only_scope_keeps_standard_chart() {
        let t = terms();
        let config = ChartConfig {
            true_solar: Some(TrueSolarScope::LuckOnly),
            ..ChartConfig::default()
        };
        let ctx =
            BirthContext::evaluate(input(Some(Gender::Male), Some(handan())), config, &t).unwrap();
        assert_eq!(ctx.chart().to_string(), "丙寅 壬辰 庚辰 丙子");
        assert_eq!(format_civil(&ctx.luck_moment()), "1986-04-05 23:59:00");
        let luck = ctx.luck().unwrap();
        let o = luck.start.offset;
        assert_eq!((o.years, o.months, o.days, o.hours), (10, 0, 17, 15));
        assert_eq!(format_civil(&luck.start.start), "1996-04-23 14:59:00");
        assert_eq!(luck.pillars.len(), DEFAULT_LUCK_PILLARS);
    }

    #[test]
    fn all_scope_corrects_chart() {
        let t = terms();
        let config = ChartConfig {
            true_solar: Some(TrueSolarScope::All),
            ..ChartConfig::default()
        };
        let ctx = BirthContext::evaluate(input(None, Some(handan())), config, &t).unwrap();
        assert_eq!(ctx.chart().to_string(), "丙寅 壬辰 己卯 丙子");
    }

    #[test]
    fn true_solar_without_location_is_rejected() {
        let t = terms();
        let config = ChartConfig {
            true_solar: Some(TrueSolarScope::LuckOnly),
            ..ChartConfig::default()
        };
        let err = BirthContext::evaluate(input(None, None), config, &t)
            .err()
            .unwrap();
        assert!(matches!(err, BaziError::Precondition(_)));
    }

    #[test]
    fn luck_without_gender_is_rejected() {
        let t = terms();
        let ctx = BirthContext::evaluate(input(None, None), ChartConfig::default(), &t).unwrap();
        assert!(matches!(ctx.luck(), Err(BaziError::Precondition(_))));
        let female = ctx.luck_for(Gender::Female).unwrap();
        assert_eq!(format_civil(&female.start.start), "1986-06-17 03:20:00");
    }

    #[test]
    fn hour_branch_sect_from_context() {
        let t = terms();
        let config = ChartConfig {
            sect: Sect::HourBranch,
            luck_pillar_count: 3,
            ..ChartConfig::default()
        };
        let ctx =
            BirthContext::evaluate(input(Some(Gender::Male), None), config, &t).unwrap();
        let luck = ctx.luck().unwrap();
        let o = luck.start.offset;
        assert_eq!((o.years, o.months, o.days, o.hours), (10, 0, 20, 0));
        assert_eq!(format_civil(&luck.start.start), "1996-04-26 00:20:00");
        assert_eq!(luck.pillars.len(), 3);
    }
}
