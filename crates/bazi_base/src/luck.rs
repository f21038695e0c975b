//! Luck cycles (大运): start offset, decade pillars and annual pillars.
//!
//! The offset is measured between the luck moment and the neighbouring jie
//! (the next one when running forward, the previous one in reverse) and
//! scaled to symbolic years/months/days/hours by one of two conventions.

use bazi_time::{
    NaiveDateTime, SolarTermSource, add_calendar_units, boundary_hour_index,
    calendar_days_between, format_civil,
};
use chrono::Datelike;
use tracing::debug;

use crate::chart::Chart;
use crate::element::Polarity;
use crate::error::BaziError;
use crate::ganzhi::{GanZhi, Stem};

/// Default number of decade pillars.
pub const DEFAULT_LUCK_PILLARS: usize = 9;

/// Upper bound on annual pillars per decade.
pub const MAX_ANNUAL_PILLARS: usize = 10;

/// Seconds in one symbolic year (4320 minutes) under [`Sect::MinuteRatio`].
const SECS_PER_YEAR: i64 = 4320 * 60;
/// Seconds in one symbolic month (360 minutes).
const SECS_PER_MONTH: i64 = 360 * 60;
/// Seconds in one symbolic day (12 minutes).
const SECS_PER_DAY: i64 = 12 * 60;
/// Seconds in one symbolic hour (half a minute).
const SECS_PER_HOUR: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Male => "男",
            Self::Female => "女",
        }
    }
}

/// Parse a gender: 1/m/male/man/boy/男 or 0/f/female/woman/girl/女.
pub fn parse_gender(text: &str) -> Result<Gender, BaziError> {
    match text.trim().to_lowercase().as_str() {
        "1" | "m" | "male" | "man" | "boy" | "男" => Ok(Gender::Male),
        "0" | "f" | "female" | "woman" | "girl" | "女" => Ok(Gender::Female),
        other => Err(BaziError::MalformedInput(format!(
            "gender {other:?} must be male/female, m/f, 1/0 or 男/女"
        ))),
    }
}

/// Counting convention for the luck offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sect {
    /// Sect 1: double-hours and calendar days between the boundaries.
    HourBranch,
    /// Sect 2: elapsed minutes at 4320/360/12/0.5 per year/month/day/hour.
    #[default]
    MinuteRatio,
}

impl Sect {
    /// Sect from its traditional number (1 or 2).
    pub fn from_code(code: u8) -> Result<Self, BaziError> {
        match code {
            1 => Ok(Self::HourBranch),
            2 => Ok(Self::MinuteRatio),
            _ => Err(BaziError::Precondition("sect must be 1 or 2")),
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            Self::HourBranch => 1,
            Self::MinuteRatio => 2,
        }
    }

    /// Offset between two boundary moments. `start` must not be after `end`.
    pub fn offset(
        self,
        start: &NaiveDateTime,
        end: &NaiveDateTime,
    ) -> Result<LuckOffset, BaziError> {
        if start > end {
            return Err(BaziError::Precondition("luck boundary start is after its end"));
        }
        Ok(match self {
            Self::HourBranch => hour_branch_offset(start, end),
            Self::MinuteRatio => minute_ratio_offset(start, end),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LuckDirection {
    Forward,
    Reverse,
}

impl LuckDirection {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Forward => "顺行",
            Self::Reverse => "逆行",
        }
    }

    /// Forward for a yang year with a male, or a yin year with a female.
    pub const fn for_year_stem(year_stem: Stem, gender: Gender) -> Self {
        match (year_stem.polarity(), gender) {
            (Polarity::Yang, Gender::Male) | (Polarity::Yin, Gender::Female) => Self::Forward,
            _ => Self::Reverse,
        }
    }

    const fn step(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Reverse => -1,
        }
    }
}

/// Symbolic time from birth until the first luck pillar begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LuckOffset {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
}

impl std::fmt::Display for LuckOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}年{}个月{}天{}小时",
            self.years, self.months, self.days, self.hours
        )
    }
}

/// Sect 2: whole seconds between boundaries, decomposed greedily.
fn minute_ratio_offset(start: &NaiveDateTime, end: &NaiveDateTime) -> LuckOffset {
    let mut secs = (*end - *start).num_seconds();
    let years = secs / SECS_PER_YEAR;
    secs -= years * SECS_PER_YEAR;
    let months = secs / SECS_PER_MONTH;
    secs -= months * SECS_PER_MONTH;
    let days = secs / SECS_PER_DAY;
    secs -= days * SECS_PER_DAY;
    let hours = secs / SECS_PER_HOUR;
    LuckOffset {
        years: years as u32,
        months: months as u32,
        days: days as u32,
        hours: hours as u32,
    }
}

/// Sect 1: each double-hour counts ten days, each calendar day four months.
fn hour_branch_offset(start: &NaiveDateTime, end: &NaiveDateTime) -> LuckOffset {
    let mut hour_diff = i64::from(boundary_hour_index(end)) - i64::from(boundary_hour_index(start));
    let mut day_diff = calendar_days_between(start, end);
    if hour_diff < 0 {
        hour_diff += 12;
        day_diff -= 1;
    }
    let month_diff = hour_diff * 10 / 30;
    let total_months = day_diff * 4 + month_diff;
    let days = hour_diff * 10 - month_diff * 30;
    let years = total_months / 12;
    LuckOffset {
        years: years as u32,
        months: (total_months - years * 12) as u32,
        days: days as u32,
        hours: 0,
    }
}

/// Where and when the luck cycle starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuckStart {
    pub gender: Gender,
    pub direction: LuckDirection,
    pub sect: Sect,
    /// Earlier boundary moment used for the offset.
    pub boundary_start: NaiveDateTime,
    /// Later boundary moment used for the offset.
    pub boundary_end: NaiveDateTime,
    pub offset: LuckOffset,
    /// Civil moment the first luck pillar begins.
    pub start: NaiveDateTime,
    /// Gregorian year of the chart moment.
    pub birth_year: i32,
    /// Counted age (虚岁) at the first luck pillar.
    pub first_age: i32,
    month_pillar: GanZhi,
}

/// Compute the luck start.
///
/// Direction comes from `chart`'s year stem; boundaries come from `terms`
/// around `luck_moment`, which may be a solar-corrected version of the
/// moment `chart` was built for. `birth_year` is the chart moment's year.
pub fn luck_start(
    chart: &Chart,
    birth_year: i32,
    luck_moment: &NaiveDateTime,
    gender: Gender,
    sect: Sect,
    terms: &dyn SolarTermSource,
) -> Result<LuckStart, BaziError> {
    let direction = LuckDirection::for_year_stem(chart.year().stem, gender);
    let (boundary_start, boundary_end) = match direction {
        LuckDirection::Forward => (*luck_moment, terms.next_jie(luck_moment)?.at),
        LuckDirection::Reverse => (terms.prev_jie(luck_moment)?.at, *luck_moment),
    };
    let offset = sect.offset(&boundary_start, &boundary_end)?;
    let start = add_calendar_units(
        luck_moment,
        offset.years,
        offset.months,
        offset.days,
        offset.hours,
    )?;
    let first_age = start.year() - birth_year + 1;
    debug!(
        ?gender,
        direction = direction.name(),
        sect = sect.code(),
        boundary_start = %format_civil(&boundary_start),
        boundary_end = %format_civil(&boundary_end),
        minutes = (boundary_end - boundary_start).num_seconds() as f64 / 60.0,
        %offset,
        start = %format_civil(&start),
        "computed luck start"
    );
    Ok(LuckStart {
        gender,
        direction,
        sect,
        boundary_start,
        boundary_end,
        offset,
        start,
        birth_year,
        first_age,
        month_pillar: chart.month(),
    })
}

/// One ten-year luck pillar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuckPillar {
    /// 1-based.
    pub index: u32,
    pub pillar: GanZhi,
    pub start_year: i32,
    pub end_year: i32,
    pub start_age: i32,
    pub end_age: i32,
}

/// One year inside a luck pillar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnualPillar {
    pub year: i32,
    pub pillar: GanZhi,
    pub age: i32,
}

impl LuckStart {
    /// The first `count` luck pillars, stepping from the month pillar.
    pub fn pillars(&self, count: usize) -> Vec<LuckPillar> {
        (1..=count as u32)
            .map(|index| {
                let start_year = self.start.year() + 10 * (index as i32 - 1);
                let start_age = start_year - self.birth_year + 1;
                LuckPillar {
                    index,
                    pillar: self
                        .month_pillar
                        .offset(self.direction.step() * i64::from(index)),
                    start_year,
                    end_year: start_year + 9,
                    start_age,
                    end_age: start_age + 9,
                }
            })
            .collect()
    }
}

impl LuckPillar {
    /// Annual pillars from the decade's first year, at most ten.
    pub fn annual_pillars(&self, count: usize) -> Vec<AnnualPillar> {
        (0..count.min(MAX_ANNUAL_PILLARS) as i32)
            .map(|k| AnnualPillar {
                year: self.start_year + k,
                pillar: GanZhi::for_year(self.start_year + k),
                age: self.start_age + k,
            })
            .collect()
    }
}
