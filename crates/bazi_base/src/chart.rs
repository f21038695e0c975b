//! The four-pillar chart and its construction from a civil moment.
//!
//! Pillar boundaries:
//! - year: switches at 立春 (the jie preceding 立春 still counts as the
//!   previous year)
//! - month: switches at each jie term
//! - day: switches at midnight, or at 23:00 under [`ZiHourMode::Early`]
//! - hour: two-hour blocks starting 23:00

use bazi_time::{NaiveDateTime, SolarTerm, SolarTermSource, TimeError, hour_branch_index};
use chrono::{Datelike, NaiveDate, Timelike};
use tracing::debug;

use crate::error::BaziError;
use crate::ganzhi::{Branch, GanZhi, Stem};
use crate::ten_gods::{TenGod, ten_god};
use crate::twelve_stages::{TwelveStage, twelve_stage};

/// One of the four chart positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PillarPosition {
    Year,
    Month,
    Day,
    Hour,
}

/// Positions in chart order.
pub const ALL_POSITIONS: [PillarPosition; 4] = [
    PillarPosition::Year,
    PillarPosition::Month,
    PillarPosition::Day,
    PillarPosition::Hour,
];

impl PillarPosition {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Year => "年柱",
            Self::Month => "月柱",
            Self::Day => "日柱",
            Self::Hour => "时柱",
        }
    }

    /// Single-character prefix (年 月 日 时).
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Year => "年",
            Self::Month => "月",
            Self::Day => "日",
            Self::Hour => "时",
        }
    }
}

/// When the day pillar rolls over during the 子 double-hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZiHourMode {
    /// Day advances at 23:00.
    Early,
    /// Day advances at midnight; 23:xx keeps the current day pillar.
    #[default]
    Late,
}

/// Four pillars: year, month, day, hour. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chart {
    pillars: [GanZhi; 4],
}

impl Chart {
    pub const fn new(year: GanZhi, month: GanZhi, day: GanZhi, hour: GanZhi) -> Self {
        Self {
            pillars: [year, month, day, hour],
        }
    }

    /// Parse four whitespace separated pillars, e.g. `丙寅 壬辰 庚辰 丙子`.
    pub fn parse(text: &str) -> Result<Self, BaziError> {
        let parts: Vec<&str> = text.split_whitespace().collect();
        let [y, m, d, h] = parts.as_slice() else {
            return Err(BaziError::MalformedInput(format!(
                "expected 4 pillars, got {}",
                parts.len()
            )));
        };
        Ok(Self::new(
            GanZhi::parse(y)?,
            GanZhi::parse(m)?,
            GanZhi::parse(d)?,
            GanZhi::parse(h)?,
        ))
    }

    /// Build the chart for a civil moment using jie boundaries from `terms`.
    pub fn from_moment(
        moment: &NaiveDateTime,
        terms: &dyn SolarTermSource,
        zi_hour: ZiHourMode,
    ) -> Result<Self, BaziError> {
        let jie = terms.prev_jie(moment)?;
        let month_branch = jie
            .term
            .month_branch_index()
            .ok_or(BaziError::Precondition("solar-term source returned a non-jie term"))?;

        // 小寒 falls in January but still belongs to the previous sexagenary year.
        let mut year = jie.at.year();
        if jie.term == SolarTerm::XiaoHan {
            year -= 1;
        }
        let year_pillar = GanZhi::for_year(year);

        let month_offset = (month_branch + 10) % 12;
        let month_stem = (year_pillar.stem.index() % 5 * 2 + 2 + month_offset) % 10;
        let month_pillar = pillar_from_parts(month_stem, month_branch);

        let date = moment.date();
        let next_date = date.succ_opt().ok_or(TimeError::Overflow)?;
        let late_zi = moment.hour() == 23;
        let day_pillar = match zi_hour {
            ZiHourMode::Early if late_zi => day_pillar_for(next_date),
            _ => day_pillar_for(date),
        };

        let hour_branch = hour_branch_index(moment);
        let base_stem = if late_zi {
            day_pillar_for(next_date).stem
        } else {
            day_pillar_for(date).stem
        };
        let hour_stem = (base_stem.index() % 5 * 2 + hour_branch) % 10;
        let hour_pillar = pillar_from_parts(hour_stem, hour_branch);

        let chart = Self::new(year_pillar, month_pillar, day_pillar, hour_pillar);
        debug!(
            %moment,
            jie = jie.term.name(),
            jie_at = %jie.at,
            ?zi_hour,
            %chart,
            "built chart"
        );
        Ok(chart)
    }

    pub const fn pillar(&self, position: PillarPosition) -> GanZhi {
        self.pillars[position.index()]
    }

    pub const fn year(&self) -> GanZhi {
        self.pillars[0]
    }

    pub const fn month(&self) -> GanZhi {
        self.pillars[1]
    }

    pub const fn day(&self) -> GanZhi {
        self.pillars[2]
    }

    pub const fn hour(&self) -> GanZhi {
        self.pillars[3]
    }

    /// Day stem, the subject of the chart.
    pub const fn day_master(&self) -> Stem {
        self.pillars[2].stem
    }

    /// The four stems in chart order.
    pub fn stems(&self) -> [Stem; 4] {
        self.pillars.map(|p| p.stem)
    }

    /// The four branches in chart order.
    pub fn branches(&self) -> [Branch; 4] {
        self.pillars.map(|p| p.branch)
    }

    /// Per-position lookups against the day master.
    pub fn details(&self) -> [PillarDetail; 4] {
        let dm = self.day_master();
        ALL_POSITIONS.map(|position| {
            let pillar = self.pillar(position);
            PillarDetail {
                position,
                pillar,
                stem_god: (position != PillarPosition::Day).then(|| ten_god(dm, pillar.stem)),
                hidden: pillar
                    .branch
                    .hidden_stems()
                    .iter()
                    .map(|&s| (s, ten_god(dm, s)))
                    .collect(),
                stage: twelve_stage(dm, pillar.branch),
                nayin: pillar.nayin(),
                void: pillar.void_branches(),
            }
        })
    }
}

impl std::fmt::Display for Chart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [y, m, d, h] = self.pillars;
        write!(f, "{y} {m} {d} {h}")
    }
}

/// Lookups for one pillar, taken against the day master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PillarDetail {
    pub position: PillarPosition,
    pub pillar: GanZhi,
    /// `None` at the day position, where the stem is the day master itself.
    pub stem_god: Option<TenGod>,
    pub hidden: Vec<(Stem, TenGod)>,
    /// Day master's stage on this pillar's branch.
    pub stage: TwelveStage,
    pub nayin: &'static str,
    pub void: [Branch; 2],
}

/// Day pillar for a calendar date: 0001-01-01 (day 1 from CE) is 己卯.
fn day_pillar_for(date: NaiveDate) -> GanZhi {
    let idx = (i64::from(date.num_days_from_ce()) + 14).rem_euclid(60);
    GanZhi::from_index(idx as u8)
}

/// Stem and branch indices computed with matching parity.
const fn pillar_from_parts(stem: u8, branch: u8) -> GanZhi {
    GanZhi {
        stem: Stem::from_index(stem),
        branch: Branch::from_index(branch),
    }
}
