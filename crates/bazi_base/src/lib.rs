//! Four Pillars tables and rule engines built on `bazi_time`.
//!
//! This crate provides:
//! - Five-phase elements, stems, branches and the sexagenary cycle
//! - Chart construction from a civil moment and jie boundaries
//! - Relation classification and the chart flow report
//! - Day-master strength assessment (Wei Qianli)
//! - Branch relations and stem combinations
//! - Luck-cycle start offsets, luck pillars and annual pillars

pub mod branch_relation;
pub mod chart;
pub mod context;
pub mod element;
pub mod error;
pub mod ganzhi;
pub mod luck;
pub mod relation;
pub mod season;
pub mod strength;
pub mod ten_gods;
pub mod twelve_stages;

pub use branch_relation::{
    ALL_BRANCH_RELATIONS, BranchRelation, PairRelations, chart_relations, detect, stems_combine,
};
pub use chart::{ALL_POSITIONS, Chart, PillarDetail, PillarPosition, ZiHourMode};
pub use context::{BirthContext, BirthInput, ChartConfig, LuckReport, TrueSolarScope};
pub use element::{ALL_ELEMENTS, Element, Polarity};
pub use error::BaziError;
pub use ganzhi::{ALL_BRANCHES, ALL_STEMS, Branch, GanZhi, Stem};
pub use luck::{
    AnnualPillar, DEFAULT_LUCK_PILLARS, Gender, LuckDirection, LuckOffset, LuckPillar, LuckStart,
    MAX_ANNUAL_PILLARS, Sect, luck_start, parse_gender,
};
pub use relation::{
    ChartFlow, DirectionalRelation, FlowEntry, FlowGroup, FlowSource, PositionFlow,
    RelationCategory, chart_flow, classify, describe,
};
pub use season::{ALL_STATUS_RANKS, Season, StatusRank};
pub use strength::{
    Bias, ElementCounts, FavourRationale, FavourableElements, Partition, PartitionMember,
    StrengthAssessment, StrengthLevel, assess, strength_level,
};
pub use ten_gods::{ALL_TEN_GODS, DAY_MASTER_LABEL, TenGod, ten_god};
pub use twelve_stages::{ALL_TWELVE_STAGES, TwelveStage, birth_branch, twelve_stage};
