use std::path::PathBuf;

use bazi_base::{
    BirthContext, BirthInput, Chart, ChartConfig, ChartFlow, DAY_MASTER_LABEL, Element,
    FavourRationale, FlowEntry, FlowGroup, FlowSource, Gender, LuckReport, MAX_ANNUAL_PILLARS,
    PairRelations, Partition, Sect, StrengthAssessment, TrueSolarScope, ZiHourMode, chart_flow,
    chart_relations, describe, parse_gender,
};
use bazi_time::{
    DegreeKind, GeoLocation, NaiveDateTime, SolarTermTable, equation_of_time_minutes,
    format_civil, parse_civil, parse_degrees, solar_time_correction_minutes, true_solar_time,
};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bazi", about = "Four Pillars chart CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// True solar time for a civil (UTC+8) moment and longitude
    SolarTime {
        /// Civil time, YYYY-MM-DDTHH:MM[:SS]
        #[arg(long)]
        date: String,
        /// Longitude, decimal or D M S with E/W
        #[arg(long, allow_hyphen_values = true)]
        lon: String,
        /// Latitude, decimal or D M S with N/S
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,
    },
    /// Four pillars with hidden stems, ten gods, stages, nayin and void
    Chart {
        #[command(flatten)]
        birth: BirthArgs,
    },
    /// Day-master strength and favourable elements
    Strength {
        #[command(flatten)]
        birth: BirthArgs,
    },
    /// Generate/overcome report centred on the day master
    Flow {
        #[command(flatten)]
        birth: BirthArgs,
    },
    /// Stem combinations and branch relations per pillar pair
    Branches {
        #[command(flatten)]
        birth: BirthArgs,
    },
    /// Luck start, luck pillars and annual pillars
    Luck {
        #[command(flatten)]
        birth: BirthArgs,
        /// male/female, m/f, 1/0 or 男/女 (both when omitted)
        #[arg(long)]
        gender: Option<String>,
        /// Luck offset sect: 1 (double-hours) or 2 (minute ratio)
        #[arg(long, default_value = "2")]
        sect: u8,
        /// Number of luck pillars
        #[arg(long, default_value_t = bazi_base::DEFAULT_LUCK_PILLARS)]
        luck_count: usize,
        /// Annual pillars listed under each luck pillar (0-10)
        #[arg(long, default_value_t = 0)]
        annual_count: usize,
    },
}

#[derive(Args)]
struct BirthArgs {
    /// Civil birth time (UTC+8), YYYY-MM-DDTHH:MM[:SS]
    #[arg(long)]
    date: Option<String>,
    /// Solar-term table, one "YYYY-MM-DD HH:MM:SS <term>" per line
    #[arg(long)]
    terms: Option<PathBuf>,
    /// Four pillars instead of a date, e.g. "丙寅 壬辰 庚辰 丙子"
    #[arg(long, conflicts_with_all = ["date", "terms"])]
    pillars: Option<String>,
    /// Hour pillar at 23:00: late (default) or early
    #[arg(long, default_value = "late")]
    zi_hour: String,
    /// Apply true-solar-time correction (needs --lon)
    #[arg(long)]
    true_solar: bool,
    /// What the correction applies to: luck (default) or all
    #[arg(long, default_value = "luck")]
    true_solar_scope: String,
    /// Birth longitude, decimal or D M S with E/W
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<String>,
    /// Birth latitude, decimal or D M S with N/S
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_moment(s: &str) -> NaiveDateTime {
    parse_civil(s).unwrap_or_else(|e| {
        eprintln!("Invalid date: {e}");
        std::process::exit(1);
    })
}

fn parse_coordinate(s: &str, kind: DegreeKind) -> f64 {
    parse_degrees(s, kind).unwrap_or_else(|e| {
        eprintln!("Invalid coordinate {s:?}: {e}");
        std::process::exit(1);
    })
}

fn parse_location(lon: &str, lat: Option<&str>) -> GeoLocation {
    let lon = parse_coordinate(lon, DegreeKind::Longitude);
    let lat = lat.map(|s| parse_coordinate(s, DegreeKind::Latitude));
    GeoLocation::new(lon, lat).unwrap_or_else(|e| {
        eprintln!("Invalid location: {e}");
        std::process::exit(1);
    })
}

fn parse_zi_hour(s: &str) -> ZiHourMode {
    match s.to_lowercase().as_str() {
        "late" => ZiHourMode::Late,
        "early" => ZiHourMode::Early,
        _ => {
            eprintln!("Invalid zi-hour mode: {s} (early or late)");
            std::process::exit(1);
        }
    }
}

fn parse_scope(s: &str) -> TrueSolarScope {
    match s.to_lowercase().as_str() {
        "luck" => TrueSolarScope::LuckOnly,
        "all" => TrueSolarScope::All,
        _ => {
            eprintln!("Invalid true-solar scope: {s} (all or luck)");
            std::process::exit(1);
        }
    }
}

fn require_gender(s: &str) -> Gender {
    parse_gender(s).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    })
}

fn require_sect(code: u8) -> Sect {
    Sect::from_code(code).unwrap_or_else(|e| {
        eprintln!("Invalid sect {code}: {e}");
        std::process::exit(1);
    })
}

fn load_terms(birth: &BirthArgs) -> SolarTermTable {
    let Some(path) = birth.terms.as_ref() else {
        eprintln!("--date and --terms <file> are required unless --pillars is given");
        std::process::exit(1);
    };
    let table = SolarTermTable::load(path).unwrap_or_else(|e| {
        eprintln!("Failed to load solar terms from {}: {e}", path.display());
        std::process::exit(1);
    });
    let (first, last) = table.range();
    debug!(events = table.len(), %first, %last, "loaded solar-term table");
    table
}

fn build_config(birth: &BirthArgs, sect: Sect, luck_count: usize) -> ChartConfig {
    let true_solar = if birth.true_solar {
        Some(parse_scope(&birth.true_solar_scope))
    } else {
        if birth.lon.is_some() || birth.lat.is_some() {
            warn!("--lon/--lat ignored without --true-solar");
        }
        None
    };
    ChartConfig {
        true_solar,
        sect,
        zi_hour: parse_zi_hour(&birth.zi_hour),
        luck_pillar_count: luck_count,
    }
}

/// Location for true solar time; `--lon`/`--lat` are not read without `--true-solar`.
fn birth_location(birth: &BirthArgs) -> Option<GeoLocation> {
    if !birth.true_solar {
        return None;
    }
    birth
        .lon
        .as_deref()
        .map(|lon| parse_location(lon, birth.lat.as_deref()))
}

fn build_context<'a>(
    birth: &BirthArgs,
    gender: Option<Gender>,
    config: ChartConfig,
    terms: &'a SolarTermTable,
) -> BirthContext<'a> {
    let Some(date) = birth.date.as_deref() else {
        eprintln!("--date or --pillars is required");
        std::process::exit(1);
    };
    let input = BirthInput {
        moment: parse_moment(date),
        gender,
        location: birth_location(birth),
    };
    BirthContext::evaluate(input, config, terms).unwrap_or_else(|e| {
        eprintln!("Failed to build chart: {e}");
        std::process::exit(1);
    })
}

fn print_moments(ctx: &BirthContext<'_>) {
    println!("公历: {}", format_civil(&ctx.input().moment));
    if let Some(corrected) = ctx.corrected() {
        println!("真太阳时: {}", format_civil(&corrected));
    }
}

/// Chart from `--pillars`, or from `--date` and `--terms`.
fn resolve_chart(birth: &BirthArgs) -> Chart {
    if let Some(text) = birth.pillars.as_deref() {
        if birth.true_solar {
            warn!("--true-solar ignored with --pillars");
        }
        return Chart::parse(text).unwrap_or_else(|e| {
            eprintln!("Invalid pillars: {e}");
            std::process::exit(1);
        });
    }
    let terms = load_terms(birth);
    let config = build_config(birth, Sect::default(), bazi_base::DEFAULT_LUCK_PILLARS);
    let ctx = build_context(birth, None, config, &terms);
    print_moments(&ctx);
    *ctx.chart()
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::SolarTime { date, lon, lat } => {
            let moment = parse_moment(&date);
            let location = parse_location(&lon, lat.as_deref());
            let corrected = true_solar_time(&moment, &location).unwrap_or_else(|e| {
                eprintln!("Failed to correct time: {e}");
                std::process::exit(1);
            });
            let eot = equation_of_time_minutes(&moment);
            let total = solar_time_correction_minutes(&moment, &location);
            println!("公历: {}", format_civil(&moment));
            match location.latitude_deg {
                Some(lat) => println!("经度: {:.6}  纬度: {lat:.6}", location.longitude_deg),
                None => println!("经度: {:.6}", location.longitude_deg),
            }
            println!(
                "修正: {total:+.2} 分钟 (经度差 {:+.2}, 均时差 {eot:+.2})",
                total - eot
            );
            println!("真太阳时: {}", format_civil(&corrected));
        }

        Commands::Chart { birth } => {
            let chart = resolve_chart(&birth);
            print_chart(&chart);
        }

        Commands::Strength { birth } => {
            let chart = resolve_chart(&birth);
            println!("八字: {chart}");
            print_strength(&bazi_base::assess(&chart));
        }

        Commands::Flow { birth } => {
            let chart = resolve_chart(&birth);
            println!("八字: {chart}");
            print_flow(&chart_flow(&chart));
        }

        Commands::Branches { birth } => {
            let chart = resolve_chart(&birth);
            println!("八字: {chart}");
            print_relations(&chart_relations(&chart));
        }

        Commands::Luck {
            birth,
            gender,
            sect,
            luck_count,
            annual_count,
        } => {
            if birth.pillars.is_some() {
                eprintln!("luck needs --date and --terms; pillars alone carry no birth moment");
                std::process::exit(1);
            }
            let gender = gender.as_deref().map(require_gender);
            let annual_count = if annual_count > MAX_ANNUAL_PILLARS {
                warn!(
                    requested = annual_count,
                    max = MAX_ANNUAL_PILLARS,
                    "annual pillar count clamped"
                );
                MAX_ANNUAL_PILLARS
            } else {
                annual_count
            };
            let terms = load_terms(&birth);
            let config = build_config(&birth, require_sect(sect), luck_count);
            let ctx = build_context(&birth, gender, config, &terms);
            print_moments(&ctx);
            println!("八字: {}", ctx.chart());

            let genders = match gender {
                Some(g) => vec![g],
                None => vec![Gender::Male, Gender::Female],
            };
            for g in genders {
                let report = ctx.luck_for(g).unwrap_or_else(|e| {
                    eprintln!("Failed to compute luck cycle: {e}");
                    std::process::exit(1);
                });
                print_luck(&report, annual_count);
            }
        }
    }
}

fn print_chart(chart: &Chart) {
    println!("八字: {chart}");
    for d in chart.details() {
        let god = d.stem_god.map_or(DAY_MASTER_LABEL, |g| g.name());
        let hidden: Vec<String> = d
            .hidden
            .iter()
            .map(|(stem, god)| format!("{stem}({})", god.name()))
            .collect();
        println!(
            "{}: {}  十神: {god}  藏干: {}  地势: {}  纳音: {}  空亡: {}{}",
            d.position.name(),
            d.pillar,
            hidden.join(" "),
            d.stage.name(),
            d.nayin,
            d.void[0],
            d.void[1],
        );
    }
}

fn format_partition(p: &Partition) -> String {
    let members: Vec<String> = p
        .members
        .iter()
        .map(|m| format!("{}{}({})", m.element.name(), m.count, m.status.name()))
        .collect();
    format!("{} => {} (加权 {})", members.join(" "), p.count, p.weighted)
}

fn format_elements(elements: &[Element]) -> String {
    if elements.is_empty() {
        return "-".to_string();
    }
    elements.iter().map(|e| e.name()).collect::<Vec<_>>().join(" ")
}

fn print_strength(s: &StrengthAssessment) {
    println!(
        "日主: {}{}  强弱: {} (韦千里: {})",
        s.day_master,
        s.element.name(),
        s.bias.name(),
        s.level.name()
    );
    println!(
        "得令: {} (月令 {} {}季, {}={})",
        if s.commands_season { "是" } else { "否" },
        s.month_branch,
        s.season.name(),
        s.element.name(),
        s.status.name()
    );
    let stages: Vec<String> = s
        .root_stages
        .iter()
        .map(|(pos, stage)| format!("{}={}", pos.short_name(), stage.name()))
        .collect();
    println!(
        "得地: {} ({})",
        if s.rooted { "是" } else { "否" },
        stages.join(" ")
    );
    println!("同方: {}", format_partition(&s.allied));
    println!("异方: {}", format_partition(&s.opposed));
    let counts: Vec<String> = s
        .counts
        .iter()
        .map(|(e, n)| format!("{}{n}", e.name()))
        .collect();
    println!("五行: {}", counts.join(" "));
    let statuses: Vec<String> = s
        .status_map
        .iter()
        .map(|(e, r)| format!("{}{}", e.name(), r.name()))
        .collect();
    println!("旺衰: {}", statuses.join(" "));

    let fav = s.favourable();
    let rationale = match fav.rationale {
        FavourRationale::Support => "身弱, 取印比帮扶",
        FavourRationale::Drain => "身强, 取食伤财泄耗",
        FavourRationale::Neutral => "中和, 无明显偏向",
    };
    println!("喜用: {} ({rationale})", format_elements(&fav.favourable));
    println!("忌: {}", format_elements(&fav.unfavourable));
}

fn source_label(source: FlowSource) -> String {
    match source {
        FlowSource::Stem(pos, stem) => format!("{}干{stem}", pos.short_name()),
        FlowSource::Branch(pos, branch) => format!("{}支{branch}", pos.short_name()),
        FlowSource::Hidden(pos, branch, stem) => {
            format!("{}支{branch}藏{stem}", pos.short_name())
        }
    }
}

/// "A 生 B" with the acting side first.
fn relation_line(a: &str, a_el: Element, b: &str, b_el: Element) -> String {
    let rel = describe(a_el, b_el);
    let (first, first_el, second, second_el) = if rel.is_reversed() {
        (b, b_el, a, a_el)
    } else {
        (a, a_el, b, b_el)
    };
    format!(
        "{first}({}) {} {second}({})",
        first_el.name(),
        rel.verb(),
        second_el.name()
    )
}

fn print_flow_entry(dm_label: &str, dm_el: Element, e: &FlowEntry) {
    let label = source_label(e.source);
    println!(
        "  {}  [{}]",
        relation_line(dm_label, dm_el, &label, e.source.element()),
        e.category.name()
    );
}

fn print_flow(flow: &ChartFlow) {
    let dm = flow.day_master;
    let dm_el = dm.element();
    let dm_label = format!("日主{dm}");

    println!("柱内:");
    for p in &flow.positions {
        let (stem, branch) = (p.stem.0, p.branch.0);
        println!(
            "  {}: {}",
            p.position.name(),
            relation_line(
                &format!("支{branch}"),
                branch.element(),
                &format!("干{stem}"),
                stem.element()
            )
        );
    }

    println!("天干:");
    for e in &flow.stems {
        print_flow_entry(&dm_label, dm_el, e);
    }
    println!("地支:");
    for e in &flow.branches {
        print_flow_entry(&dm_label, dm_el, e);
    }
    println!("藏干:");
    for e in &flow.hidden {
        print_flow_entry(&dm_label, dm_el, e);
    }

    println!("各柱:");
    for p in &flow.positions {
        let hidden: Vec<String> = p
            .hidden
            .iter()
            .map(|(stem, cat)| format!("{stem}{}", cat.name()))
            .collect();
        println!(
            "  {}: 干{}{} 支{}{} 藏[{}]",
            p.position.short_name(),
            p.stem.0,
            p.stem.1.name(),
            p.branch.0,
            p.branch.1.name(),
            hidden.join(" ")
        );
    }

    for (group, title) in [
        (FlowGroup::Assist, "助力"),
        (FlowGroup::Drain, "疏泄"),
        (FlowGroup::Hinder, "受阻"),
    ] {
        let labels: Vec<String> = flow
            .group(group)
            .iter()
            .map(|e| source_label(e.source))
            .collect();
        println!("{title}({}): {}", labels.len(), labels.join(" "));
    }
}

fn print_relations(pairs: &[PairRelations]) {
    if pairs.is_empty() {
        println!("无合冲刑害破");
        return;
    }
    for p in pairs {
        let mut tags: Vec<&str> = Vec::new();
        if p.stem_combination {
            tags.push("天干合");
        }
        tags.extend(p.branch_relations.iter().map(|r| r.name()));
        println!(
            "{}{} {}{} {}{}: {}",
            p.first.short_name(),
            p.second.short_name(),
            p.stems.0,
            p.stems.1,
            p.branches.0,
            p.branches.1,
            tags.join(" ")
        );
    }
}

fn print_luck(report: &LuckReport, annual_count: usize) {
    let s = &report.start;
    let tag = format!("[{}命]", s.gender.name());
    println!(
        "{tag} {} 第{}派  节: {} -> {}",
        s.direction.name(),
        s.sect.code(),
        format_civil(&s.boundary_start),
        format_civil(&s.boundary_end)
    );
    println!(
        "{tag} 出生后{}起运, 起运时间 {}, 起运虚岁 {}",
        s.offset,
        format_civil(&s.start),
        s.first_age
    );
    for p in &report.pillars {
        println!(
            "{tag} 大运{}: {} ({}-{}, 虚岁{}-{})",
            p.index, p.pillar, p.start_year, p.end_year, p.start_age, p.end_age
        );
        if annual_count > 0 {
            let years: Vec<String> = p
                .annual_pillars(annual_count)
                .iter()
                .map(|a| format!("{}{}({})", a.year, a.pillar, a.age))
                .collect();
            println!("{tag}   流年: {}", years.join(" "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn luck_defaults() {
        let cli = Cli::parse_from(["bazi", "luck", "--date", "1986-04-06T00:20", "--terms", "t"]);
        match cli.command {
            Commands::Luck {
                birth,
                gender,
                sect,
                luck_count,
                annual_count,
            } => {
                assert_eq!(gender, None);
                assert_eq!(sect, 2);
                assert_eq!(luck_count, bazi_base::DEFAULT_LUCK_PILLARS);
                assert_eq!(annual_count, 0);
                assert_eq!(birth.zi_hour, "late");
                assert_eq!(birth.true_solar_scope, "luck");
                assert!(!birth.true_solar);
            }
            _ => panic!("expected luck"),
        }
    }

    #[test]
    fn pillars_conflict_with_date() {
        let res = Cli::try_parse_from([
            "bazi",
            "chart",
            "--pillars",
            "丙寅 壬辰 庚辰 丙子",
            "--date",
            "1986-04-06T00:20",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn negative_longitude_accepted() {
        let cli = Cli::parse_from([
            "bazi",
            "solar-time",
            "--date",
            "2020-01-01T12:00",
            "--lon",
            "-73.5",
        ]);
        assert!(matches!(cli.command, Commands::SolarTime { ref lon, .. } if lon == "-73.5"));
    }

    #[test]
    fn location_unread_without_true_solar() {
        let mut birth = BirthArgs {
            date: None,
            terms: None,
            pillars: None,
            zi_hour: "late".into(),
            true_solar: false,
            true_solar_scope: "luck".into(),
            lon: Some("not a longitude".into()),
            lat: Some("??".into()),
        };
        assert_eq!(birth_location(&birth), None);

        birth.true_solar = true;
        birth.lon = Some("115°26'58\"E".into());
        birth.lat = None;
        let loc = birth_location(&birth).unwrap();
        assert!((loc.longitude_deg - 115.449444).abs() < 1e-4);
        assert_eq!(loc.latitude_deg, None);
    }

    #[test]
    fn build_config_maps_flags() {
        let birth = BirthArgs {
            date: None,
            terms: None,
            pillars: None,
            zi_hour: "early".into(),
            true_solar: true,
            true_solar_scope: "all".into(),
            lon: Some("115.449444".into()),
            lat: None,
        };
        let config = build_config(&birth, Sect::HourBranch, 5);
        assert_eq!(config.true_solar, Some(TrueSolarScope::All));
        assert_eq!(config.zi_hour, ZiHourMode::Early);
        assert_eq!(config.sect, Sect::HourBranch);
        assert_eq!(config.luck_pillar_count, 5);
    }

    #[test]
    fn relation_line_puts_actor_first() {
        assert_eq!(
            relation_line("日主庚", Element::Metal, "年干丙", Element::Fire),
            "年干丙(火) 克 日主庚(金)"
        );
        assert_eq!(
            relation_line("日主庚", Element::Metal, "月干壬", Element::Water),
            "日主庚(金) 生 月干壬(水)"
        );
    }
}
