//! Weapon attack-power calculator CLI.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use weapon_ar_calc::calc::{compute_attack, WeaponTableRow};
use weapon_ar_calc::codec::{decode_weapons_str, encode_weapons_string};
use weapon_ar_calc::config::{CalcConfig, DEFAULT_MAX_UPGRADE_LEVEL, DEFAULT_REGISTRY_PATH};
use weapon_ar_calc::model::{Affinity, AttackPowerType, Attribute, Attributes, WeaponType};
use weapon_ar_calc::query::{run_query, CalcQuery};
use weapon_ar_calc::registry::{load_regulation_data, Registry};
use weapon_ar_calc::report::{diff_versions, write_json_report, CalcReport};
use weapon_ar_calc::util::init_logging;

/// Smallest total-attack change the diff reports.
const DIFF_EPSILON: f64 = 0.5;

#[derive(Parser)]
#[command(name = "weapon-ar-calc")]
#[command(about = "Weapon attack-power calculator: find the best weapon for a character build")]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Regulation version registry (TOML).
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_REGISTRY_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct BuildArgs {
    /// Attribute values as str,dex,int,fai,arc.
    #[arg(long, value_name = "STR,DEX,INT,FAI,ARC", value_parser = parse_attributes, default_value = "10,10,10,10,10")]
    attributes: Attributes,
    #[arg(long)]
    two_handing: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered regulation versions.
    Versions,
    /// Compute attack power for every matching weapon, sorted.
    Calc {
        #[arg(long = "regulation", value_name = "ID")]
        version: Option<String>,
        #[command(flatten)]
        build: BuildArgs,
        /// Standard upgrade level (0-25); somber weapons use the matching somber level.
        #[arg(long, default_value_t = DEFAULT_MAX_UPGRADE_LEVEL)]
        upgrade_level: usize,
        #[arg(long = "weapon-type", value_name = "TYPE")]
        weapon_types: Vec<WeaponType>,
        #[arg(long = "affinity", value_name = "AFFINITY")]
        affinities: Vec<Affinity>,
        /// Hide weapons whose requirements the build does not meet.
        #[arg(long)]
        effective_only: bool,
        #[arg(long, default_value = "totalAttack")]
        sort_by: String,
        #[arg(long)]
        reverse: bool,
        #[arg(long)]
        limit: Option<usize>,
        /// Write a JSON report of the rows.
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
        /// Read the whole query from a TOML file instead of flags.
        #[arg(long, value_name = "FILE", conflicts_with_all = ["version", "weapon_types", "affinities"])]
        query: Option<PathBuf>,
    },
    /// Per-level attack breakdown for one weapon.
    Weapon {
        #[arg(long = "regulation", value_name = "ID")]
        version: Option<String>,
        #[command(flatten)]
        build: BuildArgs,
        name: String,
    },
    /// Write the codec-encoded weapon list of a version.
    Encode {
        #[arg(long = "regulation", value_name = "ID")]
        version: Option<String>,
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Read a codec-encoded weapon list and print its weapons.
    Decode { file: PathBuf },
    /// Compare total attack for the same build across two versions.
    Diff {
        #[arg(long)]
        a: String,
        #[arg(long)]
        b: String,
        #[command(flatten)]
        build: BuildArgs,
        #[arg(long, default_value_t = DEFAULT_MAX_UPGRADE_LEVEL)]
        upgrade_level: usize,
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Serve regulation data over HTTP.
    #[cfg(feature = "serve")]
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: std::net::SocketAddr,
    },
}

fn parse_attributes(s: &str) -> Result<Attributes, String> {
    let values: Vec<u32> = s
        .split(',')
        .map(|v| v.trim().parse::<u32>().map_err(|e| format!("{}: {}", v.trim(), e)))
        .collect::<Result<_, _>>()?;
    let values: [u32; 5] = values
        .try_into()
        .map_err(|v: Vec<u32>| format!("expected 5 attribute values, got {}", v.len()))?;
    Ok(Attributes::from_input(values))
}

fn main() -> Result<(), String> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Versions => run_versions(&cli.config),
        Commands::Calc {
            version,
            build,
            upgrade_level,
            weapon_types,
            affinities,
            effective_only,
            sort_by,
            reverse,
            limit,
            report,
            query,
        } => {
            let config = match query {
                Some(path) => load_query(&path)?,
                None => {
                    let registry = Registry::load(&cli.config).map_err(|e| e.to_string())?;
                    CalcConfig {
                        attributes: build.attributes,
                        two_handing: build.two_handing,
                        upgrade_level,
                        weapon_types,
                        affinities,
                        effective_only,
                        sort_by,
                        reverse,
                        limit,
                        report,
                        ..CalcConfig::new(pick_version(&registry, version)?)
                    }
                }
            };
            run_calc(&cli.config, config)
        }
        Commands::Weapon {
            version,
            build,
            name,
        } => run_weapon(&cli.config, version, build, &name),
        Commands::Encode { version, out } => run_encode(&cli.config, version, &out),
        Commands::Decode { file } => run_decode(&file),
        Commands::Diff {
            a,
            b,
            build,
            upgrade_level,
            out,
        } => run_diff(&cli.config, &a, &b, build, upgrade_level, out),
        #[cfg(feature = "serve")]
        Commands::Serve { addr } => run_serve(&cli.config, addr),
    }
}

/// Explicit version, or the first one registered.
fn pick_version(registry: &Registry, version: Option<String>) -> Result<String, String> {
    match version {
        Some(v) => Ok(v),
        None => registry
            .ids()
            .next()
            .map(str::to_string)
            .ok_or_else(|| "registry lists no regulation versions".to_string()),
    }
}

fn load_query(path: &Path) -> Result<CalcConfig, String> {
    let s = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    toml::from_str(&s).map_err(|e| format!("{}: {}", path.display(), e))
}

fn run_versions(config: &Path) -> Result<(), String> {
    let registry = Registry::load(config).map_err(|e| e.to_string())?;
    for v in &registry.versions {
        println!("{:<12} {:<28} {}", v.id, v.name, registry.data_path(v).display());
    }
    Ok(())
}

fn format_row(row: &WeaponTableRow<'_>) -> String {
    let attack: String = AttackPowerType::DAMAGE_TYPES
        .iter()
        .map(|&t| match row.result.attack(t) {
            Some(v) => format!(" {:>7.1}", v),
            None => format!(" {:>7}", "-"),
        })
        .collect();
    let marker = if row.result.ineffective_attributes.is_empty() {
        " "
    } else {
        "*"
    };
    format!(
        "{:<36} {:<10} +{:<3}{} {:>7.1}{}",
        row.weapon.name,
        row.weapon.affinity.name(),
        row.result.upgrade_level,
        marker,
        row.result.total_attack(),
        attack
    )
}

fn print_header() {
    let types: String = AttackPowerType::DAMAGE_TYPES
        .iter()
        .map(|t| format!(" {:>7}", t.key()))
        .collect();
    println!(
        "{:<36} {:<10} {:<5} {:>7}{}",
        "Weapon", "Affinity", "Level", "Total", types
    );
}

fn run_calc(registry_path: &Path, config: CalcConfig) -> Result<(), String> {
    let registry = Registry::load(registry_path).map_err(|e| e.to_string())?;
    let regulation = load_regulation_data(&registry, &config.version).map_err(|e| e.to_string())?;
    let query = CalcQuery::from_config(&config)?;
    let rows = run_query(&regulation, &query).map_err(|e| e.to_string())?;

    print_header();
    for row in &rows {
        println!("{}", format_row(row));
    }
    tracing::info!("{} weapon(s) for regulation {}", rows.len(), config.version);

    if let Some(path) = &config.report {
        let report = CalcReport::new(&config.version, &query, &rows);
        write_json_report(&report, path)?;
        tracing::info!("wrote {}", path.display());
    }
    Ok(())
}

fn run_weapon(
    registry_path: &Path,
    version: Option<String>,
    build: BuildArgs,
    name: &str,
) -> Result<(), String> {
    let registry = Registry::load(registry_path).map_err(|e| e.to_string())?;
    let version = pick_version(&registry, version)?;
    let regulation = load_regulation_data(&registry, &version).map_err(|e| e.to_string())?;
    let weapon = regulation
        .find_weapon(name)
        .ok_or_else(|| format!("weapon not found in {}: {}", version, name))?;

    println!("Weapon: {} ({})", weapon.name, weapon.weapon_type);
    println!("Affinity: {}", weapon.affinity);
    println!("Weight: {}", weapon.weight);
    let reqs: Vec<String> = weapon
        .requirements
        .iter()
        .filter(|(_, v)| **v > 0)
        .map(|(a, v)| format!("{} {}", a, v))
        .collect();
    println!(
        "Requirements: {}",
        if reqs.is_empty() {
            "none".to_string()
        } else {
            reqs.join(", ")
        }
    );
    if weapon.paired {
        println!("Paired: yes");
    }
    println!();
    print_header();
    let ctx = regulation.calc_context();
    for level in 0..=weapon.max_upgrade_level() {
        let result = compute_attack(ctx, weapon, level, &build.attributes, build.two_handing)
            .map_err(|e| e.to_string())?;
        let row = WeaponTableRow { weapon, result };
        println!("{}", format_row(&row));
    }
    let statuses: Vec<String> = AttackPowerType::STATUS_TYPES
        .iter()
        .filter(|t| weapon.has_attack_power_type(**t))
        .map(|t| t.to_string())
        .collect();
    if !statuses.is_empty() {
        println!("\nStatus buildup: {}", statuses.join(", "));
    }
    Ok(())
}

fn run_encode(registry_path: &Path, version: Option<String>, out: &Path) -> Result<(), String> {
    let registry = Registry::load(registry_path).map_err(|e| e.to_string())?;
    let version = pick_version(&registry, version)?;
    let regulation = load_regulation_data(&registry, &version).map_err(|e| e.to_string())?;
    let encoded = encode_weapons_string(&regulation.weapons).map_err(|e| e.to_string())?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    fs::write(out, encoded).map_err(|e| e.to_string())?;
    tracing::info!(
        "encoded {} weapon(s) of {} to {}",
        regulation.weapons.len(),
        version,
        out.display()
    );
    Ok(())
}

fn run_decode(file: &Path) -> Result<(), String> {
    let s = fs::read_to_string(file).map_err(|e| format!("{}: {}", file.display(), e))?;
    let weapons = decode_weapons_str(&s).map_err(|e| e.to_string())?;
    for w in &weapons {
        let scaling: Vec<String> = w
            .scaling_at(w.max_upgrade_level())
            .map(|s| {
                Attribute::ALL
                    .iter()
                    .filter(|a| s[**a] > 0.0)
                    .map(|a| format!("{} {:.2}", a, s[*a]))
                    .collect()
            })
            .unwrap_or_default();
        println!(
            "{:<36} {:<10} {:<22} +{:<3} {}",
            w.name,
            w.affinity.name(),
            w.weapon_type.name(),
            w.max_upgrade_level(),
            scaling.join(" ")
        );
    }
    tracing::info!("decoded {} weapon(s)", weapons.len());
    Ok(())
}

fn run_diff(
    registry_path: &Path,
    a: &str,
    b: &str,
    build: BuildArgs,
    upgrade_level: usize,
    out: Option<PathBuf>,
) -> Result<(), String> {
    let registry = Registry::load(registry_path).map_err(|e| e.to_string())?;
    let reg_a = load_regulation_data(&registry, a).map_err(|e| e.to_string())?;
    let reg_b = load_regulation_data(&registry, b).map_err(|e| e.to_string())?;
    let mut config = CalcConfig::new(a.to_string());
    config.attributes = build.attributes;
    config.two_handing = build.two_handing;
    config.upgrade_level = upgrade_level;
    config.sort_by = "name".to_string();
    let query = CalcQuery::from_config(&config)?;
    let rows_a = run_query(&reg_a, &query).map_err(|e| e.to_string())?;
    let rows_b = run_query(&reg_b, &query).map_err(|e| e.to_string())?;
    let diff = diff_versions(a, &rows_a, b, &rows_b, DIFF_EPSILON);

    println!("Diff: {} vs {}", a, b);
    println!("Weapons added: {}", diff.added.len());
    for name in &diff.added {
        println!("  + {}", name);
    }
    println!("Weapons removed: {}", diff.removed.len());
    for name in &diff.removed {
        println!("  - {}", name);
    }
    println!("Attack changed: {}", diff.changed.len());
    for c in &diff.changed {
        println!("  {}  {:.1} -> {:.1} ({:+.1})", c.name, c.before, c.after, c.delta());
    }

    if let Some(dir) = out {
        let path = dir.join("diff.json");
        write_json_report(&diff, &path)?;
        tracing::info!("wrote {}", path.display());
    }
    Ok(())
}

#[cfg(feature = "serve")]
fn run_serve(registry_path: &Path, addr: std::net::SocketAddr) -> Result<(), String> {
    let registry = Registry::load(registry_path).map_err(|e| e.to_string())?;
    let runtime = tokio::runtime::Runtime::new().map_err(|e| e.to_string())?;
    runtime.block_on(weapon_ar_calc::server::serve(&registry, addr))
}
