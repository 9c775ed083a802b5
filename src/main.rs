use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};

use kit_colors::color::HexColor;
use kit_colors::config::Settings;
use kit_colors::prompt::ConsolePrompter;
use kit_colors::resolver::{ColorResolver, colors_too_similar};
use kit_colors::store::OverrideStore;
use kit_colors::team_db;

#[derive(Parser)]
#[command(name = "kit_colors")]
#[command(about = "Resolve soccer team names to chart colors")]
struct Cli {
    /// Override store file [default: $KIT_COLORS_STORE or ~/.config/kit_colors/team_colors.json]
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve colors for one or more teams
    Resolve {
        #[arg(required = true)]
        teams: Vec<String>,

        #[command(flatten)]
        opts: ResolveOpts,
    },
    /// Resolve both sides of a fixture and fix clashing colors
    Matchup {
        home: String,
        away: String,

        #[command(flatten)]
        opts: ResolveOpts,
    },
    /// Report whether two colors are too similar to tell apart
    Check { color_a: String, color_b: String },
    /// Save a color for a team
    Save { team: String, color: String },
    /// Save a custom team abbreviation
    Abbrev { code: String, full_name: String },
    /// Show saved colors and abbreviations
    List,
}

#[derive(Args)]
struct ResolveOpts {
    /// Color read from the data file, e.g. --hint "Arsenal=#EF0107"
    #[arg(long = "hint", value_name = "TEAM=#HEX")]
    hints: Vec<String>,

    /// Fail instead of prompting for unknown teams
    #[arg(long)]
    non_interactive: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut settings = Settings::from_env();
    if let Some(path) = cli.store {
        settings.store_path = Some(path);
    }

    match cli.command {
        Command::Resolve { teams, opts } => {
            let hints = parse_hints(&opts.hints)?;
            let mut resolver = build_resolver(&settings, opts.non_interactive);
            let resolved = resolver.resolve_team_colors(teams.as_slice(), &hints)?;
            if opts.json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
                return Ok(());
            }
            println!("TEAM COLORS");
            for team in &teams {
                let Some(r) = resolved.get(team.trim()) else {
                    continue;
                };
                if r.matched_name == team.trim() {
                    println!("[OK] {team}: {} [from {}]", r.color, r.source);
                } else {
                    println!(
                        "[OK] {team}: {} [from {}, matched '{}']",
                        r.color, r.source, r.matched_name
                    );
                }
            }
        }
        Command::Matchup { home, away, opts } => {
            let hints = parse_hints(&opts.hints)?;
            let mut resolver = build_resolver(&settings, opts.non_interactive);
            let m = resolver.resolve_matchup(&home, &away, &hints)?;
            if opts.json {
                println!("{}", serde_json::to_string_pretty(&m)?);
                return Ok(());
            }
            println!("{}: {} [from {}]", m.home_team, m.home_color, m.home.source);
            println!("{}: {} [from {}]", m.away_team, m.away_color, m.away.source);
            println!("Color distance: {:.0}", m.distance);
            if let Some(fix) = m.fix.as_ref() {
                println!(
                    "Alternate kit for {}: {} -> {}",
                    fix.team, fix.original, fix.replacement
                );
            }
            if m.distinct_line_styles {
                println!("Colors remain similar: use solid vs dashed lines");
            }
        }
        Command::Check { color_a, color_b } => {
            let a = HexColor::parse(&color_a).context("first color")?;
            let b = HexColor::parse(&color_b).context("second color")?;
            let too_similar =
                colors_too_similar(&color_a, &color_b, settings.similarity_threshold)?;
            println!(
                "{a} vs {b}: distance {:.0} (threshold {:.0}) {}",
                a.distance(&b),
                settings.similarity_threshold,
                if too_similar { "TOO SIMILAR" } else { "ok" }
            );
        }
        Command::Save { team, color } => {
            let color = HexColor::parse(&color).context("invalid color")?;
            let mut store = open_store(&settings)?;
            store.set(&team, color);
            store.save().context("failed to save override store")?;
            println!("[OK] Saved color for {}: {color}", team.trim());
        }
        Command::Abbrev { code, full_name } => {
            if let Some(known) = team_db::expand_abbreviation(&code) {
                log::warn!("{code} is already built in as {known}; built-in entry wins");
            }
            let mut store = open_store(&settings)?;
            store.set_abbrev(&code, &full_name);
            store.save().context("failed to save override store")?;
            println!(
                "[OK] Saved: {} -> {}",
                code.trim().to_ascii_uppercase(),
                full_name.trim()
            );
        }
        Command::List => {
            let store = open_store(&settings)?;
            if let Some(path) = store.path() {
                println!("Store: {}", path.display());
            }
            println!("Saved colors: {}", store.len());
            for (team, saved) in store.colors() {
                match saved.saved_at.as_deref() {
                    Some(at) => println!("  {team}: {} (saved {at})", saved.color),
                    None => println!("  {team}: {}", saved.color),
                }
            }
            let abbrevs: Vec<_> = store.abbrevs().collect();
            if !abbrevs.is_empty() {
                println!("Abbreviations: {}", abbrevs.len());
                for (code, name) in abbrevs {
                    println!("  {code} -> {name}");
                }
            }
        }
    }

    Ok(())
}

fn build_resolver(settings: &Settings, non_interactive: bool) -> ColorResolver<'static> {
    let resolver = ColorResolver::from_settings(settings);
    if settings.interactive && !non_interactive {
        resolver.with_prompter(ConsolePrompter::stdio())
    } else {
        resolver
    }
}

fn open_store(settings: &Settings) -> Result<OverrideStore> {
    let path = settings
        .store_path
        .clone()
        .context("unable to resolve override store path (set --store or KIT_COLORS_STORE)")?;
    Ok(OverrideStore::load(path))
}

fn parse_hints(raw: &[String]) -> Result<HashMap<String, String>> {
    raw.iter()
        .map(|h| {
            let (team, color) = h
                .split_once('=')
                .ok_or_else(|| anyhow!("hint {h:?} should look like TEAM=#HEX"))?;
            Ok((team.trim().to_string(), color.trim().to_string()))
        })
        .collect()
}
