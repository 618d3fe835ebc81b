//! Plano - Read LLM-generated plans from the terminal
//!
//! Parses workout, nutrition and rehab plans written in Portuguese and answers
//! "what do I do today?", with exercise check-offs kept in SQLite.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate, Weekday};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use plano_core::plan::weekday::{from_index, to_index};
use plano_core::plan::{
    day_progress, detect_kind, resolve_menu, resolve_rehab, resolve_workout, validate_plan_text,
    CompletionStore, DayGroup, DayProgress, ExerciseId, Plan, PlanKind, PlanProfile,
    ScheduledExercise, TodayRehab, TodayWorkout,
};
use plano_core::{constants, paths, Database, PlanoConfig, SqliteCompletionStore};

mod render;

/// Plano - plan reader
#[derive(Parser)]
#[command(name = "plano")]
#[command(about = "Read workout, nutrition and rehab plans", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ~/.plano/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Check-off database (defaults to ~/.plano/plano.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Args)]
struct PlanArgs {
    /// Plan text file, or `-` for stdin
    file: PathBuf,

    /// Plan kind (treino, nutricao, reabilitacao); detected when omitted
    #[arg(short, long)]
    kind: Option<PlanKind>,
}

#[derive(Args)]
struct DayArgs {
    /// Date to resolve (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Weekday index to resolve instead of the date's (0 = Sunday)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..7))]
    weekday: Option<u8>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the plan's sections and items
    Parse {
        #[command(flatten)]
        plan: PlanArgs,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show what the plan schedules for a day
    Today {
        #[command(flatten)]
        plan: PlanArgs,

        #[command(flatten)]
        day: DayArgs,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Mark one of the day's exercises as done
    Check {
        #[command(flatten)]
        plan: PlanArgs,

        /// Exercise id as shown by `plano today`
        exercise: String,

        #[command(flatten)]
        day: DayArgs,

        /// Clear the check-off instead
        #[arg(long)]
        undo: bool,
    },

    /// Check that the text looks like a plan of its kind
    Validate {
        #[command(flatten)]
        plan: PlanArgs,
    },

    /// List section keywords in match order
    Keywords {
        /// Plan kind (all kinds when omitted)
        #[arg(short, long)]
        kind: Option<PlanKind>,
    },
}

// ============================================================================
// Input
// ============================================================================

fn read_plan_text(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read plan from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Plan text plus the kind it is read as.
fn load_plan(args: &PlanArgs) -> Result<(String, PlanKind)> {
    let text = read_plan_text(&args.file)?;
    let kind = match args.kind.or_else(|| detect_kind(&text)) {
        Some(kind) => kind,
        None => bail!("{}", constants::gate::NO_VALID_PLAN),
    };
    tracing::info!(file = %args.file.display(), kind = %kind, "Loaded plan text");
    Ok((text, kind))
}

fn load_config(path: Option<&Path>) -> Result<PlanoConfig> {
    let config = match path {
        Some(path) => PlanoConfig::load(path)?,
        None => PlanoConfig::load_default()?,
    };
    Ok(config)
}

fn open_store(path: Option<&Path>, kind: PlanKind) -> Result<SqliteCompletionStore> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(paths::database_path);
    let db = Database::new(&path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    Ok(SqliteCompletionStore::for_kind(db, kind))
}

// ============================================================================
// Day resolution
// ============================================================================

/// Resolved day for any plan kind.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", content = "today", rename_all = "snake_case")]
enum Today {
    Workout(TodayWorkout),
    Rehabilitation(TodayRehab),
    Nutrition {
        weekday: Weekday,
        menu: Option<DayGroup>,
    },
}

impl Today {
    fn exercises(&self) -> &[ScheduledExercise] {
        match self {
            Today::Workout(today) => today.exercises(),
            Today::Rehabilitation(today) => today.exercises(),
            Today::Nutrition { .. } => &[],
        }
    }
}

/// Date for check-offs and weekday index for the schedule.
fn target_day(args: &DayArgs) -> (NaiveDate, u8) {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let index = args
        .weekday
        .unwrap_or_else(|| to_index(date.weekday()));
    (date, index)
}

fn resolve_today(text: &str, kind: PlanKind, index: u8, config: &PlanoConfig) -> Result<Today> {
    validate_plan_text(text, kind)?;
    let profile: PlanProfile = config.profile(kind);
    let sections = plano_core::parse(text, &profile);
    let weekday = from_index(index);

    let today = match kind {
        PlanKind::Workout => Today::Workout(resolve_workout(
            index,
            &sections,
            &profile,
            &config.schedule_options(),
        )),
        PlanKind::Rehabilitation => {
            Today::Rehabilitation(resolve_rehab(weekday, &sections, &profile))
        }
        PlanKind::Nutrition => Today::Nutrition {
            weekday,
            menu: resolve_menu(weekday, &sections, &profile),
        },
    };
    Ok(today)
}

fn completed(
    date: NaiveDate,
    exercises: &[ScheduledExercise],
    store: &SqliteCompletionStore,
) -> Result<BTreeSet<ExerciseId>> {
    let mut done = BTreeSet::new();
    for exercise in exercises {
        if store.get(date, &exercise.id)? {
            done.insert(exercise.id.clone());
        }
    }
    Ok(done)
}

#[derive(Serialize)]
struct TodayReport<'a> {
    date: NaiveDate,
    #[serde(flatten)]
    today: &'a Today,
    progress: DayProgress,
    done: &'a BTreeSet<ExerciseId>,
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_parse(plan: &PlanArgs, json: bool, config: &PlanoConfig) -> Result<()> {
    let (text, kind) = load_plan(plan)?;
    validate_plan_text(&text, kind)?;
    let parsed = Plan::parse(&text, &config.profile(kind));

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
    } else {
        println!("{}", render::render_plan(&parsed));
    }
    Ok(())
}

fn cmd_today(cli: &Cli, plan: &PlanArgs, day: &DayArgs, json: bool, config: &PlanoConfig) -> Result<()> {
    let (text, kind) = load_plan(plan)?;
    let (date, index) = target_day(day);
    let today = resolve_today(&text, kind, index, config)?;

    let (progress, done) = if today.exercises().is_empty() {
        (DayProgress { done: 0, total: 0 }, BTreeSet::new())
    } else {
        let store = open_store(cli.db.as_deref(), kind)?;
        (
            day_progress(date, today.exercises(), &store)?,
            completed(date, today.exercises(), &store)?,
        )
    };

    if json {
        let report = TodayReport {
            date,
            today: &today,
            progress,
            done: &done,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let out = match &today {
        Today::Workout(workout) => render::render_workout(workout, &progress, &done),
        Today::Rehabilitation(rehab) => render::render_rehab(rehab, &progress, &done),
        Today::Nutrition { weekday, menu } => render::render_menu(menu.as_ref(), *weekday),
    };
    println!("{}", out);
    Ok(())
}

fn cmd_check(
    cli: &Cli,
    plan: &PlanArgs,
    exercise: &str,
    day: &DayArgs,
    undo: bool,
    config: &PlanoConfig,
) -> Result<()> {
    let (text, kind) = load_plan(plan)?;
    if kind == PlanKind::Nutrition {
        bail!("Planos de nutrição não têm exercícios para marcar");
    }
    let (date, index) = target_day(day);
    let today = resolve_today(&text, kind, index, config)?;

    let id = ExerciseId::from(exercise);
    let Some(scheduled) = today.exercises().iter().find(|e| e.id == id) else {
        let known: Vec<&str> = today.exercises().iter().map(|e| e.id.as_str()).collect();
        if known.is_empty() {
            bail!("Nenhum exercício programado para {}", date);
        }
        bail!("Exercício '{}' não encontrado. Disponíveis: {}", exercise, known.join(", "));
    };

    let mut store = open_store(cli.db.as_deref(), kind)?;
    store.set(date, &id, !undo)?;
    let progress = day_progress(date, today.exercises(), &store)?;

    if undo {
        println!("  ✗ {} desmarcado", scheduled.name);
    } else {
        println!("  ✓ {} feito", scheduled.name);
    }
    println!("  Progresso: {}/{}", progress.done, progress.total);
    if progress.is_complete() {
        println!("  Dia concluído!");
    }
    Ok(())
}

fn cmd_validate(plan: &PlanArgs) -> Result<()> {
    let (text, kind) = load_plan(plan)?;
    validate_plan_text(&text, kind)?;
    println!("  ✓ Plano de {} válido", kind.label());
    Ok(())
}

fn cmd_keywords(kind: Option<PlanKind>, config: &PlanoConfig) {
    let kinds: Vec<PlanKind> = match kind {
        Some(kind) => vec![kind],
        None => PlanKind::ALL.to_vec(),
    };
    let tables: Vec<String> = kinds
        .into_iter()
        .map(|kind| render::render_keywords(&config.profile(kind)))
        .collect();
    println!("{}", tables.join("\n\n"));
}

fn main() -> Result<()> {
    // Logs go to a file so they never interleave with command output
    let log_dir = paths::logs_dir();
    std::fs::create_dir_all(&log_dir).ok();

    #[cfg(unix)]
    let null_device = "/dev/null";
    #[cfg(windows)]
    let null_device = "NUL";

    let log_file = std::fs::File::create(log_dir.join(constants::ui::LOG_FILE_NAME))
        .or_else(|_| std::fs::File::create(null_device))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Parse { plan, json } => cmd_parse(plan, *json, &config),
        Commands::Today { plan, day, json } => cmd_today(&cli, plan, day, *json, &config),
        Commands::Check {
            plan,
            exercise,
            day,
            undo,
        } => cmd_check(&cli, plan, exercise, day, *undo, &config),
        Commands::Validate { plan } => cmd_validate(plan),
        Commands::Keywords { kind } => {
            cmd_keywords(*kind, &config);
            Ok(())
        }
    }
}
