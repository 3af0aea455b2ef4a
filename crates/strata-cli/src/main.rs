use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::Write;
use std::path::{Path, PathBuf};
use strata_core::{NewCheckIn, PlanningService, StrataConfig};
use strata_domain::{ActionPlanId, CompanyId, ObjectiveId, Percent};
use strata_store::{EntityStore, JsonFileStore};
use tracing_subscriber::EnvFilter;

/// Config file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG: &str = "strata.toml";

/// Log filter when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "strata=info";

fn cli() -> Command {
    Command::new("strata")
        .version(strata_core::VERSION)
        .about("Strategic-planning progress over a JSON dataset")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML config file (default: ./strata.toml if present)"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Dataset directory, overrides store.data_dir"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("map")
                .about("Show perspectives and goal completions for a company")
                .arg(
                    Arg::new("company")
                        .long("company")
                        .required(true)
                        .help("Company id"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("objective")
                .about("Show an objective with its action plans")
                .arg(Arg::new("id").long("id").required(true).help("Objective id"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("check-in")
                .about("Record progress against an action plan")
                .arg(Arg::new("plan").long("plan").required(true).help("Action plan id"))
                .arg(
                    Arg::new("progress")
                        .long("progress")
                        .required(true)
                        .value_parser(value_parser!(u32))
                        .help("Reported progress; values above 100 count as 100"),
                )
                .arg(
                    Arg::new("date")
                        .long("date")
                        .value_parser(parse_date)
                        .help("Check-in date, YYYY-MM-DD (default: today)"),
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .default_value("")
                        .help("What was done"),
                ),
        )
        .subcommand(
            Command::new("reconcile")
                .about("Recompute stored achieved percentages for a company")
                .arg(
                    Arg::new("company")
                        .long("company")
                        .required(true)
                        .help("Company id"),
                ),
        )
}

fn parse_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"))?;

    let config = load_config(
        matches.get_one::<PathBuf>("config").map(PathBuf::as_path),
        matches.get_one::<PathBuf>("data-dir").cloned(),
    )?;
    let store = JsonFileStore::with_prefix(&config.store.data_dir, config.store.file_prefix.clone())
        .with_context(|| format!("cannot open dataset {}", config.store.data_dir.display()))?;
    let service = PlanningService::from_config(store, &config);

    let mut out = std::io::stdout().lock();
    run(&service, &matches, &mut out)
}

fn init_tracing(json: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("cannot install log subscriber: {e}"))
}

fn load_config(explicit: Option<&Path>, data_dir: Option<PathBuf>) -> Result<StrataConfig> {
    let config = match explicit {
        Some(path) => StrataConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG).is_file() => StrataConfig::load(DEFAULT_CONFIG)?,
        None => StrataConfig::default(),
    };
    Ok(match data_dir {
        Some(dir) => config.with_data_dir(dir),
        None => config,
    })
}

fn run<S: EntityStore>(
    service: &PlanningService<S>,
    matches: &ArgMatches,
    out: &mut impl Write,
) -> Result<()> {
    match matches.subcommand() {
        Some(("map", args)) => {
            let company = CompanyId::new(required::<String>(args, "company")?.as_str());
            let map = service.strategic_map(&company)?;

            if args.get_flag("json") {
                writeln!(out, "{}", serde_json::to_string_pretty(&map)?)?;
                return Ok(());
            }
            if map.is_empty() {
                writeln!(out, "No perspectives for company {company}")?;
                return Ok(());
            }
            writeln!(out, "Strategic map: {company}")?;
            for perspective in map.perspectives() {
                writeln!(out)?;
                writeln!(
                    out,
                    "{:>5}  {}",
                    perspective.completion().to_string(),
                    perspective.perspective().description
                )?;
                for goal in perspective.goals() {
                    writeln!(
                        out,
                        "  {:>5}  {}",
                        goal.completion().to_string(),
                        goal.goal().description
                    )?;
                }
            }
        }
        Some(("objective", args)) => {
            let id = ObjectiveId::new(required::<String>(args, "id")?.as_str());
            let detail = service.objective_detail(&id)?;

            if args.get_flag("json") {
                writeln!(out, "{}", serde_json::to_string_pretty(&detail)?)?;
                return Ok(());
            }
            let objective = detail.objective();
            writeln!(out, "Objective {}: {}", objective.id, objective.description)?;
            writeln!(out, "  Progress:  {}", objective.progress)?;
            writeln!(out, "  Achieved:  {}", objective.achieved_percentage())?;
            writeln!(out, "  Effective: {}", objective.effective_completion())?;
            writeln!(out, "  Action plans: {}", detail.action_plans().len())?;
            for plan in detail.action_plans() {
                let last = plan
                    .last_check_in()
                    .map_or_else(|| "never".to_string(), |c| c.date.to_string());
                writeln!(
                    out,
                    "    {:>5}  {} (last check-in: {last})",
                    plan.progress.to_string(),
                    plan.description
                )?;
            }
        }
        Some(("check-in", args)) => {
            let plan_id = ActionPlanId::new(required::<String>(args, "plan")?.as_str());
            let reported = *required::<u32>(args, "progress")?;
            if reported > 100 {
                tracing::warn!(reported, "progress above 100 recorded as 100");
            }

            let mut check_in = NewCheckIn::new(Percent::saturating(reported))
                .with_description(required::<String>(args, "description")?.as_str());
            if let Some(date) = args.get_one::<NaiveDate>("date") {
                check_in = check_in.on(*date);
            }

            let plan = service.record_check_in(&plan_id, check_in)?;
            writeln!(out, "Plan {} now at {}", plan.id, plan.progress)?;
            match service.objective_achieved(&plan.objective_id) {
                Ok(achieved) => {
                    writeln!(out, "Objective {} achieved {achieved}", plan.objective_id)?;
                }
                Err(e) if e.is_not_found() => {
                    writeln!(out, "Objective {} no longer exists", plan.objective_id)?;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Some(("reconcile", args)) => {
            let company = CompanyId::new(required::<String>(args, "company")?.as_str());
            let changes = service.reconcile(&company)?;
            if changes.is_empty() {
                writeln!(out, "Nothing to repair for {company}")?;
            }
            for change in &changes {
                writeln!(
                    out,
                    "Objective {}: {} -> {}",
                    change.objective, change.before, change.after
                )?;
            }
        }
        Some((other, _)) => anyhow::bail!("unknown command: {other}"),
        None => anyhow::bail!("no command given"),
    }
    Ok(())
}

fn required<'a, T>(args: &'a ArgMatches, id: &str) -> Result<&'a T>
where
    T: std::any::Any + Clone + Send + Sync + 'static,
{
    args.get_one::<T>(id)
        .with_context(|| format!("missing --{id}"))
}
