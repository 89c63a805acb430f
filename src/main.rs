// puckwatch entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr; stdout carries the report)
// 2. Parse CLI arguments
// 3. Load config
// 4. Open the response cache
// 5. Fetch the league snapshot for the target date
// 6. Run the configured analysis
// 7. Render markdown and print it

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use puckwatch::analysis::simulation::Simulator;
use puckwatch::analysis::{playoffs, tank};
use puckwatch::{api, config, db, report};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let args = parse_args()?;

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        team = %config.bot.team,
        mode = ?config.bot.mode,
        reach = config.bot.reach,
        "puckwatch starting up"
    );

    let cache = if config.cache_enabled {
        match db::Cache::open_default() {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!("response cache unavailable, fetching fresh: {e:#}");
                None
            }
        }
    } else {
        None
    };

    let client = api::ApiClient::new(cache);
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let info = api::fetch_info(&client, date, &config.league)
        .await
        .context("failed to fetch league snapshot")?;

    let my_team = info
        .team_by_code(&config.bot.team)
        .cloned()
        .with_context(|| format!("unknown team code `{}`", config.bot.team))?;

    let markdown = match config.bot.mode {
        config::Mode::Tank => {
            let analysis = tank::Analysis::new(&info, my_team, config.bot.reach);
            report::tank::generate(&analysis)
        }
        config::Mode::Playoffs => {
            let mut simulator = if config.simulation.enabled {
                info!(
                    trials = config.simulation.trials,
                    seed = ?config.simulation.seed,
                    "season simulator enabled"
                );
                Some(match config.simulation.seed {
                    Some(seed) => Simulator::seeded(config.simulation.trials, seed),
                    None => Simulator::new(config.simulation.trials),
                })
            } else {
                None
            };
            let analysis = playoffs::Analysis::with_simulator(
                &info,
                my_team,
                config.bot.reach,
                simulator.as_mut(),
            );
            report::playoffs::generate(&analysis)
        }
    };

    if let Some(path) = &args.out {
        std::fs::write(path, &markdown)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }
    println!("{markdown}");

    Ok(())
}

struct Args {
    date: Option<NaiveDate>,
    out: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        date: None,
        out: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--date" => {
                let value = iter.next().context("--date requires a YYYY-MM-DD value")?;
                args.date = Some(
                    value
                        .parse()
                        .with_context(|| format!("invalid date `{value}`"))?,
                );
            }
            "--out" => {
                let value = iter.next().context("--out requires a file path")?;
                args.out = Some(PathBuf::from(value));
            }
            other => bail!("unknown argument `{other}` (expected --date or --out)"),
        }
    }
    Ok(args)
}

/// Initialize tracing to stderr; stdout is reserved for the report itself.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("puckwatch=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
