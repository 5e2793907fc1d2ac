use std::io::Write;
use std::time::Duration;

use clap::{Parser, Subcommand};
use spawnwatch::commands;
use spawnwatch::logging;
use spawnwatch::readline;
use spawnwatch::ticker::spawn_ticker;
use spawnwatch::AppContext;
use spawnwatch_core::context::{AppConfig, AppConfigExt};
use spawnwatch_core::BossStatus;

#[tokio::main]
async fn main() -> Result<(), String> {
    let _log_guard = logging::init();

    let config = AppConfig::load();
    let tick_secs = config.timing.tick_interval_secs.max(1);
    let ctx = AppContext::new(config)?;

    {
        let store = ctx.store.read().await;
        tracing::info!(
            bosses = store.policy().len(),
            records = store.records().len(),
            tick_secs,
            "spawnwatch started"
        );
    }

    let ticker = spawn_ticker(ctx.clone(), Duration::from_secs(tick_secs));
    ctx.tasks.lock().await.ticker = Some(ticker);

    while let Some(line) = readline()? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    ctx.tasks.lock().await.abort_all();
    Ok(())
}

#[derive(Parser)]
#[command(version, about = "Boss respawn tracker")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the status board
    Board {
        #[arg(short, long)]
        status: Option<BossStatus>,
    },
    /// List records (pending only unless --all)
    Records {
        #[arg(short, long)]
        all: bool,
    },
    /// Track an expected spawn
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        channel: Option<String>,
        #[arg(short, long)]
        map: Option<String>,
        #[arg(short, long)]
        at: String,
    },
    /// Log a kill that was not tracked as pending
    LogKill {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        channel: Option<String>,
        #[arg(short, long)]
        map: Option<String>,
        #[arg(short, long)]
        at: Option<String>,
    },
    /// Confirm a pending record as killed
    Kill {
        #[arg(short, long)]
        id: u64,
        #[arg(short, long)]
        at: Option<String>,
    },
    Noshow {
        #[arg(short, long)]
        id: u64,
    },
    Delete {
        #[arg(short, long)]
        id: u64,
    },
    /// Drop deleted records from the file
    Purge,
    ReloadPolicy,
    Config,
    /// Set the Discord webhook URL (omit to disable)
    Webhook {
        #[arg(short, long)]
        url: Option<String>,
    },
    Exit,
}

async fn respond(line: &str, ctx: &AppContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "spawnwatch".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::Board { status }) => commands::show_board(ctx, status).await?,
        Some(Commands::Records { all }) => commands::list_records(ctx, all).await?,
        Some(Commands::Add {
            name,
            channel,
            map,
            at,
        }) => commands::add_pending(ctx, &name, channel, map, &at).await?,
        Some(Commands::LogKill {
            name,
            channel,
            map,
            at,
        }) => commands::log_kill(ctx, &name, channel, map, at.as_deref()).await?,
        Some(Commands::Kill { id, at }) => commands::mark_killed(ctx, id, at.as_deref()).await?,
        Some(Commands::Noshow { id }) => commands::mark_noshow(ctx, id).await?,
        Some(Commands::Delete { id }) => commands::delete_record(ctx, id).await?,
        Some(Commands::Purge) => commands::purge_deleted(ctx).await?,
        Some(Commands::ReloadPolicy) => commands::reload_policy(ctx).await?,
        Some(Commands::Config) => commands::show_config(ctx).await?,
        Some(Commands::Webhook { url }) => commands::set_webhook(ctx, url).await?,
        Some(Commands::Exit) => {
            commands::exit()?;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
