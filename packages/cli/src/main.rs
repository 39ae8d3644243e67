mod client;
mod render;

use std::io;
use std::ops::ControlFlow;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use common::{Computed, ContestSnapshot, Ticker};
use console::{Term, style};

use crate::client::ApiClient;

#[derive(Parser)]
#[command(name = "arena", version, about = "Contest status, countdown and progress in the terminal")]
struct Cli {
    /// Base URL of the contest server.
    #[arg(
        long,
        global = true,
        env = "ARENA_API_URL",
        default_value = "http://127.0.0.1:3000"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a contest, its timing and its problems once.
    Show { id: i32 },
    /// Keep a live countdown on screen until the contest ends or Ctrl-C.
    Watch {
        id: i32,
        /// Milliseconds between refreshes.
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let client = ApiClient::new(&cli.api_url);

    let result = match cli.command {
        Command::Show { id } => show(&client, id).await,
        Command::Watch { id, interval_ms } => {
            watch(&client, id, Duration::from_millis(interval_ms)).await
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

fn not_found(id: i32) -> ExitCode {
    eprintln!("{} contest {id} not found", style("error:").red().bold());
    ExitCode::FAILURE
}

async fn show(client: &ApiClient, id: i32) -> Result<ExitCode> {
    let Some(contest) = client.get_contest(id).await? else {
        return Ok(not_found(id));
    };
    let problems = client.get_contest_problems(id).await?;

    let snapshot = ContestSnapshot::from_raw(
        &contest.start_time,
        &contest.end_time,
        contest.status_override,
        Utc::now(),
    );

    println!("{}", render::header(&contest));
    println!("{}", render::status_line(&snapshot));
    println!();
    println!("{}", render::problems(&problems));
    Ok(ExitCode::SUCCESS)
}

async fn watch(client: &ApiClient, id: i32, interval: Duration) -> Result<ExitCode> {
    let Some(contest) = client.get_contest(id).await? else {
        return Ok(not_found(id));
    };
    println!("{}", render::header(&contest));

    let term = Term::stdout();
    let (start, end, status_override) = (
        contest.start_time,
        contest.end_time,
        contest.status_override,
    );
    let mut ticker = Ticker::start(interval, move || {
        let snapshot = ContestSnapshot::from_raw(&start, &end, status_override, Utc::now());
        let drawn = draw(&term, &snapshot);
        after_draw(drawn, &snapshot)
    });

    tokio::select! {
        _ = ticker.stopped() => {}
        _ = tokio::signal::ctrl_c() => ticker.cancel(),
    }
    println!();

    Ok(ExitCode::SUCCESS)
}

fn draw(term: &Term, snapshot: &Computed<ContestSnapshot>) -> io::Result<()> {
    term.clear_line()?;
    term.write_str(&render::status_line(snapshot))
}

/// Keep watching only while the terminal takes writes and the contest is live.
fn after_draw(drawn: io::Result<()>, snapshot: &Computed<ContestSnapshot>) -> ControlFlow<()> {
    match (drawn, snapshot) {
        (Ok(()), Computed::Valid(s)) if s.needs_refresh() => ControlFlow::Continue(()),
        _ => ControlFlow::Break(()),
    }
}
