//! Jobscura CLI: poke the stats endpoint and preview badges from a terminal

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;

use jobscura::cli::TerminalSurface;
use jobscura::fetcher::http::{fetch_job_stats, ping_counter};
use jobscura::render::{Renderer, ViewState};
use jobscura::{extract_job_id, JobStats};

#[derive(Parser)]
#[command(name = "jobscura")]
#[command(about = "Job-posting stats overlay tooling", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch live stats for one job posting
    Stats {
        /// Numeric job id, or a full job-page URL
        job: String,

        /// Raw Cookie header value of a logged-in session (the CSRF token
        /// is derived from its JSESSIONID entry)
        #[arg(short, long)]
        cookie: Option<String>,
    },

    /// Extract the job id from a URL
    ExtractId {
        /// Job-page URL
        url: String,
    },

    /// Render the badge set for made-up stats, without any network
    Preview {
        #[arg(long)]
        applies: u64,

        #[arg(long)]
        views: u64,

        /// Days until the posting expires (negative for already expired)
        #[arg(long, allow_hyphen_values = true)]
        expires_in_days: i64,

        /// Remote flag; omit for unknown
        #[arg(long)]
        remote: Option<bool>,
    },

    /// Ping the usage-counter endpoint once
    Ping,
}

const DAY_MS: i64 = 86_400_000;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { job, cookie } => {
            let job_id = match extract_job_id(&job) {
                Some(id) => id,
                None if job.chars().all(|c| c.is_ascii_digit()) && !job.is_empty() => job.clone(),
                None => bail!("no job id found in {job:?}"),
            };

            let client = reqwest::Client::new();
            let stats = fetch_job_stats(&client, &job_id, cookie.as_deref())
                .await
                .with_context(|| format!("fetching stats for job {job_id}"))?;

            println!("{}", format!("Job {job_id}").bold().blue());
            render_stats(stats)?;
        }

        Commands::ExtractId { url } => match extract_job_id(&url) {
            Some(id) => println!("{id}"),
            None => bail!("no job id found in {url:?}"),
        },

        Commands::Preview {
            applies,
            views,
            expires_in_days,
            remote,
        } => {
            let stats = JobStats {
                job_id: "preview".to_string(),
                applies,
                views,
                expire_at: Utc::now().timestamp_millis() + expires_in_days * DAY_MS,
                is_remote_allowed: remote,
            };
            render_stats(stats)?;
        }

        Commands::Ping => {
            let client = reqwest::Client::new();
            let status = ping_counter(&client)
                .await
                .context("pinging the usage counter")?;
            println!("counter endpoint answered {status}");
        }
    }

    Ok(())
}

fn render_stats(stats: JobStats) -> Result<()> {
    let mut renderer = Renderer::new(TerminalSurface);
    renderer
        .transition(ViewState::Shown(stats), Utc::now().timestamp_millis())
        .context("rendering badges")?;
    Ok(())
}
