//! Command-line front end for the box-office client.
//!
//! Prints what the app screens would render: the daily chart with its
//! headline poster, or a single movie's page.

use std::collections::HashMap;
use std::process::ExitCode;

use boxoffice_core::{
    config, target_date, yesterday, CancellationToken, ClientConfig, DailyBoxOffice, MovieService,
    RankChange, ReqwestDispatcher,
};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "boxoffice")]
#[command(about = "Daily box-office ranking and movie details", long_about = None)]
struct Args {
    /// Data service base URL (overrides BOXOFFICE_DATA_URL)
    #[arg(long, global = true)]
    data_url: Option<String>,

    /// Image search base URL (overrides BOXOFFICE_IMAGE_URL)
    #[arg(long, global = true)]
    image_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the daily ranking with the top movie's poster
    Chart {
        /// Ranking date as YYYYMMDD (default: yesterday)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Show detail and poster for one movie
    Movie {
        /// Movie code from the ranking
        code: String,
        /// Movie title, used for the poster search
        name: String,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y%m%d").map_err(|e| format!("expected YYYYMMDD: {e}"))
}

fn rank_change_label(movie: &DailyBoxOffice) -> String {
    match movie.rank_change() {
        Some(RankChange::New) => "NEW".to_string(),
        Some(RankChange::Up(n)) => format!("+{n}"),
        Some(RankChange::Down(n)) => format!("-{n}"),
        Some(RankChange::Steady) => "-".to_string(),
        None => String::new(),
    }
}

fn print_movie(movie: &DailyBoxOffice) {
    let today = movie.audience_count_value().map(|n| n.to_string()).unwrap_or_default();
    let total = movie
        .audience_accumulation_value()
        .map(|n| n.to_string())
        .unwrap_or_default();
    println!(
        "{:>3} {:<5} {}  (today {today} / total {total})",
        movie.rank,
        rank_change_label(movie),
        movie.movie_name
    );
}

fn load_config(args: &Args) -> Result<ClientConfig, config::ConfigError> {
    let mut overrides = HashMap::new();
    if let Some(url) = &args.data_url {
        overrides.insert(config::DATA_URL_VAR, url.clone());
    }
    if let Some(url) = &args.image_url {
        overrides.insert(config::IMAGE_URL_VAR, url.clone());
    }
    ClientConfig::from_lookup(|var| overrides.get(var).cloned().or_else(|| std::env::var(var).ok()))
}

async fn run(args: Args, token: CancellationToken) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args)?;
    let dispatcher = ReqwestDispatcher::from_config(&config)?;
    let movies = MovieService::from_config(dispatcher, &config);

    match args.command {
        Command::Chart { date } => {
            let date = date.unwrap_or_else(|| yesterday(Local::now().date_naive()));
            tracing::info!(target_date = %target_date(date), "fetching daily chart");
            let chart = tokio::select! {
                _ = token.cancelled() => return Err("interrupted".into()),
                chart = movies.daily_chart(date) => chart?,
            };

            println!("Box office for {}", date.format("%Y-%m-%d"));
            match &chart.headliner {
                Some(headliner) => {
                    print_movie(headliner);
                    match &chart.poster {
                        Some(poster) => println!("    poster: {} bytes", poster.len()),
                        None => println!("    poster: none"),
                    }
                }
                None => println!("(no ranking published)"),
            }
            for movie in &chart.others {
                print_movie(movie);
            }
        }
        Command::Movie { code, name } => {
            let page = tokio::select! {
                _ = token.cancelled() => return Err("interrupted".into()),
                page = movies.movie_page(&code, &name) => page?,
            };
            let overview = page.overview;
            println!("{}", overview.name);
            println!("  directors:  {}", overview.directors.join(", "));
            println!("  produced:   {}", overview.year_of_production);
            println!("  opened:     {}", overview.open_date);
            println!("  running:    {} min", overview.running_time);
            println!("  rating:     {}", overview.movie_rating.as_deref().unwrap_or("-"));
            println!("  nation:     {}", overview.nation.as_deref().unwrap_or("-"));
            println!("  genres:     {}", overview.genres.join(", "));
            println!("  actors:     {}", overview.actors.join(", "));
            match page.poster {
                Some(poster) => println!("  poster:     {} bytes", poster.len()),
                None => println!("  poster:     none"),
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let token = CancellationToken::new();
    let ctrl_c = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        })
    };

    let result = run(args, token).await;
    ctrl_c.abort();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
