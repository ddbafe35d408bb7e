//! Run a gateway operation against live TMDB and print the JSON the API would return.
//! Usage:
//!   cargo run --bin movie_probe -- search <query> [page]
//!   cargo run --bin movie_probe -- popular|top-rated|now-playing [page]
//!   cargo run --bin movie_probe -- details <tmdb_id>
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use reelgate::config::Config;
use reelgate::gateway::MovieService;
use reelgate::tmdb::TmdbClient;
use std::env;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Operation {
    Search,
    Popular,
    TopRated,
    NowPlaying,
    Details,
}

impl FromStr for Operation {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "search" => Ok(Operation::Search),
            "popular" => Ok(Operation::Popular),
            "top-rated" => Ok(Operation::TopRated),
            "now-playing" => Ok(Operation::NowPlaying),
            "details" => Ok(Operation::Details),
            _ => Err(anyhow!(
                "operation must be one of: search, popular, top-rated, now-playing, details"
            )),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let args: Vec<String> = env::args().skip(1).collect();
    let op: Operation = args
        .first()
        .ok_or_else(|| anyhow!("missing operation"))?
        .parse()?;
    let arg = |i: usize| args.get(i).map(String::as_str);

    let config = Config::from_env()?;
    let service = MovieService::new(
        Arc::new(TmdbClient::from_config(&config)?),
        config.image_base.clone(),
    );

    let outcome = match op {
        Operation::Search => service
            .search_movies(arg(1), arg(2))
            .await
            .map(serde_json::to_value),
        Operation::Popular => service
            .popular_movies(arg(1))
            .await
            .map(serde_json::to_value),
        Operation::TopRated => service
            .top_rated_movies(arg(1))
            .await
            .map(serde_json::to_value),
        Operation::NowPlaying => service
            .now_playing_movies(arg(1))
            .await
            .map(serde_json::to_value),
        Operation::Details => {
            let id = arg(1).ok_or_else(|| anyhow!("details needs a movie id"))?;
            service
                .movie_details(id)
                .await
                .map(serde_json::to_value)
        }
    };

    match outcome {
        Ok(body) => println!("200\n{}", serde_json::to_string_pretty(&body?)?),
        Err(e) => println!(
            "{}\n{}",
            e.status().as_u16(),
            serde_json::to_string_pretty(&e.body())?
        ),
    }
    Ok(())
}
