//! Command-line interface for the cityguide place ranker.
//!
//! Every subcommand reads places from a SQLite database (`--database`) or a
//! JSON dump (`--places-json`), ranks them and prints the result as pretty
//! JSON on stdout. Options layer CLI flags over `CITYGUIDE_*` environment
//! variables over configuration files.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use cityguide_core::{Place, PlaceRepository};
use cityguide_ranker::{PlacePage, RankedPlace, Ranker};
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

mod commands;
mod error;
mod source;

use commands::{Action, ChatArgs, ListArgs, RankConfig, RecommendArgs, SearchArgs};
pub use error::CliError;

pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_PLACES_JSON: &str = "places-json";
pub(crate) const ARG_SEARCH_QUERY: &str = "query";
pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LNG: &str = "lng";
pub(crate) const ARG_CHAT_MESSAGE: &str = "message";
pub(crate) const ENV_SEARCH_QUERY: &str = "CITYGUIDE_CMDS_SEARCH_QUERY";
pub(crate) const ENV_RECOMMEND_LAT: &str = "CITYGUIDE_CMDS_RECOMMEND_LAT";
pub(crate) const ENV_RECOMMEND_LNG: &str = "CITYGUIDE_CMDS_RECOMMEND_LNG";
pub(crate) const ENV_CHAT_MESSAGE: &str = "CITYGUIDE_CMDS_CHAT_MESSAGE";

/// Run the cityguide CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration or the place source
/// are invalid, when the ranker rejects the request, or when the output
/// cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_with(cli.command, &mut stdout)
}

fn run_with(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = command.into_config()?;
    config.source.validate()?;
    let ranker = Ranker::new(config.source.open()?);
    let output = execute(&ranker, config.action)?;
    write_output(writer, &output)
}

#[derive(Debug, Parser)]
#[command(
    name = "cityguide",
    about = "Search, list and recommend city places",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List places in name order.
    List(ListArgs),
    /// Rank places against free text.
    Search(SearchArgs),
    /// Recommend places near a coordinate.
    Recommend(RecommendArgs),
    /// Select places to ground a chat answer.
    Chat(ChatArgs),
}

impl Command {
    fn into_config(self) -> Result<RankConfig, CliError> {
        match self {
            Self::List(args) => args.into_config(),
            Self::Search(args) => args.into_config(),
            Self::Recommend(args) => args.into_config(),
            Self::Chat(args) => args.into_config(),
        }
    }
}

/// JSON payload printed by a command.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Output {
    Page(PlacePage),
    Ranked(Vec<RankedPlace>),
    Context(Vec<Place>),
}

fn execute<R>(ranker: &Ranker<R>, action: Action) -> Result<Output, CliError>
where
    R: PlaceRepository,
{
    debug!("executing {action:?}");
    let output = match action {
        Action::List(query) => Output::Page(ranker.list_places(&query)),
        Action::Search(query) => Output::Ranked(ranker.search_places(&query)),
        Action::Recommend(query) => Output::Ranked(ranker.recommend_places(&query)?),
        Action::Chat { message, seed } => Output::Context(seed.map_or_else(
            || ranker.select_chat_context(&message),
            |value| ranker.select_chat_context_with_rng(&message, &mut StdRng::seed_from_u64(value)),
        )),
    };
    Ok(output)
}

fn write_output(writer: &mut dyn Write, output: &Output) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(output).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
