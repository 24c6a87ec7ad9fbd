//! Subcommand arguments and their resolved configurations.

use camino::Utf8PathBuf;
use clap::Parser;
use cityguide_core::{PageRequest, Query, ResultLimit};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::source::PlaceSource;
use crate::{
    ARG_CHAT_MESSAGE, ARG_DATABASE, ARG_LAT, ARG_LNG, ARG_PLACES_JSON, ARG_SEARCH_QUERY, CliError,
    ENV_CHAT_MESSAGE, ENV_RECOMMEND_LAT, ENV_RECOMMEND_LNG, ENV_SEARCH_QUERY,
};

/// CLI arguments for the `list` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "List places in name order, one page at a time")]
#[ortho_config(prefix = "CITYGUIDE")]
pub(crate) struct ListArgs {
    /// Path to a SQLite place database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Path to a JSON array of place records.
    #[arg(long = ARG_PLACES_JSON, value_name = "path")]
    #[serde(default)]
    pub(crate) places_json: Option<Utf8PathBuf>,
    /// Only places whose category, subcategory or tags contain this text.
    #[arg(long, value_name = "text")]
    #[serde(default)]
    pub(crate) category: Option<String>,
    /// Only places whose subcategory contains this text.
    #[arg(long, value_name = "text")]
    #[serde(default)]
    pub(crate) subcategory: Option<String>,
    /// 1-based page number.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) page: Option<usize>,
    /// Places per page (1 to 100).
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) page_size: Option<usize>,
}

impl ListArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

impl TryFrom<ListArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: ListArgs) -> Result<Self, Self::Error> {
        let source = PlaceSource::resolve(args.database, args.places_json)?;
        let page_size = args
            .page_size
            .map_or(ResultLimit::DEFAULT_PAGE_SIZE, ResultLimit::new);
        let query = filtered(Query::default(), args.category, args.subcategory)
            .with_page(PageRequest::new(args.page.unwrap_or(1), page_size));
        Ok(Self {
            source,
            action: Action::List(query),
        })
    }
}

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Rank places by how well they match free text")]
#[ortho_config(prefix = "CITYGUIDE")]
pub(crate) struct SearchArgs {
    /// Text to match against names, categories, tags and descriptions.
    #[arg(value_name = "query")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Path to a SQLite place database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Path to a JSON array of place records.
    #[arg(long = ARG_PLACES_JSON, value_name = "path")]
    #[serde(default)]
    pub(crate) places_json: Option<Utf8PathBuf>,
    /// Only places whose category, subcategory or tags contain this text.
    #[arg(long, value_name = "text")]
    #[serde(default)]
    pub(crate) category: Option<String>,
    /// Only places whose subcategory contains this text.
    #[arg(long, value_name = "text")]
    #[serde(default)]
    pub(crate) subcategory: Option<String>,
    /// Maximum number of results (1 to 100).
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

impl SearchArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

impl TryFrom<SearchArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let text = args.query.ok_or(CliError::MissingArgument {
            field: ARG_SEARCH_QUERY,
            env: ENV_SEARCH_QUERY,
        })?;
        let source = PlaceSource::resolve(args.database, args.places_json)?;
        let query = filtered(Query::text(text), args.category, args.subcategory)
            .with_limit(limit(args.limit));
        Ok(Self {
            source,
            action: Action::Search(query),
        })
    }
}

/// CLI arguments for the `recommend` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Recommend places near a coordinate, boosted by interest tags")]
#[ortho_config(prefix = "CITYGUIDE")]
pub(crate) struct RecommendArgs {
    /// Path to a SQLite place database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Path to a JSON array of place records.
    #[arg(long = ARG_PLACES_JSON, value_name = "path")]
    #[serde(default)]
    pub(crate) places_json: Option<Utf8PathBuf>,
    /// Latitude of the user in degrees.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the user in degrees.
    #[arg(long = ARG_LNG, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// Interest tag; repeat for several.
    #[arg(long = "tag", value_name = "tag")]
    #[serde(default)]
    pub(crate) tags: Vec<String>,
    /// Only places whose category, subcategory or tags contain this text.
    #[arg(long, value_name = "text")]
    #[serde(default)]
    pub(crate) category: Option<String>,
    /// Only places whose subcategory contains this text.
    #[arg(long, value_name = "text")]
    #[serde(default)]
    pub(crate) subcategory: Option<String>,
    /// Maximum number of results (1 to 100).
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

impl RecommendArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

impl TryFrom<RecommendArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: RecommendArgs) -> Result<Self, Self::Error> {
        let lat = args.lat.ok_or(CliError::MissingArgument {
            field: ARG_LAT,
            env: ENV_RECOMMEND_LAT,
        })?;
        let lng = args.lng.ok_or(CliError::MissingArgument {
            field: ARG_LNG,
            env: ENV_RECOMMEND_LNG,
        })?;
        let source = PlaceSource::resolve(args.database, args.places_json)?;
        let query = filtered(Query::default(), args.category, args.subcategory)
            .near(lat, lng)
            .with_tags(args.tags)
            .with_limit(limit(args.limit));
        Ok(Self {
            source,
            action: Action::Recommend(query),
        })
    }
}

/// CLI arguments for the `chat` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Select the places that ground a chat answer")]
#[ortho_config(prefix = "CITYGUIDE")]
pub(crate) struct ChatArgs {
    /// The user's chat message.
    #[arg(value_name = "message")]
    #[serde(default)]
    pub(crate) message: Option<String>,
    /// Path to a SQLite place database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Path to a JSON array of place records.
    #[arg(long = ARG_PLACES_JSON, value_name = "path")]
    #[serde(default)]
    pub(crate) places_json: Option<Utf8PathBuf>,
    /// Seed for the fallback sample, for reproducible output.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl ChatArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

impl TryFrom<ChatArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: ChatArgs) -> Result<Self, Self::Error> {
        let message = args.message.ok_or(CliError::MissingArgument {
            field: ARG_CHAT_MESSAGE,
            env: ENV_CHAT_MESSAGE,
        })?;
        let source = PlaceSource::resolve(args.database, args.places_json)?;
        Ok(Self {
            source,
            action: Action::Chat {
                message,
                seed: args.seed,
            },
        })
    }
}

/// A fully resolved command invocation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RankConfig {
    /// Place data to rank.
    pub(crate) source: PlaceSource,
    /// What to do with it.
    pub(crate) action: Action,
}

/// The ranking operation a command performs.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Action {
    List(Query),
    Search(Query),
    Recommend(Query),
    Chat { message: String, seed: Option<u64> },
}

fn filtered(query: Query, category: Option<String>, subcategory: Option<String>) -> Query {
    let with_category = category
        .into_iter()
        .fold(query, |acc, value| acc.with_category(value));
    subcategory
        .into_iter()
        .fold(with_category, |acc, value| acc.with_subcategory(value))
}

fn limit(requested: Option<usize>) -> ResultLimit {
    requested.map_or(ResultLimit::DEFAULT, ResultLimit::new)
}

#[cfg(test)]
pub(crate) fn search_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RankConfig, CliError> {
    let merged = SearchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RankConfig::try_from(merged)
}
