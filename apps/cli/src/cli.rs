//! Command line arguments

use clap::{Args, Parser, Subcommand};
use ocldm_models::CIEL_SOURCE_URL;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ocldm", version, about = "Manage OCL dictionaries from the terminal")]
pub struct Cli {
    /// Configuration file (defaults to ocldm/ocldm.toml in the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Terminology service base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// API token
    #[arg(long, global = true, env = "OCL_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search concepts
    Search(SearchArgs),
    /// List the sources concepts can be imported from
    Sources,
    /// Search the concepts of one source
    SourceConcepts(SourceConceptsArgs),
    /// Add existing concepts and their dependents to a collection
    BulkAdd(BulkAddArgs),
    /// Add one concept to a dictionary
    AddReference(AddReferenceArgs),
    /// List concept classes
    Classes,
    /// List datatypes
    Datatypes,
    /// List the map types offered for a source
    MapTypes {
        #[arg(long, default_value = "CIEL")]
        source: String,
    },
    /// List description locales
    Locales,
    /// Print the effective configuration
    ShowConfig,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-text query; empty lists everything
    #[arg(default_value = "")]
    pub query: String,

    #[arg(long)]
    pub limit: Option<u32>,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Restrict to an organization's concepts
    #[arg(long, conflicts_with = "user")]
    pub org: Option<String>,

    /// Restrict to a user's concepts
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Debug, Args)]
pub struct SourceConceptsArgs {
    pub query: String,

    #[arg(long, default_value = CIEL_SOURCE_URL)]
    pub source: String,

    #[arg(long, default_value_t = ocldm_forms::mapping::SEARCH_OPTIONS_LIMIT)]
    pub limit: u32,
}

#[derive(Debug, Args)]
pub struct BulkAddArgs {
    /// Collection URL or its references endpoint
    #[arg(long)]
    pub collection: String,

    /// Concept URL to add; repeat for several
    #[arg(long = "concept", required = true)]
    pub concepts: Vec<String>,

    /// Ids shown in progress messages; defaults to the ids in the concept URLs
    #[arg(long = "id")]
    pub ids: Vec<String>,
}

#[derive(Debug, Args)]
pub struct AddReferenceArgs {
    pub concept_url: String,

    /// Dictionary (collection) id
    #[arg(long)]
    pub dictionary: String,

    /// Owner URL such as /users/me/; defaults to the configured username
    #[arg(long)]
    pub owner: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bulk_add_collects_repeated_concepts() {
        let cli = Cli::parse_from([
            "ocldm",
            "bulk-add",
            "--collection",
            "/users/me/collections/d/",
            "--concept",
            "/orgs/CIEL/sources/CIEL/concepts/1/",
            "--concept",
            "/orgs/CIEL/sources/CIEL/concepts/2/",
        ]);
        match cli.command {
            Command::BulkAdd(args) => {
                assert_eq!(args.concepts.len(), 2);
                assert!(args.ids.is_empty());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn source_search_defaults_to_ciel() {
        let cli = Cli::parse_from(["ocldm", "source-concepts", "malaria"]);
        match cli.command {
            Command::SourceConcepts(args) => {
                assert_eq!(args.source, CIEL_SOURCE_URL);
                assert_eq!(args.limit, 20);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
