use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use malt_search::config::{Destination, SearchConfig};
use malt_search::converter::{self, rewriter};
use malt_search::dict::Dictionary;
use malt_search::dispatch::{dispatch, ClientEnv, ShellNavigator};
use malt_search::normalize::normalize;
use malt_search::pipeline::{prepare_search, SearchService};

#[derive(Parser)]
#[command(name = "searchtool", about = "Keyword pipeline diagnostics")]
struct Cli {
    /// Path to a word-mapping JSON file (default: embedded mapping)
    #[arg(long)]
    dict: Option<PathBuf>,

    /// Path to a config TOML file (default: embedded config)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show every pipeline stage for a keyword
    Translate {
        /// Raw keyword as the user would type it
        keyword: String,
    },

    /// Print the final search URL for a destination
    Url {
        /// mukawa, yahoo, rakuten or mercari
        destination: Destination,
        keyword: String,
    },

    /// Run a full search attempt (records to the store if configured)
    Search {
        /// mukawa, yahoo, rakuten or mercari
        destination: Destination,
        keyword: String,
        /// Open the result in a browser
        #[arg(long)]
        open: bool,
        /// User agent to base the navigation mode on
        #[arg(long, default_value = "searchtool")]
        user_agent: String,
    },
}

fn open_resources(cli: &Cli) -> (Dictionary, SearchConfig) {
    let dict = match &cli.dict {
        Some(path) => Dictionary::open(path).unwrap_or_else(|e| {
            eprintln!("Failed to open dictionary at {}: {}", path.display(), e);
            process::exit(1);
        }),
        None => Dictionary::embedded(),
    };
    let config = match &cli.config {
        Some(path) => SearchConfig::open(path).unwrap_or_else(|e| {
            eprintln!("Failed to open config at {}: {}", path.display(), e);
            process::exit(1);
        }),
        None => SearchConfig::embedded(),
    };
    (dict, config)
}

fn main() {
    malt_search::trace_init::init_tracing();
    let cli = Cli::parse();
    let (dict, config) = open_resources(&cli);

    match &cli.command {
        Command::Translate { keyword } => {
            let normalized = normalize(keyword);
            let mut mapping = converter::convert(&dict, &normalized);
            println!("normalized: {}", normalized);
            println!("mapped:     {}", mapping.text);
            rewriter::rewrite(&mut mapping);
            println!("rewritten:  {}", mapping.text);
            if mapping.is_fully_mapped() {
                println!("status:     fully mapped");
            } else {
                println!("unmapped:   {}", mapping.unmapped.join(", "));
            }
        }

        Command::Url {
            destination,
            keyword,
        } => match prepare_search(&dict, &config, *destination, keyword) {
            Ok(prepared) => println!("{}", prepared.url),
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },

        Command::Search {
            destination,
            keyword,
            open,
            user_agent,
        } => {
            let service = SearchService::new(dict, config);
            let ip = service.lookup_ip();
            match service.search(*destination, keyword, &ip) {
                Ok(prepared) => {
                    println!("{}", prepared.url);
                    if *open {
                        dispatch(&ShellNavigator, &ClientEnv::new(user_agent), &prepared.url);
                    }
                }
                Err(e) => {
                    eprintln!("{e}");
                    process::exit(1);
                }
            }
        }
    }
}
