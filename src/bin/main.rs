mod util;

use chrono::Datelike;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use zets::{DirectoryWalker, MatcherKind, QueryResultSet, ZetQueryEngine, ZetsConfig, index_page};

#[derive(Parser)]
#[command(name = "zets")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Zets root directory (default: $ZETS_DIR or ~/zets)
    #[clap(long, global = true, help = "Path to the zets root directory.")]
    root: Option<PathBuf>,
    /// Config file (default: the platform config directory)
    #[clap(long, global = true, help = "Path to a JSON config file.")]
    config: Option<PathBuf>,
    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

#[derive(Subcommand)]
enum Commands {
    /// Fuzzy search the lines of every note
    #[command(visible_alias = "q")]
    Query {
        /// Search terms, joined with spaces
        #[clap(required = true)]
        terms: Vec<String>,
        /// Matcher: subsequence or nucleo
        #[clap(
            long,
            help = "Line matcher to use: 'subsequence' tolerates small typos, 'nucleo' requires every character in order."
        )]
        matcher: Option<String>,
        #[clap(long, help = "Skip unreadable directories instead of failing.")]
        skip_unreadable: bool,
        /// Output results as pretty format instead of json text
        #[clap(
            long,
            help = "Output search results in pretty format instead of json text."
        )]
        pretty: bool,
    },
    /// Print the directory tree as json
    Tree {
        #[clap(long, help = "Skip unreadable directories instead of failing.")]
        skip_unreadable: bool,
    },
    /// Create <topic>/<year>/<note>/README.md
    #[command(visible_alias = "c")]
    Create {
        topic: String,
        note: String,
        #[clap(long, help = "Year directory to use (default: the current year).")]
        year: Option<i32>,
        #[clap(long, help = "Open the new note in your editor.")]
        edit: bool,
    },
    /// Write an index.html of the tree
    #[command(visible_alias = "s")]
    Serve {
        #[clap(long, help = "Where to write the page (default: <root>/index.html).")]
        output: Option<PathBuf>,
    },
    /// Clone a remote zets repository into the root
    Init {
        /// Repository URL
        url: String,
    },
}

fn validate_root_presence(root: &Path) -> anyhow::Result<()> {
    if !root.is_dir() {
        return Err(anyhow::anyhow!(
            "Zets directory '{}' does not exist. Run 'zets init <URL>' to clone one or 'zets create <TOPIC> <NOTE>' to start a new one.",
            root.display()
        ));
    }
    Ok(())
}

fn print_welcome(root: &Path) {
    println!("welcome to your zettelkasten control panel.");
    println!("your zets live in {}.", root.display());
    println!(
        "to create a new zet, use 'zets create <topic> <note>'. this creates <topic>/<year>/<note>/README.md."
    );
    println!("use 'zets query <keywords>' to search your zets.");
    println!("use 'zets serve' to write an index.html of your zets.");
}

fn print_pretty(query: &str, results: &QueryResultSet) {
    println!("Searching for: \"{}\"", query);
    if results.is_empty() {
        println!("No results found.");
        return;
    }

    println!(
        "Found {} matching line(s) in {} note(s):",
        results.total_components(),
        results.len()
    );
    println!();
    for result in results {
        println!("{}", result.path.bold().cyan());
        for line in &result.components {
            println!("   {}", line.green());
        }
        println!();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let mut config = ZetsConfig::resolve(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        config.root = root;
    }

    let Some(command) = cli.command else {
        print_welcome(&config.root);
        return Ok(());
    };

    match command {
        Commands::Query {
            terms,
            matcher,
            skip_unreadable,
            pretty,
        } => {
            validate_root_presence(&config.root)?;
            let query = zets::engines::join_terms(&terms).ok_or_else(|| {
                anyhow::anyhow!("Nothing to search for. Usage: zets query <TERMS>...")
            })?;
            let kind = match matcher {
                Some(name) => name.parse::<MatcherKind>()?,
                None => config.matcher,
            };
            config.skip_unreadable |= skip_unreadable;

            let mut engine = ZetQueryEngine::new(config.walk_options(), kind.build());
            let results = engine.query(&config.root, &terms)?;

            if pretty {
                print_pretty(&query, &results);
                return Ok(());
            }

            let json_output = serde_json::json!({
                "query": query,
                "matcher": kind,
                "results_count": results.len(),
                "results": results,
            });
            println!("{}", serde_json::to_string_pretty(&json_output)?);
        }
        Commands::Tree { skip_unreadable } => {
            validate_root_presence(&config.root)?;
            config.skip_unreadable |= skip_unreadable;
            let tree = DirectoryWalker::new(config.walk_options()).walk(&config.root)?;
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
        Commands::Create {
            topic,
            note,
            year,
            edit,
        } => {
            let year = year.unwrap_or_else(|| chrono::Local::now().year());
            let file =
                util::create_note(&config.root, &topic, &note, year, &config.walk_options())?;
            println!("Created {}", file.display());
            if edit {
                util::open_in_editor(&config.editor(), &file)?;
            }
        }
        Commands::Serve { output } => {
            validate_root_presence(&config.root)?;
            let tree = DirectoryWalker::new(config.walk_options()).walk(&config.root)?;
            let output = output.unwrap_or_else(|| config.root.join("index.html"));
            index_page::write(&tree, &output)?;
            println!("Wrote {}", output.display());
        }
        Commands::Init { url } => {
            util::clone_repository(&url, &config.root)?;
            println!("Your zets were cloned to {}", config.root.display());
        }
    }
    Ok(())
}
