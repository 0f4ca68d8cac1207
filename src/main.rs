use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use csv2json::{
    clipboard::NullClipboard,
    history::HistoryStore,
    session::Session,
    storage::FileStorage,
};
use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert CSV text to JSON and keep a local history of conversions"
)]
struct Args {
    /// History file, rewritten after every mutation.
    #[arg(long, default_value = "history.json", global = true)]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert CSV from FILE (or stdin) and print pretty JSON.
    Convert {
        /// CSV file to read; stdin when omitted.
        file: Option<PathBuf>,
    },
    /// List past conversions, newest last.
    History {
        /// Case-insensitive substring filter over name, CSV, and JSON.
        #[arg(long)]
        search: Option<String>,
        /// Dump the whole store as pretty JSON instead of a listing.
        #[arg(long)]
        dump: bool,
    },
    /// Print one entry's JSON (or its original CSV).
    Show {
        id: String,
        /// Print the raw CSV instead of the JSON.
        #[arg(long)]
        csv: bool,
    },
    /// Set an entry's label.
    Rename { id: String, name: String },
    /// Delete an entry.
    Remove { id: String },
}

fn main() -> Result<()> {
    let env =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    let store = HistoryStore::load(Box::new(FileStorage::new(&args.store)));
    let mut session = Session::new(store, Box::new(NullClipboard));

    match args.command {
        Command::Convert { file } => {
            let raw = read_input(file.as_deref())?;
            let json = session.convert(&raw)?;
            println!("{}", json);
        }

        Command::History { search, dump } => {
            if dump {
                println!("{}", serde_json::to_string_pretty(session.entries())?);
                return Ok(());
            }
            session.set_search_term(search.unwrap_or_default());
            let matches = session.matches();
            if matches.is_empty() {
                info!("no matching history entries");
                return Ok(());
            }
            for entry in matches {
                let label = if entry.name.is_empty() {
                    "(unnamed)"
                } else {
                    entry.name.as_str()
                };
                println!("{}  {}  {} rows", entry.id, label, entry.json.len());
            }
        }

        Command::Show { id, csv } => match session.get(&id) {
            Some(entry) if csv => println!("{}", entry.csv),
            Some(entry) => println!("{}", serde_json::to_string_pretty(&entry.json)?),
            None => bail!("no history entry with id `{}`", id),
        },

        Command::Rename { id, name } => {
            session.rename(&id, &name)?;
            info!(%id, "entry renamed");
        }

        Command::Remove { id } => {
            session.remove(&id)?;
            info!(%id, "entry removed");
        }
    }

    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading `{}`", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("reading CSV from stdin")?;
            Ok(raw)
        }
    }
}
