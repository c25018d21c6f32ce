//! daybook CLI - inspect and normalize journal record files

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use daybook::paths::file_stem;
use daybook::{Entry, Layout, Media, Person, Place, Record, RecordPath, Vault};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Plain-text journal records with a lossless frontmatter codec", long_about = None)]
struct Cli {
    /// Vault directory (defaults to current directory)
    #[arg(short = 'V', long, default_value = ".")]
    vault: PathBuf,

    /// Log decoding details
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that files survive a parse/serialize round trip
    Check {
        files: Vec<PathBuf>,
        #[arg(short, long)]
        kind: Option<Kind>,
    },

    /// Print a file in canonical form
    Fmt {
        file: PathBuf,
        #[arg(short, long)]
        kind: Option<Kind>,
        /// Rewrite the file in place
        #[arg(short, long)]
        write: bool,
    },

    /// Print a record as JSON
    Show {
        file: PathBuf,
        #[arg(short, long)]
        kind: Option<Kind>,
    },

    /// Print where a record belongs in the vault
    Path {
        file: PathBuf,
        #[arg(short, long)]
        kind: Option<Kind>,
        /// Move the file there if it is elsewhere
        #[arg(short, long = "move")]
        relocate: bool,
    },

    /// Clean a name the way new records are named
    Sanitize { name: String },

    /// List records of one kind
    List { kind: Kind },

    /// Decode a transcript range string to JSON
    Ranges { text: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Kind {
    Entry,
    Person,
    Place,
    Media,
}

impl Kind {
    /// Infer the kind from the folder a file sits in, or from an entry-style
    /// file name.
    fn infer(path: &Path, layout: &Layout, extension: &str) -> Option<Self> {
        for dir in path.ancestors().skip(1).filter_map(|p| p.file_name()?.to_str()) {
            if dir == layout.entries {
                return Some(Kind::Entry);
            } else if dir == layout.people {
                return Some(Kind::Person);
            } else if dir == layout.places {
                return Some(Kind::Place);
            } else if dir == layout.media {
                return Some(Kind::Media);
            }
        }

        let name = path.file_name()?.to_str()?;
        let stem = file_stem(name, extension);
        (stem.len() == 12 && stem.chars().all(|c| c.is_ascii_digit())).then_some(Kind::Entry)
    }
}

/// Run a generic command body for the record type matching `kind`
macro_rules! for_kind {
    ($kind:expr, $func:ident ( $($arg:expr),* )) => {
        match $kind {
            Kind::Entry => $func::<Entry>($($arg),*).await,
            Kind::Person => $func::<Person>($($arg),*).await,
            Kind::Place => $func::<Place>($($arg),*).await,
            Kind::Media => $func::<Media>($($arg),*).await,
        }
    };
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "daybook=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let vault = Vault::open(&cli.vault)?;

    match cli.command {
        Commands::Check { files, kind } => {
            let mut unstable = 0;
            for file in &files {
                let kind = resolve_kind(&vault, file, kind)?;
                if !for_kind!(kind, check_file(&vault, file))? {
                    unstable += 1;
                }
            }
            if unstable > 0 {
                anyhow::bail!("{} of {} file(s) are not stable", unstable, files.len());
            }
            Ok(())
        }
        Commands::Fmt { file, kind, write } => {
            let kind = resolve_kind(&vault, &file, kind)?;
            for_kind!(kind, format_file(&vault, &file, write))
        }
        Commands::Show { file, kind } => {
            let kind = resolve_kind(&vault, &file, kind)?;
            for_kind!(kind, show_file(&vault, &file))
        }
        Commands::Path { file, kind, relocate } => {
            let kind = resolve_kind(&vault, &file, kind)?;
            for_kind!(kind, show_path(&vault, &file, relocate))
        }
        Commands::Sanitize { name } => {
            println!("{}", daybook::sanitize_name(&name));
            Ok(())
        }
        Commands::List { kind } => for_kind!(kind, list_records(&vault)),
        Commands::Ranges { text } => {
            let ranges = daybook::transcript::decode(&text);
            println!("{}", serde_json::to_string_pretty(&ranges)?);
            Ok(())
        }
    }
}

fn resolve_kind(vault: &Vault, file: &Path, kind: Option<Kind>) -> anyhow::Result<Kind> {
    kind.or_else(|| Kind::infer(file, vault.layout(), &vault.config().extension))
        .with_context(|| format!("cannot tell the record kind of {:?}; pass --kind", file))
}

/// Round-trips a file twice and reports whether the second pass is a no-op
async fn check_file<R: Record>(vault: &Vault, file: &Path) -> anyhow::Result<bool> {
    let original = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {:?}", file))?;
    let record: R = vault.load(file).await?;
    let once = daybook::serialize(&record);

    let name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let reparsed: Option<R> = daybook::parse(&once, name);
    let stable = reparsed.map(|r| daybook::serialize(&r) == once).unwrap_or(false);

    let status = match (stable, once == original) {
        (false, _) => "UNSTABLE",
        (true, true) => "ok",
        (true, false) => "ok (not canonical)",
    };
    println!("{:<20} {}", status, file.display());
    Ok(stable)
}

async fn format_file<R: Record>(vault: &Vault, file: &Path, write: bool) -> anyhow::Result<()> {
    let record: R = vault.load(file).await?;
    if write {
        vault
            .write_to(&record, file)
            .await
            .with_context(|| format!("writing {:?}", file))?;
        println!("Formatted {}", file.display());
    } else {
        print!("{}", daybook::serialize(&record));
    }
    Ok(())
}

async fn show_file<R: Record + Serialize>(vault: &Vault, file: &Path) -> anyhow::Result<()> {
    let record: R = vault.load(file).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

async fn show_path<R: Record>(vault: &Vault, file: &Path, relocate: bool) -> anyhow::Result<()> {
    let record: R = vault.load(file).await?;
    let target = vault.location_of(&record);
    let extension = &vault.config().extension;

    if !relocate {
        println!("{}", target.relative(extension).display());
        return Ok(());
    }

    let previous = current_location(vault, file)?;
    if previous == target {
        println!("Already at {}", target.relative(extension).display());
        return Ok(());
    }
    let moved = vault.relocate(&record, &previous).await?;
    println!(
        "Moved {} -> {}",
        previous.relative(extension).display(),
        moved.relative(extension).display()
    );
    Ok(())
}

/// Location of an existing file relative to the vault root
fn current_location(vault: &Vault, file: &Path) -> anyhow::Result<RecordPath> {
    let absolute = if file.is_absolute() {
        file.to_path_buf()
    } else {
        std::env::current_dir()?.join(file)
    };
    let root = vault.root().canonicalize()?;
    let absolute = absolute
        .parent()
        .and_then(|p| p.canonicalize().ok())
        .zip(absolute.file_name())
        .map(|(dir, name)| dir.join(name))
        .unwrap_or(absolute);

    let relative = absolute
        .strip_prefix(&root)
        .with_context(|| format!("{:?} is not inside the vault", file))?;
    let name = relative
        .file_name()
        .and_then(|n| n.to_str())
        .context("file name is not valid UTF-8")?;
    let directory = relative.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(RecordPath::new(
        directory,
        file_stem(name, &vault.config().extension),
    ))
}

async fn list_records<R: Record>(vault: &Vault) -> anyhow::Result<()> {
    let records: Vec<R> = vault.list().await?;
    if records.is_empty() {
        println!("No {} records found.", R::KIND.as_str());
        return Ok(());
    }
    for record in &records {
        println!(
            "{:<40} {}",
            record.id(),
            vault.location_of(record).relative(&vault.config().extension).display()
        );
    }
    Ok(())
}
