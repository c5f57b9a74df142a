//! `ujson` CLI — validate, pretty-print, query, and edit JSON documents.
//!
//! ## Usage
//!
//! ```sh
//! # Pretty-print (stdin → stdout)
//! echo '{"name":"Alice","tags":["a"]}' | ujson format
//!
//! # Compact output from file to file
//! ujson format --compact -i data.json -o data.min.json
//!
//! # Read one value by dotted path
//! ujson get users.0.name -i data.json
//!
//! # Set a value (VALUE is itself JSON)
//! ujson set server.port 8080 -i config.json -o config.json
//! ujson set server.host '"example.org"' --access value-only -i config.json
//!
//! # Remove a member
//! ujson remove server.debug -i config.json
//!
//! # Validate and summarize
//! ujson check -i data.json
//! ```
//!
//! Set `RUST_LOG` (or pass `-v`) for diagnostics on stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;
use ujson_core::{Access, Kind, Node};

#[derive(Parser)]
#[command(name = "ujson", version, about = "Inspect and edit JSON documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and render it again
    Format {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit compact single-line JSON instead of the indented form
        #[arg(long)]
        compact: bool,
    },
    /// Print the value at a dotted path (e.g. `users.0.name`)
    Get {
        path: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Assign a JSON value at a dotted path and print the edited document
    Set {
        path: String,
        /// The new value, as JSON text
        value: String,
        /// Access level applied to the document
        #[arg(long, value_enum, default_value_t = AccessArg::All)]
        access: AccessArg,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Remove the object member at a dotted path and print the edited document
    Remove {
        path: String,
        /// Access level applied to the document
        #[arg(long, value_enum, default_value_t = AccessArg::All)]
        access: AccessArg,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Validate a document and summarize its top level
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AccessArg {
    Immutable,
    ValueOnly,
    All,
}

impl From<AccessArg> for Access {
    fn from(arg: AccessArg) -> Self {
        match arg {
            AccessArg::Immutable => Access::Immutable,
            AccessArg::ValueOnly => Access::ValueOnly,
            AccessArg::All => Access::All,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Format {
            input,
            output,
            compact,
        } => {
            let doc = load(input.as_deref(), Access::Immutable)?;
            let text = if compact {
                serde_json::to_string(&doc).context("Failed to serialize document")?
            } else {
                doc.render()
            };
            write_output(output.as_deref(), &text)?;
        }
        Commands::Get { path, input } => {
            let doc = load(input.as_deref(), Access::Immutable)?;
            let node = doc
                .path(&path)
                .with_context(|| format!("Failed to resolve path '{}'", path))?;
            write_output(None, &node.render_value())?;
        }
        Commands::Set {
            path,
            value,
            access,
            input,
            output,
        } => {
            let access = Access::from(access);
            let mut doc = load(input.as_deref(), access)?;
            let value = ujson_core::parse(&value, access).context("Failed to parse VALUE as JSON")?;
            doc.set_path(&path, value)
                .with_context(|| format!("Failed to set '{}'", path))?;
            write_output(output.as_deref(), &doc.render())?;
        }
        Commands::Remove {
            path,
            access,
            input,
            output,
        } => {
            let mut doc = load(input.as_deref(), Access::from(access))?;
            let removed = doc
                .remove_path(&path)
                .with_context(|| format!("Failed to remove '{}'", path))?;
            if removed.is_none() {
                tracing::warn!(%path, "no member to remove");
            }
            write_output(output.as_deref(), &doc.render())?;
        }
        Commands::Check { input } => {
            let doc = load(input.as_deref(), Access::Immutable)?;
            println!("{}", summarize(&doc));
        }
    }

    Ok(())
}

/// One-line description of a document's top level.
fn summarize(doc: &Node) -> String {
    match doc.kind() {
        Kind::Object => format!("valid object with {} member(s)", doc.len()),
        Kind::Array => format!("valid array with {} element(s)", doc.len()),
        kind => format!("valid {kind}"),
    }
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Read and parse the input document.
fn load(path: Option<&str>, access: Access) -> Result<Node> {
    let text = read_input(path)?;
    ujson_core::parse(&text, access).context("Failed to parse input JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
