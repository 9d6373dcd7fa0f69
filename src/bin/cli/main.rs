//! CLI tool for TIWUT containers.

mod commands;
mod exit_codes;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use exit_codes::ExitCode;

/// Browse and edit TIWUT containers
#[derive(Parser)]
#[command(name = "tiwut")]
#[command(author, version, about = "Browse and edit TIWUT containers", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Suppress status messages
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a container with the standard directory skeleton (alias: n)
    #[command(alias = "n")]
    Create {
        /// Container file to create
        container: PathBuf,

        /// Compression method for new entries
        #[arg(short = 'm', long, value_enum, default_value = "deflate")]
        method: CompressionMethod,
    },

    /// Show the container as a tree (alias: t)
    #[command(alias = "t")]
    Tree {
        /// Container file
        container: PathBuf,
    },

    /// List entries (alias: l)
    #[command(alias = "l")]
    List {
        /// Container file
        container: PathBuf,

        /// Show packed size and compression method
        #[arg(long)]
        technical: bool,
    },

    /// Print one entry to stdout
    Cat {
        /// Container file
        container: PathBuf,

        /// Entry name, e.g. meta/created_at.txt
        entry: String,

        /// Print binary payloads as raw bytes instead of a placeholder
        #[arg(long)]
        raw: bool,
    },

    /// Replace an entry's text, adding the entry if it is missing (alias: w)
    #[command(alias = "w")]
    Write {
        /// Container file
        container: PathBuf,

        /// Entry name
        entry: String,

        /// Read the new text from this file instead of stdin
        #[arg(short = 'i', long)]
        file: Option<PathBuf>,
    },

    /// Import an external file (alias: i)
    #[command(alias = "i")]
    Import {
        /// Container file
        container: PathBuf,

        /// File to import
        file: PathBuf,

        /// Target directory inside the container (default: data/)
        #[arg(long)]
        to: Option<String>,

        /// Overwrite an existing entry with the same name
        #[arg(long)]
        replace: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum CompressionMethod {
    Store,
    Deflate,
}

impl From<CompressionMethod> for tiwut::EntryCompression {
    fn from(method: CompressionMethod) -> Self {
        match method {
            CompressionMethod::Store => tiwut::EntryCompression::Stored,
            CompressionMethod::Deflate => tiwut::EntryCompression::Deflated,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(exit_codes::BAD_ARGS);
        }
        Err(e) => {
            // --help and --version
            let _ = e.print();
            std::process::exit(exit_codes::SUCCESS);
        }
    };

    let exit_code = match cli.command {
        Commands::Create { container, method } => {
            commands::create(&container, method, cli.format, cli.quiet)
        }

        Commands::Tree { container } => commands::tree(&container, cli.format),

        Commands::List {
            container,
            technical,
        } => commands::list(&container, technical, cli.format),

        Commands::Cat {
            container,
            entry,
            raw,
        } => commands::cat(&container, &entry, raw),

        Commands::Write {
            container,
            entry,
            file,
        } => commands::write(&container, &entry, file.as_deref(), cli.format, cli.quiet),

        Commands::Import {
            container,
            file,
            to,
            replace,
        } => commands::import(&commands::ImportConfig {
            container_path: &container,
            source: &file,
            target_dir: to.as_deref(),
            replace,
            format: cli.format,
            quiet: cli.quiet,
        }),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}
