use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "lrc-card")]
#[command(about = "Parse LRC lyrics, find the active line, and play lyric cards.")]
pub struct Args {
    /// Path to config TOML (defaults to ./config.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse an LRC file and render it in another format
    Parse(ParseCmd),
    /// Print the line that is active at a given time
    Lookup(LookupCmd),
    /// Step through a song and print each line as it becomes active
    Play(PlayCmd),
    /// Browse a song catalog (db.json)
    Catalog(CatalogCmd),
    /// Print the effective default config as TOML and exit
    PrintDefaultConfig,
}

#[derive(Debug, Parser)]
pub struct ParseCmd {
    /// Input LRC path, or '-' for stdin
    pub input: String,

    /// Output file path (optional)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Target format
    #[arg(long, value_enum)]
    pub to: Format,

    /// Write to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Allow overwriting output file
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Debug, Parser)]
pub struct LookupCmd {
    /// Input LRC path, or '-' for stdin
    pub input: String,

    /// Playback position: milliseconds or m:ss[.fff]
    #[arg(long)]
    pub at: String,
}

#[derive(Debug, Parser)]
pub struct PlayCmd {
    /// Input LRC path ('-' for stdin), or a song id when --catalog is given
    pub input: String,

    /// Read the song from this catalog instead of an LRC file
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Track length in seconds (overrides catalog and config)
    #[arg(long)]
    pub duration_sec: Option<u64>,

    /// Start position: milliseconds or m:ss[.fff]
    #[arg(long)]
    pub from: Option<String>,

    /// Pace output by the wall clock instead of printing immediately
    #[arg(long)]
    pub realtime: bool,
}

#[derive(Debug, Parser)]
pub struct CatalogCmd {
    /// Catalog JSON path
    pub db: PathBuf,

    #[command(subcommand)]
    pub action: CatalogAction,
}

#[derive(Debug, Subcommand)]
pub enum CatalogAction {
    /// List artists with their song counts
    Artists,
    /// List the songs of one artist
    Songs {
        /// Artist (singer) id
        artist_id: String,
    },
    /// Render the lyrics of one song
    Lyrics {
        /// Song id
        song_id: String,

        /// Target format
        #[arg(long, value_enum, default_value = "txt")]
        to: Format,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Format {
    Json,
    Tsv,
    Txt,
    Srt,
    Lrc,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Tsv => "tsv",
            Format::Txt => "txt",
            Format::Srt => "srt",
            Format::Lrc => "lrc",
        }
    }
}
