// CLI configuration
use clap::{Parser, Subcommand, ValueEnum};

/// mp3meta - MP3 tag command-line tool
#[derive(Parser, Debug)]
#[command(name = "mp3meta")]
#[command(about = "Read and write ID3 tags and inspect MPEG frames in MP3 files", long_about = None)]
#[command(version)]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Quiet mode (suppress progress messages)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug logging unless RUST_LOG is set)
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Pretty,
    /// Compact JSON
    Json,
    /// Key-value pairs
    KeyValue,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read tags and audio summary from file(s); glob patterns are expanded
    Read {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<String>,

        /// Include the album image as base64
        #[arg(long)]
        cover: bool,

        /// Output to file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Report which tag versions file(s) carry
    Detect {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<String>,
    },

    /// List the ID3v2 frames of file(s)
    Frames {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<String>,
    },

    /// Set ID3v2 fields, creating a tag if the file has none
    Set {
        #[arg(value_name = "FILE")]
        file: String,

        #[command(flatten)]
        fields: FieldArgs,

        /// Tag version for a new tag (2, 3 or 4, default 4); an existing tag keeps its version
        #[arg(long, value_parser = clap::value_parser!(u8).range(2..=4))]
        tag_version: Option<u8>,

        /// Pad the tag for in-place edits
        #[arg(long)]
        padding: bool,

        /// Write to this path instead of overwriting the input
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Write the album image to a file
    ExportCover {
        #[arg(value_name = "FILE")]
        file: String,

        /// Output image path
        #[arg(short, long)]
        output: String,
    },
}

/// Field values accepted by `set`
#[derive(clap::Args, Debug, Default)]
pub struct FieldArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub artist: Option<String>,
    #[arg(long)]
    pub album: Option<String>,
    #[arg(long)]
    pub album_artist: Option<String>,
    #[arg(long)]
    pub year: Option<String>,
    #[arg(long)]
    pub track: Option<String>,
    /// Genre name; older tag versions need one from the ID3v1 list
    #[arg(long)]
    pub genre: Option<String>,
    #[arg(long)]
    pub comment: Option<String>,
    #[arg(long)]
    pub composer: Option<String>,
    #[arg(long)]
    pub bpm: Option<i32>,
    /// Windows Media Player rating, 0 to 5
    #[arg(long)]
    pub rating: Option<u8>,
    /// Image file to store as the front cover
    #[arg(long)]
    pub cover: Option<String>,
}
