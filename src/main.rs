// CLI binary entry point for mp3meta
//
// This is the main entry point for the mp3meta command-line tool.

mod cli;

use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::commands::{command_detect, command_export_cover, command_frames, command_read, command_set};
use cli::{Commands, Config, OutputFormatter};

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "mp3meta=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(config.verbose);
    let formatter = OutputFormatter::new(config.format, config.quiet);

    match &config.command {
        Commands::Read { files, cover, output } => {
            command_read(files, *cover, output.as_deref(), &formatter)
        }
        Commands::Detect { files } => command_detect(files, &formatter),
        Commands::Frames { files } => command_frames(files, &formatter),
        Commands::Set {
            file,
            fields,
            tag_version,
            padding,
            output,
        } => command_set(file, fields, *tag_version, *padding, output.as_deref(), &formatter),
        Commands::ExportCover { file, output } => command_export_cover(file, output, &formatter),
    }
}
