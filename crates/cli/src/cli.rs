use clap::{Parser, Subcommand};

/// linkmill — scheduled link scraper.
#[derive(Parser, Debug)]
#[command(name = "linkmill", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one evaluation pass: scrape every service whose pattern triggers now.
    Tick,
    /// Dry run: print the evaluation result per service without fetching.
    Plan {
        /// Evaluate as if "now" were this instant (YYYY-MM-DDTHH:MM:SS).
        #[arg(long)]
        now: Option<String>,
    },
    /// Merge daily TSV files into the combined file, dropping duplicate urls.
    Merge,
    /// Upload TSV files to the configured S3 bucket.
    Export,
}
