use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "lectern",
    version,
    about = "Read a bilingual liturgical program (lessons, carols, prayers) in the terminal.",
    long_about = None
)]
pub struct Cli {
    /// Program markup to display instead of the bundled one
    #[clap(short, long, value_name = "FILE")]
    pub program: Option<PathBuf>,

    /// Translation dictionaries to use instead of the bundled ones
    #[clap(short, long, value_name = "FILE")]
    pub translations: Option<PathBuf>,

    /// Use a specific configuration file
    #[clap(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable debug output
    #[clap(long)]
    pub debug: bool,

    /// Print every section as plain text and exit
    #[clap(short, long)]
    pub dump: bool,

    /// Language to dump in; never stored
    #[clap(short, long, value_name = "CODE", requires = "dump")]
    pub lang: Option<String>,

    /// Forget the stored language and exit
    #[clap(long)]
    pub reset_language: bool,

    /// Keep preferences in memory only
    #[clap(long)]
    pub no_persist: bool,
}
