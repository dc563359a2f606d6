use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Decoded script file (XML value tree)
    pub input: PathBuf,
    /// Command-syntax table (.json)
    #[arg(long, short)]
    pub syntax: PathBuf,
    /// Output directory for the JSON dump and listing
    #[arg(long, short)]
    pub out: Option<PathBuf>,
    /// Print the listing to stdout
    #[arg(long)]
    pub listing: bool,
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
