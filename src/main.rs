//! # BASIC
//!
//! The BASIC programming language as it was in 1978.
//!

mod term;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Interactive line numbered BASIC.
#[derive(Parser, Debug)]
#[command(name = "basic", version, about)]
pub struct Args {
    /// Program to LOAD at start-up
    pub file: Option<String>,

    /// RUN the loaded program, then exit
    #[arg(long, requires = "file")]
    pub run: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Seed for RND
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Session name returned by NAME$
    #[arg(long, default_value = "main")]
    pub name: String,
}

fn main() {
    let args = Args::parse();
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    if let Err(error) = term::main(args) {
        eprintln!("{}", error);
        std::process::exit(1);
    }
}
