use std::path::PathBuf;

use jsonpad_search::{Query, SearchSession};

use super::{read_document, write_document};
use crate::config::{AppConfig, QueryFlags};

#[derive(Debug, clap::Args)]
pub struct ReplaceArgs {
    /// Document to edit
    pub file: PathBuf,

    /// Text or regular expression to replace
    pub pattern: String,

    /// Replacement text, inserted as-is
    pub replacement: String,

    #[command(flatten)]
    pub flags: QueryFlags,

    /// Replace every match instead of only the first
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Write the result back to FILE instead of printing it
    #[arg(long)]
    pub write: bool,
}

pub fn run(args: &ReplaceArgs, config: &AppConfig) -> anyhow::Result<()> {
    let text = read_document(&args.file)?;
    let query = config.query(&args.pattern, args.flags);
    let (replaced, count) = apply(&text, &query, &args.replacement, args.all)?;

    let noun = if count == 1 { "occurrence" } else { "occurrences" };
    eprintln!("Replaced {} {}", count, noun);

    if args.write {
        if count > 0 {
            write_document(&args.file, &replaced)?;
        }
    } else {
        print!("{}", replaced);
    }
    Ok(())
}

fn apply(
    text: &str,
    query: &Query,
    replacement: &str,
    all: bool,
) -> anyhow::Result<(String, usize)> {
    let mut session = SearchSession::new();
    Ok(session.replace(text, query, replacement, all)?)
}
