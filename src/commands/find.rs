use std::path::PathBuf;

use jsonpad_search::{Match, Query, SearchSession};
use serde_json::json;

use super::{format_match, read_document};
use crate::config::{AppConfig, QueryFlags};

#[derive(Debug, clap::Args)]
pub struct FindArgs {
    /// Document to search
    pub file: PathBuf,

    /// Text or regular expression to look for
    pub pattern: String,

    #[command(flatten)]
    pub flags: QueryFlags,

    /// Print matches as a JSON array
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &FindArgs, config: &AppConfig) -> anyhow::Result<()> {
    let text = read_document(&args.file)?;
    let query = config.query(&args.pattern, args.flags);
    print!("{}", render(&text, &query, args.json || config.json_output)?);
    Ok(())
}

fn render(text: &str, query: &Query, as_json: bool) -> anyhow::Result<String> {
    let mut session = SearchSession::new();
    let matches = session.search(text, query)?;

    if as_json {
        let entries: Vec<_> = matches.iter().map(match_to_json).collect();
        return Ok(format!("{}\n", serde_json::to_string_pretty(&entries)?));
    }

    let mut out = String::new();
    for m in matches {
        out.push_str(&format_match(m));
        out.push('\n');
    }
    let noun = if matches.len() == 1 { "match" } else { "matches" };
    out.push_str(&format!("{} {}\n", matches.len(), noun));
    Ok(out)
}

fn match_to_json(m: &Match) -> serde_json::Value {
    json!({
        "start": m.start,
        "end": m.end,
        "line": m.line,
        "column": m.column,
        "text": m.text,
    })
}
