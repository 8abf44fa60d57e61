use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use jsonpad_search::{Query, SearchSession};

use super::{format_match, read_document, write_document};
use crate::config::AppConfig;

const HELP: &str = "\
Commands:
  /PATTERN   search for PATTERN
  n          next match
  p          previous match
  r TEXT     replace first match with TEXT
  R TEXT     replace all matches with TEXT
  h [TEXT]   show history, optionally filtered
  H          clear history
  o OPTION   toggle case, word or regex
  v          print the document
  ?          show this help
  q          quit
";

#[derive(Debug, clap::Args)]
pub struct NavigateArgs {
    /// Document to search
    pub file: PathBuf,

    /// Save replacements back to FILE when quitting
    #[arg(long)]
    pub write: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryOption {
    CaseSensitive,
    WholeWords,
    Regex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Search(String),
    Next,
    Previous,
    Replace(String),
    ReplaceAll(String),
    History(String),
    ClearHistory,
    Toggle(QueryOption),
    View,
    Help,
    Quit,
}

fn parse_command(line: &str) -> anyhow::Result<Command> {
    if let Some(pattern) = line.strip_prefix('/') {
        return Ok(Command::Search(pattern.to_string()));
    }

    let (name, rest) = match line.split_once(' ') {
        Some((name, rest)) => (name, rest),
        None => (line.trim_end(), ""),
    };

    Ok(match name {
        "n" => Command::Next,
        "p" => Command::Previous,
        "r" => Command::Replace(rest.to_string()),
        "R" => Command::ReplaceAll(rest.to_string()),
        "h" => Command::History(rest.trim().to_string()),
        "H" => Command::ClearHistory,
        "o" => Command::Toggle(match rest.trim() {
            "case" => QueryOption::CaseSensitive,
            "word" | "words" => QueryOption::WholeWords,
            "regex" => QueryOption::Regex,
            other => bail!("unknown option `{}` (expected case, word or regex)", other),
        }),
        "v" => Command::View,
        "?" | "help" => Command::Help,
        "q" | "quit" => Command::Quit,
        other => bail!("unknown command `{}`, type ? for help", other),
    })
}

/// One interactive editing session over an in-memory copy of a document.
struct Navigator {
    text: String,
    session: SearchSession,
    case_sensitive: bool,
    whole_words: bool,
    use_regex: bool,
    pattern: Option<String>,
    modified: bool,
}

impl Navigator {
    fn new(text: String, config: &AppConfig) -> Self {
        Self {
            text,
            session: SearchSession::with_max_history(config.max_history),
            case_sensitive: config.case_sensitive,
            whole_words: config.whole_words,
            use_regex: config.use_regex,
            pattern: None,
            modified: false,
        }
    }

    fn query(&self, pattern: &str) -> Query {
        Query::new(pattern)
            .with_case_sensitive(self.case_sensitive)
            .with_whole_words(self.whole_words)
            .with_regex(self.use_regex)
    }

    fn current_query(&self) -> anyhow::Result<Query> {
        match &self.pattern {
            Some(pattern) => Ok(self.query(pattern)),
            None => bail!("no active search, start one with /PATTERN"),
        }
    }

    /// Runs one command, returning the text to print. `None` means quit.
    fn execute(&mut self, command: Command) -> anyhow::Result<Option<String>> {
        let output = match command {
            Command::Search(pattern) => {
                let query = self.query(&pattern);
                self.pattern = Some(pattern);
                let count = self.session.search(&self.text, &query)?.len();
                format!("{} matches", count)
            }
            Command::Next => {
                let found = self.session.find_next(&self.text, None)?.map(format_match);
                self.describe_step(found)
            }
            Command::Previous => {
                let found = self.session.find_previous(&self.text, None)?.map(format_match);
                self.describe_step(found)
            }
            Command::Replace(replacement) => self.replace(&replacement, false)?,
            Command::ReplaceAll(replacement) => self.replace(&replacement, true)?,
            Command::History(filter) => {
                let entries = self.session.history_by_pattern(&filter);
                if entries.is_empty() {
                    "history is empty".to_string()
                } else {
                    entries
                        .iter()
                        .enumerate()
                        .map(|(i, query)| format!("{:>3}  {}", i + 1, describe_query(query)))
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            Command::ClearHistory => {
                self.session.clear_history();
                "history cleared".to_string()
            }
            Command::Toggle(option) => {
                let (name, enabled) = match option {
                    QueryOption::CaseSensitive => {
                        self.case_sensitive = !self.case_sensitive;
                        ("case", self.case_sensitive)
                    }
                    QueryOption::WholeWords => {
                        self.whole_words = !self.whole_words;
                        ("word", self.whole_words)
                    }
                    QueryOption::Regex => {
                        self.use_regex = !self.use_regex;
                        ("regex", self.use_regex)
                    }
                };
                // Results from the old options no longer apply.
                self.session.reset();
                format!("{} {}", name, if enabled { "on" } else { "off" })
            }
            Command::View => self.text.clone(),
            Command::Help => HELP.trim_end().to_string(),
            Command::Quit => return Ok(None),
        };
        Ok(Some(output))
    }

    fn describe_step(&self, found: Option<String>) -> String {
        match (found, self.session.position()) {
            (Some(found), Some((index, total))) => format!("({}/{}) {}", index, total, found),
            _ => "no matches".to_string(),
        }
    }

    fn replace(&mut self, replacement: &str, all: bool) -> anyhow::Result<String> {
        let query = self.current_query()?;
        let (replaced, count) = self.session.replace(&self.text, &query, replacement, all)?;
        if count > 0 {
            self.text = replaced;
            self.modified = true;
        }
        // Offsets from before the edit are stale; search the new text.
        let remaining = self.session.search(&self.text, &query)?.len();
        Ok(format!("replaced {}, {} matches remain", count, remaining))
    }
}

fn describe_query(query: &Query) -> String {
    let mut flags = Vec::new();
    if query.is_case_sensitive() {
        flags.push("case");
    }
    if query.is_whole_words() {
        flags.push("word");
    }
    if query.is_regex() {
        flags.push("regex");
    }

    if flags.is_empty() {
        query.pattern().to_string()
    } else {
        format!("{}  [{}]", query.pattern(), flags.join(", "))
    }
}

fn drive<R: BufRead, W: Write>(
    navigator: &mut Navigator,
    input: R,
    mut out: W,
) -> anyhow::Result<()> {
    for line in input.lines() {
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let result = parse_command(&line).and_then(|command| navigator.execute(command));
        match result {
            Ok(Some(output)) => writeln!(out, "{}", output)?,
            Ok(None) => break,
            Err(err) => writeln!(out, "error: {:#}", err)?,
        }
        out.flush()?;
    }
    Ok(())
}

pub fn run(args: &NavigateArgs, config: &AppConfig) -> anyhow::Result<()> {
    let text = read_document(&args.file)?;
    let mut navigator = Navigator::new(text, config);

    let stdin = io::stdin();
    drive(&mut navigator, stdin.lock(), io::stdout().lock())?;

    if navigator.modified {
        if args.write {
            write_document(&args.file, &navigator.text)?;
        } else {
            eprintln!("Document changed; rerun with --write to save replacements");
        }
    }
    Ok(())
}
