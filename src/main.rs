mod report;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Instant;

use tracing_subscriber::EnvFilter;
use versefind::{MatchConfig, MatchFlags, MemoryCorpus, Search};

const DEFAULT_LOOKAHEAD: u32 = 3;
const LOG_ENV: &str = "VERSEFIND_LOG";

fn main() {
    init_tracing();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    match run(config) {
        Ok(true) => {}
        // Already reported alongside the hits.
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

/// Returns `false` when the walk stopped on a lookup error.
fn run(config: CliConfig) -> versefind::Result<bool> {
    let corpus = MemoryCorpus::load(&config.corpus)?;
    let mut search = Search::with_config(&corpus, config.matching.clone());

    for reference in &config.references {
        search.add_reference(reference)?;
    }
    for reference in &config.contexts {
        search.add_contextual_reference(reference, config.left, config.right)?;
    }
    if !config.all.is_empty() {
        search.add_mandatory_keywords(&config.all)?;
    }
    if !config.any.is_empty() {
        search.add_one_of_keywords(&config.any)?;
    }
    if !config.none.is_empty() {
        search.add_none_of_keywords(&config.none)?;
    }
    for phrase in &config.exact {
        search.add_exact_expression(phrase)?;
    }
    for &(low, high) in &config.numbers {
        search.add_number_in_range(low, high)?;
    }

    let mut report = report::Report::new(config.color, config.matching.highlight.clone());
    report.header(&config.summary());

    let started = Instant::now();
    for hit in search.verses() {
        match hit {
            Ok(hit) => report.hit(&hit),
            Err(err) => {
                report.error(&err);
                report.footer(started.elapsed());
                return Ok(false);
            }
        }
    }
    report.footer(started.elapsed());
    Ok(true)
}

struct CliConfig {
    corpus: PathBuf,
    references: Vec<String>,
    contexts: Vec<String>,
    left: u32,
    right: u32,
    all: Vec<String>,
    any: Vec<String>,
    none: Vec<String>,
    exact: Vec<String>,
    numbers: Vec<(i64, Option<i64>)>,
    matching: MatchConfig,
    color: bool,
}

impl CliConfig {
    fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.references.is_empty() && self.contexts.is_empty() {
            parts.push("whole corpus".to_string());
        }
        parts.extend(self.references.iter().cloned());
        parts.extend(self.contexts.iter().map(|r| format!("{r} (-{}/+{})", self.left, self.right)));
        let rules = self.all.len() + self.any.len() + self.none.len() + self.exact.len() + self.numbers.len();
        if rules > 0 {
            parts.push(format!("{rules} rule(s)"));
        }
        parts.join(", ")
    }
}

fn parse_args() -> Result<CliConfig, String> {
    let mut corpus: Option<PathBuf> = None;
    let mut config = CliConfig {
        corpus: PathBuf::new(),
        references: Vec::new(),
        contexts: Vec::new(),
        left: DEFAULT_LOOKAHEAD,
        right: DEFAULT_LOOKAHEAD,
        all: Vec::new(),
        any: Vec::new(),
        none: Vec::new(),
        exact: Vec::new(),
        numbers: Vec::new(),
        matching: MatchConfig::default(),
        color: io::stdout().is_terminal(),
    };
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        // `--name=value` and `--name value` are equivalent.
        let (name, inline) = match arg.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |flag: &str| -> Result<String, String> {
            match inline.clone() {
                Some(value) => Ok(value),
                None => args.next().ok_or_else(|| format!("error: {flag} expects a value")),
            }
        };

        match name.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("versefind {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => config.color = true,
            "--no-color" => config.color = false,
            "--case-sensitive" => config.matching.flags.insert(MatchFlags::CASE_SENSITIVE),
            "--accent-sensitive" => config.matching.flags.insert(MatchFlags::ACCENT_SENSITIVE),
            "--partial-words" => config.matching.flags.remove(MatchFlags::WHOLE_WORD),
            "--corpus" | "-c" => {
                if corpus.is_some() {
                    return Err("error: corpus provided multiple times".to_string());
                }
                corpus = Some(PathBuf::from(value("--corpus")?));
            }
            "--ref" | "-r" => config.references.push(value("--ref")?),
            "--context" => config.contexts.push(value("--context")?),
            "--left" => config.left = parse_lookahead("--left", &value("--left")?)?,
            "--right" => config.right = parse_lookahead("--right", &value("--right")?)?,
            "--all" => config.all.push(value("--all")?),
            "--any" => config.any.push(value("--any")?),
            "--none" => config.none.push(value("--none")?),
            "--exact" => config.exact.push(value("--exact")?),
            "--number" => config.numbers.push(parse_number_range(&value("--number")?)?),
            "--highlight" => config.matching.highlight = Some(value("--highlight")?),
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => config.references.push(arg),
        }
    }

    config.corpus = corpus.ok_or_else(|| format!("error: no corpus provided\n\n{}", help_text()))?;
    Ok(config)
}

fn parse_lookahead(flag: &str, value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("error: invalid {flag} '{value}' (expected an integer >= 1)")),
    }
}

/// `low` or `low-high`.
fn parse_number_range(value: &str) -> Result<(i64, Option<i64>), String> {
    let invalid = || format!("error: invalid --number '{value}' (expected N or LOW-HIGH)");
    match value.split_once('-') {
        Some((low, high)) => {
            Ok((low.trim().parse().map_err(|_| invalid())?, Some(high.trim().parse().map_err(|_| invalid())?)))
        }
        None => Ok((value.trim().parse().map_err(|_| invalid())?, None)),
    }
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "versefind {version}

Search a book/chapter/verse corpus by reference and keywords.

Usage:
  versefind --corpus <file.json|file.xml> [OPTIONS] [<reference>...]

References use the canonical form `Book[ ch1[-ch2][.vr1[-vr2]]]`, for
example `Genèse 1.1-5` or `1 Rois *.17`. Without references the whole
corpus is searched.

Options:
  -c, --corpus <file>        JSON or XML corpus to search (required).
  -r, --ref <reference>      Add a reference (repeatable; bare arguments too).
  --context <reference>      Add the context window around a single verse.
  --left <n>                 Verses before a context verse. Default: {lookahead}
  --right <n>                Verses after a context verse. Default: {lookahead}
  --all <word>               Word every verse must contain (repeatable).
  --any <word>               Words of which one must appear (repeatable).
  --none <word>              Word no verse may contain (repeatable).
  --exact <phrase>           Phrase that may appear (joins --any).
  --number <n|low-high>      Number, in digits or French words (joins --any).
  --case-sensitive           Match case exactly.
  --accent-sensitive         Match accents exactly.
  --partial-words            Match keywords inside longer words.
  --highlight <marker>       Wrap matches with <marker>.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}              Log filter (e.g. `debug`). Default: warn

Exit codes:
  0  Success.
  1  Corpus, reference or rule error.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        lookahead = DEFAULT_LOOKAHEAD,
        log_env = LOG_ENV,
    )
}
