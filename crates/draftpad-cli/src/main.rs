mod wordlist;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use draftpad_config::Config;
use draftpad_engine::{DecorationKind, EditorSession, sentence_at};
use tracing_subscriber::EnvFilter;
use wordlist::WordlistSpellchecker;

struct Args {
    draft: PathBuf,
    dictionary: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut draft = None;
    let mut dictionary = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dict" => {
                let path = args.next().context("--dict needs a path")?;
                dictionary = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            _ if draft.is_none() => draft = Some(PathBuf::from(arg)),
            other => bail!("unexpected argument: {other}"),
        }
    }

    Ok(Args {
        draft: draft.context("usage: draftpad <file> [--dict PATH]")?,
        dictionary,
    })
}

fn print_usage() {
    eprintln!("usage: draftpad <file> [--dict PATH]");
    eprintln!();
    eprintln!("Proofread a plain-text draft: flags words missing from the");
    eprintln!("dictionary and prints suggestions with sentence context.");
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = Config::load()
        .context("failed to load configuration")?
        .unwrap_or_default();

    let dictionary_path = args.dictionary.unwrap_or(config.dictionary_path.clone());
    let checker = WordlistSpellchecker::from_path(&dictionary_path)
        .with_context(|| format!("failed to load dictionary {}", dictionary_path.display()))?;
    tracing::debug!(words = checker.word_count(), "dictionary loaded");

    let text = std::fs::read_to_string(&args.draft)
        .with_context(|| format!("failed to read draft {}", args.draft.display()))?;

    let mut session = EditorSession::with_config(
        draftpad_engine::Document::from_plain_text(&text),
        draftpad_engine::CoachConfig {
            spellcheck: config.spellcheck.to_engine(),
            ..Default::default()
        },
    );
    session.run_spellcheck(&checker, Instant::now()).await;

    let flat = session.document().flat_text();
    let mut findings = 0usize;
    for decoration in session.decorations() {
        let DecorationKind::Misspelling { suggestions } = decoration.kind else {
            continue;
        };
        findings += 1;

        let word = session.document().text_between(decoration.range.clone());
        let from = session.document().flat_index_at(decoration.range.start);
        let bounds = sentence_at(&flat, from);
        let context = if bounds.is_empty() {
            word.clone()
        } else {
            flat[bounds.range()].trim().to_string()
        };

        println!("{word}: {context}");
        if suggestions.is_empty() {
            println!("    no suggestions");
        } else {
            println!("    try: {}", suggestions.join(", "));
        }
    }

    if findings == 0 {
        println!(
            "{} words checked, nothing to fix",
            session.word_count()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{findings} possible misspellings");
        Ok(ExitCode::FAILURE)
    }
}
