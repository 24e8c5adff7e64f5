//! The `wordloop play` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use wordloop_core::audio::AudioResolver;
use wordloop_core::loader::PackageSource;
use wordloop_core::mastery::{AnswerEffect, MASTERY_THRESHOLD};
use wordloop_core::model::Language;
use wordloop_core::session::{DrillSession, NextQuestion, QuestionView, Selection};
use wordloop_providers::{create_resolver, load_config_from};

use super::package_source;

type Session = DrillSession<ChaCha8Rng>;
type InputLines = Lines<BufReader<Stdin>>;

/// One line of learner input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PlayCommand {
    /// 1-based option number.
    Select(usize),
    Replay,
    Remove,
    Restart,
    Language(String),
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> PlayCommand {
    let line = line.trim();
    if let Ok(n) = line.parse::<usize>() {
        return PlayCommand::Select(n);
    }
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("r"), None) => PlayCommand::Replay,
        (Some("d"), None) => PlayCommand::Remove,
        (Some("s"), None) => PlayCommand::Restart,
        (Some("l"), Some(code)) => PlayCommand::Language(code.to_string()),
        (Some("h" | "?"), None) => PlayCommand::Help,
        (Some("q"), None) => PlayCommand::Quit,
        _ => PlayCommand::Unknown(line.to_string()),
    }
}

fn print_help() {
    println!("Commands: <number> pick a picture, r replay, d remove word, s restart,");
    println!("          l <de|ja|es|en> change language, h help, q quit");
}

/// Next non-empty command, or `None` at end of input.
async fn read_command(lines: &mut InputLines) -> Result<Option<PlayCommand>> {
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        if !line.trim().is_empty() {
            return Ok(Some(parse_command(&line)));
        }
    }
    Ok(None)
}

async fn play_audio(session: &mut Session, resolver: &AudioResolver) {
    if let Some(job) = session.prepare_audio() {
        let report = resolver.resolve(job).await;
        session.finish_audio(report);
    }
}

fn describe(effect: AnswerEffect) -> String {
    match effect {
        AnswerEffect::Advanced { mastered: true, .. } => "Mastered.".to_string(),
        AnswerEffect::Advanced { level, .. } => format!("Level {level}/{MASTERY_THRESHOLD}."),
        AnswerEffect::Held { level } => format!("Level stays at {level} after a slip."),
        AnswerEffect::Wrong | AnswerEffect::Unknown => String::new(),
    }
}

fn show_question(view: &QuestionView, source: &PackageSource) {
    println!();
    println!("{}   [{}]", view.display, view.status);
    println!("{}", view.progress);
    for (i, option) in view.options.iter().enumerate() {
        println!("  {}) {}", i + 1, source.resolve_image(&option.image).display());
    }
}

/// Returns `true` if the session now runs in the new language.
fn switch_language(session: &mut Session, source: &PackageSource, code: &str) -> bool {
    let language = match code.parse::<Language>() {
        Ok(language) => language,
        Err(e) => {
            println!("{e}");
            return false;
        }
    };
    match session.change_language(source, language) {
        Ok(()) => {
            println!(
                "Switched to {} ({} words).",
                language.label(),
                session.sequence().len()
            );
            true
        }
        Err(e) => {
            println!("Could not switch language: {e}");
            false
        }
    }
}

pub async fn execute(
    language: Option<Language>,
    package: Option<PathBuf>,
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    silent: bool,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let language = language.unwrap_or(config.default_language);
    let source = package_source(&config.packages_dir, package.as_deref(), language);
    let resolver = create_resolver(&config, silent)?;

    let rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut session = DrillSession::start(&source, language, config.session_settings(), rng)
        .with_context(|| format!("failed to start a {} session", language.label()))?;
    tracing::debug!(session = %session.id(), "interactive session ready");

    println!(
        "wordloop: {} ({} words)",
        language.label(),
        session.sequence().len()
    );
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let view = match session.next_question()? {
            NextQuestion::Question(view) => view,
            NextQuestion::Complete => {
                println!();
                println!("All words mastered! {}", session.progress());
                println!("Type `s` to start over, `l <code>` to switch language or `q` to quit.");
                loop {
                    match read_command(&mut lines).await? {
                        Some(PlayCommand::Restart) => {
                            session.restart();
                            break;
                        }
                        Some(PlayCommand::Language(code)) => {
                            if switch_language(&mut session, &source, &code) {
                                break;
                            }
                        }
                        Some(PlayCommand::Quit) | None => return Ok(()),
                        Some(_) => println!("Type `s`, `l <code>` or `q`."),
                    }
                }
                continue;
            }
        };

        show_question(&view, &source);
        play_audio(&mut session, &resolver).await;

        loop {
            let Some(command) = read_command(&mut lines).await? else {
                return Ok(());
            };
            match command {
                PlayCommand::Select(number) => {
                    let selection = match number.checked_sub(1) {
                        Some(index) => session.select_option(index),
                        None => Selection::Invalid,
                    };
                    match selection {
                        Selection::Correct { effect, progress } => {
                            println!("Correct! {}", describe(effect));
                            println!("{progress}");
                            break;
                        }
                        Selection::Wrong { key } => {
                            let shown = session
                                .catalog()
                                .get(&key)
                                .map(|w| w.display.clone())
                                .unwrap_or(key);
                            println!("No, that one is \"{shown}\". Try again.");
                        }
                        Selection::AlreadyChecked => println!("You already tried that one."),
                        Selection::Locked => println!("Wait for the audio to finish."),
                        Selection::Invalid | Selection::Answered => {
                            println!("Pick a number from 1 to {}.", view.options.len())
                        }
                    }
                }
                PlayCommand::Replay => play_audio(&mut session, &resolver).await,
                PlayCommand::Remove => {
                    if session.remove_current_word() {
                        println!("Removed \"{}\". {}", view.display, session.progress());
                    }
                    break;
                }
                PlayCommand::Restart => {
                    session.restart();
                    println!("Starting over.");
                    break;
                }
                PlayCommand::Language(code) => {
                    if switch_language(&mut session, &source, &code) {
                        break;
                    }
                }
                PlayCommand::Help => print_help(),
                PlayCommand::Quit => return Ok(()),
                PlayCommand::Unknown(input) => {
                    println!("Unknown command `{input}`. Type `h` for help.")
                }
            }
        }
    }
}
