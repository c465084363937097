//! WordUp CLI
//!
//! Command-line interface for the vocabulary trainer.

use std::io::{Read, Write};
use std::path::PathBuf;

use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use wordup_cli::study::{self, print_prompt, print_summary};
use wordup_cli::{Config, SessionFile};
use wordup_core::{
    BoxLevel, Card, Chapter, ChapterExport, ChapterStats, ContextMode, Direction, DirectionPolicy, NewCard,
    PracticeMode, QueueRequest, SessionError, SessionStart, SessionState, Storage, StudyEngine, SystemClock,
};

/// WordUp - Leitner-box vocabulary trainer
#[derive(Parser)]
#[command(name = "wordup")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Learn vocabulary with Leitner boxes")]
#[command(long_about = "WordUp schedules bilingual word cards in five Leitner boxes.\n\nCorrect answers move a card up a box with a longer interval; wrong answers send it back to box 1.")]
struct Cli {
    /// Custom data directory (default: WORDUP_DATA_DIR or the platform data directory)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage chapters
    Chapter {
        #[command(subcommand)]
        action: ChapterCommand,
    },

    /// Manage cards
    Card {
        #[command(subcommand)]
        action: CardCommand,
    },

    /// Step through a review session one command at a time
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },

    /// Study a chapter interactively
    Study {
        /// Chapter id, id prefix or name
        chapter: String,
        #[command(flatten)]
        queue: QueueArgs,
        /// Continue the saved session instead of starting a new one
        #[arg(long)]
        resume: bool,
    },

    /// Show statistics for one chapter or all of them
    Stats {
        /// Chapter id, id prefix or name
        chapter: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Export a chapter with its cards and review history as JSON
    Export {
        /// Chapter id, id prefix or name
        #[arg(required_unless_present = "all")]
        chapter: Option<String>,
        /// Write every chapter into a ZIP backup instead
        #[arg(long, conflicts_with = "chapter")]
        all: bool,
        /// Output file (default: stdout, or a timestamped ZIP with --all)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import a chapter from an export file or every chapter from a backup
    Import {
        /// Path to the JSON document or ZIP backup
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum ChapterCommand {
    /// Create a chapter
    New {
        name: String,
        /// Language of the prompt side, e.g. "German"
        #[arg(long)]
        source: String,
        /// Language of the answer side, e.g. "English"
        #[arg(long)]
        target: String,
    },
    /// List chapters
    List,
    /// Show a chapter and its cards
    Show { chapter: String },
    /// Rename a chapter or change its languages
    Edit {
        chapter: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        target: Option<String>,
    },
    /// Delete a chapter with all cards and review history
    Delete {
        chapter: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Move every card back to box 1 and clear review history
    Reset {
        chapter: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CardCommand {
    /// Add a card to a chapter
    Add {
        chapter: String,
        source_word: String,
        target_word: String,
        /// Example sentence, expected answer in context mode
        #[arg(long)]
        example: Option<String>,
        /// Hint shown with context questions
        #[arg(long)]
        hint: Option<String>,
    },
    /// List the cards of a chapter
    List { chapter: String },
    /// Change a card's words; an empty --example or --hint removes it
    Edit {
        card_id: String,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        target: Option<String>,
        #[arg(long)]
        example: Option<String>,
        #[arg(long)]
        hint: Option<String>,
    },
    /// Delete a card and its review history
    Delete { card_id: String },
    /// Add cards from `source | target | example | hint` lines ("-" reads stdin)
    Import { chapter: String, file: PathBuf },
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Start a new session, replacing any saved one
    Start {
        chapter: String,
        #[command(flatten)]
        queue: QueueArgs,
    },
    /// Show the current question
    Show {
        /// Also print the expected answer
        #[arg(long)]
        reveal: bool,
    },
    /// Record an answer to the current question
    Answer {
        #[arg(value_enum)]
        result: AnswerArg,
        /// Card being answered (default: the current entry's card)
        #[arg(long)]
        card: Option<String>,
        /// Direction being answered (default: the current entry's direction)
        #[arg(long)]
        direction: Option<String>,
    },
    /// Summarize the session
    Complete,
    /// Replay the cards missed in the last session
    Recap { chapter: String },
    /// Discard the saved session
    End,
}

#[derive(Args, Debug, Clone)]
struct QueueArgs {
    /// Which cards to draw from
    #[arg(long, value_enum, default_value = "due")]
    mode: ModeArg,
    /// Box for box practice (1-5); implies --mode box
    #[arg(long = "box")]
    box_level: Option<u8>,
    #[arg(long, value_enum, default_value = "random")]
    direction: DirectionArg,
    #[arg(long, value_enum, default_value = "combined")]
    context: ContextArg,
    /// Number of cards (default: WORDUP_SESSION_LIMIT or 10, at most 50)
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ModeArg {
    Due,
    All,
    Box,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum DirectionArg {
    Random,
    SourceToTarget,
    TargetToSource,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ContextArg {
    Word,
    Context,
    Combined,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum AnswerArg {
    Correct,
    Wrong,
}

impl QueueArgs {
    fn to_request(&self, config: &Config) -> anyhow::Result<QueueRequest> {
        let practice_mode = match (self.mode, self.box_level) {
            (_, Some(n)) => PracticeMode::BoxSpecific(BoxLevel::try_from(n)?),
            (ModeArg::Box, None) => PracticeMode::BoxSpecific(BoxLevel::One),
            (ModeArg::Due, None) => PracticeMode::DueOnly,
            (ModeArg::All, None) => PracticeMode::AllCards,
        };

        Ok(QueueRequest {
            practice_mode,
            direction: match self.direction {
                DirectionArg::Random => DirectionPolicy::Random,
                DirectionArg::SourceToTarget => DirectionPolicy::SourceToTarget,
                DirectionArg::TargetToSource => DirectionPolicy::TargetToSource,
            },
            context_mode: match self.context {
                ContextArg::Word => ContextMode::Word,
                ContextArg::Context => ContextMode::Context,
                ContextArg::Combined => ContextMode::Combined,
            },
            limit: self.limit.unwrap_or(config.session_limit),
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    let config = Config::resolve(cli.data_dir)?;
    let storage = config.open_storage()?;

    match cli.command {
        Commands::Chapter { action } => run_chapter(&storage, action),
        Commands::Card { action } => run_card(&storage, action),
        Commands::Session { action } => run_session(&config, &storage, action),
        Commands::Study { chapter, queue, resume } => run_study(&config, &storage, &chapter, &queue, resume),
        Commands::Stats { chapter, json } => run_stats(&storage, chapter.as_deref(), json),
        Commands::Export { all: true, output, .. } => run_export_all(&storage, output),
        Commands::Export { chapter, output, .. } => {
            let chapter = chapter.ok_or_else(|| anyhow::anyhow!("A chapter or --all is required"))?;
            run_export(&storage, &chapter, output)
        }
        Commands::Import { file } => run_import(&storage, file),
    }
}

// ============================================================================
// CHAPTERS
// ============================================================================

fn run_chapter(storage: &Storage, action: ChapterCommand) -> anyhow::Result<()> {
    match action {
        ChapterCommand::New { name, source, target } => {
            let chapter = storage.create_chapter(&name, &source, &target)?;
            println!("{} {} ({})", "Created chapter".green(), chapter.name.bold(), chapter.id.dimmed());
        }
        ChapterCommand::List => {
            let chapters = storage.list_chapters()?;
            if chapters.is_empty() {
                println!("{}", "No chapters yet. Create one with `wordup chapter new`.".dimmed());
            }
            let now = Utc::now();
            for chapter in chapters {
                let stats = storage.chapter_stats(&chapter.id, now)?;
                println!(
                    "{}  {} ({} -> {})  {} cards, {} due",
                    short_id(&chapter.id).dimmed(),
                    chapter.name.bold(),
                    chapter.source_language,
                    chapter.target_language,
                    stats.total_cards,
                    stats.due_cards.to_string().yellow()
                );
            }
        }
        ChapterCommand::Show { chapter } => {
            let chapter = resolve_chapter(storage, &chapter)?;
            let stats = storage.chapter_stats(&chapter.id, Utc::now())?;
            print_chapter_stats(&chapter, &stats);
            println!();
            print_cards(&storage.list_cards(&chapter.id)?);
        }
        ChapterCommand::Edit { chapter, name, source, target } => {
            let chapter = resolve_chapter(storage, &chapter)?;
            let updated = storage.update_chapter(
                &chapter.id,
                name.as_deref().unwrap_or(&chapter.name),
                source.as_deref().unwrap_or(&chapter.source_language),
                target.as_deref().unwrap_or(&chapter.target_language),
            )?;
            println!("{} {}", "Updated chapter".green(), updated.name.bold());
        }
        ChapterCommand::Delete { chapter, yes } => {
            let chapter = resolve_chapter(storage, &chapter)?;
            if !yes && !confirm(&format!("Delete chapter \"{}\" with all its cards?", chapter.name))? {
                println!("{}", "Aborted.".yellow());
                return Ok(());
            }
            storage.delete_chapter(&chapter.id)?;
            println!("{} {}", "Deleted chapter".green(), chapter.name.bold());
        }
        ChapterCommand::Reset { chapter, yes } => {
            let chapter = resolve_chapter(storage, &chapter)?;
            if !yes && !confirm(&format!("Reset all progress in \"{}\"?", chapter.name))? {
                println!("{}", "Aborted.".yellow());
                return Ok(());
            }
            let reset = storage.reset_chapter(&chapter.id)?;
            println!("{} {} cards back in box 1", "Reset:".green(), reset);
        }
    }
    Ok(())
}

// ============================================================================
// CARDS
// ============================================================================

fn run_card(storage: &Storage, action: CardCommand) -> anyhow::Result<()> {
    match action {
        CardCommand::Add { chapter, source_word, target_word, example, hint } => {
            let chapter = resolve_chapter(storage, &chapter)?;
            let mut card = NewCard::new(source_word, target_word);
            card.example_sentence = example;
            card.context_hint = hint;
            let card = storage.create_card(&chapter.id, card)?;
            println!(
                "{} {} = {} ({})",
                "Added".green(),
                card.source_word.bold(),
                card.target_word,
                card.id.dimmed()
            );
        }
        CardCommand::List { chapter } => {
            let chapter = resolve_chapter(storage, &chapter)?;
            print_cards(&storage.list_cards(&chapter.id)?);
        }
        CardCommand::Edit { card_id, source, target, example, hint } => {
            let card = storage.get_card(&card_id)?;
            let content = NewCard {
                source_word: source.unwrap_or(card.source_word),
                target_word: target.unwrap_or(card.target_word),
                example_sentence: example.or(card.example_sentence),
                context_hint: hint.or(card.context_hint),
            };
            let card = storage.update_card_content(&card.id, content)?;
            println!("{} {} = {}", "Updated".green(), card.source_word.bold(), card.target_word);
        }
        CardCommand::Delete { card_id } => {
            storage.delete_card(&card_id)?;
            println!("{} {}", "Deleted card".green(), card_id.dimmed());
        }
        CardCommand::Import { chapter, file } => {
            let chapter = resolve_chapter(storage, &chapter)?;
            let text = if file.as_os_str() == "-" {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                text
            } else {
                std::fs::read_to_string(&file)?
            };
            let imported = storage.bulk_import(&chapter.id, &text)?;
            println!("{} {} cards into {}", "Imported".green(), imported, chapter.name.bold());
        }
    }
    Ok(())
}

fn print_cards(cards: &[Card]) {
    if cards.is_empty() {
        println!("{}", "No cards.".dimmed());
        return;
    }
    let now = Utc::now();
    for card in cards {
        let due = if card.is_due(now) { "due".yellow() } else { "".normal() };
        let context = if card.has_context() { "ctx".cyan() } else { "".normal() };
        println!(
            "{}  [box {}] {} = {}  {} {}",
            card.id.dimmed(),
            card.box_level,
            card.source_word.bold(),
            card.target_word,
            due,
            context
        );
    }
}

// ============================================================================
// SESSIONS
// ============================================================================

fn run_session(config: &Config, storage: &Storage, action: SessionCommand) -> anyhow::Result<()> {
    let engine = StudyEngine::new(storage, SystemClock);
    let file = config.session_file();

    match action {
        SessionCommand::Start { chapter, queue } => {
            let chapter = resolve_chapter(storage, &chapter)?;
            let request = queue.to_request(config)?;
            let Some(session) = start_new_session(&engine, &file, &chapter, &request)? else {
                return Ok(());
            };
            println!(
                "{} {} questions from {}",
                "Session started:".green(),
                session.total_count,
                chapter.name.bold()
            );
            print_prompt(&engine.current_prompt(Some(&session))?, &mut std::io::stdout())?;
        }
        SessionCommand::Show { reveal } => {
            let session = file.load()?;
            match engine.current_prompt(session.as_ref()) {
                Ok(prompt) => {
                    print_prompt(&prompt, &mut std::io::stdout())?;
                    if reveal {
                        println!("{}: {}", "Answer".white().bold(), prompt.answer.yellow());
                    }
                }
                Err(e) => report_out_of_sequence(e)?,
            }
        }
        SessionCommand::Answer { result, card, direction } => {
            let session = file.load()?;
            let Some(current) = session.as_ref() else {
                return report_out_of_sequence(SessionError::NoActiveSession);
            };
            let entry = match current.current_entry() {
                Ok(entry) => entry.clone(),
                Err(e) => return report_out_of_sequence(e),
            };
            let direction = match direction {
                Some(name) => Direction::parse_name(&name)
                    .ok_or_else(|| anyhow::anyhow!("Unknown direction '{}'", name))?,
                None => entry.direction,
            };
            let card_id = card.unwrap_or(entry.card_id);
            let correct = matches!(result, AnswerArg::Correct);

            let outcome = engine.submit_answer(session.as_ref(), &card_id, correct, direction)?;
            if correct {
                println!("{}", "Correct!".green().bold());
            } else {
                println!("{}", "Wrong.".red().bold());
            }
            if let Some(scored) = outcome.scored {
                println!("  box {} (next review {})", scored.box_level, scored.next_review.format("%Y-%m-%d"));
            }

            let session = outcome.session;
            if session.is_complete() {
                finish_session(session, &file)?;
            } else {
                file.save(&session)?;
                print_prompt(&engine.current_prompt(Some(&session))?, &mut std::io::stdout())?;
            }
        }
        SessionCommand::Complete => match file.load()? {
            Some(session) => {
                let (answered, total) = (session.current_index, session.total_count);
                if !session.is_complete() {
                    println!("{} {}/{} answered", "Session still running:".yellow(), answered, total);
                }
                finish_session(session, &file)?;
            }
            None => report_out_of_sequence(SessionError::NoActiveSession)?,
        },
        SessionCommand::Recap { chapter } => {
            let chapter = resolve_chapter(storage, &chapter)?;
            let prior = file.load()?;
            match engine.start_recap(prior.as_ref(), &chapter.id) {
                Ok(recap) => {
                    file.save(&recap)?;
                    println!("{} {} missed questions", "Recap started:".green(), recap.total_count);
                    print_prompt(&engine.current_prompt(Some(&recap))?, &mut std::io::stdout())?;
                }
                Err(e @ (SessionError::NoWrongCards | SessionError::ChapterMismatch { .. })) => {
                    file.clear()?;
                    println!("{}", e.to_string().yellow());
                }
                Err(SessionError::NoPriorSession) => {
                    println!("{}", SessionError::NoPriorSession.to_string().yellow());
                }
                Err(e) => return Err(e.into()),
            }
        }
        SessionCommand::End => {
            file.clear()?;
            println!("{}", "Session ended.".green());
        }
    }
    Ok(())
}

/// Build a session and store it, warning about the session it replaces
fn start_new_session<S, C>(
    engine: &StudyEngine<S, C>,
    file: &SessionFile,
    chapter: &Chapter,
    request: &QueueRequest,
) -> anyhow::Result<Option<SessionState>>
where
    S: wordup_core::CardStore,
    C: wordup_core::Clock,
{
    let session = match engine.start_session(&chapter.id, request)? {
        SessionStart::Started(session) => session,
        SessionStart::Empty(reason) => {
            println!("{}", reason.to_string().yellow());
            return Ok(None);
        }
    };

    if let Some(previous) = file.load()? {
        warn_overwrite(&previous);
    }
    file.save(&session)?;
    Ok(Some(session))
}

fn warn_overwrite(previous: &SessionState) {
    if !previous.wrong_log.is_empty() {
        tracing::warn!(
            chapter_id = %previous.chapter_id,
            missed = previous.wrong_log.len(),
            "Replacing a session with unresolved wrong answers"
        );
        eprintln!(
            "{} the previous session had {} missed card(s) that were never recapped; they are discarded",
            "warning:".yellow().bold(),
            previous.wrong_log.len()
        );
    } else if !previous.is_complete() {
        eprintln!(
            "{} the previous session stopped at {}/{} and is discarded",
            "warning:".yellow().bold(),
            previous.current_index,
            previous.total_count
        );
    }
}

fn finish_session(session: SessionState, file: &SessionFile) -> anyhow::Result<()> {
    let completion = session.finish()?;
    file.store(completion.retained.as_ref())?;
    print_summary(&completion.summary, &mut std::io::stdout())?;
    if let Some(retained) = &completion.retained
        && retained.is_complete()
    {
        println!("{}", "Run `wordup session recap <chapter>` to practice the missed cards.".dimmed());
    }
    Ok(())
}

/// Out-of-sequence calls are not failures; tell the learner what to do next
fn report_out_of_sequence(error: SessionError) -> anyhow::Result<()> {
    match error {
        SessionError::NoActiveSession => {
            println!("{}", "No active session. Start one with `wordup session start <chapter>`.".yellow());
        }
        SessionError::SessionComplete => {
            println!("{}", "Session is complete. Run `wordup session complete` for the summary.".yellow());
        }
        other => return Err(other.into()),
    }
    Ok(())
}

// ============================================================================
// STUDY
// ============================================================================

fn run_study(config: &Config, storage: &Storage, chapter: &str, queue: &QueueArgs, resume: bool) -> anyhow::Result<()> {
    let chapter = resolve_chapter(storage, chapter)?;
    let engine = StudyEngine::new(storage, SystemClock);
    let file = config.session_file();

    let saved = if resume {
        file.load()?
            .filter(|s| s.chapter_id == chapter.id && !s.is_complete())
    } else {
        None
    };

    let session = match saved {
        Some(session) => {
            println!("{} {}/{}", "Resuming at".green(), session.current_index + 1, session.total_count);
            session
        }
        None => {
            if resume {
                println!("{}", "No unfinished session for this chapter; starting a new one.".dimmed());
            }
            let request = queue.to_request(config)?;
            match start_new_session(&engine, &file, &chapter, &request)? {
                Some(session) => session,
                None => return Ok(()),
            }
        }
    };

    println!("{}", format!("=== {} ===", chapter.name).cyan().bold());
    println!("{}", "Type the answer, press Enter to reveal it, or q to stop.".dimmed());

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();
    study::run_with_recaps(&engine, session, &file, &mut input, &mut out)
}

// ============================================================================
// STATISTICS
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChapterReport<'a> {
    chapter: &'a Chapter,
    stats: &'a ChapterStats,
}

fn run_stats(storage: &Storage, chapter: Option<&str>, json: bool) -> anyhow::Result<()> {
    let now = Utc::now();

    if let Some(key) = chapter {
        let chapter = resolve_chapter(storage, key)?;
        let stats = storage.chapter_stats(&chapter.id, now)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&ChapterReport { chapter: &chapter, stats: &stats })?);
        } else {
            print_chapter_stats(&chapter, &stats);
        }
        return Ok(());
    }

    let dashboard = storage.dashboard(now)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    println!("{}", "=== WordUp Statistics ===".cyan().bold());
    println!();
    println!("{}: {}", "Chapters".white().bold(), dashboard.total_chapters);
    println!("{}: {}", "Total Cards".white().bold(), dashboard.total_cards);
    println!("{}: {}", "Due for Review".white().bold(), dashboard.total_due);
    Ok(())
}

fn print_chapter_stats(chapter: &Chapter, stats: &ChapterStats) {
    println!("{}", format!("=== {} ===", chapter.name).cyan().bold());
    println!("{} -> {}", chapter.source_language, chapter.target_language);
    println!();
    println!("{}: {}", "Total Cards".white().bold(), stats.total_cards);
    println!("{}: {}", "Due for Review".white().bold(), stats.due_cards);
    println!("{}: {}", "Reviews".white().bold(), stats.total_reviews);
    println!("{}: {:.1}%", "Success Rate".white().bold(), stats.success_rate);
    println!();
    println!("{}", "Box Distribution".yellow().bold());
    for level in BoxLevel::ALL {
        print_distribution_bar(
            &format!("Box {} ({}d)", level, level.interval_days()),
            stats.in_box(level),
            stats.total_cards,
        );
    }
}

/// Print a distribution bar
fn print_distribution_bar(label: &str, count: usize, total: usize) {
    let percentage = if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    let bar_width: usize = 30;
    let filled = ((percentage / 100.0) * bar_width as f64) as usize;
    let empty = bar_width.saturating_sub(filled);
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(empty));

    println!("  {:15} [{:30}] {:>4} ({:>5.1}%)", label, bar.green(), count, percentage);
}

// ============================================================================
// EXPORT / IMPORT
// ============================================================================

fn ensure_parent(path: &std::path::Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn run_export(storage: &Storage, chapter: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let chapter = resolve_chapter(storage, chapter)?;
    let json = storage.export_chapter(&chapter.id)?.to_json_pretty()?;

    match output {
        Some(path) => {
            ensure_parent(&path)?;
            std::fs::write(&path, format!("{json}\n"))?;
            eprintln!("{} {} to {}", "Exported".green(), chapter.name.bold(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

fn run_export_all(storage: &Storage, output: Option<PathBuf>) -> anyhow::Result<()> {
    let path = output.unwrap_or_else(|| {
        PathBuf::from(format!("wordup_full_backup_{}.zip", Utc::now().format("%Y%m%d_%H%M%S")))
    });
    ensure_parent(&path)?;

    let file = std::fs::File::create(&path)?;
    let (_, chapters) = storage.export_archive(file)?;
    eprintln!("{} {} chapters to {}", "Exported".green(), chapters, path.display());
    Ok(())
}

/// ZIP local file header magic
const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";

fn is_archive(file: &std::path::Path) -> std::io::Result<bool> {
    if file.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("zip")) {
        return Ok(true);
    }
    let mut magic = [0u8; 4];
    let mut handle = std::fs::File::open(file)?;
    match handle.read_exact(&mut magic) {
        Ok(()) => Ok(&magic == ZIP_MAGIC),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}

fn run_import_archive(storage: &Storage, file: PathBuf) -> anyhow::Result<()> {
    let outcome = storage.import_archive(std::fs::File::open(&file)?)?;

    for chapter in &outcome.imported {
        println!("  {} {}", "+".green(), chapter.name);
    }
    for entry in &outcome.skipped {
        println!("  {} {}", "skipped".yellow(), entry.dimmed());
    }
    println!(
        "{} {} chapters ({} skipped)",
        "Imported".green(),
        outcome.imported.len(),
        outcome.skipped.len()
    );
    Ok(())
}

fn run_import(storage: &Storage, file: PathBuf) -> anyhow::Result<()> {
    if is_archive(&file)? {
        return run_import_archive(storage, file);
    }

    let text = std::fs::read_to_string(&file)?;
    let doc = ChapterExport::from_json(&text)?;
    let imported = storage.import_chapter(&doc)?;
    println!(
        "{} {} with {} cards",
        "Imported".green(),
        imported.chapter.name.bold(),
        imported.cards.len()
    );
    Ok(())
}

// ============================================================================
// HELPERS
// ============================================================================

/// Find a chapter by exact id, unique id prefix or name
fn resolve_chapter(storage: &Storage, key: &str) -> anyhow::Result<Chapter> {
    if let Some(chapter) = storage.find_chapter(key)? {
        return Ok(chapter);
    }

    let key_lower = key.trim().to_lowercase();
    let mut matches: Vec<Chapter> = storage
        .list_chapters()?
        .into_iter()
        .filter(|c| c.id.starts_with(key) || c.name.to_lowercase() == key_lower)
        .collect();

    match matches.len() {
        0 => anyhow::bail!("Chapter not found: {}", key),
        1 => Ok(matches.remove(0)),
        n => anyhow::bail!("'{}' matches {} chapters; use the chapter id", key, n),
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
