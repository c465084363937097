//! Interactive study loop
//!
//! Reads answers line by line. A typed answer that matches is counted
//! correct; anything else reveals the expected answer and the learner
//! grades themselves. `q` stops and leaves the session resumable.

use std::io::{BufRead, Write};

use colored::Colorize;
use wordup_core::{
    CardStore, Clock, Completion, PresentationMode, Prompt, SessionError, SessionState, SessionSummary,
    StudyEngine,
};

use crate::session_file::SessionFile;

/// How a round ended
#[derive(Debug)]
pub enum RoundEnd {
    /// Learner quit; the session was saved as it stood
    Quit,
    Finished(Completion),
}

enum Grade {
    Correct,
    Wrong,
    Quit,
}

/// Drive one session (or recap round) until it completes or the learner quits
///
/// The session file is rewritten after every answer, and cleared or kept
/// according to the completion rule once the round is done.
pub fn run_round<S, C, I, O>(
    engine: &StudyEngine<S, C>,
    mut session: SessionState,
    file: &SessionFile,
    input: &mut I,
    out: &mut O,
) -> anyhow::Result<RoundEnd>
where
    S: CardStore,
    C: Clock,
    I: BufRead,
    O: Write,
{
    while !session.is_complete() {
        let prompt = engine.current_prompt(Some(&session))?;
        let grade = ask(&prompt, input, out)?;

        let correct = match grade {
            Grade::Quit => {
                file.save(&session)?;
                writeln!(out, "{}", "Session saved. Resume with `wordup study --resume`.".dimmed())?;
                return Ok(RoundEnd::Quit);
            }
            Grade::Correct => true,
            Grade::Wrong => false,
        };

        let outcome = engine.submit_answer(Some(&session), &prompt.card_id, correct, prompt.direction)?;
        if let Some(scored) = outcome.scored {
            writeln!(
                out,
                "  {} box {} (next review {})",
                "->".dimmed(),
                scored.box_level,
                scored.next_review.format("%Y-%m-%d")
            )?;
        }
        session = outcome.session;
        file.save(&session)?;
    }

    let completion = session.finish()?;
    file.store(completion.retained.as_ref())?;
    print_summary(&completion.summary, out)?;

    Ok(RoundEnd::Finished(completion))
}

/// Run rounds back to back, offering a recap after each one with misses
pub fn run_with_recaps<S, C, I, O>(
    engine: &StudyEngine<S, C>,
    session: SessionState,
    file: &SessionFile,
    input: &mut I,
    out: &mut O,
) -> anyhow::Result<()>
where
    S: CardStore,
    C: Clock,
    I: BufRead,
    O: Write,
{
    let chapter_id = session.chapter_id.clone();
    let mut next = Some(session);

    while let Some(session) = next.take() {
        let completion = match run_round(engine, session, file, input, out)? {
            RoundEnd::Quit => return Ok(()),
            RoundEnd::Finished(completion) => completion,
        };
        if !completion.summary.has_wrong {
            return Ok(());
        }

        let question = format!("Recap {} missed card(s)? [y/N] ", completion.summary.wrong_count);
        if !confirm(&question, input, out)? {
            return Ok(());
        }

        match engine.start_recap(completion.retained.as_ref(), &chapter_id) {
            Ok(recap) => {
                writeln!(out, "{}", "=== Recap ===".yellow().bold())?;
                next = Some(recap);
            }
            Err(e @ (SessionError::NoWrongCards | SessionError::ChapterMismatch { .. })) => {
                file.clear()?;
                writeln!(out, "{}", e.to_string().yellow())?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

pub fn print_prompt<O: Write>(prompt: &Prompt, out: &mut O) -> std::io::Result<()> {
    let kind = match prompt.mode {
        PresentationMode::Word => "word",
        PresentationMode::Context => "context",
    };
    writeln!(out)?;
    writeln!(
        out,
        "{} {}",
        format!("[{}/{}]", prompt.position, prompt.total).cyan().bold(),
        format!("({kind}, {})", prompt.direction).dimmed()
    )?;
    writeln!(out, "{}: {}", prompt.question_language.white().bold(), prompt.question)?;
    if let Some(hint) = &prompt.context_hint {
        writeln!(out, "{}: {}", "Hint".white().bold(), hint)?;
    }
    Ok(())
}

pub fn print_summary<O: Write>(summary: &SessionSummary, out: &mut O) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=== Session Complete ===".cyan().bold())?;
    writeln!(
        out,
        "{}: {}/{} ({:.1}%)",
        "Correct".white().bold(),
        summary.correct_count,
        summary.total_count,
        summary.accuracy
    )?;
    if summary.has_wrong {
        writeln!(out, "{}: {}", "Missed".white().bold(), summary.wrong_count.to_string().red())?;
    } else {
        writeln!(out, "{}", "No mistakes!".green())?;
    }
    Ok(())
}

fn ask<I: BufRead, O: Write>(prompt: &Prompt, input: &mut I, out: &mut O) -> anyhow::Result<Grade> {
    print_prompt(prompt, out)?;
    write!(out, "{} ", format!("{}?", prompt.answer_language).white().bold())?;
    out.flush()?;

    let Some(line) = read_line(input)? else {
        return Ok(Grade::Quit);
    };
    if line.eq_ignore_ascii_case("q") {
        return Ok(Grade::Quit);
    }

    if !line.is_empty() && answers_match(&line, &prompt.answer) {
        writeln!(out, "{}", "Correct!".green().bold())?;
        return Ok(Grade::Correct);
    }

    writeln!(out, "{}: {}", "Answer".white().bold(), prompt.answer.yellow())?;
    let knew = confirm("Did you know it? [y/N] ", input, out)?;
    Ok(if knew { Grade::Correct } else { Grade::Wrong })
}

fn confirm<I: BufRead, O: Write>(question: &str, input: &mut I, out: &mut O) -> anyhow::Result<bool> {
    write!(out, "{}", question)?;
    out.flush()?;
    let answer = read_line(input)?.unwrap_or_default().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Next trimmed line, `None` at end of input
fn read_line<I: BufRead>(input: &mut I) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn answers_match(given: &str, expected: &str) -> bool {
    let normalize = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    normalize(given) == normalize(expected)
}
