//! Terminal host for the bereavement triage.
//!
//! Usage: `afterlife-triage [SESSION_KEY]`
//!
//! Passing a key resumes that session if it was saved. At any prompt,
//! `back` goes to the previous question and `quit` leaves with progress saved.

use std::error::Error;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::info;

use afterlife_triage::adapters::{FileSessionStore, InMemorySessionStore, TracingOutcomeSink};
use afterlife_triage::application::{
    GoBackCommand, GoBackHandler, StartTriageCommand, StartTriageHandler, SubmitAnswerCommand,
    SubmitAnswerHandler, TriageCommandError, TriageRegistry, TriageStep,
};
use afterlife_triage::config::{init_tracing, StorageBackend, TriageConfig};
use afterlife_triage::domain::foundation::SessionKey;
use afterlife_triage::domain::triage::catalog::standard_graph;
use afterlife_triage::domain::triage::{
    AnswerValue, QuestionKind, QuestionView, TriageCompleted, WizardError,
};
use afterlife_triage::ports::{SessionStore, TriageOutcomeSink};

enum Input {
    Answer(AnswerValue),
    Back,
    Quit,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = TriageConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging)?;

    let store: Arc<dyn SessionStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemorySessionStore::new()),
        StorageBackend::File => Arc::new(FileSessionStore::new(&config.storage.data_dir)),
    };
    let sink: Arc<dyn TriageOutcomeSink> = Arc::new(TracingOutcomeSink);
    let registry = Arc::new(
        TriageRegistry::new(standard_graph(), store).with_policy(config.integrity_policy()),
    );

    let start = StartTriageHandler::new(Arc::clone(&registry));
    let submit = SubmitAnswerHandler::new(Arc::clone(&registry), Arc::clone(&sink));
    let back = GoBackHandler::new(Arc::clone(&registry), sink);

    let requested = std::env::args().nth(1).map(SessionKey::new).transpose()?;
    let started = start
        .handle(StartTriageCommand {
            session_key: requested,
        })
        .await?;
    let key = started.session_key;
    info!(session_key = %key, resumed = started.resumed, "terminal triage started");

    let mut out = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    if started.resumed {
        write(&mut out, "Picking up where you left off.\n").await?;
    }
    write(&mut out, &format!("Session: {}\n", key)).await?;

    let mut view = started.question;
    loop {
        render(&mut out, &view).await?;
        let input = match read_input(&mut lines, &view).await? {
            Some(input) => input,
            None => {
                write(&mut out, "Please choose one of the listed options.\n").await?;
                continue;
            }
        };

        let step = match input {
            Input::Quit => {
                write(&mut out, &format!("Progress saved. Resume with: {}\n", key)).await?;
                return Ok(());
            }
            Input::Back => {
                back.handle(GoBackCommand {
                    session_key: key.clone(),
                })
                .await
            }
            Input::Answer(value) => {
                submit
                    .handle(SubmitAnswerCommand {
                        session_key: key.clone(),
                        value,
                    })
                    .await
            }
        };

        match step {
            Ok(TriageStep::Question(next)) => view = next,
            Ok(TriageStep::Completed(event)) => {
                print_summary(&mut out, &event).await?;
                return Ok(());
            }
            Ok(TriageStep::Exited(_)) => {
                write(&mut out, "Leaving the questionnaire.\n").await?;
                return Ok(());
            }
            Err(TriageCommandError::Wizard(WizardError::Validation(err))) => {
                write(&mut out, &format!("{}\n", err)).await?;
            }
            Err(err) => return Err(err.into()),
        }
    }
}

async fn write(out: &mut tokio::io::Stdout, text: &str) -> std::io::Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.flush().await
}

async fn render(out: &mut tokio::io::Stdout, view: &QuestionView) -> std::io::Result<()> {
    let mut text = format!("\n[{}] {}\n", view.step_number, view.prompt);
    if let Some(description) = &view.description {
        text.push_str(&format!("    {}\n", description));
    }
    match view.kind {
        QuestionKind::SingleChoice => {
            for (index, option) in view.options.iter().enumerate() {
                let marker = match &view.previous_answer {
                    Some(AnswerValue::Text(previous)) if *previous == option.value => " *",
                    _ => "",
                };
                text.push_str(&format!("  {}. {}{}\n", index + 1, option.label, marker));
            }
        }
        QuestionKind::FreeText => {
            if let Some(placeholder) = &view.placeholder {
                text.push_str(&format!("  ({})\n", placeholder));
            }
            if let Some(previous) = &view.previous_answer {
                text.push_str(&format!("  Previously: {}\n", previous));
            }
        }
        QuestionKind::Boolean => text.push_str("  yes / no\n"),
    }
    if view.can_go_back {
        text.push_str("  (type 'back' to go back)\n");
    }
    text.push_str("> ");
    write(out, &text).await
}

// Returns None when the line cannot be mapped onto the question.
async fn read_input(
    lines: &mut Lines<BufReader<Stdin>>,
    view: &QuestionView,
) -> std::io::Result<Option<Input>> {
    let Some(line) = lines.next_line().await? else {
        return Ok(Some(Input::Quit));
    };
    let line = line.trim();
    match line {
        "quit" | "exit" => return Ok(Some(Input::Quit)),
        "back" => return Ok(Some(Input::Back)),
        _ => {}
    }

    let input = match view.kind {
        QuestionKind::SingleChoice => line
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| view.options.get(index))
            .map(|option| Input::Answer(AnswerValue::from(option.value.as_str()))),
        QuestionKind::FreeText => Some(Input::Answer(AnswerValue::from(line))),
        QuestionKind::Boolean => match line.to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(Input::Answer(AnswerValue::Flag(true))),
            "n" | "no" => Some(Input::Answer(AnswerValue::Flag(false))),
            _ => None,
        },
    };
    Ok(input)
}

async fn print_summary(
    out: &mut tokio::io::Stdout,
    event: &TriageCompleted,
) -> std::io::Result<()> {
    let summary = &event.summary;
    let mut text = String::from("\nThank you. Here is what we will base your guidance on:\n");
    if let Some(jurisdiction) = summary.jurisdiction {
        text.push_str(&format!(
            "  Jurisdiction: {} (register within {} days; {})\n",
            jurisdiction.display_name(),
            jurisdiction.registration_deadline_days(),
            jurisdiction.probate_term()
        ));
        if !jurisdiction.tell_us_once_available() {
            text.push_str("  Tell Us Once is not available here.\n");
        }
    }
    if summary.needs_urgent_burial_help {
        text.push_str("  Urgent burial support: we will help you find a funeral director now.\n");
    }
    if summary.needs_repatriation {
        text.push_str("  Repatriation: specialist help requested.\n");
    }
    for (question, answer) in event.answers.to_flat_map() {
        text.push_str(&format!("  {}: {}\n", question, answer));
    }
    write(out, &text).await
}
