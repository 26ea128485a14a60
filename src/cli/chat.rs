//! `impactwatch chat` interactive session.

use crate::cli::{analyzer, load_existing, open_store, render_message};
use crate::client::Analyzer;
use crate::config::Config;
use crate::core::{Chat, Completion, SessionStore};
use crate::error::{Error, Result};
use crate::view::{TranscriptUpdate, TranscriptView, summary_text};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

const PROMPT: &str = "> ";
const CONTINUATION: &str = ". ";

const HELP: &str = "\
Type text and press Enter to analyze it. End a line with \\ to continue on the next line.

  /new            start a new conversation
  /sessions       list saved sessions
  /load <id>      switch to a saved session
  /delete <id>    delete a saved session
  /regen [n]      re-run the prompt behind result n (default: latest)
  /copy [n]       print the summary of result n (default: latest)
  /help           show this help
  /quit           exit";

/// A parsed line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Submit(String),
    New,
    Sessions,
    Load(String),
    Delete(String),
    Regenerate(Option<usize>),
    Copy(Option<usize>),
    Help,
    Quit,
}

/// Run the chat command.
///
/// # Errors
///
/// Returns an error if the starting session does not exist, storage cannot be
/// opened, or the terminal fails.
pub async fn run(config: &Config, session_id: Option<&str>) -> Result<()> {
    let mut store = open_store(config)?;
    if let Some(id) = session_id {
        load_existing(&mut store, id)?;
    }

    let mut chat = Chat::new(store, analyzer(config)?);
    let mut view = TranscriptView::new();
    let mut editor = DefaultEditor::new()?;

    println!(
        "{}: analyzing via {}. Type /help for commands.",
        "ImpactWatch".green().bold(),
        chat.analyzer().endpoint()
    );
    refresh(&mut view, chat.store());

    while let Some(input) = read_input(&mut editor)? {
        let command = match parse_command(&input) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{}", message.red());
                continue;
            }
        };

        if command == ReplCommand::Quit {
            break;
        }

        match execute(&mut chat, &mut view, command).await {
            Ok(()) | Err(Error::EmptyInput) => {}
            Err(e @ Error::Terminal(_)) => return Err(e),
            Err(e) => eprintln!("{}", e.to_string().red()),
        }

        refresh(&mut view, chat.store());
    }

    Ok(())
}

async fn execute<A: Analyzer>(
    chat: &mut Chat<A>,
    view: &mut TranscriptView,
    command: ReplCommand,
) -> Result<()> {
    match command {
        ReplCommand::Submit(text) => {
            let pending = chat.begin_submit(&text)?;
            refresh(view, chat.store());
            println!("{}", "analyzing...".bright_black());

            let outcome = chat.analyzer().analyze(&pending.prompt).await;
            let completion = chat.complete(pending, outcome);
            announce(chat.store(), &completion);
        }
        ReplCommand::Regenerate(index) => {
            println!("{}", "regenerating...".bright_black());
            let completion = match index {
                Some(i) => chat.regenerate(i).await?,
                None => chat.regenerate_last().await?,
            };
            announce(chat.store(), &completion);
        }
        ReplCommand::New => chat.store_mut().clear_active_session(),
        ReplCommand::Sessions => print_sessions(chat.store()),
        ReplCommand::Load(id) => load_existing(chat.store_mut(), &id)?,
        ReplCommand::Delete(id) => {
            if chat.store().session(&id).is_none() {
                return Err(Error::SessionNotFound(id));
            }
            chat.store_mut().delete_session(&id);
            println!("Deleted session {id}");
        }
        ReplCommand::Copy(index) => {
            let session = chat.store().active_session().ok_or(Error::NoActiveSession)?;
            let result = crate::cli::copy::select_result(session, index)?;
            println!("{}", summary_text(result));
        }
        ReplCommand::Help => println!("{HELP}"),
        ReplCommand::Quit => {}
    }
    Ok(())
}

/// Report completions the transcript alone would not show.
fn announce(store: &SessionStore, completion: &Completion) {
    match completion {
        Completion::Appended {
            session_id,
            active: false,
        } => {
            let name = store.session(session_id).map_or("", |s| s.name.as_str());
            println!(
                "{}",
                format!("Result saved to \"{name}\" ({session_id}).").yellow()
            );
        }
        Completion::Appended { .. } => {}
        Completion::Discarded { session_id } => println!(
            "{}",
            format!("Session {session_id} was deleted; result discarded.").yellow()
        ),
        Completion::Failed { error, .. } => eprintln!(
            "{}",
            format!("Analysis failed ({}): {error}", error.kind()).red()
        ),
    }
}

/// Bring the terminal up to date with the store.
fn refresh(view: &mut TranscriptView, store: &SessionStore) {
    match view.sync(store) {
        TranscriptUpdate::Reset {
            session_id,
            messages,
        } => {
            match session_id.and_then(|id| store.session(id)) {
                Some(session) => println!(
                    "\n{}",
                    format!("── {} ({}) ──", session.name, session.id).cyan()
                ),
                None => println!("\n{}", "── new conversation ──".cyan()),
            }
            for (index, message) in messages.iter().enumerate() {
                print!("{}", render_message(index, message));
            }
        }
        TranscriptUpdate::Append(messages) => {
            let start = view.rendered() - messages.len();
            for (offset, message) in messages.iter().enumerate() {
                print!("{}", render_message(start + offset, message));
            }
        }
        TranscriptUpdate::Unchanged => {}
    }
}

fn print_sessions(store: &SessionStore) {
    if store.sessions().is_empty() {
        println!("No sessions found.");
        return;
    }
    for session in store.sessions() {
        let marker = if store.active_id() == Some(session.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {}  {} ({} messages)",
            session.id,
            session.name,
            session.messages.len()
        );
    }
}

/// Add non-blank input to the editor's recall history.
fn record_history(editor: &mut DefaultEditor, input: &str) {
    if input.trim().is_empty() {
        return;
    }
    if let Err(e) = editor.add_history_entry(input) {
        debug!("Failed to record input history: {e}");
    }
}

/// Read one logical input, joining backslash-continued lines.
///
/// Returns `None` at end of input.
fn read_input(editor: &mut DefaultEditor) -> Result<Option<String>> {
    let mut buffer = String::new();
    let mut prompt = PROMPT;

    loop {
        match editor.readline(prompt) {
            Ok(line) => {
                if push_line(&mut buffer, &line) {
                    record_history(editor, &buffer);
                    return Ok(Some(buffer));
                }
                prompt = CONTINUATION;
            }
            // Ctrl-C abandons the current input
            Err(ReadlineError::Interrupted) => return Ok(Some(String::new())),
            Err(ReadlineError::Eof) => return Ok(None),
            Err(e) => return Err(e.into()),
        }
    }
}

/// Append `line` to `buffer`. Returns `true` once the input is complete.
fn push_line(buffer: &mut String, line: &str) -> bool {
    match line.strip_suffix('\\') {
        Some(head) => {
            buffer.push_str(head);
            buffer.push('\n');
            false
        }
        None => {
            buffer.push_str(line);
            true
        }
    }
}

fn parse_command(input: &str) -> std::result::Result<ReplCommand, String> {
    let trimmed = input.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(ReplCommand::Submit(input.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    let index = |arg: Option<&str>| -> std::result::Result<Option<usize>, String> {
        arg.map(|a| a.parse().map_err(|_| format!("not a message number: {a}")))
            .transpose()
    };
    let required = |arg: Option<&str>| -> std::result::Result<String, String> {
        arg.map(str::to_string)
            .ok_or_else(|| format!("/{name} needs a session id"))
    };

    match name {
        "new" => Ok(ReplCommand::New),
        "sessions" | "list" => Ok(ReplCommand::Sessions),
        "load" => required(arg).map(ReplCommand::Load),
        "delete" => required(arg).map(ReplCommand::Delete),
        "regen" | "regenerate" => index(arg).map(ReplCommand::Regenerate),
        "copy" => index(arg).map(ReplCommand::Copy),
        "help" => Ok(ReplCommand::Help),
        "quit" | "exit" => Ok(ReplCommand::Quit),
        other => Err(format!("unknown command: /{other} (try /help)")),
    }
}
