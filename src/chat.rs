//! Interactive chat session in the terminal.
//!
//! Stdin is read on its own thread and forwarded over a channel, so the
//! main loop can render a turn (typing delays included) while the visitor
//! keeps typing. Anything that arrives before the turn has settled is
//! offered to the engine and dropped by its busy flag.
//!
//! Input handling:
//!
//! - a number picks the matching quick action,
//! - `/submit`, `/back`, `/restart` map onto engine commands,
//! - `/open`, `/close`, `/history`, `/quit` only affect the widget,
//! - an empty line accepts the suggested input, if there is one,
//! - anything else is a free-text reply.

mod widget;

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::bridge::FormBridge;
use crate::engine::{Engine, View, command};
use crate::model::Choice;
use crate::storage::SessionStore;

pub use widget::Widget;

/// What a line of terminal input means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Send to the engine. `label` is what the transcript shows instead of `value`.
    Reply { value: String, label: Option<String> },
    Open,
    Close,
    History,
    Quit,
    /// A control that is not available right now.
    Unavailable(&'static str),
    Unknown(String),
    Ignore,
}

/// Interprets one line of input against what the widget currently offers.
pub fn resolve_input(
    line: &str,
    quick_actions: &[Choice],
    view: &View,
    suggestion: Option<String>,
) -> Input {
    let line = line.trim();

    if let Some(control) = line.strip_prefix('/') {
        return match control.to_ascii_lowercase().as_str() {
            "submit" if view.can_submit => Input::Reply {
                value: command::SUBMIT_CASE.to_string(),
                label: Some("Create Case Now".to_string()),
            },
            "submit" => Input::Unavailable("nothing to submit yet"),
            "back" if view.can_go_back => Input::Reply {
                value: "back".to_string(),
                label: None,
            },
            "back" => Input::Unavailable("already at the first step"),
            "restart" => Input::Reply {
                value: "restart".to_string(),
                label: None,
            },
            "open" => Input::Open,
            "close" => Input::Close,
            "history" => Input::History,
            "quit" | "exit" => Input::Quit,
            _ => Input::Unknown(line.to_string()),
        };
    }

    if line.is_empty() {
        return suggestion.map_or(Input::Ignore, |value| Input::Reply { value, label: None });
    }

    if let Ok(n) = line.parse::<usize>()
        && let Some(choice) = n.checked_sub(1).and_then(|i| quick_actions.get(i))
    {
        return Input::Reply {
            value: choice.value.clone(),
            label: Some(choice.label.clone()),
        };
    }

    Input::Reply {
        value: line.to_string(),
        label: None,
    }
}

/// Runs the chat on stdin and stdout until `/quit` or end of input.
pub fn run<S: SessionStore, B: FormBridge>(
    engine: &mut Engine<S, B>,
    assistant: &str,
    delay: Duration,
) -> io::Result<()> {
    let lines = read_stdin();
    let mut widget = Widget::new(io::stdout().lock(), assistant, delay);
    drive(engine, &lines, &mut widget)
}

/// Forwards stdin lines over a channel from a reader thread.
fn read_stdin() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Starts the engine and feeds it `lines` until `/quit` or the sender hangs up.
///
/// Lines already queued when a turn finishes rendering arrived while the
/// engine was busy; they are offered to it and dropped.
fn drive<S: SessionStore, B: FormBridge, W: Write>(
    engine: &mut Engine<S, B>,
    lines: &Receiver<String>,
    widget: &mut Widget<W>,
) -> io::Result<()> {
    let turn = engine.start();
    widget.show(&turn, &engine.view())?;

    while let Ok(line) = lines.recv() {
        let view = engine.view();
        if !widget.is_open() {
            match resolve_input(&line, &[], &view, None) {
                Input::Open => widget.open(&view)?,
                Input::Quit => break,
                _ => widget.hint("the assistant is closed, type /open")?,
            }
            continue;
        }

        match resolve_input(&line, widget.quick_actions(), &view, engine.suggested_input()) {
            Input::Reply { value, label } => {
                let Some(turn) = engine.reply(&value, label.as_deref()) else {
                    continue;
                };
                widget.show(&turn, &engine.view())?;
                for late in lines.try_iter() {
                    if engine.reply(&late, None).is_none() {
                        debug!(line = %late, "input dropped while rendering");
                    }
                }
                engine.settle();
            }
            Input::Open => widget.open(&view)?,
            Input::Close => widget.close()?,
            Input::History => widget.history(&view)?,
            Input::Quit => break,
            Input::Unavailable(why) => widget.hint(why)?,
            Input::Unknown(control) => widget.hint(&format!(
                "unknown command {control}; try /submit /back /restart /open /close /history /quit"
            ))?,
            Input::Ignore => {}
        }
    }

    Ok(())
}
