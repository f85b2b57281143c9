//! Terminal rendering of engine turns.
//!
//! The widget is a pure view: it keeps a copy of the transcript and the
//! quick actions currently on offer, and writes them out. Closing it hides
//! output without touching the engine; reopening reprints what was missed.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use crate::engine::{Output, Progress, Status, Turn, View};
use crate::model::Choice;

const BAR_WIDTH: usize = 10;

/// Carriage return plus ANSI erase-line, wiping the typing indicator.
const CLEAR_LINE: &str = "\r\x1b[2K";

/// One transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Bot(String),
    User(String),
}

pub struct Widget<W> {
    out: W,
    assistant: String,
    delay: Duration,
    open: bool,
    transcript: Vec<Entry>,
    quick_actions: Vec<Choice>,
}

impl<W: Write> Widget<W> {
    /// An open widget writing to `out`, pausing `delay` before each bot message.
    pub fn new(out: W, assistant: impl Into<String>, delay: Duration) -> Self {
        Self {
            out,
            assistant: assistant.into(),
            delay,
            open: true,
            transcript: Vec::new(),
            quick_actions: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn quick_actions(&self) -> &[Choice] {
        &self.quick_actions
    }

    /// Applies a turn's outputs in order, then redraws the footer.
    ///
    /// While closed everything is recorded but nothing is written and the
    /// typing delay is skipped.
    pub fn show(&mut self, turn: &Turn, view: &View) -> io::Result<()> {
        for output in &turn.outputs {
            match output {
                Output::User(text) => {
                    self.transcript.push(Entry::User(text.clone()));
                    if self.open {
                        writeln!(self.out, "  you: {text}")?;
                    }
                }
                Output::Bot { text, choices } => {
                    if self.open && !self.delay.is_zero() {
                        write!(self.out, "  {} is typing...", self.assistant)?;
                        self.out.flush()?;
                        thread::sleep(self.delay);
                        write!(self.out, "{CLEAR_LINE}")?;
                    }
                    self.transcript.push(Entry::Bot(text.clone()));
                    self.quick_actions.clone_from(choices);
                    if self.open {
                        self.write_bot(text)?;
                    }
                }
                Output::Notice(text) | Output::Summary(text) => {
                    self.transcript.push(Entry::Bot(text.clone()));
                    if self.open {
                        self.write_bot(text)?;
                    }
                }
                Output::ClearTranscript => {
                    self.transcript.clear();
                    self.quick_actions.clear();
                }
                Output::Submitted => {
                    self.quick_actions.clear();
                    if self.open {
                        writeln!(self.out, "  -- case submitted --")?;
                    }
                }
            }
        }
        self.footer(view)
    }

    /// Shows the widget again, replaying the transcript.
    pub fn open(&mut self, view: &View) -> io::Result<()> {
        if self.open {
            return Ok(());
        }
        self.open = true;
        self.history(view)
    }

    pub fn close(&mut self) -> io::Result<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        writeln!(self.out, "  [{}] closed, type /open to continue", Status::Idle)?;
        self.out.flush()
    }

    /// Reprints the whole transcript and footer.
    pub fn history(&mut self, view: &View) -> io::Result<()> {
        for entry in self.transcript.clone() {
            match entry {
                Entry::User(text) => writeln!(self.out, "  you: {text}")?,
                Entry::Bot(text) => self.write_bot(&text)?,
            }
        }
        self.footer(view)
    }

    /// A one-line message from the widget itself, outside the transcript.
    pub fn hint(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "  ({text})")?;
        self.out.flush()
    }

    fn write_bot(&mut self, text: &str) -> io::Result<()> {
        let mut lines = text.lines();
        if let Some(first) = lines.next() {
            writeln!(self.out, "  {}: {first}", self.assistant)?;
        }
        for line in lines {
            writeln!(self.out, "      {line}")?;
        }
        Ok(())
    }

    fn footer(&mut self, view: &View) -> io::Result<()> {
        if !self.open {
            return Ok(());
        }
        if !self.quick_actions.is_empty() {
            let chips: Vec<_> = self
                .quick_actions
                .iter()
                .enumerate()
                .map(|(i, c)| format!("[{}] {}", i + 1, c.label))
                .collect();
            writeln!(self.out, "  {}", chips.join("  "))?;
        }
        writeln!(self.out, "  {}  [{}]", progress_line(&view.progress), view.status)?;
        write!(self.out, "{} > ", view.placeholder)?;
        self.out.flush()
    }
}

#[cfg(test)]
impl<W> Widget<W> {
    pub fn output(&self) -> &W {
        &self.out
    }
}

/// `[#####.....] 50%  Step 4 of 6`
pub fn progress_line(progress: &Progress) -> String {
    let percent = progress.percent();
    let filled = ((percent + 5) / 10).min(BAR_WIDTH);
    format!(
        "[{}{}] {percent}%  {}",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        progress.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(step_index: usize, ready: bool) -> View {
        View {
            status: if ready { Status::Ready } else { Status::Collecting },
            progress: Progress {
                step_index,
                completed: if ready { 6 } else { step_index },
                total: 6,
                ready,
            },
            placeholder: "Type your reply...",
            can_go_back: ready || step_index > 0,
            can_submit: ready,
        }
    }

    fn test_widget() -> Widget<Vec<u8>> {
        Widget::new(Vec::new(), "AuraVoice", Duration::ZERO)
    }

    fn written(widget: &Widget<Vec<u8>>) -> String {
        String::from_utf8(widget.out.clone()).unwrap()
    }

    fn sample_turn() -> Turn {
        let mut turn = Turn::default();
        turn.user("Integration");
        turn.bot(
            "Great. What is your full name?",
            vec![Choice::plain("Ada"), Choice::new("Skip", "__skip_phone__")],
        );
        turn
    }

    #[test]
    fn progress_bar() {
        assert_eq!(progress_line(&view(3, false).progress), "[#####.....] 50%  Step 4 of 6");
        assert_eq!(progress_line(&view(0, false).progress), "[..........] 0%  Step 1 of 6");
        assert_eq!(
            progress_line(&view(6, true).progress),
            "[##########] 100%  All 6 steps complete"
        );
    }

    #[test]
    fn shows_messages_chips_and_footer() {
        let mut widget = test_widget();
        widget.show(&sample_turn(), &view(1, false)).unwrap();

        let out = written(&widget);
        assert!(out.contains("  you: Integration\n"));
        assert!(out.contains("  AuraVoice: Great. What is your full name?\n"));
        assert!(out.contains("[1] Ada  [2] Skip"));
        assert!(out.contains("Step 2 of 6  [Collecting]"));
        assert_eq!(widget.quick_actions().len(), 2);
    }

    #[test]
    fn typing_indicator_is_erased_before_the_message() {
        let mut widget = Widget::new(Vec::new(), "AuraVoice", Duration::from_millis(1));
        let mut turn = Turn::default();
        turn.bot("Hi again.", Vec::new());
        widget.show(&turn, &view(0, false)).unwrap();

        let out = written(&widget);
        assert!(out.starts_with("  AuraVoice is typing...\r\x1b[2K  AuraVoice: Hi again.\n"));
    }

    #[test]
    fn no_indicator_without_delay() {
        let mut widget = test_widget();
        let mut turn = Turn::default();
        turn.bot("Hi again.", Vec::new());
        widget.show(&turn, &view(0, false)).unwrap();

        assert!(written(&widget).starts_with("  AuraVoice: Hi again.\n"));
    }

    #[test]
    fn multiline_summary_is_indented() {
        let mut widget = test_widget();
        let mut turn = Turn::default();
        turn.summary("Service Focus: Other\nSubject: -");
        widget.show(&turn, &view(6, true)).unwrap();

        let out = written(&widget);
        assert!(out.contains("  AuraVoice: Service Focus: Other\n      Subject: -\n"));
    }

    #[test]
    fn clear_transcript_wipes_history() {
        let mut widget = test_widget();
        widget.show(&sample_turn(), &view(1, false)).unwrap();

        let mut turn = Turn::default();
        turn.push(Output::ClearTranscript);
        turn.bot("Hi again.", Vec::new());
        widget.show(&turn, &view(0, false)).unwrap();

        assert_eq!(widget.transcript, vec![Entry::Bot("Hi again.".into())]);
        assert!(widget.quick_actions().is_empty());
    }

    #[test]
    fn closed_widget_records_silently_and_replays_on_open() {
        let mut widget = test_widget();
        widget.close().unwrap();
        widget.out.clear();

        widget.show(&sample_turn(), &view(1, false)).unwrap();
        assert!(written(&widget).is_empty());
        assert_eq!(widget.transcript.len(), 2);

        widget.open(&view(1, false)).unwrap();
        let out = written(&widget);
        assert!(out.contains("you: Integration"));
        assert!(out.contains("What is your full name?"));
        assert!(widget.is_open());
    }

    #[test]
    fn close_reports_idle() {
        let mut widget = test_widget();
        widget.close().unwrap();

        assert!(!widget.is_open());
        assert!(written(&widget).contains("[Idle]"));
    }
}
