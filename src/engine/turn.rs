//! Turn: what the engine wants shown after handling one reply.

use crate::model::Choice;

/// One presentational effect, in the order it should be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Echo of what the visitor sent (the chip label for quick actions).
    User(String),

    /// A bot message, revealed after the typing delay. Replaces the quick
    /// actions with `choices` (an empty list hides them).
    Bot { text: String, choices: Vec<Choice> },

    /// A bot message shown at once, leaving quick actions alone.
    Notice(String),

    /// The case recap, shown at once.
    Summary(String),

    /// Wipe the transcript.
    ClearTranscript,

    /// The case was handed to the form bridge.
    Submitted,
}

/// Ordered outputs of one engine step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Turn {
    pub outputs: Vec<Output>,
}

impl Turn {
    pub fn user(&mut self, text: impl Into<String>) {
        self.outputs.push(Output::User(text.into()));
    }

    pub fn bot(&mut self, text: impl Into<String>, choices: Vec<Choice>) {
        self.outputs.push(Output::Bot {
            text: text.into(),
            choices,
        });
    }

    pub fn notice(&mut self, text: impl Into<String>) {
        self.outputs.push(Output::Notice(text.into()));
    }

    pub fn summary(&mut self, text: impl Into<String>) {
        self.outputs.push(Output::Summary(text.into()));
    }

    pub fn push(&mut self, output: Output) {
        self.outputs.push(output);
    }
}

#[cfg(test)]
impl Turn {
    /// Choices offered by the last bot message, if any bot message was sent.
    pub fn last_choices(&self) -> Option<&[Choice]> {
        self.outputs.iter().rev().find_map(|o| match o {
            Output::Bot { choices, .. } => Some(choices.as_slice()),
            _ => None,
        })
    }

    /// Text of the last bot message.
    pub fn last_bot_text(&self) -> Option<&str> {
        self.outputs.iter().rev().find_map(|o| match o {
            Output::Bot { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn was_submitted(&self) -> bool {
        self.outputs.contains(&Output::Submitted)
    }
}
