//! Dialogue state: where the visitor is in the step sequence.

use super::Answers;

/// The live state of one case-bot session.
///
/// `step_index == step count` means every step is answered.
/// `ready_to_submit` implies that, and stays true until Back or Restart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueState {
    pub step_index: usize,
    pub answers: Answers,
    pub ready_to_submit: bool,
}

impl DialogueState {
    /// Number of steps counted as complete for progress display.
    pub fn completed(&self, step_count: usize) -> usize {
        if self.ready_to_submit {
            step_count
        } else {
            self.step_index.min(step_count)
        }
    }
}
