//! Core data model for the case bot.
//!
//! These types carry the dialogue between its parts:
//! step keys, collected answers, quick-reply choices, the live dialogue
//! state, and the persisted draft snapshot.

mod answers;
mod choice;
mod dialogue;
mod draft;

pub use answers::{Answers, StepKey};
pub use choice::Choice;
pub use dialogue::DialogueState;
pub use draft::DraftRecord;
