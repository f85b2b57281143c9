//! Dialogue engine: the case bot's state machine.
//!
//! The engine owns the dialogue state and is the only writer of drafts.
//! Every reply goes through [`Engine::reply`], which first checks the
//! reserved command vocabulary and otherwise treats the text as an answer
//! to the current step:
//!
//! - a valid answer is stored, the step pointer advances, and the next
//!   step is asked; past the last step the engine becomes ready and
//!   offers submit / refine,
//! - an invalid answer changes nothing and re-offers the same step,
//! - Back rewinds one step (or, when ready, reopens only the description),
//! - Restart wipes everything, including the stored draft.
//!
//! One reply is handled at a time. [`Engine::reply`] raises a busy flag
//! that stays up until the presenter calls [`Engine::settle`] after it has
//! finished showing the turn; replies arriving in between are dropped.

pub mod command;
mod turn;
mod view;

use tracing::{debug, info};

use crate::bridge::FormBridge;
use crate::catalog::{self, Catalog, StepDefinition};
use crate::form::{self, CaseForm};
use crate::model::{Choice, DialogueState, DraftRecord, StepKey};
use crate::page::PageContext;
use crate::storage::{DraftStore, SessionStore};

pub use command::Command;
pub use turn::{Output, Turn};
pub use view::{Progress, Status, View};

const READY_PROMPT: &str = "Perfect. I have prepared your Salesforce case summary. \
    You can submit now or go back to refine details.";
const READY_REMINDER: &str =
    "Case is ready. Use \"Create Case Now\" to submit, or \"Back\" to edit.";
const ALREADY_SUBMITTED: &str =
    "This case has already been submitted. Type \"restart\" to open a new one.";
const SUBMIT_FAILED: &str =
    "I could not hand your case over just now. Your draft is kept, so you can try again.";
const DEFAULT_PLACEHOLDER: &str = "Type your reply...";

/// Submit and refine quick actions offered once every step is answered.
pub fn ready_actions() -> Vec<Choice> {
    vec![
        Choice::new("Create Case Now", command::SUBMIT_CASE),
        Choice::new("Refine Description", "back"),
    ]
}

/// The case bot for one session.
pub struct Engine<S, B> {
    catalog: Catalog,
    page: PageContext,
    assistant: String,
    state: DialogueState,
    processing: bool,
    submitted: bool,
    drafts: DraftStore<S>,
    bridge: B,
}

impl<S: SessionStore, B: FormBridge> Engine<S, B> {
    /// Builds an engine for `page`. Nothing is shown or loaded until [`Engine::start`].
    pub fn new(
        page: PageContext,
        assistant: impl Into<String>,
        drafts: DraftStore<S>,
        bridge: B,
    ) -> Self {
        Self {
            catalog: Catalog::new(&page),
            page,
            assistant: assistant.into(),
            state: DialogueState::default(),
            processing: false,
            submitted: false,
            drafts,
            bridge,
        }
    }

    /// Opens the session: resumes a stored draft if there is a fresh one,
    /// otherwise greets and asks the first step.
    ///
    /// This is the only place a draft is loaded.
    pub fn start(&mut self) -> Turn {
        let mut turn = Turn::default();
        match self.drafts.load() {
            Some(draft) => self.resume(draft, &mut turn),
            None => self.restart(&mut turn),
        }
        turn
    }

    /// Handles one reply: typed text, or a quick action's value with its label.
    ///
    /// Returns `None` when the reply is ignored: blank, or sent while a
    /// previous turn is still being shown. Otherwise the engine stays busy
    /// until [`Engine::settle`].
    pub fn reply(&mut self, raw: &str, label: Option<&str>) -> Option<Turn> {
        if self.processing {
            debug!(reply = raw, "reply dropped while busy");
            return None;
        }
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        self.processing = true;
        let label = label.map(str::trim).filter(|l| !l.is_empty());
        let mut turn = Turn::default();

        match Command::parse(text) {
            Some(Command::Restart) => {
                turn.user("Restart");
                self.restart(&mut turn);
            }
            _ if self.submitted => {
                turn.user(label.unwrap_or(text));
                turn.bot(ALREADY_SUBMITTED, Vec::new());
            }
            Some(command) => self.dispatch(command, label, &mut turn),
            None if self.state.ready_to_submit => {
                turn.user(label.unwrap_or(text));
                turn.bot(READY_REMINDER, Vec::new());
            }
            None => self.answer(text, label, &mut turn),
        }

        Some(turn)
    }

    /// Marks the current turn as fully shown, accepting replies again.
    pub fn settle(&mut self) {
        self.processing = false;
    }

    /// The step awaiting an answer, `None` once ready.
    pub fn current_step(&self) -> Option<&StepDefinition> {
        if self.state.ready_to_submit {
            return None;
        }
        self.catalog.get(self.state.step_index)
    }

    /// Text to pre-fill the input with: the first subject preset on the subject step.
    pub fn suggested_input(&self) -> Option<String> {
        let step = self.current_step()?;
        (step.key == StepKey::Subject)
            .then(|| catalog::subject_presets(&self.state.answers)[0].to_string())
    }

    /// Form fields as they currently stand.
    pub fn form(&self) -> CaseForm {
        CaseForm::from_answers(&self.state.answers, &self.assistant)
    }

    pub fn view(&self) -> View {
        let total = self.catalog.len();
        let ready = self.state.ready_to_submit;
        View {
            status: if ready { Status::Ready } else { Status::Collecting },
            progress: Progress {
                step_index: self.state.step_index,
                completed: self.state.completed(total),
                total,
                ready,
            },
            placeholder: self
                .current_step()
                .map_or(DEFAULT_PLACEHOLDER, |s| s.placeholder),
            can_go_back: !self.submitted && (ready || self.state.step_index > 0),
            can_submit: !self.submitted && ready,
        }
    }

    fn dispatch(&mut self, command: Command, label: Option<&str>, turn: &mut Turn) {
        match command {
            Command::Submit => {
                turn.user(label.unwrap_or("Create Case Now"));
                self.submit(turn);
            }
            Command::UsePageContext => {
                if self.at_step(StepKey::Intent) {
                    let intent = self.page.intent.label();
                    turn.user(label.map_or_else(|| format!("Use {intent}"), str::to_string));
                    self.advance(StepKey::Intent, intent.to_string(), turn);
                } else {
                    debug!("page context offered outside the intent step");
                }
            }
            Command::SkipPhone => {
                if self.at_step(StepKey::Phone) {
                    turn.user(label.unwrap_or("Skip Phone"));
                    self.advance(StepKey::Phone, String::new(), turn);
                } else {
                    debug!("skip phone outside the phone step");
                }
            }
            Command::Back => {
                turn.user("Back");
                self.back(turn);
            }
            Command::Restart => {
                turn.user("Restart");
                self.restart(turn);
            }
        }
    }

    fn at_step(&self, key: StepKey) -> bool {
        self.current_step().is_some_and(|s| s.key == key)
    }

    /// Ordinary answer to the current step: normalize, validate, advance or reject.
    fn answer(&mut self, text: &str, label: Option<&str>, turn: &mut Turn) {
        let answers = &self.state.answers;
        let Some(step) = self.catalog.get(self.state.step_index) else {
            return;
        };
        turn.user(label.unwrap_or(text));

        let value = step.normalize(text, answers);
        match step.validate(&value, answers) {
            Ok(()) => {
                let key = step.key;
                self.advance(key, value, turn);
            }
            Err(message) => {
                debug!(step = %step.key, "answer rejected");
                turn.bot(message, step.choices(answers));
            }
        }
    }

    fn advance(&mut self, key: StepKey, value: String, turn: &mut Turn) {
        self.state.answers.insert(key, value);
        self.state.step_index += 1;
        debug!(step = %key, next = self.state.step_index, "step answered");

        if self.state.step_index < self.catalog.len() {
            self.persist();
            self.ask_current_step(turn);
            return;
        }

        self.state.ready_to_submit = true;
        self.persist();
        info!("all steps answered, case ready");
        turn.bot(READY_PROMPT, ready_actions());
        turn.summary(form::summary(&self.state.answers));
    }

    fn back(&mut self, turn: &mut Turn) {
        if self.state.ready_to_submit {
            self.state.ready_to_submit = false;
            self.state.step_index = self.catalog.len() - 1;
            self.state.answers.remove(StepKey::Description);
            self.persist();
            turn.bot("Let's refine the case description before submission.", Vec::new());
            self.ask_current_step(turn);
            return;
        }

        if self.state.step_index == 0 {
            turn.bot("You are already at the first step.", catalog::intent_choices());
            return;
        }

        self.state.step_index -= 1;
        let Some(step) = self.catalog.get(self.state.step_index) else {
            return;
        };
        self.state.answers.remove(step.key);
        let label = step.label;
        self.persist();
        turn.bot(format!("Going back. Let's update {label}."), Vec::new());
        self.ask_current_step(turn);
    }

    fn restart(&mut self, turn: &mut Turn) {
        self.state = DialogueState::default();
        self.submitted = false;
        self.drafts.clear();
        info!(page = %self.page.id, "dialogue reset");

        turn.push(Output::ClearTranscript);
        turn.bot(
            format!("Hi, I am {}. {}", self.assistant, self.page.intro),
            Vec::new(),
        );
        self.ask_current_step(turn);
    }

    fn resume(&mut self, draft: DraftRecord, turn: &mut Turn) {
        self.state = draft.into_state(self.catalog.len());
        info!(
            step = self.state.step_index,
            ready = self.state.ready_to_submit,
            "draft restored"
        );

        turn.push(Output::ClearTranscript);
        turn.bot(
            format!(
                "I restored your previous {} draft so you can continue.",
                self.assistant
            ),
            Vec::new(),
        );
        if self.state.ready_to_submit {
            turn.bot("Your case draft is ready for submission.", ready_actions());
            turn.summary(form::summary(&self.state.answers));
        } else {
            self.ask_current_step(turn);
        }
    }

    fn submit(&mut self, turn: &mut Turn) {
        if !self.state.ready_to_submit {
            debug!("submit requested before the case is ready");
            return;
        }

        turn.notice("Submitting your case to Salesforce...");
        if let Err(e) = self.bridge.submit(&self.form()) {
            info!(error = %e, "case handoff failed, keeping draft");
            turn.bot(SUBMIT_FAILED, ready_actions());
            return;
        }
        self.drafts.clear();
        self.submitted = true;
        turn.push(Output::Submitted);
    }

    fn ask_current_step(&self, turn: &mut Turn) {
        if let Some(step) = self.current_step() {
            turn.bot(
                step.prompt(&self.state.answers),
                step.choices(&self.state.answers),
            );
        }
    }

    fn persist(&self) {
        self.drafts.save(&self.state, &self.page.id);
    }
}

#[cfg(test)]
impl<S, B> Engine<S, B> {
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn state(&self) -> &DialogueState {
        &self.state
    }
}
