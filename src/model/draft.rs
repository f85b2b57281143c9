//! Draft record: the persisted snapshot of a dialogue in progress.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Answers, DialogueState};

/// A snapshot of dialogue progress, stored as one JSON object:
///
/// ```text
/// {"stepIndex":3,"answers":{...},"readyToSubmit":false,"page":"services.html","ts":1760000000000}
/// ```
///
/// `ts` is epoch milliseconds at the time of writing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    #[serde(default)]
    pub step_index: i64,

    pub answers: Answers,

    #[serde(default)]
    pub ready_to_submit: bool,

    #[serde(default)]
    pub page: String,

    #[serde(default)]
    pub ts: i64,
}

impl DraftRecord {
    /// Snapshots `state` as of `at`.
    pub fn capture(state: &DialogueState, page: &str, at: Timestamp) -> Self {
        Self {
            step_index: i64::try_from(state.step_index).unwrap_or(i64::MAX),
            answers: state.answers.clone(),
            ready_to_submit: state.ready_to_submit,
            page: page.to_string(),
            ts: at.as_millisecond(),
        }
    }

    /// Milliseconds between `ts` and `now`. Negative for records from the future.
    pub fn age_ms(&self, now: Timestamp) -> i64 {
        now.as_millisecond().saturating_sub(self.ts)
    }

    /// Rebuilds the dialogue state for a catalog of `step_count` steps.
    ///
    /// A ready draft lands past the last step. Otherwise the index is
    /// clamped to `[0, step_count - 1]` and answers for steps at or after
    /// it are dropped.
    pub fn into_state(self, step_count: usize) -> DialogueState {
        let last = step_count.saturating_sub(1);
        let mut answers = self.answers;

        if self.ready_to_submit {
            return DialogueState {
                step_index: step_count,
                answers,
                ready_to_submit: true,
            };
        }

        let step_index = usize::try_from(self.step_index.max(0))
            .unwrap_or(last)
            .min(last);
        answers.truncate(step_index);

        DialogueState {
            step_index,
            answers,
            ready_to_submit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::StepKey;

    fn answered(keys: &[StepKey]) -> Answers {
        let mut answers = Answers::new();
        for key in keys {
            answers.insert(*key, format!("{key} value"));
        }
        answers
    }

    fn record(step_index: i64, answers: Answers, ready: bool) -> DraftRecord {
        DraftRecord {
            step_index,
            answers,
            ready_to_submit: ready,
            page: "index.html".into(),
            ts: 0,
        }
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let state = DialogueState {
            step_index: 1,
            answers: answered(&[StepKey::Intent]),
            ready_to_submit: false,
        };
        let at = Timestamp::from_millisecond(1_700_000_000_000).unwrap();
        let draft = DraftRecord::capture(&state, "services.html", at);

        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["stepIndex"], 1);
        assert_eq!(value["readyToSubmit"], false);
        assert_eq!(value["page"], "services.html");
        assert_eq!(value["ts"], 1_700_000_000_000_i64);
        assert_eq!(value["answers"]["intent"], "intent value");
    }

    #[test]
    fn ready_draft_lands_past_last_step() {
        let state = record(2, answered(&StepKey::ALL), true).into_state(6);

        assert_eq!(state.step_index, 6);
        assert!(state.ready_to_submit);
        assert_eq!(state.answers.keys().count(), 6);
    }

    #[test]
    fn step_index_clamped_to_last_step() {
        let state = record(42, answered(&StepKey::ALL), false).into_state(6);

        assert_eq!(state.step_index, 5);
        assert!(!state.ready_to_submit);
        assert!(!state.answers.contains(StepKey::Description));
    }

    #[test]
    fn negative_step_index_clamped_to_zero() {
        let state = record(-3, answered(&[StepKey::Intent]), false).into_state(6);

        assert_eq!(state.step_index, 0);
        assert_eq!(state.answers, Answers::new());
    }

    #[test]
    fn answers_beyond_step_are_dropped() {
        let answers = answered(&[StepKey::Intent, StepKey::Name, StepKey::Subject]);
        let state = record(2, answers, false).into_state(6);

        let keys: Vec<_> = state.answers.keys().collect();
        assert_eq!(keys, vec![StepKey::Intent, StepKey::Name]);
    }

    #[test]
    fn missing_optional_fields_default() {
        let draft: DraftRecord = serde_json::from_str(r#"{"answers":{}}"#).unwrap();

        assert_eq!(draft.step_index, 0);
        assert!(!draft.ready_to_submit);
        assert_eq!(draft.ts, 0);
    }

    #[test]
    fn answers_must_be_an_object() {
        let result = serde_json::from_str::<DraftRecord>(r#"{"stepIndex":1,"answers":"nope"}"#);
        assert!(result.is_err());
    }
}
