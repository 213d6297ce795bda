// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{FormResult, Store};

pub type FormModeStore = Store<FormModeState, FormModeAction>;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
pub enum FormMode {
    /// The form's record is being fetched.
    #[default]
    Load,
    Add,
    Edit,
    View,
    /// A long running operation (save, delete, ...) is in flight.
    Process,
}

/// One mode, with the narration shown while in it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormModeEntry {
    pub mode: FormMode,
    pub description: Option<String>,
}

/// Current editing mode plus the stack of modes it replaced. Every mode setting action
/// pushes the current entry; [`FormModeAction::Revert`] pops exactly one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormModeState {
    pub current: FormModeEntry,
    pub history: Vec<FormModeEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormModeAction {
    SetLoad(Option<String>),
    SetAdd,
    SetEdit,
    SetView,
    SetProcess(Option<String>),
    /// Back to the previous mode and its description. No-op without history.
    Revert,
}

impl FormModeState {
    #[must_use]
    pub fn new(initial_mode: FormMode) -> Self {
        Self {
            current: FormModeEntry {
                mode: initial_mode,
                description: None,
            },
            history: vec![],
        }
    }

    #[must_use]
    pub fn current_mode(&self) -> FormMode { self.current.mode }

    #[must_use]
    pub fn description(&self) -> Option<&str> { self.current.description.as_deref() }

    #[must_use]
    pub fn previous_mode(&self) -> Option<FormMode> {
        self.history.last().map(|it| it.mode)
    }

    #[must_use]
    pub fn is_mode(&self, mode: FormMode) -> bool { self.current.mode == mode }

    #[must_use]
    pub fn reduce(&self, action: &FormModeAction) -> Self {
        let push = |mode: FormMode, description: Option<String>| {
            let mut history = self.history.clone();
            history.push(self.current.clone());
            Self {
                current: FormModeEntry { mode, description },
                history,
            }
        };

        let new_state = match action {
            FormModeAction::SetLoad(description) => push(FormMode::Load, description.clone()),
            FormModeAction::SetAdd => push(FormMode::Add, None),
            FormModeAction::SetEdit => push(FormMode::Edit, None),
            FormModeAction::SetView => push(FormMode::View, None),
            FormModeAction::SetProcess(description) => {
                push(FormMode::Process, description.clone())
            }
            FormModeAction::Revert => {
                let mut history = self.history.clone();
                match history.pop() {
                    Some(previous) => Self {
                        current: previous,
                        history,
                    },
                    None => self.clone(),
                }
            }
        };

        // % is Display, ? is Debug.
        tracing::debug!(
            message = "🔀 form mode",
            action = ?action,
            from = %self.current.mode,
            to = %new_state.current.mode,
            depth = %new_state.history.len()
        );

        new_state
    }
}

/// [`FormModeState::reduce`] in the shape a [`Store`] expects. Never fails.
///
/// # Errors
///
/// None.
pub fn form_mode_reducer(
    state: &FormModeState,
    action: &FormModeAction,
) -> FormResult<FormModeState> {
    Ok(state.reduce(action))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_revert_on_fresh_state_is_a_no_op() {
        let state = FormModeState::new(FormMode::View);
        assert_eq!(state.reduce(&FormModeAction::Revert), state);
    }

    #[test]
    fn test_two_edits_then_two_reverts_returns_to_start() {
        let start = FormModeState::new(FormMode::View);
        let state = start
            .reduce(&FormModeAction::SetEdit)
            .reduce(&FormModeAction::SetEdit);
        assert_eq!(state.history.len(), 2);

        let state = state
            .reduce(&FormModeAction::Revert)
            .reduce(&FormModeAction::Revert);
        assert_eq!(state, start);
    }

    #[test]
    fn test_revert_restores_the_popped_description() {
        let state = FormModeState::new(FormMode::Edit)
            .reduce(&FormModeAction::SetLoad(Some("Loading project".into())))
            .reduce(&FormModeAction::SetProcess(Some("Saving".into())));
        assert_eq!(state.current_mode(), FormMode::Process);
        assert_eq!(state.description(), Some("Saving"));
        assert_eq!(state.previous_mode(), Some(FormMode::Load));

        let state = state.reduce(&FormModeAction::Revert);
        assert_eq!(state.current_mode(), FormMode::Load);
        assert_eq!(state.description(), Some("Loading project"));
        assert_eq!(state.previous_mode(), Some(FormMode::Edit));

        let state = state.reduce(&FormModeAction::Revert);
        assert!(state.is_mode(FormMode::Edit));
        assert_eq!(state.description(), None);
        assert_eq!(state.reduce(&FormModeAction::Revert), state);
    }

    #[test]
    fn test_reduce_leaves_the_old_state_alone() {
        let state = FormModeState::new(FormMode::Add);
        let _unused = state.reduce(&FormModeAction::SetView);
        assert_eq!(state, FormModeState::new(FormMode::Add));
    }

    #[test]
    fn test_in_a_store() {
        let mut store = FormModeStore::new(FormModeState::default(), form_mode_reducer);
        store.dispatch(&FormModeAction::SetEdit).unwrap();
        store.dispatch(&FormModeAction::Revert).unwrap();
        assert_eq!(store.get_state().current_mode(), FormMode::Load);
    }
}
