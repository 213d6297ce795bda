// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{FieldValues, FormError, FormResult, Store};

pub type ListDataStore = Store<ListDataState, ListDataAction>;

/// Ordered rows plus a pagination flag. Rows are opaque here, their shape belongs to the
/// caller (usually each row backs its own [`crate::FormDataState`]).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListDataState {
    pub items: Vec<FieldValues>,
    /// More rows can be fetched from the source.
    pub has_more_items: bool,
}

#[derive(Clone, Debug, PartialEq, strum_macros::AsRefStr)]
pub enum ListDataAction {
    SetItems {
        items: Vec<FieldValues>,
        has_more_items: bool,
    },
    ClearItems,
    /// Next page.
    AppendItems {
        items: Vec<FieldValues>,
        has_more_items: bool,
    },
    /// `index == len` appends.
    InsertItem { item: FieldValues, index: usize },
    UpdateItem { index: usize, item: FieldValues },
    RemoveItem(usize),
    SwapItems(usize, usize),
}

impl ListDataState {
    #[must_use]
    pub fn new(items: Vec<FieldValues>, has_more_items: bool) -> Self {
        Self {
            items,
            has_more_items,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize { self.items.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Copy on write, `self` is left untouched.
    ///
    /// # Errors
    ///
    /// [`FormError::IndexOutOfBounds`] if an index doesn't address an existing row.
    pub fn reduce(&self, action: &ListDataAction) -> FormResult<Self> {
        let len = self.items.len();
        let check = |index: usize, limit: usize| -> FormResult<()> {
            if index < limit {
                Ok(())
            } else {
                Err(FormError::IndexOutOfBounds { index, len }.logged())
            }
        };

        let new_state = match action {
            ListDataAction::SetItems {
                items,
                has_more_items,
            } => Self::new(items.clone(), *has_more_items),
            ListDataAction::ClearItems => Self::default(),
            ListDataAction::AppendItems {
                items,
                has_more_items,
            } => {
                let mut acc = self.items.clone();
                acc.extend(items.iter().cloned());
                Self::new(acc, *has_more_items)
            }
            ListDataAction::InsertItem { item, index } => {
                check(*index, len + 1)?;
                let mut acc = self.items.clone();
                acc.insert(*index, item.clone());
                Self::new(acc, self.has_more_items)
            }
            ListDataAction::UpdateItem { index, item } => {
                check(*index, len)?;
                let mut acc = self.items.clone();
                acc[*index] = item.clone();
                Self::new(acc, self.has_more_items)
            }
            ListDataAction::RemoveItem(index) => {
                check(*index, len)?;
                let mut acc = self.items.clone();
                acc.remove(*index);
                Self::new(acc, self.has_more_items)
            }
            ListDataAction::SwapItems(index_a, index_b) => {
                check(*index_a, len)?;
                check(*index_b, len)?;
                let mut acc = self.items.clone();
                acc.swap(*index_a, *index_b);
                Self::new(acc, self.has_more_items)
            }
        };

        // % is Display, ? is Debug.
        tracing::debug!(
            message = "📜 list data",
            action = %action.as_ref(),
            len = %new_state.items.len(),
            has_more_items = %new_state.has_more_items
        );

        Ok(new_state)
    }
}

/// [`ListDataState::reduce`] in the shape a [`Store`] expects.
///
/// # Errors
///
/// See [`ListDataState::reduce`].
pub fn list_data_reducer(
    state: &ListDataState,
    action: &ListDataAction,
) -> FormResult<ListDataState> {
    state.reduce(action)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::FieldValue;

    fn row(name: &str) -> FieldValues {
        let mut acc = FieldValues::new();
        acc.insert("name".into(), FieldValue::text(name));
        acc
    }

    fn abc() -> ListDataState { ListDataState::new(vec![row("A"), row("B"), row("C")], false) }

    fn names(state: &ListDataState) -> Vec<String> {
        state
            .items
            .iter()
            .map(|it| it["name"].to_string())
            .collect()
    }

    #[test]
    fn test_swap_items() {
        let state = abc().reduce(&ListDataAction::SwapItems(0, 2)).unwrap();
        assert_eq!(names(&state), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_insert_update_remove() {
        let state = abc();
        let state = state
            .reduce(&ListDataAction::InsertItem {
                item: row("X"),
                index: 1,
            })
            .unwrap();
        assert_eq!(names(&state), vec!["A", "X", "B", "C"]);

        let state = state
            .reduce(&ListDataAction::InsertItem {
                item: row("Z"),
                index: 4,
            })
            .unwrap();
        assert_eq!(names(&state), vec!["A", "X", "B", "C", "Z"]);

        let state = state
            .reduce(&ListDataAction::UpdateItem {
                index: 0,
                item: row("a"),
            })
            .unwrap();
        let state = state.reduce(&ListDataAction::RemoveItem(2)).unwrap();
        assert_eq!(names(&state), vec!["a", "X", "C", "Z"]);
    }

    #[test]
    fn test_pagination() {
        let state = ListDataState::default()
            .reduce(&ListDataAction::SetItems {
                items: vec![row("A")],
                has_more_items: true,
            })
            .unwrap()
            .reduce(&ListDataAction::AppendItems {
                items: vec![row("B"), row("C")],
                has_more_items: false,
            })
            .unwrap();
        assert_eq!(names(&state), vec!["A", "B", "C"]);
        assert!(!state.has_more_items);

        let state = state.reduce(&ListDataAction::ClearItems).unwrap();
        assert!(state.is_empty());
    }

    #[test_case(ListDataAction::RemoveItem(3) ; "remove")]
    #[test_case(ListDataAction::SwapItems(0, 3) ; "swap")]
    #[test_case(ListDataAction::UpdateItem { index: 3, item: FieldValues::new() } ; "update")]
    #[test_case(ListDataAction::InsertItem { item: FieldValues::new(), index: 4 } ; "insert")]
    fn test_out_of_bounds_fails_fast(action: ListDataAction) {
        let state = abc();
        assert!(matches!(
            state.reduce(&action),
            Err(FormError::IndexOutOfBounds { len: 3, .. })
        ));
        assert_eq!(state, abc());
    }
}
