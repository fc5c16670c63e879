//! Editing session for a single fulfillment.
//!
//! A session wraps the units resolved for one fulfillment and tracks where
//! the merchant is in its lifecycle:
//!
//! ```text
//! New ──save_draft/fulfil──▶ Saved(kind) ──begin_edit──▶ Editing
//!                               ▲  │                        │
//!                               │  └──remove──▶ Removed ◀───┤
//!                               └──────save_draft/fulfil────┘
//!
//! Locked (read-only, terminal)
//! ```
//!
//! Sessions never persist anything. Saving yields a [`SaveRequest`] for the
//! caller to hand to the store; once the store has the new record, the caller
//! opens a fresh session from refreshed snapshots.

use serde::{Deserialize, Serialize};

use crate::reconcile::{
    ItemSelection, ItemSelections, SelectionSummary, resolve_availability, resolve_for_edit,
};
use crate::types::{
    AllocatedItem, FulfillmentId, FulfillmentRecord, LineItemId, OrderSnapshot, RefundRecord,
};

/// How a fulfillment was last saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveKind {
    /// Saved for later, units reserved but not shipped.
    Draft,
    /// Marked as fulfilled.
    Fulfilled,
}

/// Where a session is in the fulfillment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "kind")]
pub enum SessionState {
    /// A fulfillment that has not been saved yet.
    New,
    /// A saved fulfillment.
    Saved(SaveKind),
    /// A saved fulfillment whose units are being changed.
    Editing,
    /// A fulfillment locked by the store. Read-only.
    Locked,
    /// A fulfillment that has been removed.
    Removed,
}

impl SessionState {
    /// Returns true if units can be checked or unchecked.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::New | Self::Editing)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Saved(SaveKind::Draft) => write!(f, "saved (draft)"),
            Self::Saved(SaveKind::Fulfilled) => write!(f, "saved (fulfilled)"),
            Self::Editing => write!(f, "editing"),
            Self::Locked => write!(f, "locked"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

/// Errors from session operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The fulfillment is not in the supplied list.
    #[error("fulfillment {0} not found")]
    UnknownFulfillment(FulfillmentId),
    /// The fulfillment is locked by the store.
    #[error("fulfillment {0} is locked")]
    Locked(FulfillmentId),
    /// The action is not allowed in the current state.
    #[error("cannot {action} a fulfillment that is {from}")]
    InvalidTransition {
        /// State the session was in.
        from: SessionState,
        /// Attempted action.
        action: &'static str,
    },
    /// No unit is selected.
    #[error("select at least one item to fulfil")]
    NothingSelected,
    /// The unit is not part of this session.
    #[error("no unit {index} for line item {item_id}")]
    UnknownUnit {
        /// Line item ID.
        item_id: LineItemId,
        /// Unit index.
        index: usize,
    },
}

/// What the caller should persist after a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    /// Existing record to update, or `None` to create one.
    pub fulfillment_id: Option<FulfillmentId>,
    /// Draft or fulfilled.
    pub kind: SaveKind,
    /// Units to allocate to the record.
    pub allocated_items: Vec<AllocatedItem>,
}

/// Units and lifecycle state for one fulfillment being created or edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FulfillmentSession {
    fulfillment_id: Option<FulfillmentId>,
    state: SessionState,
    selections: ItemSelections,
}

impl FulfillmentSession {
    /// Start a new fulfillment over every available unit, none selected.
    ///
    /// Only order line items are offered. Stale allocations and unmatched
    /// refunds carried by availability are left out.
    #[must_use]
    pub fn start(
        order: &OrderSnapshot,
        fulfillments: &[FulfillmentRecord],
        refunds: &[RefundRecord],
    ) -> Self {
        let mut selections = resolve_availability(order, fulfillments, refunds);
        selections.retain(|entry| order.line_item(entry.item_id).is_some());
        selections.iter_mut().for_each(ItemSelection::uncheck_all);

        Self {
            fulfillment_id: None,
            state: SessionState::New,
            selections,
        }
    }

    /// Open an existing fulfillment. Its own units are shown checked, ahead
    /// of whatever else is still available.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownFulfillment`] if `fulfillment_id` is
    /// not in `fulfillments`.
    pub fn open(
        order: &OrderSnapshot,
        fulfillments: &[FulfillmentRecord],
        refunds: &[RefundRecord],
        fulfillment_id: FulfillmentId,
    ) -> Result<Self, SessionError> {
        let record = fulfillments
            .iter()
            .find(|f| f.id == fulfillment_id)
            .ok_or(SessionError::UnknownFulfillment(fulfillment_id))?;
        let selections = resolve_for_edit(order, fulfillments, refunds, fulfillment_id)
            .ok_or(SessionError::UnknownFulfillment(fulfillment_id))?;

        let state = if record.is_locked {
            SessionState::Locked
        } else if record.is_fulfilled {
            SessionState::Saved(SaveKind::Fulfilled)
        } else {
            SessionState::Saved(SaveKind::Draft)
        };

        Ok(Self {
            fulfillment_id: Some(fulfillment_id),
            state,
            selections,
        })
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Fulfillment being edited, if it has been saved before.
    #[must_use]
    pub const fn fulfillment_id(&self) -> Option<FulfillmentId> {
        self.fulfillment_id
    }

    /// Returns true if units cannot be changed in the current state.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        !self.state.is_editable()
    }

    /// Units in this session.
    #[must_use]
    pub const fn selections(&self) -> &ItemSelections {
        &self.selections
    }

    /// Selected vs. total units.
    #[must_use]
    pub fn summary(&self) -> SelectionSummary {
        self.selections.summary()
    }

    /// Move a saved fulfillment into editing.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Locked`] for a locked record, and
    /// [`SessionError::InvalidTransition`] unless the session is saved.
    pub fn begin_edit(&mut self) -> Result<(), SessionError> {
        match (self.state, self.fulfillment_id) {
            (SessionState::Locked, Some(id)) => Err(SessionError::Locked(id)),
            (SessionState::Saved(_), _) => {
                self.state = SessionState::Editing;
                Ok(())
            }
            (from, _) => Err(SessionError::InvalidTransition {
                from,
                action: "edit",
            }),
        }
    }

    /// Set one unit's `checked` flag.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] if the session is read-only
    /// and [`SessionError::UnknownUnit`] if the unit does not exist.
    pub fn set_checked(
        &mut self,
        item_id: LineItemId,
        index: usize,
        checked: bool,
    ) -> Result<(), SessionError> {
        self.ensure_editable("change")?;
        let updated = self
            .selections
            .get_mut(item_id)
            .is_some_and(|entry| entry.set_checked(index, checked));
        if updated {
            Ok(())
        } else {
            Err(SessionError::UnknownUnit { item_id, index })
        }
    }

    /// Flip one unit's `checked` flag, returning the new value.
    ///
    /// # Errors
    ///
    /// Same as [`set_checked`](Self::set_checked).
    pub fn toggle(&mut self, item_id: LineItemId, index: usize) -> Result<bool, SessionError> {
        self.ensure_editable("change")?;
        self.selections
            .get_mut(item_id)
            .and_then(|entry| entry.toggle(index))
            .ok_or(SessionError::UnknownUnit { item_id, index })
    }

    /// Check every unit.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] if the session is read-only.
    pub fn select_all(&mut self) -> Result<(), SessionError> {
        self.ensure_editable("change")?;
        self.selections.iter_mut().for_each(|entry| entry.check_all());
        Ok(())
    }

    /// Uncheck every unit.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] if the session is read-only.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.ensure_editable("change")?;
        self.selections.iter_mut().for_each(|entry| entry.uncheck_all());
        Ok(())
    }

    /// Save the selected units as a draft.
    ///
    /// # Errors
    ///
    /// See [`fulfil`](Self::fulfil).
    pub fn save_draft(&mut self) -> Result<SaveRequest, SessionError> {
        self.save(SaveKind::Draft)
    }

    /// Save the selected units as fulfilled.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] if the session is read-only
    /// and [`SessionError::NothingSelected`] if no unit is checked.
    pub fn fulfil(&mut self) -> Result<SaveRequest, SessionError> {
        self.save(SaveKind::Fulfilled)
    }

    /// Remove a saved fulfillment, returning the id the caller should delete.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Locked`] for a locked record, and
    /// [`SessionError::InvalidTransition`] unless the session holds a saved
    /// record.
    pub fn remove(&mut self) -> Result<FulfillmentId, SessionError> {
        match (self.state, self.fulfillment_id) {
            (SessionState::Locked, Some(id)) => Err(SessionError::Locked(id)),
            (SessionState::Saved(_) | SessionState::Editing, Some(id)) => {
                self.state = SessionState::Removed;
                tracing::info!(fulfillment_id = %id, "Fulfillment removed");
                Ok(id)
            }
            (from, _) => Err(SessionError::InvalidTransition {
                from,
                action: "remove",
            }),
        }
    }

    fn save(&mut self, kind: SaveKind) -> Result<SaveRequest, SessionError> {
        self.ensure_editable(match kind {
            SaveKind::Draft => "save",
            SaveKind::Fulfilled => "fulfil",
        })?;

        let allocated_items = self.selections.to_allocation();
        if allocated_items.is_empty() {
            return Err(SessionError::NothingSelected);
        }

        tracing::info!(
            fulfillment_id = ?self.fulfillment_id,
            ?kind,
            units = self.selections.checked_units(),
            "Fulfillment saved"
        );

        self.state = SessionState::Saved(kind);
        Ok(SaveRequest {
            fulfillment_id: self.fulfillment_id,
            kind,
            allocated_items,
        })
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), SessionError> {
        match (self.state, self.fulfillment_id) {
            (state, _) if state.is_editable() => Ok(()),
            (SessionState::Locked, Some(id)) => Err(SessionError::Locked(id)),
            (from, _) => Err(SessionError::InvalidTransition { from, action }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{LineItem, OrderId, ProductId, RefundId, RefundLineItem};

    fn order() -> OrderSnapshot {
        OrderSnapshot::new(
            OrderId::new(1),
            vec![
                LineItem::new(LineItemId::new(10), ProductId::new(100), 3),
                LineItem::new(LineItemId::new(11), ProductId::new(101), 1),
            ],
        )
    }

    fn record(id: i64, qty: i64) -> FulfillmentRecord {
        FulfillmentRecord::new(
            FulfillmentId::new(id),
            vec![AllocatedItem::new(LineItemId::new(10), qty)],
        )
    }

    #[test]
    fn test_start_is_new_and_unselected() {
        let session = FulfillmentSession::start(&order(), &[], &[]);
        assert_eq!(session.state(), SessionState::New);
        assert_eq!(session.fulfillment_id(), None);
        assert_eq!(session.summary().selected_units, 0);
        assert_eq!(session.summary().total_units, 4);
    }

    #[test]
    fn test_start_leaves_out_unmatched_refund() {
        let refunds = [RefundRecord::new(
            RefundId::new(1),
            vec![RefundLineItem::new(LineItemId::new(777), ProductId::new(999), -2)],
        )];
        let mut session = FulfillmentSession::start(&order(), &[], &refunds);

        assert!(!session.selections().contains(LineItemId::new(777)));
        assert_eq!(session.summary().selected_units, 0);
        assert_eq!(session.summary().total_units, 4);
        assert_eq!(session.fulfil(), Err(SessionError::NothingSelected));
    }

    #[test]
    fn test_start_leaves_out_stale_allocation() {
        let stale = FulfillmentRecord::new(
            FulfillmentId::new(2),
            vec![AllocatedItem::new(LineItemId::new(404), 3)],
        );
        let mut session = FulfillmentSession::start(&order(), &[stale], &[]);

        assert!(!session.selections().contains(LineItemId::new(404)));
        assert_eq!(session.summary().selected_units, 0);
        assert_eq!(session.save_draft(), Err(SessionError::NothingSelected));
    }

    #[test]
    fn test_edit_save_keeps_other_stale_allocation_out() {
        let fulfillments = [
            record(1, 1),
            FulfillmentRecord::new(
                FulfillmentId::new(2),
                vec![AllocatedItem::new(LineItemId::new(404), 3)],
            ),
        ];
        let mut session =
            FulfillmentSession::open(&order(), &fulfillments, &[], FulfillmentId::new(1)).unwrap();
        session.begin_edit().unwrap();

        let request = session.save_draft().unwrap();
        assert_eq!(
            request.allocated_items,
            vec![AllocatedItem::new(LineItemId::new(10), 1)]
        );
    }

    #[test]
    fn test_save_requires_selection() {
        let mut session = FulfillmentSession::start(&order(), &[], &[]);
        assert_eq!(session.fulfil(), Err(SessionError::NothingSelected));
        assert_eq!(session.state(), SessionState::New);
    }

    #[test]
    fn test_new_fulfil_produces_create_request() {
        let mut session = FulfillmentSession::start(&order(), &[], &[]);
        session.set_checked(LineItemId::new(10), 0, true).unwrap();
        assert!(session.toggle(LineItemId::new(11), 0).unwrap());

        let request = session.fulfil().unwrap();
        assert_eq!(request.fulfillment_id, None);
        assert_eq!(request.kind, SaveKind::Fulfilled);
        assert_eq!(
            request.allocated_items,
            vec![
                AllocatedItem::new(LineItemId::new(10), 1),
                AllocatedItem::new(LineItemId::new(11), 1),
            ]
        );
        assert_eq!(session.state(), SessionState::Saved(SaveKind::Fulfilled));
        assert!(session.is_read_only());
    }

    #[test]
    fn test_unknown_unit() {
        let mut session = FulfillmentSession::start(&order(), &[], &[]);
        assert_eq!(
            session.toggle(LineItemId::new(11), 3),
            Err(SessionError::UnknownUnit {
                item_id: LineItemId::new(11),
                index: 3,
            })
        );
        assert!(session.set_checked(LineItemId::new(99), 0, true).is_err());
    }

    #[test]
    fn test_open_unknown_fulfillment() {
        assert_eq!(
            FulfillmentSession::open(&order(), &[], &[], FulfillmentId::new(5)),
            Err(SessionError::UnknownFulfillment(FulfillmentId::new(5)))
        );
    }

    #[test]
    fn test_open_draft_edit_and_update() {
        let fulfillments = [record(5, 2)];
        let mut session =
            FulfillmentSession::open(&order(), &fulfillments, &[], FulfillmentId::new(5)).unwrap();
        assert_eq!(session.state(), SessionState::Saved(SaveKind::Draft));
        assert_eq!(session.summary().selected_units, 2);

        assert!(matches!(
            session.toggle(LineItemId::new(10), 0),
            Err(SessionError::InvalidTransition { .. })
        ));

        session.begin_edit().unwrap();
        session.set_checked(LineItemId::new(10), 2, true).unwrap();
        let request = session.save_draft().unwrap();

        assert_eq!(request.fulfillment_id, Some(FulfillmentId::new(5)));
        assert_eq!(
            request.allocated_items,
            vec![AllocatedItem::new(LineItemId::new(10), 3)]
        );
        assert_eq!(session.state(), SessionState::Saved(SaveKind::Draft));
    }

    #[test]
    fn test_open_fulfilled_record() {
        let mut fulfilled = record(5, 1);
        fulfilled.is_fulfilled = true;
        let session =
            FulfillmentSession::open(&order(), &[fulfilled], &[], FulfillmentId::new(5)).unwrap();
        assert_eq!(session.state(), SessionState::Saved(SaveKind::Fulfilled));
    }

    #[test]
    fn test_locked_record_is_read_only() {
        let mut locked = record(5, 1);
        locked.is_locked = true;
        let mut session =
            FulfillmentSession::open(&order(), &[locked], &[], FulfillmentId::new(5)).unwrap();

        assert_eq!(session.state(), SessionState::Locked);
        assert!(session.is_read_only());
        let locked_err = Err(SessionError::Locked(FulfillmentId::new(5)));
        assert_eq!(session.begin_edit(), locked_err);
        assert_eq!(session.select_all(), locked_err);
        assert_eq!(
            session.remove(),
            Err(SessionError::Locked(FulfillmentId::new(5)))
        );
    }

    #[test]
    fn test_remove_saved_record() {
        let mut session =
            FulfillmentSession::open(&order(), &[record(5, 1)], &[], FulfillmentId::new(5))
                .unwrap();
        assert_eq!(session.remove(), Ok(FulfillmentId::new(5)));
        assert_eq!(session.state(), SessionState::Removed);
        assert!(matches!(
            session.begin_edit(),
            Err(SessionError::InvalidTransition {
                from: SessionState::Removed,
                ..
            })
        ));
    }

    #[test]
    fn test_remove_new_session_is_invalid() {
        let mut session = FulfillmentSession::start(&order(), &[], &[]);
        assert!(matches!(
            session.remove(),
            Err(SessionError::InvalidTransition {
                from: SessionState::New,
                action: "remove",
            })
        ));
    }

    #[test]
    fn test_select_all_then_clear() {
        let mut session = FulfillmentSession::start(&order(), &[], &[]);
        session.select_all().unwrap();
        assert_eq!(session.summary().selected_units, 4);
        session.clear().unwrap();
        assert!(!session.summary().has_selection());
    }

    #[test]
    fn test_error_messages() {
        let err = SessionError::InvalidTransition {
            from: SessionState::Saved(SaveKind::Draft),
            action: "edit",
        };
        assert_eq!(err.to_string(), "cannot edit a fulfillment that is saved (draft)");
        assert_eq!(
            SessionError::NothingSelected.to_string(),
            "select at least one item to fulfil"
        );
    }
}
