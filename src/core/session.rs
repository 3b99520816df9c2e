//! core::session
//!
//! Explicit state machines for multi-step interactions.
//!
//! # Design
//!
//! Gateway layers walk operators through "select store, select
//! product, enter identifier" flows. Instead of nested callbacks
//! capturing mutable state, each pending interaction is a tagged
//! variant keyed by a session identifier. The presentation layer feeds
//! inputs in; the machine either advances or rejects the input with
//! what it expected.
//!
//! # Invariants
//!
//! - Transitions consume the current state; an interaction cannot be
//!   advanced twice from the same state
//! - A completed interaction carries everything needed to invoke the
//!   corresponding registry operation
//!
//! # Example
//!
//! ```
//! use turnstile::core::session::{Input, Interaction, WhitelistAction};
//! use turnstile::core::types::{ExternalId, ProductName, StoreName};
//!
//! let flow = Interaction::begin(WhitelistAction::Add);
//! let flow = flow
//!     .advance(Input::Store(StoreName::new("my_shop").unwrap()))
//!     .unwrap();
//! let flow = flow
//!     .advance(Input::Product(ProductName::new("epic_sword").unwrap()))
//!     .unwrap();
//! let flow = flow.advance(Input::Id(ExternalId::new(123))).unwrap();
//! assert!(flow.is_complete());
//! ```

use std::collections::HashMap;

use thiserror::Error;

use super::types::{ExternalId, ProductName, StoreName};

/// Errors from session handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unexpected input: expected {expected}")]
    UnexpectedInput { expected: &'static str },

    #[error("interaction is already complete")]
    AlreadyComplete,

    #[error("no pending interaction for session {0:?}")]
    UnknownSession(String),
}

/// Which whitelist mutation the interaction will perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitelistAction {
    Add,
    Remove,
}

/// Operator input fed into a pending interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Store(StoreName),
    Product(ProductName),
    Id(ExternalId),
}

/// A pending multi-step interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Waiting for a store selection.
    SelectStore { action: WhitelistAction },

    /// Waiting for a product selection within the chosen store.
    SelectProduct {
        action: WhitelistAction,
        store: StoreName,
    },

    /// Waiting for the external identifier.
    EnterId {
        action: WhitelistAction,
        store: StoreName,
        product: ProductName,
    },

    /// All inputs collected; ready to invoke the registry operation.
    Complete {
        action: WhitelistAction,
        store: StoreName,
        product: ProductName,
        id: ExternalId,
    },
}

impl Interaction {
    /// Start a whitelist interaction at store selection.
    pub fn begin(action: WhitelistAction) -> Self {
        Interaction::SelectStore { action }
    }

    /// Feed the next input, consuming the current state.
    pub fn advance(self, input: Input) -> Result<Self, SessionError> {
        match (self, input) {
            (Interaction::SelectStore { action }, Input::Store(store)) => {
                Ok(Interaction::SelectProduct { action, store })
            }
            (Interaction::SelectProduct { action, store }, Input::Product(product)) => {
                Ok(Interaction::EnterId {
                    action,
                    store,
                    product,
                })
            }
            (
                Interaction::EnterId {
                    action,
                    store,
                    product,
                },
                Input::Id(id),
            ) => Ok(Interaction::Complete {
                action,
                store,
                product,
                id,
            }),
            (Interaction::Complete { .. }, _) => Err(SessionError::AlreadyComplete),
            (state, _) => Err(SessionError::UnexpectedInput {
                expected: state.expects(),
            }),
        }
    }

    /// What input the interaction currently expects.
    pub fn expects(&self) -> &'static str {
        match self {
            Interaction::SelectStore { .. } => "a store selection",
            Interaction::SelectProduct { .. } => "a product selection",
            Interaction::EnterId { .. } => "an external identifier",
            Interaction::Complete { .. } => "nothing",
        }
    }

    /// Whether all inputs have been collected.
    pub fn is_complete(&self) -> bool {
        matches!(self, Interaction::Complete { .. })
    }
}

/// Pending interactions keyed by session identifier.
///
/// Sessions are opaque strings chosen by the gateway (one per
/// operator conversation).
#[derive(Debug, Default)]
pub struct InteractionTable {
    pending: HashMap<String, Interaction>,
}

impl InteractionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin an interaction for a session, replacing any pending one.
    pub fn begin(&mut self, session: impl Into<String>, action: WhitelistAction) {
        self.pending
            .insert(session.into(), Interaction::begin(action));
    }

    /// Advance a session's interaction with the next input.
    ///
    /// On success returns the new state (cloned); a completed
    /// interaction stays in the table until [`take_complete`] or
    /// [`cancel`].
    ///
    /// [`take_complete`]: InteractionTable::take_complete
    /// [`cancel`]: InteractionTable::cancel
    pub fn advance(&mut self, session: &str, input: Input) -> Result<Interaction, SessionError> {
        let state = self
            .pending
            .remove(session)
            .ok_or_else(|| SessionError::UnknownSession(session.to_string()))?;
        match state.clone().advance(input) {
            Ok(next) => {
                self.pending.insert(session.to_string(), next.clone());
                Ok(next)
            }
            Err(err) => {
                // Invalid input leaves the interaction where it was.
                self.pending.insert(session.to_string(), state);
                Err(err)
            }
        }
    }

    /// Remove and return a completed interaction, if the session has
    /// one.
    pub fn take_complete(&mut self, session: &str) -> Option<Interaction> {
        if self.pending.get(session).is_some_and(Interaction::is_complete) {
            self.pending.remove(session)
        } else {
            None
        }
    }

    /// Drop a session's pending interaction.
    pub fn cancel(&mut self, session: &str) -> bool {
        self.pending.remove(session).is_some()
    }

    /// Look at a session's pending interaction.
    pub fn get(&self, session: &str) -> Option<&Interaction> {
        self.pending.get(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(raw: &str) -> StoreName {
        StoreName::new(raw).unwrap()
    }

    fn product(raw: &str) -> ProductName {
        ProductName::new(raw).unwrap()
    }

    #[test]
    fn full_flow_completes() {
        let flow = Interaction::begin(WhitelistAction::Add)
            .advance(Input::Store(store("s")))
            .unwrap()
            .advance(Input::Product(product("p")))
            .unwrap()
            .advance(Input::Id(ExternalId::new(1)))
            .unwrap();

        assert_eq!(
            flow,
            Interaction::Complete {
                action: WhitelistAction::Add,
                store: store("s"),
                product: product("p"),
                id: ExternalId::new(1),
            }
        );
    }

    #[test]
    fn out_of_order_input_is_rejected() {
        let flow = Interaction::begin(WhitelistAction::Remove);
        let err = flow.clone().advance(Input::Id(ExternalId::new(1))).unwrap_err();
        assert_eq!(
            err,
            SessionError::UnexpectedInput {
                expected: "a store selection"
            }
        );

        let flow = flow.advance(Input::Store(store("s"))).unwrap();
        let err = flow.advance(Input::Store(store("t"))).unwrap_err();
        assert_eq!(
            err,
            SessionError::UnexpectedInput {
                expected: "a product selection"
            }
        );
    }

    #[test]
    fn complete_interaction_rejects_further_input() {
        let flow = Interaction::begin(WhitelistAction::Add)
            .advance(Input::Store(store("s")))
            .unwrap()
            .advance(Input::Product(product("p")))
            .unwrap()
            .advance(Input::Id(ExternalId::new(1)))
            .unwrap();

        let err = flow.advance(Input::Id(ExternalId::new(2))).unwrap_err();
        assert_eq!(err, SessionError::AlreadyComplete);
    }

    #[test]
    fn table_tracks_sessions_independently() {
        let mut table = InteractionTable::new();
        table.begin("alice", WhitelistAction::Add);
        table.begin("bob", WhitelistAction::Remove);

        table.advance("alice", Input::Store(store("s"))).unwrap();
        assert!(matches!(
            table.get("alice"),
            Some(Interaction::SelectProduct { .. })
        ));
        assert!(matches!(
            table.get("bob"),
            Some(Interaction::SelectStore { .. })
        ));
    }

    #[test]
    fn table_invalid_input_preserves_state() {
        let mut table = InteractionTable::new();
        table.begin("alice", WhitelistAction::Add);

        let err = table
            .advance("alice", Input::Id(ExternalId::new(1)))
            .unwrap_err();
        assert!(matches!(err, SessionError::UnexpectedInput { .. }));
        assert!(matches!(
            table.get("alice"),
            Some(Interaction::SelectStore { .. })
        ));
    }

    #[test]
    fn table_unknown_session() {
        let mut table = InteractionTable::new();
        let err = table
            .advance("ghost", Input::Store(store("s")))
            .unwrap_err();
        assert_eq!(err, SessionError::UnknownSession("ghost".to_string()));
    }

    #[test]
    fn take_complete_only_when_done() {
        let mut table = InteractionTable::new();
        table.begin("alice", WhitelistAction::Add);
        assert!(table.take_complete("alice").is_none());

        table.advance("alice", Input::Store(store("s"))).unwrap();
        table.advance("alice", Input::Product(product("p"))).unwrap();
        table.advance("alice", Input::Id(ExternalId::new(7))).unwrap();

        let done = table.take_complete("alice").unwrap();
        assert!(done.is_complete());
        assert!(table.get("alice").is_none());
    }

    #[test]
    fn cancel_drops_pending_interaction() {
        let mut table = InteractionTable::new();
        table.begin("alice", WhitelistAction::Add);
        assert!(table.cancel("alice"));
        assert!(!table.cancel("alice"));
    }
}
