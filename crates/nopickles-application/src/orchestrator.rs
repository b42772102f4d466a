//! Conversation orchestrator: the core control loop.

use crate::registry::SessionRegistry;
use crate::reply;
use nopickles_core::error::{NoPicklesError, Result};
use nopickles_core::menu::MenuCatalog;
use nopickles_core::order::{OrderSession, OrderSnapshot, Speaker, Stage};
use nopickles_core::{Intent, ItemRequest};
use nopickles_interaction::{Interpreter, InterpretRequest};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// How much conversation history is handed to the interpreter.
const CONTEXT_TURNS: usize = 8;

/// Result of handling one utterance: the reply plus a snapshot of the
/// order after the transition. This is what the HTTP layer wraps as
/// `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct HandleOutcome {
    pub reply_text: String,
    pub snapshot: OrderSnapshot,
}

/// One row of the sessions listing (`GET /api/orders`).
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub snapshot: OrderSnapshot,
}

/// Receives (session id, utterance) pairs and advances the matching order
/// session through its lifecycle, producing a natural-language reply.
///
/// The orchestrator owns no global state: the registry, interpreter and
/// catalog are injected at construction and live as long as the serving
/// process.
pub struct Orchestrator {
    registry: Arc<SessionRegistry>,
    interpreter: Arc<Interpreter>,
    catalog: Arc<MenuCatalog>,
}

impl Orchestrator {
    pub fn new(
        registry: Arc<SessionRegistry>,
        interpreter: Arc<Interpreter>,
        catalog: Arc<MenuCatalog>,
    ) -> Self {
        Self {
            registry,
            interpreter,
            catalog,
        }
    }

    /// Handles one customer utterance for a session.
    ///
    /// Fetches or creates the session, interprets the utterance in context,
    /// applies the transition table, and returns the reply together with an
    /// order snapshot. Malformed input never fails: it degrades to a
    /// conversational reply.
    ///
    /// Only this session's mutex is held across the interpreter call, so
    /// utterances for different sessions proceed in parallel while
    /// utterances for the same session are serialized.
    pub async fn handle(&self, session_id: &str, utterance: &str) -> HandleOutcome {
        let session = self.registry.get_or_create(session_id).await;
        let mut session = session.lock().await;

        session.push_turn(Speaker::Customer, utterance);

        let request = InterpretRequest::new(utterance, session.stage, self.catalog.menu_text())
            .with_recent_turns(session.recent_turns(CONTEXT_TURNS).to_vec());
        let intent = self.interpreter.interpret(&request).await;
        debug!(session_id, ?intent, stage = ?session.stage, "interpreted utterance");

        let reply_text = self.apply_intent(&mut session, intent);
        session.push_turn(Speaker::Assistant, reply_text.clone());

        HandleOutcome {
            reply_text,
            snapshot: session.snapshot(),
        }
    }

    /// Lists all current sessions with their order snapshots.
    pub async fn list_sessions(&self) -> Vec<SessionSummary> {
        let mut summaries = Vec::new();
        for session_id in self.registry.list_ids().await {
            if let Some(session) = self.registry.get(&session_id).await {
                let snapshot = session.lock().await.snapshot();
                summaries.push(SessionSummary {
                    session_id,
                    snapshot,
                });
            }
        }
        summaries
    }

    /// Returns the snapshot for a single session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown session id; this is a boundary
    /// concern for the listing endpoint, not a core-logic fault.
    pub async fn session_snapshot(&self, session_id: &str) -> Result<OrderSnapshot> {
        let session = self
            .registry
            .get(session_id)
            .await
            .ok_or_else(|| NoPicklesError::not_found("session", session_id))?;
        let snapshot = session.lock().await.snapshot();
        Ok(snapshot)
    }

    /// Applies one intent to a session per the transition table.
    ///
    /// This is a pure function of (stage, line items, intent): reapplying
    /// the same intent in the same state yields the same resulting state
    /// and total, independent of any model nondeterminism upstream.
    fn apply_intent(&self, session: &mut OrderSession, intent: Intent) -> String {
        // Terminal state: total and line items are frozen.
        if session.is_completed() {
            return reply::already_completed();
        }

        match intent {
            Intent::Unrecognized(_) => reply::clarification(),

            Intent::Greet => {
                if session.stage == Stage::Greeting {
                    session.stage = Stage::Ordering;
                    reply::welcome()
                } else {
                    reply::anything_else()
                }
            }

            Intent::AddItems(requests) => {
                let was_greeting = session.stage == Stage::Greeting;
                if was_greeting {
                    session.stage = Stage::Ordering;
                }
                let confirmation = self.add_items(session, &requests);
                if was_greeting {
                    format!("{} {confirmation}", reply::welcome())
                } else {
                    confirmation
                }
            }

            Intent::RemoveItems(requests) => {
                if session.stage == Stage::Greeting {
                    session.stage = Stage::Ordering;
                }
                self.remove_items(session, &requests)
            }

            // Stage unchanged.
            Intent::QueryTotal => reply::total_only(session.total()),

            Intent::Finish => {
                if session.line_items.is_empty() {
                    reply::nothing_ordered_yet()
                } else {
                    session.complete();
                    reply::order_summary(session)
                }
            }
        }
    }

    /// Resolves and applies add requests. Unresolvable names are collected
    /// and reported in the reply, never silently dropped.
    fn add_items(&self, session: &mut OrderSession, requests: &[ItemRequest]) -> String {
        let mut added: Vec<(String, u32, Decimal)> = Vec::new();
        let mut missing: Vec<String> = Vec::new();

        for request in requests {
            match self.catalog.find_by_name(&request.name) {
                Some(item) => {
                    session.add_item(item, request.quantity);
                    let subtotal = item.price * Decimal::from(request.quantity);
                    added.push((item.name.clone(), request.quantity, subtotal));
                }
                None => missing.push(request.name.clone()),
            }
        }

        reply::added(&added, &missing, session.total())
    }

    /// Resolves and applies remove requests, distinguishing items that are
    /// not on the order from names that do not resolve at all.
    fn remove_items(&self, session: &mut OrderSession, requests: &[ItemRequest]) -> String {
        let mut removed: Vec<String> = Vec::new();
        let mut not_on_order: Vec<String> = Vec::new();
        let mut missing: Vec<String> = Vec::new();

        for request in requests {
            match self.catalog.find_by_name(&request.name) {
                Some(item) => {
                    if session.remove_item(&item.id, request.quantity) {
                        removed.push(item.name.clone());
                    } else {
                        not_on_order.push(item.name.clone());
                    }
                }
                None => missing.push(request.name.clone()),
            }
        }

        reply::removed(&removed, &not_on_order, &missing, session.total())
    }
}
