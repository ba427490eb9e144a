//! The host application as seen by the tool.
//!
//! Every operation receives the host explicitly; there is no global
//! "current document" or "current layer". `Session` is the in-memory
//! implementation used by the command-line front end and by tests.

use scrawl_core::{Document, LayerId};
use std::collections::VecDeque;

/// Capability returned by [`Host::subscribe`]; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

/// Host-level notifications a tool can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// The edit view's active layer changed (`None`: no layer is active).
    ActiveLayerChanged { layer: Option<LayerId> },
}

pub trait Host {
    /// Layer under edit in the active view. `None` when no edit view is
    /// available.
    fn active_layer(&self) -> Option<LayerId>;

    /// All layers in the current multi-selection.
    fn selected_layers(&self) -> Vec<LayerId>;

    fn document(&self) -> &Document;

    fn document_mut(&mut self) -> &mut Document;

    /// Start receiving [`Notification::ActiveLayerChanged`].
    fn subscribe(&mut self) -> SubscriptionToken;

    fn unsubscribe(&mut self, token: SubscriptionToken);

    fn is_subscribed(&self, token: SubscriptionToken) -> bool;

    /// Ask for the edit view to be repainted.
    fn request_redraw(&mut self);
}

// ─── In-memory session ───────────────────────────────────────────────────

pub struct Session {
    pub document: Document,
    active: Option<LayerId>,
    selection: Vec<LayerId>,
    /// Whether an edit view is open; when closed, `active_layer` is `None`.
    view_open: bool,
    subscribers: Vec<SubscriptionToken>,
    next_token: u64,
    pending: VecDeque<Notification>,
    redraws: usize,
}

impl Session {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            active: None,
            selection: Vec::new(),
            view_open: true,
            subscribers: Vec::new(),
            next_token: 0,
            pending: VecDeque::new(),
            redraws: 0,
        }
    }

    /// Make `layer` the active (and only selected) layer, notifying
    /// subscribers if it changed.
    pub fn switch_layer(&mut self, layer: Option<LayerId>) {
        self.selection = layer.into_iter().collect();
        if self.active == layer {
            return;
        }
        self.active = layer;
        if !self.subscribers.is_empty() {
            self.pending
                .push_back(Notification::ActiveLayerChanged { layer });
        }
    }

    /// Select several layers; the first becomes active.
    pub fn select(&mut self, layers: &[LayerId]) {
        self.switch_layer(layers.first().copied());
        self.selection = layers.to_vec();
    }

    pub fn set_view_open(&mut self, open: bool) {
        self.view_open = open;
    }

    /// Take the notifications queued since the last call.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }

    pub fn redraw_count(&self) -> usize {
        self.redraws
    }
}

impl Host for Session {
    fn active_layer(&self) -> Option<LayerId> {
        if self.view_open { self.active } else { None }
    }

    fn selected_layers(&self) -> Vec<LayerId> {
        self.selection.clone()
    }

    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn subscribe(&mut self) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_token);
        self.next_token += 1;
        self.subscribers.push(token);
        token
    }

    fn unsubscribe(&mut self, token: SubscriptionToken) {
        self.subscribers.retain(|t| *t != token);
        if self.subscribers.is_empty() {
            self.pending.clear();
        }
    }

    fn is_subscribed(&self, token: SubscriptionToken) -> bool {
        self.subscribers.contains(&token)
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_only_queue_while_subscribed() {
        let mut session = Session::new(Document::new(1000.0));
        let a = LayerId::intern("host-a");
        let b = LayerId::intern("host-b");

        session.switch_layer(Some(a));
        assert!(session.drain_notifications().is_empty());

        let token = session.subscribe();
        session.switch_layer(Some(b));
        session.switch_layer(Some(b));
        assert_eq!(
            session.drain_notifications(),
            vec![Notification::ActiveLayerChanged { layer: Some(b) }]
        );

        session.unsubscribe(token);
        assert!(!session.is_subscribed(token));
        session.switch_layer(Some(a));
        assert!(session.drain_notifications().is_empty());
    }

    #[test]
    fn closed_view_has_no_active_layer() {
        let mut session = Session::new(Document::new(1000.0));
        session.switch_layer(Some(LayerId::intern("host-c")));
        session.set_view_open(false);
        assert_eq!(session.active_layer(), None);
    }

    #[test]
    fn multi_selection_keeps_first_active() {
        let mut session = Session::new(Document::new(1000.0));
        let ids = [LayerId::intern("host-d"), LayerId::intern("host-e")];
        session.select(&ids);
        assert_eq!(session.active_layer(), Some(ids[0]));
        assert_eq!(session.selected_layers(), ids.to_vec());
    }
}
