//! Filter Controller: orchestrates preference, gate, sync and rendering
//!
//! All handlers run on the caller's event thread and take `&mut self`.
//! The only asynchronous work is the remote push, which is detached and
//! never awaited here.

use super::gate::{ConfirmationGate, Dismissal, GateState, ToggleDecision};
use super::surface::{
    ConfirmationSurface, FilterMarker, Notifier, RenderSurface, Severity, TextField,
};
use crate::error::Result;
use crate::feed::Feed;
use crate::preference::{PreferenceStore, RemoteSyncClient};
use crate::search::Query;
use crate::visibility::{GroupSelection, RenderPlan, VisibilityCompositor, VisibilityMap};
use serde_json::Value;
use tokio::task::JoinHandle;

/// Ephemeral view inputs owned by the controller
#[derive(Debug, Clone, Default)]
struct ViewState {
    query: Query,
    selection: GroupSelection,
}

/// Event-driven controller for search and the sensitive-content filter
pub struct FilterController<R, N, C> {
    feed: Feed,
    store: PreferenceStore,
    sync: RemoteSyncClient,
    gate: ConfirmationGate,
    compositor: VisibilityCompositor,
    view: ViewState,
    visibility: VisibilityMap,
    last_plan: RenderPlan,
    pending_push: Option<JoinHandle<Result<()>>>,
    render: R,
    notifier: N,
    confirmation: C,
}

impl<R, N, C> FilterController<R, N, C>
where
    R: RenderSurface,
    N: Notifier,
    C: ConfirmationSurface,
{
    pub fn new(
        feed: Feed,
        store: PreferenceStore,
        sync: RemoteSyncClient,
        compositor: VisibilityCompositor,
        render: R,
        notifier: N,
        confirmation: C,
    ) -> Self {
        Self {
            feed,
            store,
            sync,
            gate: ConfirmationGate::default(),
            compositor,
            view: ViewState::default(),
            visibility: VisibilityMap::default(),
            last_plan: RenderPlan::default(),
            pending_push: None,
            render,
            notifier,
            confirmation,
        }
    }

    /// Replace the gate (e.g. to customize the warning notice)
    pub fn with_gate(mut self, gate: ConfirmationGate) -> Self {
        self.gate = gate;
        self
    }

    /// Load the persisted preference and render the initial pass
    pub fn start(&mut self) -> bool {
        let hide_sensitive = self.store.load();
        self.render.set_filter_marker(&FilterMarker::for_state(hide_sensitive));
        self.refresh();
        tracing::info!(hide_sensitive, items = self.feed.len(), "Filter controller started");
        hide_sensitive
    }

    // =========================================================================
    // Filter toggle
    // =========================================================================

    /// Flip the filter; revealing waits for confirmation
    pub fn toggle(&mut self) -> ToggleDecision {
        let requested = !self.store.get();
        self.request(requested)
    }

    /// Ask for a specific filter value; revealing waits for confirmation
    pub fn request(&mut self, hide_sensitive: bool) -> ToggleDecision {
        let current = self.store.get();
        let decision = self
            .gate
            .request(current, hide_sensitive, &mut self.confirmation);

        if let ToggleDecision::Commit(value) = decision {
            let message = if value {
                "Sensitive content hidden"
            } else {
                "Sensitive content shown"
            };
            self.commit(value, message);
        }
        decision
    }

    /// User confirmed the reveal; returns whether anything was committed
    pub fn confirm_reveal(&mut self) -> bool {
        match self.gate.confirm(&mut self.confirmation) {
            Some(value) => {
                self.commit(value, "Sensitive content is now visible");
                true
            }
            None => false,
        }
    }

    /// User dismissed the reveal prompt; the filter stays as it was
    pub fn cancel_reveal(&mut self, reason: Dismissal) -> bool {
        self.gate.cancel(reason, &mut self.confirmation)
    }

    fn commit(&mut self, hide_sensitive: bool, message: &str) {
        self.store.set(hide_sensitive);
        // Detached: a later toggle may overtake this push, which is accepted.
        // Replacing the handle does not cancel the previous push.
        self.pending_push = self.sync.push(hide_sensitive);
        self.render.set_filter_marker(&FilterMarker::for_state(hide_sensitive));
        self.refresh();
        self.notifier.notify(message, Severity::Info);
        tracing::info!(hide_sensitive, "Filter preference committed");
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Handle a keystroke in the search box
    pub fn set_query(&mut self, raw: &str) {
        self.apply_query(Query::new(raw));
    }

    /// Handle untyped search input; non-strings clear the query
    pub fn set_query_value(&mut self, value: &Value) {
        self.apply_query(Query::from_value(value));
    }

    /// The search surface was closed: reset the query and clear highlights
    pub fn close_search(&mut self) {
        self.view.query = Query::empty();
        self.refresh();
    }

    fn apply_query(&mut self, query: Query) {
        let changed = query != self.view.query;
        self.view.query = query;
        self.refresh();

        if !changed || self.view.query.is_empty() {
            return;
        }
        if self.visibility.no_results() {
            self.notifier.notify("No results found", Severity::Error);
        } else {
            let message = format!("Showing results for: \"{}\"", self.view.query.as_str());
            self.notifier.notify(&message, Severity::Success);
        }
    }

    // =========================================================================
    // Category selection
    // =========================================================================

    /// Narrow the displayed groups; item visibility is unaffected
    pub fn select_group(&mut self, selection: GroupSelection) {
        let message = format!("Filtering by: {}", selection.label());
        self.view.selection = selection;
        self.refresh();
        self.notifier.notify(&message, Severity::Info);
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Recompute visibility from scratch and push it to the render surface
    pub fn refresh(&mut self) -> &RenderPlan {
        let items = self.feed.items();
        let hide_sensitive = self.store.get();
        self.visibility = self
            .compositor
            .recompute(items, &self.view.query, hide_sensitive);
        let plan = self.compositor.plan(
            items,
            &self.view.query,
            &self.visibility,
            &self.view.selection,
        );

        for item in &plan.items {
            self.render.set_item_visible(&item.id, item.visible);
            self.render
                .replace_text(&item.id, TextField::Title, &item.title);
            self.render
                .replace_text(&item.id, TextField::Description, &item.description);
        }
        for group in &plan.groups {
            self.render.set_group_visible(&group.group, group.visible);
        }

        self.last_plan = plan;
        &self.last_plan
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn hide_sensitive(&self) -> bool {
        self.store.get()
    }

    pub fn query(&self) -> &Query {
        &self.view.query
    }

    pub fn selection(&self) -> &GroupSelection {
        &self.view.selection
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn visibility(&self) -> &VisibilityMap {
        &self.visibility
    }

    /// Handle of the most recent remote push, for callers that must let it
    /// finish before exiting. Local state never depends on it.
    pub fn take_pending_push(&mut self) -> Option<JoinHandle<Result<()>>> {
        self.pending_push.take()
    }

    /// Instructions from the most recent render pass
    pub fn plan(&self) -> &RenderPlan {
        &self.last_plan
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn render_surface(&self) -> &R {
        &self.render
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn confirmation_surface(&self) -> &C {
        &self.confirmation
    }
}
