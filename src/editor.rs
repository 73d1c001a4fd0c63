//! # Template Editor
//!
//! One editing session over one template. The editor owns the template and
//! is the only way to change it from outside the crate:
//!
//! ```text
//!   Operation ──prepare──▶ Action ──apply──▶ Template
//!                             │                  │
//!                          Command           repack touched
//!                         ╱       ╲            sections
//!                   History     ActivityLog
//! ```
//!
//! Every accepted operation becomes exactly one command on the undo stack and
//! one entry in the activity feed. A rejected operation changes nothing.
//!
//! The editor keeps a *baseline*: the template as it was before the oldest
//! command still on the undo stack. Commands evicted by the depth cap are
//! folded into it, so replaying the undo stack over the baseline always
//! reproduces the current template.

use tracing::{debug, info, warn};

use crate::activity::ActivityLog;
use crate::command::{Action, Command, Operation};
use crate::config::BuilderConfig;
use crate::error::BuilderError;
use crate::history::History;
use crate::keymap::{KeyChord, Shortcut};
use crate::layout::{Row, TemplateLayout};
use crate::model::{SectionKind, Template};
use crate::placement::{DropStrategy, PlacementController, Viewport};
use crate::store::TemplateStore;

#[derive(Debug, Clone)]
pub struct TemplateEditor {
    template: Template,
    baseline: Template,
    layout: TemplateLayout,
    history: History,
    activity: ActivityLog,
    viewport: Viewport,
    next_command_id: u64,
}

impl TemplateEditor {
    /// Start editing `template` with the default limits.
    pub fn new(template: Template) -> Self {
        Self::with_config(template, &BuilderConfig::default())
    }

    pub fn with_config(template: Template, config: &BuilderConfig) -> Self {
        Self {
            layout: TemplateLayout::of(&template),
            baseline: template.clone(),
            template,
            history: History::new(config.history_depth),
            activity: ActivityLog::new(config.activity_capacity),
            viewport: config.viewport,
            next_command_id: 1,
        }
    }

    /// An empty template.
    pub fn blank(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(Template::new(id, name))
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Packed rows of every region, always in sync with the template.
    pub fn layout(&self) -> &TemplateLayout {
        &self.layout
    }

    pub fn rows(&self, kind: SectionKind) -> &[Row] {
        self.layout.rows(kind)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// The state that the undo stack replays from.
    pub fn baseline(&self) -> &Template {
        &self.baseline
    }

    /// Empty the activity feed. Undo and redo are unaffected.
    pub fn clear_activity(&mut self) {
        self.activity.clear();
    }

    /// A placement controller for the configured viewport.
    pub fn placement<S: DropStrategy>(&self, strategy: S) -> PlacementController<S> {
        PlacementController::new(self.viewport, strategy)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Validate and apply an operation as one undoable command.
    ///
    /// Clears the redo stack. On error nothing changes.
    pub fn execute(&mut self, operation: Operation) -> Result<&Template, BuilderError> {
        let action = match operation.prepare(&self.template) {
            Ok(action) => action,
            Err(e) => {
                warn!(target: "folio::editor", error = %e, "rejected operation");
                return Err(e);
            }
        };
        action.apply(&mut self.template)?;
        self.repack(&action);

        let command = Command::new(self.next_id(), action);
        debug!(
            target: "folio::editor",
            id = command.id(),
            action = %command.action_type(),
            "{}",
            command.message()
        );
        self.activity.record(&command);

        // The oldest command was prepared against exactly the baseline, so
        // folding it cannot fail while replay(baseline, applied) == template.
        for evicted in self.history.push(command) {
            let folded = evicted.action().apply(&mut self.baseline);
            debug_assert!(
                folded.is_ok(),
                "evicted command {} does not apply to baseline: {folded:?}",
                evicted.id()
            );
            if let Err(e) = folded {
                warn!(target: "folio::editor", id = evicted.id(), error = %e, "could not fold evicted command into baseline");
            }
        }
        Ok(&self.template)
    }

    /// Revert the most recent command. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Result<&Template, BuilderError>> {
        let command = self.history.pop_applied()?;
        if let Err(e) = command.action().revert(&mut self.template) {
            warn!(target: "folio::editor", id = command.id(), error = %e, "undo failed");
            self.history.push_applied(command);
            return Some(Err(e));
        }
        self.repack(command.action());
        debug!(target: "folio::editor", id = command.id(), "undid: {}", command.message());
        self.activity.record_undo(&command);
        self.history.push_undone(command);
        Some(Ok(&self.template))
    }

    /// Re-apply the most recently undone command. `None` when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> Option<Result<&Template, BuilderError>> {
        let command = self.history.pop_undone()?;
        if let Err(e) = command.action().apply(&mut self.template) {
            warn!(target: "folio::editor", id = command.id(), error = %e, "redo failed");
            self.history.push_undone(command);
            return Some(Err(e));
        }
        self.repack(command.action());
        debug!(target: "folio::editor", id = command.id(), "redid: {}", command.message());
        self.activity.record_redo(&command);
        self.history.push_applied(command);
        Some(Ok(&self.template))
    }

    pub fn handle_shortcut(&mut self, shortcut: Shortcut) -> Option<Result<&Template, BuilderError>> {
        match shortcut {
            Shortcut::Undo => self.undo(),
            Shortcut::Redo => self.redo(),
        }
    }

    /// Dispatch a key press. Unbound chords do nothing.
    pub fn handle_key(&mut self, chord: KeyChord) -> Option<Result<&Template, BuilderError>> {
        let shortcut = chord.shortcut()?;
        self.handle_shortcut(shortcut)
    }

    /// Record a save point in the activity feed. Not undoable; the history is
    /// left alone.
    pub fn mark_saved(&mut self) {
        let command = Command::new(
            self.next_id(),
            Action::Save {
                template: self.template.name.clone(),
            },
        );
        info!(target: "folio::editor", template = %self.template.id, "saved");
        self.activity.record(&command);
    }

    /// Hand the template to `store`, then mark it saved. A failed save
    /// changes nothing.
    pub fn save_to(&mut self, store: &mut dyn TemplateStore) -> Result<(), BuilderError> {
        if let Err(e) = store.save(&self.template) {
            warn!(target: "folio::editor", template = %self.template.id, error = %e, "save failed");
            return Err(e);
        }
        self.mark_saved();
        Ok(())
    }

    /// The template document in its persisted form.
    pub fn serialize(&self) -> Template {
        self.template.clone()
    }

    /// Replace the template with an imported one. Both history stacks and the
    /// activity feed start over.
    pub fn hydrate(&mut self, template: Template) -> Result<&Template, BuilderError> {
        let template = template.normalize()?;
        self.layout = TemplateLayout::of(&template);
        for (section, field) in self.layout.clamped_fields() {
            warn!(
                target: "folio::editor",
                field = %field,
                section = %section,
                "field width out of range, laid out at full width"
            );
        }
        self.baseline = template.clone();
        self.template = template;
        self.history.clear();
        self.activity.clear();
        info!(
            target: "folio::editor",
            template = %self.template.id,
            fields = self.template.field_count(),
            "hydrated"
        );
        Ok(&self.template)
    }

    pub fn hydrate_json(&mut self, json: &str) -> Result<&Template, BuilderError> {
        let template = Template::from_json(json)?;
        self.hydrate(template)
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_command_id;
        self.next_command_id += 1;
        id
    }

    fn repack(&mut self, action: &Action) {
        for kind in action.affected_sections() {
            self.layout.repack(&self.template, kind);
        }
    }
}
