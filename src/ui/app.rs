//! Application state
//!
//! [`App`] owns the catalog, the selection and the generated document, and
//! is mutated only by the event loop through [`App::handle`]. Nothing here
//! touches the terminal, so the whole interaction can be driven in tests.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::event::AppEvent;
use super::input::{Action, KeyBinding};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::logging::LogBuffer;
use crate::persist::{self, Clipboard, SaveOutcome};
use crate::refresh::RefreshTrigger;
use crate::selection::{ListKind, Navigation, NoOpReason, SelectionModel, Toggle};
use crate::transformer::{ConfigDocument, RuleBuilder, RuleMode};

/// Rows assumed for a list before the first draw reports real heights
const DEFAULT_VIEWPORT_HEIGHT: usize = 10;

/// Interactive session state
pub struct App {
    catalog: Arc<Catalog>,
    selection: SelectionModel,
    builder: RuleBuilder,
    document: ConfigDocument,
    rendered: String,
    focus: ListKind,
    viewport: [usize; 3],
    bindings: KeyBinding,
    clipboard: Box<dyn Clipboard>,
    fallback_path: PathBuf,
    refresh: Option<RefreshTrigger>,
    logs: LogBuffer,
    status: String,
    should_quit: bool,
}

impl App {
    /// Create the session for `target` over an initial catalog
    pub fn new(
        target: impl Into<String>,
        catalog: Arc<Catalog>,
        config: &Config,
        clipboard: Box<dyn Clipboard>,
        logs: LogBuffer,
    ) -> Self {
        let mut selection = SelectionModel::new();
        selection.sync(&catalog);

        let mut app = Self {
            catalog,
            selection,
            builder: RuleBuilder::new(config.selection.mode),
            document: ConfigDocument::new(target, &config.exporter),
            rendered: String::new(),
            focus: ListKind::Domain,
            viewport: [DEFAULT_VIEWPORT_HEIGHT; 3],
            bindings: KeyBinding::default(),
            clipboard,
            fallback_path: config.output.fallback_path.clone(),
            refresh: None,
            logs,
            status: String::new(),
            should_quit: false,
        };
        app.regenerate();
        app
    }

    /// Attach the handle used by the refresh key
    pub fn with_refresh(mut self, trigger: RefreshTrigger) -> Self {
        self.refresh = Some(trigger);
        self
    }

    /// Replace the default key bindings
    pub fn with_bindings(mut self, bindings: KeyBinding) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// The YAML shown in the config pane and copied on save
    pub fn config_text(&self) -> &str {
        &self.rendered
    }

    pub fn focus(&self) -> ListKind {
        self.focus
    }

    pub fn mode(&self) -> RuleMode {
        self.builder.mode()
    }

    pub fn logs(&self) -> &LogBuffer {
        &self.logs
    }

    /// Last outcome worth showing outside the log pane
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Report the visible row count of a list and refit its cursor
    pub fn set_viewport(&mut self, list: ListKind, height: usize) {
        self.viewport[list_slot(list)] = height;
        self.selection.fit(&self.catalog, list, height);
    }

    /// Visible row count last reported for a list
    pub fn viewport(&self, list: ListKind) -> usize {
        self.viewport[list_slot(list)]
    }

    /// Apply one event
    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => {
                if let Some(action) = self.bindings.action(&key) {
                    self.apply(action);
                }
            }
            AppEvent::Resize => {}
            AppEvent::CatalogRefreshed { catalog, skipped } => {
                self.replace_catalog(catalog, skipped);
            }
            AppEvent::EnumerationFailed(reason) => {
                self.status = format!("refresh failed: {}", reason);
            }
        }
    }

    /// Dispatch an action against the focused pane
    pub fn apply(&mut self, action: Action) {
        match (self.focus, action) {
            (_, Action::Quit) => {
                info!("Quit requested");
                self.should_quit = true;
            }
            (_, Action::Save) => self.save(),
            (_, Action::Refresh) => match &self.refresh {
                Some(trigger) => {
                    info!("Refresh requested");
                    trigger.request();
                }
                None => warn!("Background refresh is not running"),
            },
            (_, Action::NextPane) => self.focus = next_pane(self.focus),
            (_, Action::PrevPane) => self.focus = prev_pane(self.focus),
            (list, Action::Down) => {
                let height = self.viewport(list);
                let nav = self.selection.move_down(&self.catalog, list, height);
                log_navigation(list, nav);
            }
            (list, Action::Up) => {
                let height = self.viewport(list);
                let nav = self.selection.move_up(&self.catalog, list, height);
                log_navigation(list, nav);
            }
            (ListKind::Domain, Action::Toggle) => self.focus = ListKind::Bean,
            (ListKind::Bean, Action::Toggle) => match self.builder.mode() {
                RuleMode::Label => self.focus = ListKind::Label,
                RuleMode::Bean => self.toggle_current_bean(),
            },
            (ListKind::Label, Action::Toggle) => match self.builder.mode() {
                RuleMode::Label => self.toggle_label_under_cursor(),
                RuleMode::Bean => {
                    info!("Label selection has no effect in bean mode");
                }
            },
        }
    }

    fn toggle_current_bean(&mut self) {
        let Some(name) = self
            .selection
            .current_bean(&self.catalog)
            .map(|b| b.name.clone())
        else {
            log_toggle(ListKind::Bean, "", Toggle::NoOp(NoOpReason::NoSelection));
            return;
        };
        let toggle = self.selection.toggle_bean(&self.catalog, &name);
        log_toggle(ListKind::Bean, &name, toggle);
        if toggle.changed() {
            self.regenerate();
        }
    }

    fn toggle_label_under_cursor(&mut self) {
        let position = self.selection.cursor(ListKind::Label).position();
        let Some(name) = self
            .selection
            .current_bean(&self.catalog)
            .and_then(|b| b.labels.get(position))
            .map(|l| l.name.clone())
        else {
            log_toggle(ListKind::Label, "", Toggle::NoOp(NoOpReason::NoSelection));
            return;
        };
        let toggle = self.selection.toggle_label(&self.catalog, &name);
        log_toggle(ListKind::Label, &name, toggle);
        if toggle.changed() {
            self.regenerate();
        }
    }

    fn replace_catalog(&mut self, catalog: Arc<Catalog>, skipped: usize) {
        if *catalog == *self.catalog {
            debug!(skipped, "Catalog unchanged");
            return;
        }

        info!(
            domains = catalog.len(),
            beans = catalog.bean_count(),
            skipped,
            "Catalog refreshed"
        );
        self.selection.rebase(&self.catalog, &catalog);
        self.catalog = catalog;
        for list in ListKind::ALL {
            let height = self.viewport(list);
            self.selection.fit(&self.catalog, list, height);
        }
        self.status.clear();
        self.regenerate();
    }

    fn regenerate(&mut self) {
        self.document
            .regenerate(&self.builder, &self.catalog, &self.selection);
        match self.document.dump() {
            Ok(text) => self.rendered = text,
            Err(e) => error!(error = %e, "Failed to render config"),
        }
    }

    fn save(&mut self) {
        match persist::save(&self.rendered, self.clipboard.as_mut(), &self.fallback_path) {
            Ok(outcome @ SaveOutcome::Clipboard) => {
                info!(rules = self.document.rules().len(), "Config copied to clipboard");
                self.status = outcome.to_string();
            }
            Ok(outcome @ SaveOutcome::File { .. }) => {
                self.status = outcome.to_string();
            }
            Err(e) => {
                error!(error = %e, "Failed to save config");
                self.status = format!("save failed: {}", e);
            }
        }
    }
}

fn list_slot(list: ListKind) -> usize {
    match list {
        ListKind::Domain => 0,
        ListKind::Bean => 1,
        ListKind::Label => 2,
    }
}

fn next_pane(list: ListKind) -> ListKind {
    match list {
        ListKind::Domain => ListKind::Bean,
        ListKind::Bean => ListKind::Label,
        ListKind::Label => ListKind::Domain,
    }
}

fn prev_pane(list: ListKind) -> ListKind {
    match list {
        ListKind::Domain => ListKind::Label,
        ListKind::Bean => ListKind::Domain,
        ListKind::Label => ListKind::Bean,
    }
}

fn log_navigation(list: ListKind, nav: Navigation) {
    if let Navigation::NoOp(reason) = nav {
        info!(list = %list, reason = %reason, "Cursor not moved");
    }
}

fn log_toggle(list: ListKind, name: &str, toggle: Toggle) {
    match toggle {
        Toggle::On => info!(list = %list, name, "Marked used"),
        Toggle::Off => info!(list = %list, name, "Marked unused"),
        Toggle::NoOp(reason) => info!(list = %list, reason = %reason, "Nothing to toggle"),
    }
}
