//! Navigation and selection state
//!
//! Tracks the cursor of the domain, bean and label lists, which domain and
//! bean are current, and which beans and labels the operator marked as used.
//! The catalog stays the sole owner of beans and labels; this module only
//! keeps indices into it and name-keyed flags.

mod cursor;
mod model;

pub use cursor::NavigationCursor;
pub use model::SelectionModel;

/// The three navigable lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// Domain list
    Domain,
    /// Beans of the current domain
    Bean,
    /// Labels of the current bean
    Label,
}

impl ListKind {
    /// All lists, in pane order
    pub const ALL: [ListKind; 3] = [ListKind::Domain, ListKind::Bean, ListKind::Label];

    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Domain => "domain",
            ListKind::Bean => "bean",
            ListKind::Label => "label",
        }
    }
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an operation left the state untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// Cursor already on the first item
    AtTop,
    /// Cursor already on the last item
    AtBottom,
    /// The list has no items or no rows
    Empty,
    /// No current domain or bean to operate on
    NoSelection,
    /// No item with the requested name
    NotFound,
}

impl std::fmt::Display for NoOpReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoOpReason::AtTop => write!(f, "reached top"),
            NoOpReason::AtBottom => write!(f, "reached bottom"),
            NoOpReason::Empty => write!(f, "list is empty"),
            NoOpReason::NoSelection => write!(f, "nothing selected"),
            NoOpReason::NotFound => write!(f, "no such item"),
        }
    }
}

/// Outcome of a cursor move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Row cursor moved inside the viewport
    Moved,
    /// Viewport scrolled by one item
    Scrolled,
    /// Nothing changed
    NoOp(NoOpReason),
}

impl Navigation {
    /// Whether the selected item changed
    pub fn changed(&self) -> bool {
        !matches!(self, Navigation::NoOp(_))
    }
}

/// Outcome of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Item is now used
    On,
    /// Item is no longer used
    Off,
    /// Nothing changed
    NoOp(NoOpReason),
}

impl Toggle {
    /// Whether a used flag flipped
    pub fn changed(&self) -> bool {
        !matches!(self, Toggle::NoOp(_))
    }
}
