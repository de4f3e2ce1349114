//! Selection model

use std::collections::{BTreeSet, HashMap, HashSet};

use super::{ListKind, Navigation, NavigationCursor, NoOpReason, Toggle};
use crate::catalog::{Bean, BeanKey, Catalog, Domain, Label};

/// Mutable navigation and selection state over a [`Catalog`]
///
/// Every method that reads beans or labels takes the catalog it was built
/// against. Used flags are keyed by [`BeanKey`] and label index, so they
/// survive a catalog replacement (see [`SelectionModel::rebase`]).
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    domain_cursor: NavigationCursor,
    bean_cursor: NavigationCursor,
    label_cursor: NavigationCursor,
    current_domain: Option<usize>,
    current_bean: Option<usize>,
    used_beans: HashSet<BeanKey>,
    used_labels: HashMap<BeanKey, BTreeSet<usize>>,
}

impl SelectionModel {
    /// Zeroed cursors, nothing selected, nothing used
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor of a list
    pub fn cursor(&self, list: ListKind) -> &NavigationCursor {
        match list {
            ListKind::Domain => &self.domain_cursor,
            ListKind::Bean => &self.bean_cursor,
            ListKind::Label => &self.label_cursor,
        }
    }

    fn cursor_mut(&mut self, list: ListKind) -> &mut NavigationCursor {
        match list {
            ListKind::Domain => &mut self.domain_cursor,
            ListKind::Bean => &mut self.bean_cursor,
            ListKind::Label => &mut self.label_cursor,
        }
    }

    /// Current domain
    pub fn current_domain<'c>(&self, catalog: &'c Catalog) -> Option<&'c Domain> {
        self.current_domain.and_then(|i| catalog.domains().get(i))
    }

    /// Current bean
    pub fn current_bean<'c>(&self, catalog: &'c Catalog) -> Option<&'c Bean> {
        let domain = self.current_domain(catalog)?;
        self.current_bean.and_then(|i| domain.beans.get(i))
    }

    /// Number of items in a list, `None` when the list has no owner selected
    pub fn list_len(&self, catalog: &Catalog, list: ListKind) -> Option<usize> {
        match list {
            ListKind::Domain => Some(catalog.len()),
            ListKind::Bean => self.current_domain(catalog).map(|d| d.beans.len()),
            ListKind::Label => self.current_bean(catalog).map(|b| b.labels.len()),
        }
    }

    /// Select the domain under the domain cursor if nothing is selected yet
    pub fn sync(&mut self, catalog: &Catalog) {
        if self.current_domain(catalog).is_none() {
            self.current_domain = None;
            self.current_bean = None;
            let position = self.domain_cursor.position();
            self.select_domain(catalog, position);
        }
    }

    /// Move the cursor of `list` one item down
    ///
    /// Moving the domain or bean cursor selects the item it lands on.
    pub fn move_down(&mut self, catalog: &Catalog, list: ListKind, height: usize) -> Navigation {
        let Some(total) = self.list_len(catalog, list) else {
            return Navigation::NoOp(NoOpReason::NoSelection);
        };
        let nav = self.cursor_mut(list).move_down(total, height);
        if nav.changed() {
            self.follow_cursor(catalog, list);
        }
        nav
    }

    /// Move the cursor of `list` one item up
    pub fn move_up(&mut self, catalog: &Catalog, list: ListKind, height: usize) -> Navigation {
        let Some(total) = self.list_len(catalog, list) else {
            return Navigation::NoOp(NoOpReason::NoSelection);
        };
        let nav = self.cursor_mut(list).move_up(total, height);
        if nav.changed() {
            self.follow_cursor(catalog, list);
        }
        nav
    }

    fn follow_cursor(&mut self, catalog: &Catalog, list: ListKind) {
        let position = self.cursor(list).position();
        match list {
            ListKind::Domain => {
                self.select_domain(catalog, position);
            }
            ListKind::Bean => {
                self.select_bean(catalog, position);
            }
            ListKind::Label => {}
        }
    }

    /// Fit a cursor to the viewport height the front-end currently shows
    ///
    /// When fitting moves the cursor the current item follows it.
    pub fn fit(&mut self, catalog: &Catalog, list: ListKind, height: usize) {
        let total = self.list_len(catalog, list).unwrap_or(0);
        let before = self.cursor(list).position();
        self.cursor_mut(list).normalize(total, height);
        if total > 0 && self.cursor(list).position() != before {
            self.follow_cursor(catalog, list);
        }
    }

    /// Make `index` the current domain
    ///
    /// A different domain resets the bean and label cursors and makes its
    /// first bean current. Returns `false` when the index is out of range.
    pub fn select_domain(&mut self, catalog: &Catalog, index: usize) -> bool {
        let Some(domain) = catalog.domains().get(index) else {
            return false;
        };
        if self.current_domain != Some(index) {
            self.current_domain = Some(index);
            self.bean_cursor.reset();
            self.label_cursor.reset();
            self.current_bean = (!domain.beans.is_empty()).then_some(0);
        }
        true
    }

    /// Make `index` of the current domain the current bean
    ///
    /// A different bean resets the label cursor. Returns `false` without a
    /// current domain or when the index is out of range.
    pub fn select_bean(&mut self, catalog: &Catalog, index: usize) -> bool {
        let Some(domain) = self.current_domain(catalog) else {
            return false;
        };
        if index >= domain.beans.len() {
            return false;
        }
        if self.current_bean != Some(index) {
            self.current_bean = Some(index);
            self.label_cursor.reset();
        }
        true
    }

    /// Flip the used flag of the named bean in the current domain
    pub fn toggle_bean(&mut self, catalog: &Catalog, name: &str) -> Toggle {
        let Some(domain) = self.current_domain(catalog) else {
            return Toggle::NoOp(NoOpReason::NoSelection);
        };
        if !domain.beans.iter().any(|b| b.name == name) {
            return Toggle::NoOp(NoOpReason::NotFound);
        }

        let key = BeanKey::new(&domain.name, name);
        if self.used_beans.remove(&key) {
            Toggle::Off
        } else {
            self.used_beans.insert(key);
            Toggle::On
        }
    }

    /// Flip the used flag of the named label of the current bean
    pub fn toggle_label(&mut self, catalog: &Catalog, name: &str) -> Toggle {
        let Some(bean) = self.current_bean(catalog) else {
            return Toggle::NoOp(NoOpReason::NoSelection);
        };
        let Some(label) = bean.label(name) else {
            return Toggle::NoOp(NoOpReason::NotFound);
        };

        let key = bean.key();
        let indices = self.used_labels.entry(key.clone()).or_default();
        let toggle = if indices.remove(&label.index) {
            Toggle::Off
        } else {
            indices.insert(label.index);
            Toggle::On
        };
        if indices.is_empty() {
            self.used_labels.remove(&key);
        }
        toggle
    }

    /// Whether a bean is marked used
    pub fn is_bean_used(&self, bean: &Bean) -> bool {
        self.used_beans.contains(&bean.key())
    }

    /// Whether a label of a bean is marked used
    pub fn is_label_used(&self, bean: &Bean, label: &Label) -> bool {
        self.used_labels
            .get(&bean.key())
            .is_some_and(|set| set.contains(&label.index))
    }

    /// Used label indices of a bean, ascending
    pub fn used_labels(&self, key: &BeanKey) -> Option<&BTreeSet<usize>> {
        self.used_labels.get(key)
    }

    /// Whether any label of the bean is used
    pub fn has_used_labels(&self, key: &BeanKey) -> bool {
        self.used_labels.contains_key(key)
    }

    /// Whether the bean key is marked used
    pub fn is_key_used(&self, key: &BeanKey) -> bool {
        self.used_beans.contains(key)
    }

    /// Carry the current domain and bean over to a replacement catalog
    ///
    /// Domain and bean are matched by name. Used flags are untouched; flags
    /// of beans missing from `new` simply stop contributing rules.
    pub fn rebase(&mut self, old: &Catalog, new: &Catalog) {
        let domain_name = self.current_domain(old).map(|d| d.name.clone());
        let bean = self.current_bean(old).cloned();

        self.current_domain = None;
        self.current_bean = None;

        let Some(domain_index) = domain_name.and_then(|n| new.domain_position(&n)) else {
            self.domain_cursor.normalize(new.len(), usize::MAX);
            self.bean_cursor.reset();
            self.label_cursor.reset();
            self.sync(new);
            return;
        };

        self.current_domain = Some(domain_index);
        self.domain_cursor.focus(domain_index);

        let beans = &new.domains()[domain_index].beans;
        let bean_index = bean.and_then(|old_bean| {
            beans
                .iter()
                .position(|b| {
                    b.name == old_bean.name
                        && b.attribute == old_bean.attribute
                        && b.value_name == old_bean.value_name
                })
                .or_else(|| beans.iter().position(|b| b.name == old_bean.name))
        });

        match bean_index {
            Some(i) => {
                self.current_bean = Some(i);
                self.bean_cursor.focus(i);
            }
            None => {
                self.current_bean = (!beans.is_empty()).then_some(0);
                self.bean_cursor.reset();
                self.label_cursor.reset();
            }
        }
    }
}
