//! Source / target selection for mirror and extend.
//!
//! Clicking monitors walks a small state machine:
//!
//! ```text
//! (none, none) ──click A──► (A, none) ──click B──► (A, B)
//!      ▲                        │                     │
//!      └──────click A───────────┘        click B ─────┘ → (A, none)
//! ```
//!
//! Clicking a selected monitor deselects it.  A third monitor clicked while
//! both slots are filled is ignored.  Source and target are never the same
//! monitor.

/// What a click did to the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    SourceSet(String),
    TargetSet(String),
    SourceCleared(String),
    TargetCleared(String),
    /// Both slots were taken by other monitors.
    Ignored,
}

/// At most one source and one target monitor, never equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    source: Option<String>,
    target: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Returns `(source, target)` when both are selected.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (&self.source, &self.target) {
            (Some(s), Some(t)) => Some((s, t)),
            _ => None,
        }
    }

    /// Applies a click on monitor `name`.
    pub fn click(&mut self, name: &str) -> SelectionChange {
        if self.source.as_deref() == Some(name) {
            self.source = None;
            return SelectionChange::SourceCleared(name.to_string());
        }
        if self.target.as_deref() == Some(name) {
            self.target = None;
            return SelectionChange::TargetCleared(name.to_string());
        }
        if self.source.is_none() {
            self.source = Some(name.to_string());
            return SelectionChange::SourceSet(name.to_string());
        }
        if self.target.is_none() {
            self.target = Some(name.to_string());
            return SelectionChange::TargetSet(name.to_string());
        }
        SelectionChange::Ignored
    }

    /// Clears both slots.
    pub fn clear(&mut self) {
        self.source = None;
        self.target = None;
    }

    /// Drops any selected name for which `is_known` returns `false`.
    ///
    /// Used after a refresh: identity across refreshes is by name, so a
    /// selection survives only while its monitor is still connected.
    pub fn retain_known(&mut self, is_known: impl Fn(&str) -> bool) {
        if self.source.as_deref().is_some_and(|n| !is_known(n)) {
            self.source = None;
        }
        if self.target.as_deref().is_some_and(|n| !is_known(n)) {
            self.target = None;
        }
    }
}
