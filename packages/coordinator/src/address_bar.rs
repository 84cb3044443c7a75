//! Where the selection is persisted.

/// The browser's address bar, reduced to the one fact it persists: which
/// observation is selected.
///
/// Writing must not cause a navigation or reload.
pub trait AddressBar {
    /// The selected identifier currently in the URL, if any.
    fn selection(&self) -> Option<String>;

    /// Writes `id` into the URL, or removes the parameter for `None`.
    fn push_selection(&mut self, id: Option<&str>);
}

/// An address bar held in memory.
///
/// Used for a single server-side render (seeded from the request's query
/// string) and in tests. Counts writes so callers can tell a restore from a
/// fresh selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryAddressBar {
    selection: Option<String>,
    pushes: usize,
}

impl MemoryAddressBar {
    /// An address bar with no selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selection: None,
            pushes: 0,
        }
    }

    /// An address bar as loaded from a URL carrying `selection`. Blank values
    /// count as absent.
    #[must_use]
    pub fn with_selection(selection: Option<&str>) -> Self {
        Self {
            selection: selection
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            pushes: 0,
        }
    }

    /// How many times the selection was written.
    #[must_use]
    pub const fn pushes(&self) -> usize {
        self.pushes
    }
}

impl AddressBar for MemoryAddressBar {
    fn selection(&self) -> Option<String> {
        self.selection.clone()
    }

    fn push_selection(&mut self, id: Option<&str>) {
        self.selection = id.map(str::to_string);
        self.pushes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_selection_is_absent() {
        assert_eq!(MemoryAddressBar::with_selection(Some("  ")).selection(), None);
        assert_eq!(
            MemoryAddressBar::with_selection(Some(" abc123 ")).selection(),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn counts_pushes() {
        let mut bar = MemoryAddressBar::new();
        bar.push_selection(Some("a"));
        bar.push_selection(None);
        assert_eq!(bar.pushes(), 2);
        assert_eq!(bar.selection(), None);
    }
}
