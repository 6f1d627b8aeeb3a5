/// Selection transition: choosing the current id again clears it.
///
/// `select(current, requested)` is `None` when `current == requested`,
/// otherwise `requested`. Passing `None` always clears.
pub fn select(current: Option<&str>, requested: Option<&str>) -> Option<String> {
    if current == requested {
        None
    } else {
        requested.map(str::to_string)
    }
}

/// At most one selected server.
///
/// The id is not validated against the dataset: a dangling id simply
/// matches nothing downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    id: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    /// Applies [`select`]. Returns `true` if the selection changed.
    pub fn toggle(&mut self, requested: Option<&str>) -> bool {
        let next = select(self.id(), requested);
        if next == self.id {
            return false;
        }
        self.id = next;
        true
    }

    pub fn clear(&mut self) -> bool {
        self.id.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{Selection, select};

    #[test]
    fn select_transition_table() {
        assert_eq!(select(None, Some("a")), Some("a".to_string()));
        assert_eq!(select(Some("a"), Some("a")), None);
        assert_eq!(select(Some("a"), Some("b")), Some("b".to_string()));
        assert_eq!(select(Some("a"), None), None);
        assert_eq!(select(None, None), None);
    }

    #[test]
    fn toggle_reports_changes() {
        let mut s = Selection::new();
        assert!(s.is_empty());

        assert!(s.toggle(Some("a")));
        assert!(s.is_selected("a"));
        assert_eq!(s.id(), Some("a"));

        assert!(s.toggle(Some("b")));
        assert!(s.is_selected("b"));
        assert!(!s.is_selected("a"));

        assert!(s.toggle(Some("b")));
        assert!(s.is_empty());

        assert!(!s.toggle(None));
    }

    #[test]
    fn clear() {
        let mut s = Selection::new();
        assert!(!s.clear());
        s.toggle(Some("x"));
        assert!(s.clear());
        assert!(s.is_empty());
    }
}
