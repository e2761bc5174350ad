//! Handle table mapping [`ElementId`]s to host objects.

use std::collections::HashMap;

use crate::ElementId;

/// Owns host objects behind element handles.
///
/// Handles are never reused, so a handle kept after [`HandleTable::release`]
/// resolves to nothing rather than to a newer element.
#[derive(Debug, Clone)]
pub struct HandleTable<T> {
    entries: HashMap<usize, T>,
    next: usize,
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandleTable<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next: 0,
        }
    }

    /// Store `value` under a fresh handle.
    pub fn insert(&mut self, value: T) -> ElementId {
        let id = ElementId(self.next);
        self.next += 1;
        self.entries.insert(id.0, value);
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&T> {
        self.entries.get(&id.0)
    }

    /// Drop the object behind `id`, returning it.
    pub fn release(&mut self, id: ElementId) -> Option<T> {
        self.entries.remove(&id.0)
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_sequential() {
        let mut table = HandleTable::new();
        assert_eq!(table.insert("body"), ElementId(0));
        assert_eq!(table.insert("head"), ElementId(1));
        assert_eq!(table.get(ElementId(1)), Some(&"head"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_released_handles_stay_dead() {
        let mut table = HandleTable::new();
        let toast = table.insert("toast");
        assert_eq!(table.release(toast), Some("toast"));
        assert_eq!(table.release(toast), None);
        assert!(table.is_empty());

        let next = table.insert("spinner");
        assert_ne!(next, toast);
        assert_eq!(table.get(toast), None);
        assert_eq!(table.get(next), Some(&"spinner"));
    }

    #[test]
    fn test_churn_keeps_table_bounded() {
        let mut table = HandleTable::new();
        for _ in 0..1000 {
            let ids: Vec<_> = (0..50).map(|i| table.insert(i)).collect();
            for id in ids {
                table.release(id);
            }
        }
        assert!(table.is_empty());
    }
}
