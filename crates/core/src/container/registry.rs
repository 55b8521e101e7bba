use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// String-keyed store that enumerates in insertion order
///
/// Replacing the value of an existing key keeps its position; removing a key
/// and inserting it again moves it to the end.
#[derive(Debug, Clone)]
pub struct Entries<V> {
    order: Vec<String>,
    values: HashMap<String, V>,
}

impl<V> Entries<V> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            values: HashMap::new(),
        }
    }

    /// Insert or replace a value, returning a handle to the stored value
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> &mut V {
        let key = key.into();
        match self.values.entry(key) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(value);
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => {
                self.order.push(vacant.key().clone());
                vacant.insert(value)
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.values.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.values.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove a value, returning it when it was present
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let value = self.values.remove(key)?;
        self.order.retain(|existing| existing != key);
        Some(value)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.order
            .iter()
            .filter_map(move |key| self.values.get(key).map(|value| (key.as_str(), value)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<V> Default for Entries<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_kept() {
        let mut entries = Entries::new();
        entries.insert("zeta", 1);
        entries.insert("alpha", 2);
        entries.insert("mid", 3);

        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_replacing_keeps_position() {
        let mut entries = Entries::new();
        entries.insert("a", 1);
        entries.insert("b", 2);
        *entries.insert("a", 10) += 1;

        assert_eq!(
            entries.iter().collect::<Vec<_>>(),
            vec![("a", &11), ("b", &2)]
        );
    }

    #[test]
    fn test_remove_and_reinsert_moves_to_end() {
        let mut entries = Entries::new();
        entries.insert("a", 1);
        entries.insert("b", 2);

        assert_eq!(entries.remove("a"), Some(1));
        assert_eq!(entries.remove("a"), None);
        entries.insert("a", 3);

        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(entries.contains_key("a"));
    }
}
