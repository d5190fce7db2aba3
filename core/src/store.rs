//! Store - Per-Request Key/Value State
//!
//! Handlers and middleware stages running for the same request hand data to each
//! other through the Store. One Store lives inside one request context and is
//! dropped with it, so it carries no synchronization.

use std::any::Any;
use std::collections::HashMap;

/// String-keyed container of arbitrary values.
///
/// Values are stored type-erased and read back with a typed accessor. Asking for a
/// key with the wrong type behaves like asking for a missing key.
#[derive(Default)]
pub struct Store {
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Store {
    /// Create a new empty Store
    pub fn new() -> Self {
        Store {
            values: HashMap::new(),
        }
    }

    /// Insert a value under `key`.
    ///
    /// An existing value under the same key is replaced, whatever its type.
    pub fn set<T: Send + Sync + 'static>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Box::new(value));
    }

    /// Get a reference to the value under `key`.
    ///
    /// Returns `None` if the key is absent or holds a value of another type.
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.values
            .get(key)
            .and_then(|boxed| boxed.downcast_ref())
    }

    /// Get a mutable reference to the value under `key`.
    pub fn get_mut<T: 'static>(&mut self, key: &str) -> Option<&mut T> {
        self.values
            .get_mut(key)
            .and_then(|boxed| boxed.downcast_mut())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove the value under `key`, returning it if present with type `T`.
    ///
    /// A value of another type is still removed.
    pub fn remove<T: 'static>(&mut self, key: &str) -> Option<T> {
        self.values
            .remove(key)
            .and_then(|boxed| boxed.downcast().ok())
            .map(|boxed| *boxed)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Store").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut store = Store::new();
        store.set("user", "Joe".to_string());
        store.set("count", 3u32);

        assert_eq!(store.get::<String>("user"), Some(&"Joe".to_string()));
        assert_eq!(store.get::<u32>("count"), Some(&3));
        assert_eq!(store.get::<String>("missing"), None);
    }

    #[test]
    fn test_wrong_type_reads_as_absent() {
        let mut store = Store::new();
        store.set("count", 3u32);

        assert_eq!(store.get::<i64>("count"), None);
        assert!(store.contains("count"));
    }

    #[test]
    fn test_set_replaces_across_types() {
        let mut store = Store::new();
        store.set("value", 1u8);
        store.set("value", "one");

        assert_eq!(store.get::<u8>("value"), None);
        assert_eq!(store.get::<&str>("value"), Some(&"one"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_mut_and_remove() {
        let mut store = Store::new();
        store.set("ids", vec![1, 2]);

        if let Some(ids) = store.get_mut::<Vec<i32>>("ids") {
            ids.push(3);
        }
        assert_eq!(store.remove::<Vec<i32>>("ids"), Some(vec![1, 2, 3]));
        assert!(store.is_empty());
    }

    #[test]
    fn test_debug_lists_keys() {
        let mut store = Store::new();
        store.set("b", 1);
        store.set("a", 2);
        assert_eq!(format!("{store:?}"), r#"Store { keys: ["a", "b"] }"#);
    }
}
