use std::collections::HashMap;

use crate::context::UniformLocation;

/// Uniform name → location, including misses.
///
/// Locations never change after a successful link, so every answer is kept
/// for the program's lifetime. A miss is stored as
/// [`UniformLocation::NOT_FOUND`] and warned about once, on the lookup that
/// produced it.
#[derive(Debug, Default, Clone)]
pub struct UniformCache {
    locations: HashMap<String, UniformLocation>,
}

impl UniformCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached location for `name`, calling `lookup` only on a miss.
    ///
    /// `owner` labels the warning for unresolved names.
    pub fn resolve<F>(&mut self, owner: &str, name: &str, lookup: F) -> UniformLocation
    where
        F: FnOnce(&str) -> UniformLocation,
    {
        if let Some(&location) = self.locations.get(name) {
            return location;
        }
        let location = lookup(name);
        if !location.is_found() {
            log::warn!("uniform '{name}' not found in '{owner}' (unused or misspelled)");
        }
        self.locations.insert(name.to_owned(), location);
        location
    }

    /// Cached answer for `name`, without querying.
    pub fn get(&self, name: &str) -> Option<UniformLocation> {
        self.locations.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn second_resolve_skips_lookup() {
        let mut cache = UniformCache::new();
        let queries = Cell::new(0);
        let lookup = |_: &str| {
            queries.set(queries.get() + 1);
            UniformLocation::new(4)
        };

        let first = cache.resolve("test", "u_MVP", lookup);
        let second = cache.resolve("test", "u_MVP", |_| unreachable!());
        assert_eq!(first, second);
        assert_eq!(first.raw(), 4);
        assert_eq!(queries.get(), 1);
    }

    #[test]
    fn misses_are_cached_as_not_found() {
        let mut cache = UniformCache::new();
        let miss = cache.resolve("test", "u_Gone", |_| UniformLocation::NOT_FOUND);
        assert_eq!(miss, UniformLocation::NOT_FOUND);
        assert_eq!(cache.get("u_Gone"), Some(UniformLocation::NOT_FOUND));
        assert_eq!(
            cache.resolve("test", "u_Gone", |_| UniformLocation::new(0)),
            UniformLocation::NOT_FOUND
        );
        assert_eq!(cache.len(), 1);
    }
}
