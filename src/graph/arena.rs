use std::collections::{HashMap, HashSet};

/// Interns canonical addresses into dense indices, in first-seen order, and
/// keeps an undirected, deduplicated neighbor list per index.
#[derive(Debug, Default)]
pub struct AddressArena {
    index: HashMap<String, usize>,
    addresses: Vec<String>,
    neighbors: Vec<Vec<usize>>,
    linked: HashSet<(usize, usize)>,
}

impl AddressArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index for `address`, registering it if new.
    pub fn intern(&mut self, address: &str) -> usize {
        if let Some(&idx) = self.index.get(address) {
            return idx;
        }
        let idx = self.addresses.len();
        self.index.insert(address.to_string(), idx);
        self.addresses.push(address.to_string());
        self.neighbors.push(Vec::new());
        idx
    }

    pub fn get(&self, address: &str) -> Option<usize> {
        self.index.get(address).copied()
    }

    pub fn address(&self, idx: usize) -> &str {
        &self.addresses[idx]
    }

    /// Record `a` and `b` as neighbors of each other. Repeat links are ignored.
    pub fn link(&mut self, a: usize, b: usize) {
        if self.linked.insert((a, b)) {
            self.neighbors[a].push(b);
        }
        if self.linked.insert((b, a)) {
            self.neighbors[b].push(a);
        }
    }

    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.neighbors[idx]
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.addresses.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_stable() {
        let mut arena = AddressArena::new();
        let a = arena.intern("0xa");
        let b = arena.intern("0xb");
        assert_eq!(arena.intern("0xa"), a);
        assert_eq!((a, b), (0, 1));
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get("0xb"), Some(b));
        assert_eq!(arena.get("0xc"), None);
        assert_eq!(arena.addresses().collect::<Vec<_>>(), vec!["0xa", "0xb"]);
    }

    #[test]
    fn test_link_dedupes_both_directions() {
        let mut arena = AddressArena::new();
        let a = arena.intern("0xa");
        let b = arena.intern("0xb");
        arena.link(a, b);
        arena.link(b, a);
        arena.link(a, b);
        assert_eq!(arena.neighbors(a), &[b]);
        assert_eq!(arena.neighbors(b), &[a]);
    }
}
