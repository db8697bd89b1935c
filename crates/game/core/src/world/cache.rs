//! Bounded cache of departed maps.
//!
//! The current map lives in the game state, so a cache with capacity `n`
//! stores at most `n - 1` departed maps. Inserting beyond that evicts the
//! least recently departed map; an evicted map is rebuilt from the catalog
//! the next time it is needed.

use std::collections::VecDeque;

use crate::state::{GameMap, MapId};

#[derive(Clone, Debug)]
pub struct MapCache {
    /// Live maps including the current one.
    capacity: usize,
    /// Most recently departed first.
    maps: VecDeque<GameMap>,
}

impl MapCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            maps: VecDeque::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn stored_limit(&self) -> usize {
        self.capacity - 1
    }

    pub fn contains(&self, id: &MapId) -> bool {
        self.maps.iter().any(|m| &m.id == id)
    }

    /// Removes and returns a cached map so it can become current.
    pub fn take(&mut self, id: &MapId) -> Option<GameMap> {
        let index = self.maps.iter().position(|m| &m.id == id)?;
        self.maps.remove(index)
    }

    /// Stores a departed map. Returns the ids evicted to stay within capacity.
    pub fn insert(&mut self, map: GameMap) -> Vec<MapId> {
        if let Some(index) = self.maps.iter().position(|m| m.id == map.id) {
            self.maps.remove(index);
        }
        self.maps.push_front(map);

        let mut evicted = Vec::new();
        while self.maps.len() > self.stored_limit() {
            match self.maps.pop_back() {
                Some(map) => evicted.push(map.id),
                None => break,
            }
        }
        evicted
    }

    pub fn ids(&self) -> impl Iterator<Item = &MapId> {
        self.maps.iter().map(|m| &m.id)
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
