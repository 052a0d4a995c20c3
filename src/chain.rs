//! Chain: singly-linked lists whose nodes live in a shared slot arena.
//!
//! A `Chain` is only a head key and a length; the nodes it links are stored
//! in a `NodeArena` passed to every operation. Any number of chains can share
//! one arena as long as each node is linked into exactly one chain. Nodes own
//! their data outright and drop it when they are deleted or freed.
//!
//! A chain must always be handed the arena its nodes were prepended into.
//! Node keys carry no arena identity, so a chain walked over some other
//! arena of the same element type stops at the first key that arena does not
//! hold, but may unlink and free that arena's nodes where slot and
//! version happen to match. Nothing unsafe follows; the other structure is
//! simply corrupted. `ChainMap` keeps its chains and arena together and never
//! exposes either.

use crate::error::AllocError;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Generational key of a node inside a [`NodeArena`].
    pub struct NodeKey;
}

// slotmap refuses to grow past u32::MAX - 1 live elements.
const MAX_NODES: usize = u32::MAX as usize - 1;

#[derive(Debug)]
struct Node<T> {
    data: T,
    next: Option<NodeKey>,
}

/// Storage for the nodes of one or more chains.
#[derive(Debug)]
pub struct NodeArena<T> {
    nodes: SlotMap<NodeKey, Node<T>>,
}

impl<T> NodeArena<T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
        }
    }

    /// Total live nodes across every chain using this arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, key: NodeKey) -> Option<&T> {
        self.nodes.get(key).map(|n| &n.data)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut T> {
        self.nodes.get_mut(key).map(|n| &mut n.data)
    }

    fn alloc(&mut self, data: T, next: Option<NodeKey>) -> Result<NodeKey, AllocError> {
        if self.nodes.len() >= MAX_NODES {
            return Err(AllocError::ArenaFull {
                len: self.nodes.len(),
            });
        }
        Ok(self.nodes.insert(Node { data, next }))
    }

    fn next_of(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(|n| n.next)
    }

    fn set_next(&mut self, key: NodeKey, next: Option<NodeKey>) {
        if let Some(n) = self.nodes.get_mut(key) {
            n.next = next;
        }
    }
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Head of a singly-linked list of nodes in a [`NodeArena`].
#[derive(Debug, Default)]
pub struct Chain {
    head: Option<NodeKey>,
    len: usize,
}

impl Chain {
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn head(&self) -> Option<NodeKey> {
        self.head
    }

    /// Link a new node owning `data` in front of the current head.
    ///
    /// No search is made: an entry equal to one already in the chain is
    /// stored again and shadows the older one for `find`.
    pub fn prepend<T>(
        &mut self,
        arena: &mut NodeArena<T>,
        data: T,
    ) -> Result<NodeKey, AllocError> {
        let key = arena.alloc(data, self.head)?;
        self.head = Some(key);
        self.len += 1;
        Ok(key)
    }

    /// Key of the first node, in chain order, for which `equals(data, needle)`
    /// holds.
    pub fn find_key<T, Q, F>(
        &self,
        arena: &NodeArena<T>,
        needle: &Q,
        mut equals: F,
    ) -> Option<NodeKey>
    where
        Q: ?Sized,
        F: FnMut(&T, &Q) -> bool,
    {
        let mut cur = self.head;
        while let Some(k) = cur {
            let node = arena.nodes.get(k)?;
            if equals(&node.data, needle) {
                return Some(k);
            }
            cur = node.next;
        }
        None
    }

    /// First match in chain order, i.e. the most recently prepended one.
    pub fn find<'a, T, Q, F>(
        &self,
        arena: &'a NodeArena<T>,
        needle: &Q,
        equals: F,
    ) -> Option<&'a T>
    where
        Q: ?Sized,
        F: FnMut(&T, &Q) -> bool,
    {
        let key = self.find_key(arena, needle, equals)?;
        arena.get(key)
    }

    pub fn find_mut<'a, T, Q, F>(
        &self,
        arena: &'a mut NodeArena<T>,
        needle: &Q,
        equals: F,
    ) -> Option<&'a mut T>
    where
        Q: ?Sized,
        F: FnMut(&T, &Q) -> bool,
    {
        let key = self.find_key(arena, needle, equals)?;
        arena.get_mut(key)
    }

    /// Unlink the first match and hand back its data. A miss, or an empty
    /// chain, leaves everything untouched.
    pub fn delete<T, Q, F>(
        &mut self,
        arena: &mut NodeArena<T>,
        needle: &Q,
        mut equals: F,
    ) -> Option<T>
    where
        Q: ?Sized,
        F: FnMut(&T, &Q) -> bool,
    {
        let mut prev: Option<NodeKey> = None;
        let mut cur = self.head;
        while let Some(k) = cur {
            let node = arena.nodes.get(k)?;
            let next = node.next;
            if equals(&node.data, needle) {
                match prev {
                    None => self.head = next,
                    Some(p) => arena.set_next(p, next),
                }
                self.len -= 1;
                return arena.nodes.remove(k).map(|n| n.data);
            }
            prev = Some(k);
            cur = next;
        }
        None
    }

    /// Unlink and drop every match in one pass. Returns how many were removed.
    ///
    /// If `equals` panics, the matches already removed stay removed and the
    /// chain's length still agrees with its links.
    pub fn delete_all<T, Q, F>(
        &mut self,
        arena: &mut NodeArena<T>,
        needle: &Q,
        mut equals: F,
    ) -> usize
    where
        Q: ?Sized,
        F: FnMut(&T, &Q) -> bool,
    {
        let mut removed = 0;
        let mut prev: Option<NodeKey> = None;
        let mut cur = self.head;
        while let Some(k) = cur {
            let Some(node) = arena.nodes.get(k) else {
                break;
            };
            let next = node.next;
            if equals(&node.data, needle) {
                match prev {
                    None => self.head = next,
                    Some(p) => arena.set_next(p, next),
                }
                self.len -= 1;
                removed += 1;
                drop(arena.nodes.remove(k));
            } else {
                prev = Some(k);
            }
            cur = next;
        }
        removed
    }

    /// Drop every node in chain order and leave the chain empty. Freeing an
    /// empty chain does nothing.
    pub fn free<T>(&mut self, arena: &mut NodeArena<T>) {
        let mut cur = self.head.take();
        while let Some(k) = cur {
            cur = match arena.nodes.remove(k) {
                Some(node) => node.next,
                None => None,
            };
        }
        self.len = 0;
    }

    /// Unlink every node without dropping it; keys come back newest first.
    pub(crate) fn take_nodes<T>(&mut self, arena: &NodeArena<T>) -> Vec<NodeKey> {
        let mut keys = Vec::with_capacity(self.len);
        let mut cur = self.head.take();
        while let Some(k) = cur {
            keys.push(k);
            cur = arena.next_of(k);
        }
        self.len = 0;
        keys
    }

    /// Link an already-allocated, currently unlinked node in front of the head.
    pub(crate) fn relink_front<T>(&mut self, arena: &mut NodeArena<T>, key: NodeKey) {
        arena.set_next(key, self.head);
        self.head = Some(key);
        self.len += 1;
    }

    pub fn iter<'a, T>(&self, arena: &'a NodeArena<T>) -> Iter<'a, T> {
        Iter {
            arena,
            cur: self.head,
        }
    }
}

/// Walks a chain from its head.
pub struct Iter<'a, T> {
    arena: &'a NodeArena<T>,
    cur: Option<NodeKey>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.nodes.get(self.cur?)?;
        self.cur = node.next;
        Some(&node.data)
    }
}
