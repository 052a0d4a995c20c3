//! Debug-only detection of callbacks that re-enter their map.
//!
//! `ChainMap` calls user code (`KeyOps::hash`/`equals`) while a bucket may be
//! half-walked. A callback that reaches back into the same map through a raw
//! pointer or interior mutability would observe that state, so debug builds
//! mark the map busy for the duration of each operation and panic on nested
//! entry. Release builds keep only a zero-sized marker.

use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug, Default)]
pub(crate) struct CallbackGuard {
    #[cfg(debug_assertions)]
    busy: Cell<bool>,
    // Single-threaded: keep the map !Sync even in release builds.
    _unsync: PhantomData<Cell<()>>,
}

impl CallbackGuard {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            busy: Cell::new(false),
            _unsync: PhantomData,
        }
    }

    /// Mark the owner busy until the returned token drops.
    #[inline]
    pub(crate) fn enter(&self) -> Busy<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.busy.replace(true),
                "ChainMap re-entered from a hash or equals callback"
            );
            Busy { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            Busy { _lt: PhantomData }
        }
    }
}

pub(crate) struct Busy<'a> {
    #[cfg(debug_assertions)]
    owner: &'a CallbackGuard,
    #[cfg(not(debug_assertions))]
    _lt: PhantomData<&'a ()>,
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.busy.set(false);
    }
}
