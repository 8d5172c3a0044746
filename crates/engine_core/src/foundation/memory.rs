//! Memory management utilities
//!
//! Every subsystem's private state lives in one [`SystemArena`]: a single
//! contiguous region carved front-to-back by a bump pointer. Blocks are never
//! released individually; the whole arena is reset once, after the memory
//! system itself has shut down.

use std::ops::Range;
use thiserror::Error;

/// Default size of the systems arena (64 MiB)
pub const DEFAULT_ARENA_BYTES: usize = 64 * 1024 * 1024;

/// A view into the systems arena
///
/// Blocks are plain offsets, so holding one never borrows the arena. A block
/// is only meaningful for the arena that produced it, until that arena is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaBlock {
    offset: usize,
    len: usize,
}

impl ArenaBlock {
    /// Byte offset of the block from the start of the arena
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Size of the block in bytes
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the block holds zero bytes
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last byte of the block
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Byte range covered by the block
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Whether two blocks share at least one byte
    pub const fn overlaps(&self, other: &Self) -> bool {
        !self.is_empty() && !other.is_empty() && self.offset < other.end() && other.offset < self.end()
    }
}

/// Arena allocation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    /// The request does not fit in what is left of the arena
    #[error("arena exhausted: requested {requested} bytes, {remaining} of {capacity} bytes remaining")]
    Exhausted {
        /// Bytes requested
        requested: usize,
        /// Bytes still free
        remaining: usize,
        /// Total arena capacity
        capacity: usize,
    },
}

/// Bump-pointer arena backing all subsystem state blocks
pub struct SystemArena {
    /// Backing storage, allocated to full capacity up front
    data: Vec<u8>,
    /// Next free byte
    cursor: usize,
    allocation_count: usize,
}

impl SystemArena {
    /// Create an arena with the given capacity in bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            cursor: 0,
            allocation_count: 0,
        }
    }

    /// Carve `size` bytes off the front of the free region
    ///
    /// The returned block is zero-filled. Requests that do not fit fail with
    /// [`ArenaError::Exhausted`] and leave the arena untouched.
    pub fn allocate(&mut self, size: usize) -> Result<ArenaBlock, ArenaError> {
        let exhausted = || ArenaError::Exhausted {
            requested: size,
            remaining: self.remaining(),
            capacity: self.capacity(),
        };

        let end = self.cursor.checked_add(size).ok_or_else(exhausted)?;
        if end > self.data.len() {
            return Err(exhausted());
        }

        let block = ArenaBlock {
            offset: self.cursor,
            len: size,
        };
        // reset() does not clear memory, so every block is cleared on the way out
        self.data[block.range()].fill(0);
        self.cursor = end;
        self.allocation_count += 1;

        log::trace!(
            "Arena allocated {} bytes at offset {} ({} / {} used)",
            size,
            block.offset,
            self.cursor,
            self.data.len()
        );

        Ok(block)
    }

    /// Shared access to a block's bytes
    ///
    /// # Panics
    ///
    /// Panics if `block` was not produced by this arena since its last reset.
    pub fn block(&self, block: ArenaBlock) -> &[u8] {
        assert!(block.end() <= self.cursor, "arena block {block:?} is stale");
        &self.data[block.range()]
    }

    /// Mutable access to a block's bytes
    ///
    /// # Panics
    ///
    /// Panics if `block` was not produced by this arena since its last reset.
    pub fn block_mut(&mut self, block: ArenaBlock) -> &mut [u8] {
        assert!(block.end() <= self.cursor, "arena block {block:?} is stale");
        &mut self.data[block.range()]
    }

    /// Release every block at once
    pub fn reset(&mut self) {
        log::debug!(
            "Resetting systems arena ({} bytes across {} allocations)",
            self.cursor,
            self.allocation_count
        );
        self.cursor = 0;
        self.allocation_count = 0;
    }

    /// Bytes handed out so far
    pub const fn used(&self) -> usize {
        self.cursor
    }

    /// Total size of the arena in bytes
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes still available
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Number of blocks carved since the last reset
    pub const fn allocation_count(&self) -> usize {
        self.allocation_count
    }
}

impl Default for SystemArena {
    fn default() -> Self {
        Self::new(DEFAULT_ARENA_BYTES)
    }
}

impl std::fmt::Debug for SystemArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemArena")
            .field("capacity", &self.capacity())
            .field("used", &self.cursor)
            .field("allocations", &self.allocation_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocations_are_sequential() {
        let mut arena = SystemArena::new(64);

        let a = arena.allocate(16).unwrap();
        let b = arena.allocate(8).unwrap();

        assert_eq!(a.offset(), 0);
        assert_eq!(b.offset(), 16);
        assert!(!a.overlaps(&b));
        assert_eq!(arena.used(), 24);
        assert_eq!(arena.remaining(), 40);
        assert_eq!(arena.allocation_count(), 2);
    }

    #[test]
    fn test_exhaustion_is_reported_and_leaves_arena_intact() {
        let mut arena = SystemArena::new(32);
        arena.allocate(30).unwrap();

        let err = arena.allocate(4).unwrap_err();
        assert_eq!(
            err,
            ArenaError::Exhausted {
                requested: 4,
                remaining: 2,
                capacity: 32,
            }
        );
        assert_eq!(arena.used(), 30);

        // Exactly filling the arena is fine
        assert!(arena.allocate(2).is_ok());
        assert_eq!(arena.remaining(), 0);
    }

    #[test]
    fn test_oversized_request_does_not_overflow() {
        let mut arena = SystemArena::new(16);
        arena.allocate(8).unwrap();
        assert!(arena.allocate(usize::MAX).is_err());
    }

    #[test]
    fn test_zero_sized_block() {
        let mut arena = SystemArena::new(16);
        let block = arena.allocate(0).unwrap();

        assert!(block.is_empty());
        assert!(arena.block(block).is_empty());
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn test_reset_zeroes_reissued_blocks() {
        let mut arena = SystemArena::new(16);
        let block = arena.allocate(4).unwrap();
        arena.block_mut(block).copy_from_slice(&[1, 2, 3, 4]);

        arena.reset();
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.allocation_count(), 0);

        let again = arena.allocate(4).unwrap();
        assert_eq!(again, block);
        assert_eq!(arena.block(again), &[0, 0, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "stale")]
    fn test_stale_block_access_panics() {
        let mut arena = SystemArena::new(16);
        let block = arena.allocate(4).unwrap();
        arena.reset();
        let _ = arena.block(block);
    }

    #[test]
    fn test_block_overlap() {
        let a = ArenaBlock { offset: 0, len: 8 };
        let b = ArenaBlock { offset: 4, len: 8 };
        let c = ArenaBlock { offset: 8, len: 0 };

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }
}
