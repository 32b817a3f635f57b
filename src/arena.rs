//! Chunked allocator that hands out copyable handles instead of references.

use crate::error::{Error, Result};
use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A struct representing a slot in a `TypedArena<T>`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    chunk_index: usize,
    block_index: usize,
}

enum Block<T> {
    Occupied(T),
    Vacant(Option<Handle>),
}

/// A fast, but limited allocator that only allocates a single type of object.
///
/// Objects are addressed through `Handle`s, which are plain indices, so structures that need
/// back-references (such as parent links in a tree) can hold them without any ownership
/// cycle. Freed slots are threaded into a free list and reused by later allocations. Chunks
/// are never reallocated once created, and reserving a new chunk is fallible: running out of
/// memory, or exceeding an optional object limit, is reported as an `Error` instead of
/// aborting.
///
/// # Examples
///
/// ```
/// use balanced_trees::arena::TypedArena;
///
/// let mut arena = TypedArena::new(1024);
///
/// let x = arena.allocate(1).unwrap();
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(x), 2);
/// assert!(arena.is_empty());
/// ```
pub struct TypedArena<T> {
    head: Option<Handle>,
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
    limit: Option<usize>,
}

impl<T> TypedArena<T> {
    fn is_valid_handle(&self, handle: Handle) -> bool {
        handle.chunk_index < self.chunks.len()
            && handle.block_index < self.chunks[handle.chunk_index].len()
    }

    /// Constructs a new, empty `TypedArena<T>` with a specific number of objects per chunk.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Expected a positive chunk size.");
        TypedArena {
            head: None,
            chunks: Vec::new(),
            chunk_size,
            len: 0,
            capacity: 0,
            limit: None,
        }
    }

    /// Constructs a new, empty `TypedArena<T>` that refuses to hold more than `limit` objects
    /// at the same time.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::with_limit(16, 1);
    /// assert!(arena.allocate(0).is_ok());
    /// assert!(arena.allocate(1).is_err());
    /// ```
    pub fn with_limit(chunk_size: usize, limit: usize) -> Self {
        TypedArena {
            limit: Some(limit),
            ..TypedArena::new(chunk_size)
        }
    }

    /// Allocates an object in the typed arena and returns its `Handle`. If no slot can be
    /// obtained the object is dropped and an error is returned; the arena is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0).unwrap();
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn allocate(&mut self, value: T) -> Result<Handle> {
        if let Some(limit) = self.limit {
            if self.len >= limit {
                return Err(Error::CapacityExceeded(limit));
            }
        }

        if self.head.is_none() && self.len == self.capacity {
            self.chunks.try_reserve(1)?;
            let mut chunk = Vec::new();
            chunk.try_reserve_exact(self.chunk_size)?;
            self.chunks.push(chunk);
            self.capacity += self.chunk_size;
        }
        self.len += 1;

        match self.head.take() {
            None => {
                let chunk_count = self.chunks.len();
                let last_chunk = &mut self.chunks[chunk_count - 1];
                last_chunk.push(Block::Occupied(value));
                Ok(Handle {
                    chunk_index: chunk_count - 1,
                    block_index: last_chunk.len() - 1,
                })
            },
            Some(handle) => {
                let vacant_block = mem::replace(
                    &mut self.chunks[handle.chunk_index][handle.block_index],
                    Block::Occupied(value),
                );

                match vacant_block {
                    Block::Vacant(next_handle) => {
                        self.head = next_handle;
                        Ok(handle)
                    },
                    Block::Occupied(_) => unreachable!("Expected a vacant block in the free list."),
                }
            },
        }
    }

    /// Deallocates an object in the typed arena and returns the object.
    ///
    /// # Panics
    ///
    /// Panics if `handle` corresponds to an invalid or vacant slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0).unwrap();
    /// assert_eq!(arena.free(x), 0);
    /// ```
    pub fn free(&mut self, handle: Handle) -> T {
        if !self.is_valid_handle(handle) {
            panic!("Error: attempting to free invalid block.");
        }
        let block = &mut self.chunks[handle.chunk_index][handle.block_index];
        if let Block::Vacant(_) = block {
            panic!("Error: attempting to free vacant block.");
        }
        match mem::replace(block, Block::Vacant(self.head.take())) {
            Block::Occupied(value) => {
                self.len -= 1;
                self.head = Some(handle);
                value
            },
            Block::Vacant(_) => unreachable!(),
        }
    }

    /// Returns an immutable reference to an object in the typed arena. Returns `None` if the
    /// handle does not correspond to a live object.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        if !self.is_valid_handle(handle) {
            return None;
        }
        match self.chunks[handle.chunk_index][handle.block_index] {
            Block::Occupied(ref value) => Some(value),
            Block::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to an object in the typed arena. Returns `None` if the
    /// handle does not correspond to a live object.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if !self.is_valid_handle(handle) {
            return None;
        }
        match self.chunks[handle.chunk_index][handle.block_index] {
            Block::Occupied(ref mut value) => Some(value),
            Block::Vacant(_) => None,
        }
    }

    /// Returns the number of live objects in the typed arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the typed arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every live object and releases all chunks.
    pub fn clear(&mut self) {
        self.head = None;
        self.chunks.clear();
        self.len = 0;
        self.capacity = 0;
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("Error: handle does not refer to a live object.")
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle).expect("Error: handle does not refer to a live object.")
    }
}

#[cfg(test)]
mod tests {
    use super::{Handle, TypedArena};
    use crate::error::Error;

    #[test]
    #[should_panic]
    fn test_free_invalid_block() {
        let mut arena: TypedArena<u32> = TypedArena::new(1024);
        arena.free(Handle {
            chunk_index: 0,
            block_index: 0,
        });
    }

    #[test]
    #[should_panic]
    fn test_free_vacant_block() {
        let mut arena = TypedArena::new(1024);
        let handle = arena.allocate(0).unwrap();
        arena.free(handle);
        arena.free(handle);
    }

    #[test]
    fn test_allocate_multiple_chunks() {
        let mut arena = TypedArena::new(2);
        assert_eq!(
            arena.allocate(0).unwrap(),
            Handle {
                chunk_index: 0,
                block_index: 0
            },
        );
        assert_eq!(
            arena.allocate(0).unwrap(),
            Handle {
                chunk_index: 0,
                block_index: 1
            },
        );
        assert_eq!(
            arena.allocate(0).unwrap(),
            Handle {
                chunk_index: 1,
                block_index: 0
            },
        );
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_free_reuses_slot() {
        let mut arena = TypedArena::new(2);
        let first = arena.allocate(0).unwrap();
        let second = arena.allocate(1).unwrap();
        assert_eq!(arena.free(first), 0);
        assert_eq!(arena.allocate(2).unwrap(), first);
        assert_eq!(arena.free(second), 1);
        assert_eq!(arena.allocate(3).unwrap(), second);
        assert_eq!(arena.chunks.len(), 1);
    }

    #[test]
    fn test_get_vacant_block() {
        let mut arena = TypedArena::new(1024);
        let handle = arena.allocate(0).unwrap();
        arena.free(handle);
        assert_eq!(arena.get(handle), None);
        assert_eq!(arena.get_mut(handle), None);
    }

    #[test]
    fn test_limit() {
        let mut arena = TypedArena::with_limit(4, 2);
        let handle = arena.allocate(0).unwrap();
        arena.allocate(1).unwrap();
        match arena.allocate(2) {
            Err(Error::CapacityExceeded(2)) => {},
            _ => panic!("Expected the arena to be full."),
        }
        assert_eq!(arena.len(), 2);

        arena.free(handle);
        assert!(arena.allocate(2).is_ok());
    }

    #[test]
    fn test_clear() {
        let mut arena = TypedArena::new(2);
        for i in 0..5 {
            arena.allocate(i).unwrap();
        }
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(
            arena.allocate(0).unwrap(),
            Handle {
                chunk_index: 0,
                block_index: 0
            },
        );
    }
}
