// SPDX-License-Identifier: Apache-2.0

//! Reusable window memory. Buffers claim a block when opened and collect it back
//! when closed, so short-lived buffers over the same store don't allocate.

use std::collections::HashMap;
use std::ops::DerefMut;
use std::sync::Arc;
use once_cell::sync::Lazy;
use parking_lot::{Mutex, MutexGuard};
use tracing::trace;

/// A block of window memory.
pub type Block = Box<[u8]>;

/// The default number of bytes a [`DefaultPool`] retains.
pub const DEFAULT_RETAIN_LIMIT: usize = 64 * 1024 * 1024;

#[derive(Copy, Clone, Debug, thiserror::Error)]
#[error("failed to borrow the pool")]
pub struct PoolError;

/// Allocates a zeroed block of `capacity` bytes.
pub fn alloc_block(capacity: usize) -> Block {
	vec![0; capacity].into_boxed_slice()
}

pub trait Pool: Clone {
	type Pool: MutPool + ?Sized;
	type Ref<'p>: DerefMut<Target = Self::Pool> where Self: 'p;

	/// Gets a shared reference to the pool.
	fn get() -> Self;

	/// Borrows the pool mutably, locking it for the duration of the borrow.
	fn try_borrow(&self) -> Result<Self::Ref<'_>, PoolError>;

	/// Claims a block of `capacity` bytes.
	fn claim(&self, capacity: usize) -> Result<Block, PoolError> {
		Ok(self.try_borrow()?.claim(capacity))
	}

	/// Collects a block back into the pool.
	fn collect(&self, block: Block) -> Result<(), PoolError> {
		if block.is_empty() { return Ok(()) }

		self.try_borrow()?.collect(block);
		Ok(())
	}
}

/// A mutably-borrowed pool, usually from a [`Mutex`].
pub trait MutPool {
	/// Claims a block of exactly `capacity` bytes. The returned block must be
	/// indistinguishable from a freshly allocated one: all of its bytes are zero.
	fn claim(&mut self, capacity: usize) -> Block;

	/// Collects a block back into the pool. The pool may drop it instead.
	fn collect(&mut self, block: Block);
}

/// Pools blocks by capacity, retaining at most `limit` bytes in total.
pub struct DefaultPool {
	blocks: HashMap<usize, Vec<Block>>,
	retained: usize,
	limit: usize,
}

impl Default for DefaultPool {
	fn default() -> Self { Self::with_limit(DEFAULT_RETAIN_LIMIT) }
}

impl DefaultPool {
	/// Creates a pool retaining at most `limit` bytes.
	pub fn with_limit(limit: usize) -> Self {
		Self {
			blocks: HashMap::new(),
			retained: 0,
			limit,
		}
	}

	/// Returns the number of bytes held by the pool.
	pub fn retained(&self) -> usize { self.retained }

	/// Returns the number of blocks of `capacity` bytes held by the pool.
	pub fn count(&self, capacity: usize) -> usize {
		self.blocks.get(&capacity).map_or(0, Vec::len)
	}
}

impl MutPool for DefaultPool {
	fn claim(&mut self, capacity: usize) -> Block {
		let Some(mut block) = self.blocks
								  .get_mut(&capacity)
								  .and_then(Vec::pop) else {
			return alloc_block(capacity)
		};
		self.retained -= block.len();
		block.fill(0);
		block
	}

	fn collect(&mut self, block: Block) {
		let len = block.len();
		if self.retained + len > self.limit {
			trace!(len, retained = self.retained, "dropping block over pool limit");
			return
		}

		self.retained += len;
		self.blocks.entry(len).or_default().push(block);
	}
}

/// A shared, lockable pool container.
pub struct PoolContainer<P: MutPool + ?Sized>(Arc<Mutex<P>>);

pub type DefaultPoolContainer = PoolContainer<DefaultPool>;

impl<P: MutPool> From<P> for PoolContainer<P> {
	fn from(pool: P) -> Self {
		Self(Arc::new(Mutex::new(pool)))
	}
}

impl<P: MutPool + ?Sized> Clone for PoolContainer<P> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}

impl Default for DefaultPoolContainer {
	fn default() -> Self {
		DefaultPool::default().into()
	}
}

impl Pool for DefaultPoolContainer {
	type Pool = DefaultPool;
	type Ref<'p> = MutexGuard<'p, DefaultPool>;

	fn get() -> Self { pool() }

	fn try_borrow(&self) -> Result<Self::Ref<'_>, PoolError> {
		self.0.try_lock().ok_or(PoolError)
	}
}

/// Clones a shared reference to the default block pool.
#[inline]
pub fn pool() -> DefaultPoolContainer { POOL.clone() }

static POOL: Lazy<DefaultPoolContainer> = Lazy::new(DefaultPoolContainer::default);

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn claimed_blocks_are_zeroed() {
		let mut pool = DefaultPool::default();
		let mut block = pool.claim(16);
		block.fill(0xAA);
		pool.collect(block);
		assert_eq!(pool.count(16), 1);

		let block = pool.claim(16);
		assert!(block.iter().all(|&b| b == 0));
		assert_eq!(pool.count(16), 0);
		assert_eq!(pool.retained(), 0);
	}

	#[test]
	fn keyed_by_capacity() {
		let mut pool = DefaultPool::default();
		pool.collect(alloc_block(8));
		assert_eq!(pool.claim(16).len(), 16);
		assert_eq!(pool.count(8), 1);
	}

	#[test]
	fn drops_over_limit() {
		let mut pool = DefaultPool::with_limit(24);
		pool.collect(alloc_block(16));
		pool.collect(alloc_block(16));
		assert_eq!(pool.count(16), 1);
		assert_eq!(pool.retained(), 16);
	}

	#[test]
	fn contended_borrow_fails() {
		let pool = DefaultPoolContainer::default();
		let _guard = pool.try_borrow().unwrap();
		assert!(pool.claim(8).is_err());
	}
}
