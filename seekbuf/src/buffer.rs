// SPDX-License-Identifier: Apache-2.0

mod read;
mod write;
mod options;

pub use options::*;

use std::fmt;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::{AcqRel, Acquire};
use tracing::{trace, warn};
use crate::{ByteOrder, Error, Result, ResultContext};
use crate::OperationKind::{Close, Flush, Open, Sibling, Truncate};
use crate::OperationKind;
use crate::pool::{alloc_block, Block, DefaultPoolContainer, Pool};
use crate::shared::{Shared, State};
use crate::store::Store;
use crate::window::Window;

/// A buffer over a random-access [`Store`], caching a window of it in memory.
///
/// Reads and writes go through the window at the buffer's position, or at an
/// explicit position with the `_at` variants, which leave the position alone.
/// Writes are visible to later reads on the same buffer immediately, and reach
/// the store when the window moves, on [`flush`](Self::flush), or on
/// [`close`](Self::close).
///
/// Buffers opened with [`sibling`](Self::sibling) share the store, which closes
/// when the last of them does. Siblings don't see each other's unflushed writes.
pub struct Buffer<S: Store, P: Pool = DefaultPoolContainer> {
	pub(crate) shared: Arc<Shared<S>>,
	pub(crate) window: Window,
	pool: P,
	pub(crate) position: u64,
	pub(crate) size: u64,
	byte_order: ByteOrder,
	options: BufferOptions,
	closed: AtomicBool,
}

impl<S: Store, P: Pool> Debug for Buffer<S, P> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Buffer")
			.field("window", &self.window)
			.field("position", &self.position)
			.field("size", &self.size)
			.field("byte_order", &self.byte_order)
			.field("state", &self.shared.state())
			.field("closed", &self.is_closed())
			.finish_non_exhaustive()
	}
}

impl<S: Store> Buffer<S> {
	/// Opens a buffer over `store` with default options.
	pub fn open(store: S) -> Result<Self> {
		Self::with_options(store, BufferOptions::default())
	}

	/// Opens a buffer over `store`.
	pub fn with_options(store: S, options: BufferOptions) -> Result<Self> {
		Self::with_pool(store, DefaultPoolContainer::get(), options)
	}
}

impl<S: Store, P: Pool> Buffer<S, P> {
	/// Opens a buffer over `store`, claiming its window from `pool`.
	pub fn with_pool(store: S, pool: P, options: BufferOptions) -> Result<Self> {
		let size = store.size().context(Open)?;
		let block = claim(&pool, &options, Open)?;
		Ok(Self::new(Arc::new(Shared::new(store)), pool, block, size, options))
	}

	fn new(
		shared: Arc<Shared<S>>,
		pool: P,
		block: Block,
		size: u64,
		options: BufferOptions
	) -> Self {
		Self {
			shared,
			window: Window::new(block),
			pool,
			position: 0,
			size,
			byte_order: options.byte_order(),
			options,
			closed: AtomicBool::new(false),
		}
	}

	/// Opens a sibling buffer sharing this buffer's store, with its position at
	/// zero and its size read from the store. Unflushed writes in this buffer
	/// are not visible to the sibling.
	pub fn sibling(&self) -> Result<Self> {
		self.check_open(Sibling)?;
		if self.shared.attach().is_none() {
			return Err(Error::closed(Sibling))
		}

		let opened = self.shared
						 .store()
						 .size()
						 .context(Sibling)
						 .and_then(|size|
							 Ok((size, claim(&self.pool, &self.options, Sibling)?))
						 );
		match opened {
			Ok((size, block)) => {
				let mut sibling = Self::new(
					self.shared.clone(),
					self.pool.clone(),
					block,
					size,
					self.options
				);
				sibling.byte_order = self.byte_order;
				Ok(sibling)
			}
			Err(error) => {
				if let Err(detach) = self.shared.detach() {
					warn!(error = %detach, "failed to detach after a failed sibling open");
				}
				Err(error)
			}
		}
	}

	/// Returns the current position.
	#[inline]
	pub fn position(&self) -> u64 { self.position }

	/// Sets the current position. The position may be past the size, where
	/// reads find nothing and writes extend the size.
	#[inline]
	pub fn set_position(&mut self, value: u64) {
		self.position = value;
	}

	/// Returns the default byte order.
	#[inline]
	pub fn byte_order(&self) -> ByteOrder { self.byte_order }

	/// Sets the default byte order.
	#[inline]
	pub fn set_byte_order(&mut self, value: ByteOrder) {
		self.byte_order = value;
	}

	/// Returns the size, as last read from the store and extended by writes
	/// through this buffer.
	#[inline]
	pub fn size(&self) -> u64 { self.size }

	/// Returns the number of bytes between the position and the size.
	#[inline]
	pub fn remaining(&self) -> u64 { self.size.saturating_sub(self.position) }

	/// Returns the window capacity.
	#[inline]
	pub fn capacity(&self) -> usize { self.options.capacity() }

	/// Returns the options the buffer was opened with.
	#[inline]
	pub fn options(&self) -> &BufferOptions { &self.options }

	/// Returns the store.
	#[inline]
	pub fn store(&self) -> &S { self.shared.store() }

	/// Returns the lifecycle state of the shared store.
	pub fn shared_state(&self) -> State { self.shared.state() }

	/// Returns `true` if the buffer is closed.
	pub fn is_closed(&self) -> bool { self.closed.load(Acquire) }

	/// Shrinks the store to `size` bytes. Does nothing if `size` is not less than
	/// the current size.
	pub fn truncate(&mut self, size: u64) -> Result {
		self.check_open(Truncate)?;
		if size >= self.size { return Ok(()) }

		self.shared.store().truncate(size).context(Truncate)?;
		self.window.truncate(size);
		self.size = size;
		Ok(())
	}

	/// Writes the window to the store if it has unflushed writes. On failure the
	/// writes are kept, so the flush can be retried.
	pub fn flush(&mut self) -> Result {
		self.check_open(Flush)?;
		self.window.flush(self.shared.store()).context(Flush)
	}

	/// Flushes the window, returns it to the pool, and detaches from the store,
	/// closing the store if no siblings remain. Closing a closed buffer does
	/// nothing.
	///
	/// If the flush fails the buffer stays open with its writes kept, so closing
	/// can be retried. Dropping the buffer closes it, discarding the writes of a
	/// failed flush.
	pub fn close(&mut self) -> Result {
		if self.is_closed() { return Ok(()) }

		self.window.flush(self.shared.store()).context(Close)?;
		self.release()
	}

	fn release(&mut self) -> Result {
		if self.closed.swap(true, AcqRel) { return Ok(()) }

		let block = self.window.release();
		if !self.options.allocation().is_always() {
			if let Err(error) = self.pool.collect(block) {
				trace!(%error, "dropping window block");
			}
		}

		self.shared.detach().context(Close)?;
		Ok(())
	}

	pub(crate) fn check_open(&self, op: OperationKind) -> Result {
		if self.is_closed() {
			Err(Error::closed(op))
		} else {
			Ok(())
		}
	}
}

impl<S: Store, P: Pool> Drop for Buffer<S, P> {
	fn drop(&mut self) {
		if let Err(error) = self.close() {
			warn!(%error, "failed to close buffer on drop");
			let _ = self.release();
		}
	}
}

fn claim<P: Pool>(pool: &P, options: &BufferOptions, op: OperationKind) -> Result<Block> {
	let capacity = options.capacity();
	match options.allocation() {
		Allocate::Always => Ok(alloc_block(capacity)),
		Allocate::Never => pool.claim(capacity).context(op),
		Allocate::OnError => Ok(
			pool.claim(capacity)
				.unwrap_or_else(|_| alloc_block(capacity))
		)
	}
}

/// Returns the end of `len` bytes at `pos`, failing if it overflows.
pub(crate) fn end_of(op: OperationKind, pos: u64, len: usize) -> Result<u64> {
	pos.checked_add(len as u64)
	   .ok_or_else(|| Error::invalid_argument(op, "position overflows"))
}
