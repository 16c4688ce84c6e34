// SPDX-License-Identifier: Apache-2.0

mod file;
mod memory;

pub use file::*;
pub use memory::*;

use std::fs::File;
use std::io;
use std::sync::Arc;

/// A byte-addressable backing store, such as a file, read and written at
/// explicit positions.
///
/// Stores are shared between sibling buffers, so every method takes `&self`.
pub trait Store {
	/// Returns the current length of the store.
	fn size(&self) -> io::Result<u64>;

	/// Reads bytes at `pos` into `dst`, returning the number of bytes read. The
	/// count may only be short of `dst.len()` when the end of the store is
	/// reached.
	fn read_at(&self, pos: u64, dst: &mut [u8]) -> io::Result<usize>;

	/// Writes all of `src` at `pos`. Writing past the end grows the store, with
	/// any gap between the old end and `pos` reading back as zeros.
	fn write_at(&self, pos: u64, src: &[u8]) -> io::Result<()>;

	/// Sets the length of the store to `size`.
	fn truncate(&self, size: u64) -> io::Result<()>;

	/// Closes the store. Called once, by the last sibling to close. The default
	/// implementation does nothing; handles are released when dropped.
	fn close(&self) -> io::Result<()> { Ok(()) }

	/// Returns the file behind this store, if any, allowing transfers between
	/// file-backed stores to skip user-space copies.
	fn as_file(&self) -> Option<&File> { None }
}

macro_rules! gen_deref_store {
    ($($ptr:ident),+) => {
		$(
		impl<S: Store + ?Sized> Store for $ptr<S> {
			#[inline]
			fn size(&self) -> io::Result<u64> { (**self).size() }
			#[inline]
			fn read_at(&self, pos: u64, dst: &mut [u8]) -> io::Result<usize> { (**self).read_at(pos, dst) }
			#[inline]
			fn write_at(&self, pos: u64, src: &[u8]) -> io::Result<()> { (**self).write_at(pos, src) }
			#[inline]
			fn truncate(&self, size: u64) -> io::Result<()> { (**self).truncate(size) }
			#[inline]
			fn close(&self) -> io::Result<()> { (**self).close() }
			#[inline]
			fn as_file(&self) -> Option<&File> { (**self).as_file() }
		}
		)+
	};
}

gen_deref_store! { Box, Arc }
