// SPDX-License-Identifier: Apache-2.0

use std::cmp::{max, min};
use std::io::{self, Read, Seek, SeekFrom};
use std::ptr;
use tracing::trace;
use crate::{Buffer, Error, Result, ResultContext};
use crate::OperationKind::Transfer;
use crate::pool::Pool;
use crate::store::Store;

impl<S: Store, P: Pool> Buffer<S, P> {
	/// Transfers up to `len` bytes from this buffer's position to `dst`'s
	/// position, advancing both. Returns the number of bytes transferred, less
	/// than `len` only at the end of this buffer.
	pub fn transfer_to<S2: Store, P2: Pool>(&mut self, dst: &mut Buffer<S2, P2>, len: u64) -> Result<u64> {
		let moved = self.transfer_at(self.position, dst, dst.position, len)?;
		self.position += moved;
		dst.position += moved;
		Ok(moved)
	}

	/// Transfers up to `len` bytes at `pos` to `dst_pos` in `dst`. Neither
	/// position changes. Returns the number of bytes transferred.
	///
	/// Between two distinct file-backed stores, transfers of at least the
	/// [transfer threshold](crate::BufferOptions::transfer_threshold) are copied
	/// file-to-file by the OS after flushing the windows they overlap. Anything
	/// else is copied through both windows.
	pub fn transfer_at<S2: Store, P2: Pool>(
		&mut self,
		pos: u64,
		dst: &mut Buffer<S2, P2>,
		dst_pos: u64,
		len: u64
	) -> Result<u64> {
		self.check_open(Transfer)?;
		dst.check_open(Transfer)?;
		if len == 0 || pos >= self.size { return Ok(0) }

		let len = min(len, self.size - pos);
		if dst_pos.checked_add(len).is_none() {
			return Err(Error::invalid_argument(Transfer, "position overflows"))
		}

		let mut moved = 0;
		if len >= self.options().transfer_threshold() {
			moved = self.transfer_files(pos, dst, dst_pos, len)?;
		}

		if moved < len {
			moved += self.transfer_windows(pos + moved, dst, dst_pos + moved, len - moved)?;
		}
		Ok(moved)
	}

	fn transfer_windows<S2: Store, P2: Pool>(
		&mut self,
		pos: u64,
		dst: &mut Buffer<S2, P2>,
		dst_pos: u64,
		len: u64
	) -> Result<u64> {
		let capacity = self.capacity() as u64;
		let mut moved = 0;
		while moved < len {
			let want = min(len - moved, capacity) as usize;
			let chunk = self.window
							.seek(self.shared.store(), pos + moved, want, self.size)
							.context(Transfer)?;
			let n = min(chunk.len(), want);
			if n == 0 { break }

			dst.window
			   .write(dst.shared.store(), dst_pos + moved, &chunk[..n], &mut dst.size)
			   .context(Transfer)?;
			moved += n as u64;
		}
		Ok(moved)
	}

	/// Copies file-to-file, returning the number of bytes copied, or zero if
	/// either store isn't a file or both are the same file.
	fn transfer_files<S2: Store, P2: Pool>(
		&mut self,
		pos: u64,
		dst: &mut Buffer<S2, P2>,
		dst_pos: u64,
		len: u64
	) -> Result<u64> {
		let src_store = self.shared.store();
		let dst_store = dst.shared.store();
		let (Some(src_file), Some(dst_file)) = (src_store.as_file(), dst_store.as_file()) else {
			return Ok(0)
		};
		if ptr::eq(src_file, dst_file) { return Ok(0) }

		if self.window.overlaps(pos, pos + len) {
			self.window.flush(src_store).context(Transfer)?;
		}

		if dst.window.overlaps(dst_pos, dst_pos + len) {
			dst.window.flush(dst_store).context(Transfer)?;
			dst.window.invalidate();
		}

		trace!(pos, dst_pos, len, "copying file to file");
		let copied = copy_file(src_file, pos, dst_file, dst_pos, len).context(Transfer)?;
		if copied > 0 {
			dst.size = max(dst.size, dst_pos + copied);
		}
		Ok(copied)
	}
}

/// Copies `len` bytes at `pos` in `src` to `dst_pos` in `dst`. The standard
/// library lowers this to `copy_file_range` or `sendfile` where the platform
/// has them.
fn copy_file(
	mut src: &std::fs::File,
	pos: u64,
	mut dst: &std::fs::File,
	dst_pos: u64,
	len: u64
) -> io::Result<u64> {
	src.seek(SeekFrom::Start(pos))?;
	dst.seek(SeekFrom::Start(dst_pos))?;
	io::copy(&mut src.take(len), &mut dst)
}
