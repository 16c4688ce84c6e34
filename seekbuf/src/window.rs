// SPDX-License-Identifier: Apache-2.0

//! The movable window a buffer caches store bytes in.
//!
//! A window holds `len` bytes of the store starting at `start`, in a block of
//! fixed capacity. Accesses inside `[start, start + capacity)` are served by
//! copying into or out of the block, growing it forward as needed. Accesses
//! outside it flush any mutations and move the window. When moving, a window
//! slides by one capacity if that reaches the access, keeping sequential scans
//! in either direction to one store call per window. Otherwise it's anchored
//! to the access: at its start going forward, at its end going backward. Bulk
//! accesses of at least one capacity skip the window entirely.
//!
//! The window never holds bytes past the buffer size, except while a write is
//! extending it, and never discards dirty bytes it failed to flush.

use std::cmp::{max, min};
use std::fmt::{Debug, Formatter};
use std::{fmt, io, mem};
use all_asserts::debug_assert_le;
use tracing::{trace, warn};
use crate::codec::{Bytes, FastBytes};
use crate::pool::Block;
use crate::store::Store;

pub(crate) struct Window {
	block: Block,
	start: u64,
	len: usize,
	dirty: bool,
}

impl Debug for Window {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Window")
			.field("start", &self.start)
			.field("len", &self.len)
			.field("capacity", &self.capacity())
			.field("dirty", &self.dirty)
			.finish()
	}
}

impl Window {
	pub fn new(block: Block) -> Self {
		Self {
			block,
			start: 0,
			len: 0,
			dirty: false,
		}
	}

	#[inline]
	pub fn capacity(&self) -> usize { self.block.len() }

	/// Returns the position past the last resident byte.
	#[inline]
	pub fn end(&self) -> u64 { self.start + self.len as u64 }

	/// Returns the position past the last byte the window could hold at its
	/// current start.
	#[inline]
	fn limit(&self) -> u64 { self.start.saturating_add(self.capacity() as u64) }

	/// Returns `true` if resident bytes overlap `[pos, end)`.
	pub fn overlaps(&self, pos: u64, end: u64) -> bool {
		self.len > 0 && pos < self.end() && self.start < end
	}

	/// Writes dirty bytes to the store. On failure the window stays dirty, so
	/// the flush can be retried.
	pub fn flush<S: Store + ?Sized>(&mut self, store: &S) -> io::Result<()> {
		if !self.dirty { return Ok(()) }

		if self.len > 0 {
			if let Err(error) = store.write_at(self.start, &self.block[..self.len]) {
				warn!(
					start = self.start,
					len = self.len,
					%error,
					"failed to flush window, keeping it dirty"
				);
				return Err(error)
			}
		}

		self.dirty = false;
		Ok(())
	}

	/// Empties the window without flushing.
	pub fn invalidate(&mut self) {
		self.len = 0;
		self.dirty = false;
	}

	/// Drops resident bytes at or past `size`.
	pub fn truncate(&mut self, size: u64) {
		if self.start >= size {
			self.invalidate();
		} else {
			self.len = min(self.len as u64, size - self.start) as usize;
		}
	}

	/// Takes the block out of the window, leaving it with zero capacity.
	pub fn release(&mut self) -> Block {
		self.invalidate();
		self.start = 0;
		mem::take(&mut self.block)
	}

	/// Reads `dst.len()` bytes at `pos`, which must not extend past `size`.
	pub fn read<S: Store + ?Sized>(
		&mut self,
		store: &S,
		mut pos: u64,
		mut dst: &mut [u8],
		size: u64
	) -> io::Result<()> {
		if dst.is_empty() { return Ok(()) }
		if dst.len() >= self.capacity() {
			return self.read_direct(store, pos, dst)
		}

		while !dst.is_empty() {
			// Take resident bytes first; only the rest needs the window to move.
			let want = if self.start <= pos && pos < self.end() { 1 } else { dst.len() };
			let chunk = self.seek(store, pos, want, size)?;
			if chunk.is_empty() {
				Bytes::fill(dst, 0);
				break
			}

			let n = min(chunk.len(), dst.len());
			dst[..n].copy_from_slice(&chunk[..n]);
			dst = &mut dst[n..];
			pos += n as u64;
		}
		Ok(())
	}

	/// Writes `src` at `pos`, extending `size` if the write ends past it.
	pub fn write<S: Store + ?Sized>(
		&mut self,
		store: &S,
		mut pos: u64,
		mut src: &[u8],
		size: &mut u64
	) -> io::Result<()> {
		if src.is_empty() { return Ok(()) }
		if src.len() >= self.capacity() {
			return self.write_direct(store, pos, src, size)
		}

		while !src.is_empty() {
			let fits = self.start <= pos && pos <= self.end() && pos < self.limit();
			let want = if fits { 1 } else { src.len() };
			let chunk = self.seek_mut(store, pos, want, *size)?;
			let n = min(chunk.len(), src.len());
			chunk[..n].copy_from_slice(&src[..n]);
			self.commit(pos, n, size);
			src = &src[n..];
			pos += n as u64;
		}
		Ok(())
	}

	/// Makes at least one byte at `pos` resident, and at least `min` bytes up to
	/// the capacity and `size`, returning all resident bytes from `pos` on. The
	/// slice is empty only at or past `size`.
	pub fn seek<S: Store + ?Sized>(
		&mut self,
		store: &S,
		pos: u64,
		min: usize,
		size: u64
	) -> io::Result<&[u8]> {
		if pos >= size { return Ok(&[]) }

		let want = pos.saturating_add(min.clamp(1, self.capacity()) as u64).min(size);
		if self.start > pos || want > self.end() {
			if self.start > pos || want > self.limit() {
				self.relocate(store, pos, want)?;
			}

			// Fill greedily, so scans touch the store once per window.
			let to = self.limit().min(size);
			self.load(store, self.end(), to, size)?;
			self.len = (to - self.start) as usize;
		}

		let off = (pos - self.start) as usize;
		Ok(&self.block[off..self.len])
	}

	/// Makes room for at least `min` bytes at `pos`, up to the capacity,
	/// returning the writable block from `pos` on. Written bytes must then be
	/// [committed](Self::commit).
	pub fn seek_mut<S: Store + ?Sized>(
		&mut self,
		store: &S,
		pos: u64,
		min: usize,
		size: u64
	) -> io::Result<&mut [u8]> {
		let want = pos.saturating_add(min.clamp(1, self.capacity()) as u64);
		if self.start > pos || want > self.limit() {
			self.relocate(store, pos, want)?;
		}

		if pos > self.end() {
			// Bring in the gap between resident bytes and the write, so the window
			// stays contiguous. Past the size it's zeroed.
			self.load(store, self.end(), pos, size)?;
		}

		let off = (pos - self.start) as usize;
		Ok(&mut self.block[off..])
	}

	/// Marks `n` bytes written at `pos` by [`seek_mut`](Self::seek_mut) as
	/// resident and dirty, extending `size` to cover them.
	pub fn commit(&mut self, pos: u64, n: usize, size: &mut u64) {
		if n == 0 { return }

		let end = (pos - self.start) as usize + n;
		use all_asserts::assert_le;
		debug_assert_le!(end, self.capacity());
		self.len = max(self.len, end);
		self.dirty = true;
		*size = max(*size, self.end());
	}

	/// Flushes and moves the window so that it can hold `[pos, end)`.
	fn relocate<S: Store + ?Sized>(&mut self, store: &S, pos: u64, end: u64) -> io::Result<()> {
		self.flush(store)?;

		let cap = self.capacity() as u64;
		let start = if pos < self.start {
			if end <= self.start && pos >= self.start.saturating_sub(cap) {
				self.start.saturating_sub(cap)
			} else {
				end.saturating_sub(cap)
			}
		} else {
			let limit = self.limit();
			if pos >= limit && end <= limit.saturating_add(cap) {
				limit
			} else {
				pos
			}
		};

		trace!(from = self.start, to = start, pos, end, "relocating window");
		self.start = start;
		self.len = 0;
		Ok(())
	}

	/// Loads `[from, to)` into the block from the store, zeroing whatever is past
	/// `size` or the end of the store. Both must lie within the block.
	fn load<S: Store + ?Sized>(&mut self, store: &S, from: u64, to: u64, size: u64) -> io::Result<()> {
		if from >= to { return Ok(()) }

		let off = (from - self.start) as usize;
		let end = (to - self.start) as usize;
		let avail = if from < size {
			(min(to, size) - from) as usize
		} else {
			0
		};

		let read = if avail > 0 {
			store.read_at(from, &mut self.block[off..off + avail])?
		} else {
			0
		};
		Bytes::fill(&mut self.block[off + read..end], 0);
		Ok(())
	}

	fn read_direct<S: Store + ?Sized>(&mut self, store: &S, pos: u64, dst: &mut [u8]) -> io::Result<()> {
		let end = pos + dst.len() as u64;
		if self.dirty && self.overlaps(pos, end) {
			self.flush(store)?;
		}

		trace!(pos, len = dst.len(), "reading around window");
		let read = store.read_at(pos, dst)?;
		Bytes::fill(&mut dst[read..], 0);
		Ok(())
	}

	fn write_direct<S: Store + ?Sized>(
		&mut self,
		store: &S,
		pos: u64,
		src: &[u8],
		size: &mut u64
	) -> io::Result<()> {
		let end = pos + src.len() as u64;
		trace!(pos, len = src.len(), "writing around window");
		store.write_at(pos, src)?;
		*size = max(*size, end);

		// Overwrite the overlapped bytes rather than let a later flush revert them.
		if self.overlaps(pos, end) {
			let lo = max(pos, self.start);
			let hi = min(end, self.end());
			let dst = &mut self.block[(lo - self.start) as usize..(hi - self.start) as usize];
			dst.copy_from_slice(&src[(lo - pos) as usize..(hi - pos) as usize]);
		}
		Ok(())
	}
}
