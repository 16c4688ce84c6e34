// SPDX-License-Identifier: Apache-2.0

use std::cmp::min;
use crate::{Buffer, ByteOrder, Error, Primitive, Result, ResultContext};
use crate::codec::{Bytes, decode, FastBytes, MAX_WIDTH};
use crate::OperationKind::Read;
use crate::pool::Pool;
use crate::store::Store;
use super::end_of;

macro_rules! gen_reads {
    ($($name:ident$at_name:ident$ty:ident),+) => {
		$(
		#[doc = concat!("Reads a `", stringify!($ty), "` in the default byte order.")]
		pub fn $name(&mut self) -> Result<$ty> {
			self.read_pod()
		}

		#[doc = concat!("Reads a `", stringify!($ty), "` at `pos` in the default byte order.")]
		pub fn $at_name(&mut self, pos: u64) -> Result<$ty> {
			self.read_pod_at(pos)
		}
		)+
	};
}

impl<S: Store, P: Pool> Buffer<S, P> {
	/// Reads a fixed-width value in the default byte order, advancing the
	/// position.
	pub fn read_pod<T: Primitive>(&mut self) -> Result<T> {
		self.read_pod_with(self.byte_order())
	}

	/// Reads a fixed-width value in `order`, advancing the position.
	pub fn read_pod_with<T: Primitive>(&mut self, order: ByteOrder) -> Result<T> {
		let value = self.read_pod_at_with(self.position, order)?;
		self.position += T::WIDTH as u64;
		Ok(value)
	}

	/// Reads a fixed-width value at `pos` in the default byte order.
	pub fn read_pod_at<T: Primitive>(&mut self, pos: u64) -> Result<T> {
		self.read_pod_at_with(pos, self.byte_order())
	}

	/// Reads a fixed-width value at `pos` in `order`. Fails with an out-of-range
	/// error, before touching the store, if the value ends past the size.
	pub fn read_pod_at_with<T: Primitive>(&mut self, pos: u64, order: ByteOrder) -> Result<T> {
		self.check_open(Read)?;
		let end = end_of(Read, pos, T::WIDTH)?;
		if end > self.size {
			return Err(Error::out_of_range(Read, pos, T::WIDTH as u64, self.size))
		}

		let mut raw = [0; MAX_WIDTH];
		let raw = &mut raw[..T::WIDTH];
		self.window
			.read(self.shared.store(), pos, raw, self.size)
			.context(Read)?;
		Ok(decode(raw, order))
	}

	gen_reads! {
		read_u8  read_u8_at  u8,
		read_i8  read_i8_at  i8,
		read_u16 read_u16_at u16,
		read_i16 read_i16_at i16,
		read_u32 read_u32_at u32,
		read_i32 read_i32_at i32,
		read_u64 read_u64_at u64,
		read_i64 read_i64_at i64,
		read_f32 read_f32_at f32,
		read_f64 read_f64_at f64
	}

	/// Reads up to `dst.len()` bytes into `dst`, advancing the position by the
	/// number of bytes read. Fewer bytes are read only at the end of the buffer.
	pub fn read_slice(&mut self, dst: &mut [u8]) -> Result<usize> {
		let read = self.read_slice_at(self.position, dst)?;
		self.position += read as u64;
		Ok(read)
	}

	/// Reads up to `dst.len()` bytes at `pos` into `dst`, returning the number
	/// of bytes read.
	pub fn read_slice_at(&mut self, pos: u64, dst: &mut [u8]) -> Result<usize> {
		self.check_open(Read)?;
		if dst.is_empty() { return Ok(0) }
		end_of(Read, pos, dst.len())?;
		if pos >= self.size { return Ok(0) }

		let n = min(dst.len() as u64, self.size - pos) as usize;
		self.window
			.read(self.shared.store(), pos, &mut dst[..n], self.size)
			.context(Read)?;
		Ok(n)
	}

	/// Fills `dst`, advancing the position. Fails with an out-of-range error if
	/// fewer than `dst.len()` bytes remain.
	pub fn read_slice_exact(&mut self, dst: &mut [u8]) -> Result {
		self.read_slice_exact_at(self.position, dst)?;
		self.position += dst.len() as u64;
		Ok(())
	}

	/// Fills `dst` with the bytes at `pos`. Fails with an out-of-range error,
	/// before touching the store, if they end past the size.
	pub fn read_slice_exact_at(&mut self, pos: u64, dst: &mut [u8]) -> Result {
		self.check_open(Read)?;
		if dst.is_empty() { return Ok(()) }
		let end = end_of(Read, pos, dst.len())?;
		if end > self.size {
			return Err(Error::out_of_range(Read, pos, dst.len() as u64, self.size))
		}

		self.window
			.read(self.shared.store(), pos, dst, self.size)
			.context(Read)
	}

	/// Returns `true` if the bytes at `pos` equal `bytes`. Bytes past the size
	/// never match.
	pub fn matches_at(&mut self, mut pos: u64, mut bytes: &[u8]) -> Result<bool> {
		self.check_open(Read)?;
		let end = end_of(Read, pos, bytes.len())?;
		if end > self.size { return Ok(false) }

		while !bytes.is_empty() {
			let chunk = self.window
							.seek(self.shared.store(), pos, bytes.len(), self.size)
							.context(Read)?;
			let n = min(chunk.len(), bytes.len());
			if n == 0 || !Bytes::equal(&chunk[..n], &bytes[..n]) {
				return Ok(false)
			}

			bytes = &bytes[n..];
			pos += n as u64;
		}
		Ok(true)
	}
}
