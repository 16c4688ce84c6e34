// SPDX-License-Identifier: Apache-2.0

use std::cmp::min;
use crate::{Buffer, ByteOrder, Primitive, Result, ResultContext};
use crate::codec::{Bytes, encode, FastBytes, MAX_WIDTH};
use crate::OperationKind::Write;
use crate::pool::Pool;
use crate::store::Store;
use super::end_of;

macro_rules! gen_writes {
    ($($name:ident$at_name:ident$ty:ident),+) => {
		$(
		#[doc = concat!("Writes a `", stringify!($ty), "` in the default byte order.")]
		pub fn $name(&mut self, value: $ty) -> Result {
			self.write_pod(value)
		}

		#[doc = concat!("Writes a `", stringify!($ty), "` at `pos` in the default byte order.")]
		pub fn $at_name(&mut self, pos: u64, value: $ty) -> Result {
			self.write_pod_at(pos, value)
		}
		)+
	};
}

impl<S: Store, P: Pool> Buffer<S, P> {
	/// Writes a fixed-width value in the default byte order, advancing the
	/// position.
	pub fn write_pod<T: Primitive>(&mut self, value: T) -> Result {
		self.write_pod_with(value, self.byte_order())
	}

	/// Writes a fixed-width value in `order`, advancing the position.
	pub fn write_pod_with<T: Primitive>(&mut self, value: T, order: ByteOrder) -> Result {
		self.write_pod_at_with(self.position, value, order)?;
		self.position += T::WIDTH as u64;
		Ok(())
	}

	/// Writes a fixed-width value at `pos` in the default byte order.
	pub fn write_pod_at<T: Primitive>(&mut self, pos: u64, value: T) -> Result {
		self.write_pod_at_with(pos, value, self.byte_order())
	}

	/// Writes a fixed-width value at `pos` in `order`. Writing past the size
	/// extends it, with any gap reading back as zeros.
	pub fn write_pod_at_with<T: Primitive>(&mut self, pos: u64, value: T, order: ByteOrder) -> Result {
		self.check_open(Write)?;
		end_of(Write, pos, T::WIDTH)?;

		let mut raw = [0; MAX_WIDTH];
		let raw = encode(value, order, &mut raw);
		self.window
			.write(self.shared.store(), pos, raw, &mut self.size)
			.context(Write)
	}

	gen_writes! {
		write_u8  write_u8_at  u8,
		write_i8  write_i8_at  i8,
		write_u16 write_u16_at u16,
		write_i16 write_i16_at i16,
		write_u32 write_u32_at u32,
		write_i32 write_i32_at i32,
		write_u64 write_u64_at u64,
		write_i64 write_i64_at i64,
		write_f32 write_f32_at f32,
		write_f64 write_f64_at f64
	}

	/// Writes all of `src`, advancing the position. Returns the number of bytes
	/// written.
	pub fn write_slice(&mut self, src: &[u8]) -> Result<usize> {
		let written = self.write_slice_at(self.position, src)?;
		self.position += written as u64;
		Ok(written)
	}

	/// Writes all of `src` at `pos`, returning the number of bytes written.
	/// Writing past the size extends it, with any gap reading back as zeros.
	pub fn write_slice_at(&mut self, pos: u64, src: &[u8]) -> Result<usize> {
		self.check_open(Write)?;
		if src.is_empty() { return Ok(0) }
		end_of(Write, pos, src.len())?;

		self.window
			.write(self.shared.store(), pos, src, &mut self.size)
			.context(Write)?;
		Ok(src.len())
	}

	/// Sets `len` bytes at `pos` to `value`.
	pub fn fill_at(&mut self, mut pos: u64, len: usize, value: u8) -> Result {
		self.check_open(Write)?;
		end_of(Write, pos, len)?;

		let mut remaining = len;
		while remaining > 0 {
			let chunk = self.window
							.seek_mut(self.shared.store(), pos, remaining, self.size)
							.context(Write)?;
			let n = min(chunk.len(), remaining);
			Bytes::fill(&mut chunk[..n], value);
			self.window.commit(pos, n, &mut self.size);
			remaining -= n;
			pos += n as u64;
		}
		Ok(())
	}
}
