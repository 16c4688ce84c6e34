// SPDX-License-Identifier: Apache-2.0

//! Fixed-width value encoding and the byte-level primitives it runs on.

use std::mem;
use bytemuck::Pod;

/// The byte order of multi-byte values.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ByteOrder {
	#[default]
	BigEndian,
	LittleEndian,
}

impl ByteOrder {
	/// Returns the byte order of the target platform.
	#[inline]
	pub const fn native() -> Self {
		if cfg!(target_endian = "big") {
			Self::BigEndian
		} else {
			Self::LittleEndian
		}
	}

	/// Returns `true` if this is the byte order of the target platform.
	#[inline]
	pub fn is_native(self) -> bool { self == Self::native() }

	/// Returns `true` if the order is [`BigEndian`](Self::BigEndian).
	pub fn is_big_endian(self) -> bool {
		matches!(self, Self::BigEndian)
	}

	/// Returns `true` if the order is [`LittleEndian`](Self::LittleEndian).
	pub fn is_little_endian(self) -> bool {
		matches!(self, Self::LittleEndian)
	}
}

/// Byte-slice operations the window and codec depend on. Implementations may
/// accelerate these; [`Portable`] is the safe fallback every target gets.
pub trait FastBytes {
	/// Reverses `bytes` in place, swapping their byte order.
	fn swap(bytes: &mut [u8]);

	/// Sets every byte of `bytes` to `value`.
	fn fill(bytes: &mut [u8], value: u8);

	/// Returns `true` if `a` and `b` hold the same bytes.
	fn equal(a: &[u8], b: &[u8]) -> bool;
}

/// The portable [`FastBytes`] implementation.
#[derive(Copy, Clone, Debug, Default)]
pub struct Portable;

impl FastBytes for Portable {
	#[inline]
	fn swap(bytes: &mut [u8]) { bytes.reverse() }

	#[inline]
	fn fill(bytes: &mut [u8], value: u8) { bytes.fill(value) }

	#[inline]
	fn equal(a: &[u8], b: &[u8]) -> bool { a == b }
}

/// The [`FastBytes`] implementation used by the crate.
pub(crate) type Bytes = Portable;

/// The largest [`Primitive`] width, in bytes.
pub const MAX_WIDTH: usize = 8;

mod sealed {
	pub trait Sealed { }
}

/// A fixed-width value of 1, 2, 4, or 8 bytes which can be read from and written
/// to a buffer in either byte order.
pub trait Primitive: Pod + sealed::Sealed {
	/// The encoded width in bytes.
	const WIDTH: usize = mem::size_of::<Self>();
}

macro_rules! gen_primitives {
    ($($ty:ident)+) => {
		$(
		impl sealed::Sealed for $ty { }
		impl Primitive for $ty { }
		)+
	};
}

gen_primitives! { u8 i8 u16 i16 u32 i32 u64 i64 f32 f64 }

/// Decodes a value from exactly `T::WIDTH` bytes in `order`.
pub(crate) fn decode<T: Primitive>(bytes: &[u8], order: ByteOrder) -> T {
	let mut raw = [0; MAX_WIDTH];
	let raw = &mut raw[..T::WIDTH];
	raw.copy_from_slice(bytes);
	if !order.is_native() {
		Bytes::swap(raw);
	}
	bytemuck::pod_read_unaligned(raw)
}

/// Encodes `value` in `order` into the front of `raw`, returning the encoded
/// slice.
pub(crate) fn encode<T: Primitive>(value: T, order: ByteOrder, raw: &mut [u8; MAX_WIDTH]) -> &[u8] {
	let raw = &mut raw[..T::WIDTH];
	raw.copy_from_slice(bytemuck::bytes_of(&value));
	if !order.is_native() {
		Bytes::swap(raw);
	}
	raw
}
