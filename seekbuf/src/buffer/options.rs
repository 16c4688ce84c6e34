// SPDX-License-Identifier: Apache-2.0

use crate::ByteOrder;

/// The default window capacity.
pub const DEFAULT_CAPACITY: usize = 8192;
/// The smallest window capacity. Smaller capacities are raised to this, so any
/// fixed-width value fits in the window.
pub const MIN_CAPACITY: usize = 8;
/// The default minimum length of a file-to-file transfer.
pub const DEFAULT_TRANSFER_THRESHOLD: u64 = 64 * 1024;

/// Options for tuning [`Buffer`](super::Buffer)'s behavior and performance.
///
/// # Capacity
///
/// The window size in bytes. Defaults to `8KiB`. Sequential accesses smaller than
/// this touch the store about once per window; accesses at least this long skip
/// the window and go straight to the store. Capacities below [`MIN_CAPACITY`]
/// are raised to it.
///
/// # Byte order
///
/// The order fixed-width values are read and written in when none is given.
/// Defaults to big-endian.
///
/// # Allocation
///
/// By default, the buffer will fallback to allocating its window if borrowing the
/// pool fails. It can also be set to always allocate, ignoring the pool, or to
/// never allocate.
///
/// # Transfer threshold
///
/// The minimum length for a transfer between two file-backed buffers to be handed
/// to the OS as a file-to-file copy, rather than copied through the windows.
/// Defaults to `64KiB`. The threshold only affects speed, not results.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct BufferOptions {
	pub capacity: usize,
	pub byte_order: ByteOrder,
	pub allocation: Allocate,
	pub transfer_threshold: u64,
}

/// The window allocation mode.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Allocate {
	/// Claim windows from the pool instead of allocating, failing if the pool
	/// cannot be borrowed.
	Never,
	/// Always allocate windows, ignoring the pool.
	Always,
	/// Claim windows from the pool, allocating if the pool cannot be borrowed.
	#[default]
	OnError,
}

impl Allocate {
	/// Returns `true` if the mode is [`Never`](Self::Never).
	pub fn is_never(&self) -> bool {
		matches!(self, Self::Never)
	}

	/// Returns `true` if the mode is [`Always`](Self::Always).
	pub fn is_always(&self) -> bool {
		matches!(self, Self::Always)
	}

	/// Returns `true` if the mode is [`OnError`](Self::OnError).
	pub fn is_on_error(&self) -> bool {
		matches!(self, Self::OnError)
	}
}

impl Default for BufferOptions {
	fn default() -> Self { Self::new() }
}

const fn clamp_capacity(value: usize) -> usize {
	if value < MIN_CAPACITY { MIN_CAPACITY } else { value }
}

impl BufferOptions {
	/// Creates a new set of buffer options.
	pub const fn new() -> Self {
		Self {
			capacity: DEFAULT_CAPACITY,
			byte_order: ByteOrder::BigEndian,
			allocation: Allocate::OnError,
			transfer_threshold: DEFAULT_TRANSFER_THRESHOLD,
		}
	}

	/// Returns the window capacity, at least [`MIN_CAPACITY`].
	#[inline]
	pub const fn capacity(&self) -> usize { clamp_capacity(self.capacity) }

	/// Returns the default byte order.
	#[inline]
	pub const fn byte_order(&self) -> ByteOrder { self.byte_order }

	/// Returns the window allocation mode.
	#[inline]
	pub const fn allocation(&self) -> Allocate { self.allocation }

	/// Returns the file-to-file transfer threshold.
	#[inline]
	pub const fn transfer_threshold(&self) -> u64 { self.transfer_threshold }

	/// Sets the window capacity.
	#[inline]
	pub fn set_capacity(&mut self, value: usize) {
		self.capacity = clamp_capacity(value);
	}

	/// Sets the default byte order.
	#[inline]
	pub fn set_byte_order(&mut self, value: ByteOrder) {
		self.byte_order = value;
	}

	/// Sets the window allocation mode.
	#[inline]
	pub fn set_allocation(&mut self, value: Allocate) {
		self.allocation = value;
	}

	/// Sets the file-to-file transfer threshold.
	#[inline]
	pub fn set_transfer_threshold(&mut self, value: u64) {
		self.transfer_threshold = value;
	}

	/// Sets the window capacity.
	#[inline]
	pub const fn with_capacity(mut self, value: usize) -> Self {
		self.capacity = clamp_capacity(value);
		self
	}

	/// Sets the default byte order.
	#[inline]
	pub const fn with_byte_order(mut self, value: ByteOrder) -> Self {
		self.byte_order = value;
		self
	}

	/// Sets the default byte order to little-endian.
	#[inline]
	pub const fn little_endian(self) -> Self {
		self.with_byte_order(ByteOrder::LittleEndian)
	}

	/// Sets the window allocation mode.
	#[inline]
	pub const fn with_allocation(mut self, value: Allocate) -> Self {
		self.allocation = value;
		self
	}

	/// Sets window allocation to [`Always`](Allocate::Always).
	#[inline]
	pub const fn always_allocate(self) -> Self {
		self.with_allocation(Allocate::Always)
	}

	/// Sets window allocation to [`Never`](Allocate::Never).
	#[inline]
	pub const fn never_allocate(self) -> Self {
		self.with_allocation(Allocate::Never)
	}

	/// Sets the file-to-file transfer threshold.
	#[inline]
	pub const fn with_transfer_threshold(mut self, value: u64) -> Self {
		self.transfer_threshold = value;
		self
	}
}
