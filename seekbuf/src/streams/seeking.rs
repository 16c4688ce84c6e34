// SPDX-License-Identifier: Apache-2.0

use std::io::SeekFrom;
use crate::{Buffer, Error, Result};
use crate::OperationKind::Seek;
use crate::pool::Pool;
use crate::store::Store;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SeekOffset {
	/// Reset the stream to the start. Equivalent to `FromStart(0)`.
	Reset,
	/// Move forward by an offset.
	Forward(u64),
	/// Move back by an offset.
	Back(u64),
	/// Seek a position from the start of the stream.
	FromStart(u64),
	/// Seek a position from the end of the stream. A positive position seeks
	/// beyond the end, where reads find nothing and writes extend the stream.
	FromEnd(i64),
}

impl SeekOffset {
	/// Converts to a start-based position given a current `pos` and `len`.
	/// Returns `None` if the position would be before the start, or overflows.
	pub fn to_pos(self, pos: u64, len: u64) -> Option<u64> {
		match self {
			SeekOffset::Reset => Some(0),
			SeekOffset::Forward(off) => pos.checked_add(off),
			SeekOffset::Back   (off) => pos.checked_sub(off),
			SeekOffset::FromStart(pos) => Some(pos),
			SeekOffset::FromEnd(off @ 0..) => len.checked_add(off as u64),
			SeekOffset::FromEnd(off      ) => len.checked_sub(off.unsigned_abs())
		}
	}
}

impl From<SeekFrom> for SeekOffset {
	fn from(value: SeekFrom) -> Self {
		match value {
			SeekFrom::Start  (pos)       => SeekOffset::FromStart(pos),
			SeekFrom::End    (pos)       => SeekOffset::FromEnd(pos),
			SeekFrom::Current(off @ 0..) => SeekOffset::Forward(off as u64),
			SeekFrom::Current(off      ) => SeekOffset::Back(off.unsigned_abs())
		}
	}
}

/// A stream that supports seeking. Based on the [`std::io::Seek`] trait.
pub trait Seekable {
	/// Seeks to an `offset`, returning the new position.
	fn seek(&mut self, offset: SeekOffset) -> Result<u64>;

	/// Seeks to the end of the stream then back to the current position, returning
	/// the length.
	fn seek_len(&mut self) -> Result<u64> {
		let pos = self.seek_pos()?;
		let len = self.seek(SeekOffset::FromEnd(0))?;

		if pos != len {
			self.seek(SeekOffset::FromStart(pos))?;
		}

		Ok(len)
	}

	/// Returns the current position.
	fn seek_pos(&mut self) -> Result<u64> {
		self.seek(SeekOffset::Forward(0))
	}
}

/// A convenience extension for [`Seekable`].
pub trait SeekableExt: Seekable {
	/// Resets to the start of the stream. Shorthand for `seek(SeekOffset::Reset)`.
	fn reset(&mut self) -> Result {
		self.seek(SeekOffset::Reset)?;
		Ok(())
	}

	/// Seeks forward `offset` bytes relative to the current position, returning
	/// the new position. Shorthand for `seek(SeekOffset::Forward(offset))`.
	fn seek_forward(&mut self, offset: u64) -> Result<u64> {
		self.seek(SeekOffset::Forward(offset))
	}

	/// Seeks back `offset` bytes relative to the current position, returning the
	/// new position. Shorthand for `seek(SeekOffset::Back(offset))`.
	fn seek_back(&mut self, offset: u64) -> Result<u64> {
		self.seek(SeekOffset::Back(offset))
	}

	/// Seeks `offset` bytes from the start of the stream, returning the new
	/// position. Shorthand for `seek(SeekOffset::FromStart(offset))`.
	fn seek_from_start(&mut self, offset: u64) -> Result<u64> {
		self.seek(SeekOffset::FromStart(offset))
	}

	/// Seeks `offset` bytes relative to the end of the stream, returning the new
	/// position. Shorthand for `seek(SeekOffset::FromEnd(offset))`.
	fn seek_from_end(&mut self, offset: i64) -> Result<u64> {
		self.seek(SeekOffset::FromEnd(offset))
	}
}

impl<S: Seekable> SeekableExt for S { }

impl<S: Store, P: Pool> Seekable for Buffer<S, P> {
	/// Moves the position. Seeking before the start fails without moving it.
	fn seek(&mut self, offset: SeekOffset) -> Result<u64> {
		self.check_open(Seek)?;
		let pos = offset.to_pos(self.position, self.size)
						.ok_or_else(|| Error::invalid_argument(Seek, "seek before start or past the maximum position"))?;
		self.position = pos;
		Ok(pos)
	}
}
