// SPDX-License-Identifier: Apache-2.0

use std::convert::Infallible;
use std::result;
use simdutf8::compat;
use crate::{Buffer, Error, ErrorBox, Result, ResultContext, Utf8Error};
use crate::OperationKind::{Decode, Encode};
use crate::pool::Pool;
use crate::store::Store;

/// Why a text coder stopped.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CoderResult {
	/// All the input the coder could use was consumed. A trailing partial
	/// character may remain, waiting for more input.
	InputEmpty,
	/// The output limit was reached.
	OutputFull,
}

/// Decodes bytes in some encoding to UTF-8 text.
pub trait TextDecoder {
	type Error: Into<ErrorBox>;

	/// Decodes `src` into `dst`, appending at most `max` bytes. Returns why the
	/// decoder stopped and the number of bytes consumed from `src`. `last` is
	/// `true` when no input follows `src`, so a trailing partial character is
	/// an error rather than left unconsumed.
	fn decode(
		&mut self,
		src: &[u8],
		dst: &mut String,
		max: usize,
		last: bool
	) -> result::Result<(CoderResult, usize), Self::Error>;
}

/// Encodes UTF-8 text to bytes in some encoding.
pub trait TextEncoder {
	type Error: Into<ErrorBox>;

	/// Encodes `src` into `dst`. Returns why the encoder stopped, the number of
	/// bytes consumed from `src`, and the number written to `dst`.
	fn encode(
		&mut self,
		src: &str,
		dst: &mut [u8]
	) -> result::Result<(CoderResult, usize, usize), Self::Error>;
}

/// A UTF-8 [`TextDecoder`], validating input with [`simdutf8`].
#[derive(Copy, Clone, Debug, Default)]
pub struct Utf8Decoder;

/// A UTF-8 [`TextEncoder`].
#[derive(Copy, Clone, Debug, Default)]
pub struct Utf8Encoder;

/// An ISO-8859-1 [`TextDecoder`], mapping each byte to the code point of the same
/// value.
#[derive(Copy, Clone, Debug, Default)]
pub struct Latin1Decoder;

/// An ISO-8859-1 [`TextEncoder`]. Characters above `U+00FF` can't be encoded.
#[derive(Copy, Clone, Debug, Default)]
pub struct Latin1Encoder;

/// A character with no mapping in the target encoding.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unmappable character {char:?} at index {index}")]
pub struct UnmappableChar {
	pub char: char,
	pub index: usize,
}

/// Returns the largest char boundary of `str` not past `index`.
fn floor_boundary(str: &str, index: usize) -> usize {
	let mut index = index.min(str.len());
	while !str.is_char_boundary(index) {
		index -= 1;
	}
	index
}

impl TextDecoder for Utf8Decoder {
	type Error = Utf8Error;

	fn decode(
		&mut self,
		src: &[u8],
		dst: &mut String,
		max: usize,
		last: bool
	) -> result::Result<(CoderResult, usize), Utf8Error> {
		let (valid, error) = match compat::from_utf8(src) {
			Ok(valid) => (valid, None),
			Err(error) => (
				std::str::from_utf8(&src[..error.valid_up_to()]).unwrap_or_default(),
				Some(error)
			)
		};

		let take = floor_boundary(valid, max);
		dst.push_str(&valid[..take]);
		if take < valid.len() {
			return Ok((CoderResult::OutputFull, take))
		}

		match error {
			None => Ok((CoderResult::InputEmpty, take)),
			// Report the error on the next call, once the valid bytes are consumed.
			Some(_) if take > 0 => Ok((CoderResult::InputEmpty, take)),
			Some(error) if error.error_len().is_none() && !last =>
				Ok((CoderResult::InputEmpty, 0)),
			Some(error) => Err(Utf8Error::from_compat(error, src))
		}
	}
}

impl TextEncoder for Utf8Encoder {
	type Error = Infallible;

	fn encode(
		&mut self,
		src: &str,
		dst: &mut [u8]
	) -> result::Result<(CoderResult, usize, usize), Infallible> {
		let n = floor_boundary(src, dst.len());
		dst[..n].copy_from_slice(&src.as_bytes()[..n]);
		let result = if n < src.len() {
			CoderResult::OutputFull
		} else {
			CoderResult::InputEmpty
		};
		Ok((result, n, n))
	}
}

impl TextDecoder for Latin1Decoder {
	type Error = Infallible;

	fn decode(
		&mut self,
		src: &[u8],
		dst: &mut String,
		max: usize,
		_last: bool
	) -> result::Result<(CoderResult, usize), Infallible> {
		let mut written = 0;
		for (read, &byte) in src.iter().enumerate() {
			let char = char::from(byte);
			written += char.len_utf8();
			if written > max {
				return Ok((CoderResult::OutputFull, read))
			}
			dst.push(char);
		}
		Ok((CoderResult::InputEmpty, src.len()))
	}
}

impl TextEncoder for Latin1Encoder {
	type Error = UnmappableChar;

	fn encode(
		&mut self,
		src: &str,
		dst: &mut [u8]
	) -> result::Result<(CoderResult, usize, usize), UnmappableChar> {
		let mut written = 0;
		for (index, char) in src.char_indices() {
			if written == dst.len() {
				return Ok((CoderResult::OutputFull, index, written))
			}

			let Ok(byte) = u8::try_from(char) else {
				return if written > 0 {
					// Report the error on the next call.
					Ok((CoderResult::InputEmpty, index, written))
				} else {
					Err(UnmappableChar { char, index })
				}
			};
			dst[written] = byte;
			written += 1;
		}
		Ok((CoderResult::InputEmpty, src.len(), written))
	}
}

impl<S: Store, P: Pool> Buffer<S, P> {
	/// Decodes text at the position into `dst` until `max` bytes are appended or
	/// the end of the buffer, advancing the position by the bytes consumed.
	/// Returns the number of bytes consumed.
	///
	/// The decoder is fed one resident chunk of the window at a time. A character
	/// spanning the end of the window is decoded once the window moves to hold
	/// it whole.
	pub fn decode<D: TextDecoder>(
		&mut self,
		decoder: &mut D,
		dst: &mut String,
		max: usize
	) -> Result<usize> {
		self.check_open(Decode)?;
		let capacity = self.capacity();
		let start = dst.len();
		let mut consumed = 0;
		let mut min = 1;
		loop {
			let written = dst.len() - start;
			if written >= max { break }

			let chunk = self.window
							.seek(self.shared.store(), self.position, min, self.size)
							.context(Decode)?;
			let len = chunk.len();
			let last = self.position + len as u64 >= self.size;
			let (result, read) = decoder.decode(chunk, dst, max - written, last)
										.map_err(|err| Error::format(Decode, err))?;
			self.position += read as u64;
			consumed += read;

			if result == CoderResult::OutputFull { break }
			if read > 0 {
				min = 1;
				continue
			}

			if len == 0 || last { break }
			if len >= capacity {
				return Err(Error::format(Decode, "character is longer than the window"))
			}
			min = len + 1;
		}
		Ok(consumed)
	}

	/// Decodes a line of text at the position into `dst`, advancing past its
	/// terminator. The `\n` terminator and a `\r` before it are not appended.
	/// Returns `false` if the position was at the end of the buffer.
	pub fn next_line<D: TextDecoder>(&mut self, decoder: &mut D, dst: &mut String) -> Result<bool> {
		self.check_open(Decode)?;
		if self.position >= self.size { return Ok(false) }

		let capacity = self.capacity();
		let start = dst.len();
		let mut terminated = false;
		let mut min = 1;
		loop {
			let chunk = self.window
							.seek(self.shared.store(), self.position, min, self.size)
							.context(Decode)?;
			if chunk.is_empty() { break }

			let len = chunk.len();
			let newline = chunk.iter().position(|&b| b == b'\n');
			let line = newline.map_or(chunk, |i| &chunk[..i]);
			let at_end = self.position + len as u64 >= self.size;
			let (_, read) = decoder.decode(line, dst, usize::MAX, newline.is_some() || at_end)
								   .map_err(|err| Error::format(Decode, err))?;
			self.position += read as u64;

			if newline.is_some_and(|i| read == i) {
				self.position += 1;
				terminated = true;
				break
			}

			if read > 0 {
				min = 1;
				continue
			}

			if at_end { break }
			if len >= capacity {
				return Err(Error::format(Decode, "character is longer than the window"))
			}
			min = len + 1;
		}

		if terminated && dst[start..].ends_with('\r') {
			dst.pop();
		}
		Ok(true)
	}

	/// Encodes `src` at the position, advancing it by the bytes written. Returns
	/// the number of bytes written.
	pub fn encode<E: TextEncoder>(&mut self, encoder: &mut E, mut src: &str) -> Result<usize> {
		self.check_open(Encode)?;
		let mut total = 0;
		while !src.is_empty() {
			let chunk = self.window
							.seek_mut(self.shared.store(), self.position, src.len(), self.size)
							.context(Encode)?;
			let (_, read, written) = encoder.encode(src, chunk)
											.map_err(|err| Error::format(Encode, err))?;
			self.window.commit(self.position, written, &mut self.size);
			self.position += written as u64;
			total += written;
			src = &src[read..];

			if read == 0 {
				return Err(Error::format(Encode, "encoder made no progress"))
			}
		}
		Ok(total)
	}
}
