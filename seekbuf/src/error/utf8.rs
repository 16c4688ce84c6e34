// SPDX-License-Identifier: Apache-2.0

use amplify_derive::Display;
use simdutf8::compat;
use thiserror::Error;

/// A UTF-8 decode error.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[error(
	"{kind} UTF-8 byte sequence ({:X?}) from index {valid_up_to}",
	self.bytes()
)]
pub struct Utf8Error {
	/// The length of the valid input before the error.
	pub valid_up_to: usize,
	/// The invalid or incomplete byte sequence, padded with zeros.
	pub bytes: [u8; 4],
	/// The number the bytes in the invalid or incomplete byte sequence.
	pub count: usize,
	/// The error kind.
	pub kind: Utf8ErrorKind
}

#[derive(Copy, Clone, Debug, Display, Eq, PartialEq)]
pub enum Utf8ErrorKind {
	/// An invalid byte sequence.
	#[display("invalid")]
	InvalidSequence,
	/// An incomplete character byte sequence at the end of input.
	#[display("incomplete")]
	IncompleteChar
}

impl Utf8Error {
	/// Creates an error from a validation failure over `input`.
	pub(crate) fn from_compat(error: compat::Utf8Error, input: &[u8]) -> Self {
		let valid_up_to = error.valid_up_to();
		let (count, kind) = match error.error_len() {
			Some(len) => (len, Utf8ErrorKind::InvalidSequence),
			None      => (input.len() - valid_up_to, Utf8ErrorKind::IncompleteChar)
		};
		let count = count.min(4);
		let mut bytes = [0; 4];
		bytes[..count].copy_from_slice(&input[valid_up_to..valid_up_to + count]);
		Self { valid_up_to, bytes, count, kind }
	}

	/// The invalid or incomplete byte sequence.
	pub fn bytes(&self) -> &[u8] {
		&self.bytes[..self.count]
	}
}

impl Utf8ErrorKind {
	pub fn is_invalid_sequence(&self) -> bool {
		matches!(self, Self::InvalidSequence)
	}

	pub fn is_incomplete_char(&self) -> bool {
		matches!(self, Self::IncompleteChar)
	}
}
