// Copyright 2023 Strixpyrr
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod utf8;

pub use utf8::*;

use std::{fmt, io, result};
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use amplify_derive::Display;
use crate::pool::PoolError;

pub type ErrorBox = Box<dyn StdError + Send + Sync>;
pub type Result<T = ()> = result::Result<T, Error>;

/// The operation an [`Error`] was raised from.
#[derive(Copy, Clone, Debug, Default, Display, Eq, PartialEq)]
pub enum OperationKind {
	#[default]
	#[display("unknown operation")]
	Unknown,
	#[display("open buffer")]
	Open,
	#[display("read")]
	Read,
	#[display("write")]
	Write,
	#[display("truncate")]
	Truncate,
	#[display("flush window")]
	Flush,
	#[display("close buffer")]
	Close,
	#[display("attach sibling")]
	Sibling,
	#[display("seek")]
	Seek,
	#[display("decode text")]
	Decode,
	#[display("encode text")]
	Encode,
	#[display("inflate")]
	Inflate,
	#[display("update checksum")]
	Checksum,
	#[display("transfer")]
	Transfer,
	#[display("{0}")]
	Other(&'static str)
}

/// The kind of an [`Error`].
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq)]
pub enum ErrorKind {
	/// A malformed position or range, detected before any IO.
	#[display("invalid argument")]
	InvalidArgument,
	/// A fixed-width or exact access past the buffer size.
	#[display("out of range")]
	OutOfRange,
	/// The backing store failed.
	#[display("IO error")]
	Io,
	/// The buffer or its backing store is closed.
	#[display("buffer closed")]
	Closed,
	/// Malformed input to a decoder or inflater.
	#[display("malformed data")]
	Format,
	#[display("block pool error")]
	Pool,
	#[display("{0}")]
	Other(&'static str),
}

#[derive(Debug)]
pub struct Error {
	op: OperationKind,
	kind: ErrorKind,
	source: Option<ErrorBox>,
}

/// The range of an out-of-range access.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{len} bytes at position {pos} exceed size {size}")]
pub struct RangeError {
	pub pos: u64,
	pub len: u64,
	pub size: u64,
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let Self { op, kind, source } = self;
		if let Some(source) = source {
			write!(f, "{op} failed; {kind} ({source})")
		} else {
			write!(f, "{op} failed; {kind}")
		}
	}
}

impl StdError for Error {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		if let Some(ref source) = self.source {
			Some(source.as_ref())
		} else {
			None
		}
	}
}

impl Error {
	pub(crate) fn new(
		op: OperationKind,
		kind: ErrorKind,
		source: Option<ErrorBox>
	) -> Self {
		Self { op, kind, source }
	}

	/// Creates a new error with a custom message.
	pub fn other(
		op: OperationKind,
		message: &'static str,
		source: Option<ErrorBox>
	) -> Self {
		Self::new(op, ErrorKind::Other(message), source)
	}

	/// Creates a new "invalid argument" error.
	pub fn invalid_argument(op: OperationKind, message: &'static str) -> Self {
		Self::new(op, ErrorKind::InvalidArgument, Some(message.into()))
	}

	/// Creates a new "out of range" error for `len` bytes at `pos`.
	pub fn out_of_range(op: OperationKind, pos: u64, len: u64, size: u64) -> Self {
		Self::new(
			op,
			ErrorKind::OutOfRange,
			Some(RangeError { pos, len, size }.into())
		)
	}

	/// Creates a new IO error.
	pub fn io(op: OperationKind, error: io::Error) -> Self {
		Self::new(op, ErrorKind::Io, Some(error.into()))
	}

	/// Creates a new "closed" error.
	pub fn closed(op: OperationKind) -> Self {
		Self::new(op, ErrorKind::Closed, None)
	}

	/// Creates a new data format error.
	pub fn format(op: OperationKind, source: impl Into<ErrorBox>) -> Self {
		Self::new(op, ErrorKind::Format, Some(source.into()))
	}

	/// Creates a new block pool error.
	pub fn pool(op: OperationKind, error: PoolError) -> Self {
		Self::new(op, ErrorKind::Pool, Some(error.into()))
	}

	/// Returns the operation kind.
	pub fn operation(&self) -> OperationKind { self.op }

	/// Sets the operation kind.
	pub fn with_operation(mut self, op: OperationKind) -> Self {
		self.op = op;
		self
	}

	/// Returns the error kind.
	pub fn kind(&self) -> ErrorKind { self.kind }

	/// Returns the source downcast into an IO Error, if possible.
	pub fn io_source(&self) -> Option<&io::Error> {
		self.source()?.downcast_ref()
	}

	/// Returns the source downcast into a [`RangeError`], if possible.
	pub fn range(&self) -> Option<&RangeError> {
		self.source()?.downcast_ref()
	}

	pub fn is_invalid_argument(&self) -> bool { matches!(self.kind, ErrorKind::InvalidArgument) }
	pub fn is_out_of_range(&self) -> bool { matches!(self.kind, ErrorKind::OutOfRange) }
	pub fn is_io(&self) -> bool { matches!(self.kind, ErrorKind::Io) }
	pub fn is_closed(&self) -> bool { matches!(self.kind, ErrorKind::Closed) }
	pub fn is_format(&self) -> bool { matches!(self.kind, ErrorKind::Format) }
}

impl From<&'static str> for Error {
	fn from(value: &'static str) -> Self {
		Self::other(OperationKind::Unknown, value, None)
	}
}

impl From<Error> for io::Error {
	fn from(value: Error) -> Self {
		let kind = match value.kind {
			ErrorKind::Io => value.io_source()
								  .map_or(io::ErrorKind::Other, io::Error::kind),
			ErrorKind::InvalidArgument => io::ErrorKind::InvalidInput,
			ErrorKind::OutOfRange => io::ErrorKind::UnexpectedEof,
			ErrorKind::Closed => io::ErrorKind::BrokenPipe,
			ErrorKind::Format => io::ErrorKind::InvalidData,
			ErrorKind::Pool |
			ErrorKind::Other(_) => io::ErrorKind::Other,
		};
		io::Error::new(kind, value)
	}
}

/// Attaches an operation to a foreign error.
pub trait ResultContext<T> {
	fn context(self, op: OperationKind) -> Result<T>;
}

/// Replaces the operation of an existing [`Error`].
pub trait ResultSetContext<T> {
	fn set_context(self, op: OperationKind) -> Result<T>;
}

impl<T> ResultContext<T> for result::Result<T, io::Error> {
	#[inline]
	fn context(self, op: OperationKind) -> Result<T> {
		self.map_err(|err| Error::io(op, err))
	}
}

impl<T> ResultContext<T> for result::Result<T, PoolError> {
	#[inline]
	fn context(self, op: OperationKind) -> Result<T> {
		self.map_err(|err| Error::pool(op, err))
	}
}

impl<T> ResultSetContext<T> for Result<T> {
	#[inline]
	fn set_context(self, op: OperationKind) -> Result<T> {
		self.map_err(|err| err.with_operation(op))
	}
}
