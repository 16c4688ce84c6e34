// SPDX-License-Identifier: Apache-2.0

use std::cmp::min;
use std::result;
use flate2::{Decompress, FlushDecompress, Status};
use crate::{Buffer, Error, ErrorBox, Result, ResultContext};
use crate::OperationKind::Inflate;
use crate::pool::Pool;
use crate::store::Store;

/// The progress of an inflate call.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Inflated {
	/// The number of compressed bytes consumed.
	pub read: usize,
	/// The number of decompressed bytes produced.
	pub written: usize,
	/// Whether the end of the compressed stream was reached.
	pub finished: bool,
}

/// A failed inflate call, with the progress made before the failure.
#[derive(Debug, thiserror::Error)]
#[error("inflate failed after consuming {read} bytes")]
pub struct InflateError {
	/// The number of compressed bytes consumed before the failure.
	pub read: usize,
	/// The number of decompressed bytes produced before the failure.
	pub written: usize,
	#[source]
	pub source: ErrorBox,
}

/// Decompresses a stream incrementally.
pub trait Inflater {
	/// Decompresses from `src` into `dst`, returning the number of bytes
	/// consumed and produced. Input the inflater holds internally counts as
	/// consumed only once it's been decompressed.
	fn inflate(&mut self, src: &[u8], dst: &mut [u8]) -> result::Result<Inflated, InflateError>;
}

impl Inflater for Decompress {
	fn inflate(&mut self, src: &[u8], dst: &mut [u8]) -> result::Result<Inflated, InflateError> {
		let total_in = self.total_in();
		let total_out = self.total_out();
		let status = self.decompress(src, dst, FlushDecompress::None);
		let read = (self.total_in() - total_in) as usize;
		let written = (self.total_out() - total_out) as usize;
		match status {
			Ok(status) => Ok(Inflated {
				read,
				written,
				finished: status == Status::StreamEnd,
			}),
			Err(error) => Err(InflateError {
				read,
				written,
				source: error.into(),
			})
		}
	}
}

impl Inflated {
	fn add(&mut self, other: Inflated) {
		self.read += other.read;
		self.written += other.written;
		self.finished = other.finished;
	}

	fn made_progress(&self) -> bool {
		self.read > 0 || self.written > 0
	}
}

impl<S: Store, P: Pool> Buffer<S, P> {
	/// Inflates compressed bytes at the position into `dst`, until it's full or
	/// the compressed stream ends, advancing the position by the bytes consumed.
	///
	/// On malformed input, the position still advances by exactly the bytes the
	/// inflater consumed before failing. The returned error's source is an
	/// [`InflateError`] holding the totals.
	pub fn inflate<I: Inflater>(&mut self, inflater: &mut I, dst: &mut [u8]) -> Result<Inflated> {
		self.check_open(Inflate)?;
		let mut total = Inflated::default();
		while total.written < dst.len() && !total.finished {
			let src = self.window
						  .seek(self.shared.store(), self.position, 1, self.size)
						  .context(Inflate)?;
			match inflater.inflate(src, &mut dst[total.written..]) {
				Ok(step) => {
					self.position += step.read as u64;
					total.add(step);
					if !step.made_progress() { break }
				}
				Err(error) => {
					self.position += error.read as u64;
					return Err(failed(total, error))
				}
			}
		}
		Ok(total)
	}

	/// Inflates compressed bytes at the position into `dst` at its position,
	/// until `max` bytes are produced or the compressed stream ends. Both
	/// positions advance.
	pub fn inflate_to<I: Inflater, S2: Store, P2: Pool>(
		&mut self,
		inflater: &mut I,
		dst: &mut Buffer<S2, P2>,
		max: usize
	) -> Result<Inflated> {
		self.check_open(Inflate)?;
		dst.check_open(Inflate)?;
		let mut total = Inflated::default();
		while total.written < max && !total.finished {
			let src = self.window
						  .seek(self.shared.store(), self.position, 1, self.size)
						  .context(Inflate)?;
			let remaining = max - total.written;
			let out = dst.window
						 .seek_mut(dst.shared.store(), dst.position, remaining, dst.size)
						 .context(Inflate)?;
			let limit = min(out.len(), remaining);
			let result = inflater.inflate(src, &mut out[..limit]);
			let (read, written) = match &result {
				Ok(step) => (step.read, step.written),
				Err(error) => (error.read, error.written)
			};

			self.position += read as u64;
			dst.window.commit(dst.position, written, &mut dst.size);
			dst.position += written as u64;

			match result {
				Ok(step) => {
					total.add(step);
					if !step.made_progress() { break }
				}
				Err(error) => return Err(failed(total, error))
			}
		}
		Ok(total)
	}
}

fn failed(total: Inflated, error: InflateError) -> Error {
	Error::format(
		Inflate,
		InflateError {
			read: total.read + error.read,
			written: total.written + error.written,
			source: error.source,
		}
	)
}
