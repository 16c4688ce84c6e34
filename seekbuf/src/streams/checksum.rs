// SPDX-License-Identifier: Apache-2.0

use std::cmp::min;
use flate2::Crc;
use crate::{Buffer, Result, ResultContext};
use crate::buffer::end_of;
use crate::OperationKind;
use crate::pool::Pool;
use crate::store::Store;

/// A running checksum over bytes fed to it.
pub trait Checksum {
	fn update(&mut self, bytes: &[u8]);
}

impl<C: Checksum + ?Sized> Checksum for &mut C {
	#[inline]
	fn update(&mut self, bytes: &[u8]) {
		(**self).update(bytes)
	}
}

impl Checksum for Crc {
	#[inline]
	fn update(&mut self, bytes: &[u8]) {
		Crc::update(self, bytes)
	}
}

/// A [`Checksum`] over a [`digest`] hash function, such as SHA-256.
#[cfg(feature = "hash")]
#[derive(Clone, Debug, Default)]
pub struct DigestChecksum<D>(pub D);

#[cfg(feature = "hash")]
impl<D> DigestChecksum<D> {
	/// Returns a reference to the hash function.
	pub fn inner(&self) -> &D { &self.0 }

	/// Consumes the checksum, returning the hash function.
	pub fn into_inner(self) -> D { self.0 }
}

#[cfg(feature = "hash")]
impl<D: digest::Update> Checksum for DigestChecksum<D> {
	#[inline]
	fn update(&mut self, bytes: &[u8]) {
		self.0.update(bytes)
	}
}

impl<S: Store, P: Pool> Buffer<S, P> {
	/// Feeds up to `len` bytes at the position into `checksum`, advancing the
	/// position by the bytes fed. Returns `None` if no bytes were available,
	/// distinguishing the end of the buffer from a zero-length request.
	pub fn update_checksum(&mut self, checksum: &mut impl Checksum, len: usize) -> Result<Option<usize>> {
		let fed = self.update_checksum_at(self.position, checksum, len)?;
		if let Some(fed) = fed {
			self.position += fed as u64;
		}
		Ok(fed)
	}

	/// Feeds up to `len` bytes at `pos` into `checksum`. Returns `None` if no
	/// bytes were available.
	pub fn update_checksum_at(
		&mut self,
		mut pos: u64,
		checksum: &mut impl Checksum,
		len: usize
	) -> Result<Option<usize>> {
		self.check_open(OperationKind::Checksum)?;
		if len == 0 { return Ok(Some(0)) }
		end_of(OperationKind::Checksum, pos, len)?;
		if pos >= self.size { return Ok(None) }

		let len = min(len as u64, self.size - pos) as usize;
		let mut remaining = len;
		while remaining > 0 {
			let chunk = self.window
							.seek(self.shared.store(), pos, remaining, self.size)
							.context(OperationKind::Checksum)?;
			let n = min(chunk.len(), remaining);
			if n == 0 { break }

			checksum.update(&chunk[..n]);
			remaining -= n;
			pos += n as u64;
		}
		Ok(Some(len - remaining))
	}
}
