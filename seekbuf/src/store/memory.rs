// SPDX-License-Identifier: Apache-2.0

use std::io;
use parking_lot::Mutex;
use super::Store;

/// A growable in-memory [`Store`].
#[derive(Debug, Default)]
pub struct MemoryStore {
	data: Mutex<Vec<u8>>,
}

impl MemoryStore {
	pub fn new() -> Self { Self::default() }

	/// Returns a copy of the stored bytes.
	pub fn to_vec(&self) -> Vec<u8> {
		self.data.lock().clone()
	}

	/// Consumes the store, returning the stored bytes.
	pub fn into_inner(self) -> Vec<u8> {
		self.data.into_inner()
	}
}

impl From<Vec<u8>> for MemoryStore {
	fn from(value: Vec<u8>) -> Self {
		Self { data: Mutex::new(value) }
	}
}

impl From<&[u8]> for MemoryStore {
	fn from(value: &[u8]) -> Self {
		value.to_vec().into()
	}
}

fn offset(pos: u64) -> io::Result<usize> {
	usize::try_from(pos).map_err(|_|
		io::Error::new(io::ErrorKind::InvalidInput, "position exceeds addressable memory")
	)
}

impl Store for MemoryStore {
	fn size(&self) -> io::Result<u64> {
		Ok(self.data.lock().len() as u64)
	}

	fn read_at(&self, pos: u64, dst: &mut [u8]) -> io::Result<usize> {
		let data = self.data.lock();
		let Ok(pos) = usize::try_from(pos) else { return Ok(0) };
		let Some(src) = data.get(pos..) else { return Ok(0) };
		let n = src.len().min(dst.len());
		dst[..n].copy_from_slice(&src[..n]);
		Ok(n)
	}

	fn write_at(&self, pos: u64, src: &[u8]) -> io::Result<()> {
		let pos = offset(pos)?;
		let end = pos.checked_add(src.len()).ok_or_else(||
			io::Error::new(io::ErrorKind::InvalidInput, "write overflows addressable memory")
		)?;
		let mut data = self.data.lock();
		if data.len() < end {
			data.resize(end, 0);
		}
		data[pos..end].copy_from_slice(src);
		Ok(())
	}

	fn truncate(&self, size: u64) -> io::Result<()> {
		let size = offset(size)?;
		self.data.lock().resize(size, 0);
		Ok(())
	}
}
