// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::io::{Read, Seek, SeekFrom, Write};
use crate::Buffer;
use crate::pool::Pool;
use crate::store::Store;
use crate::streams::Seekable;

impl<S: Store, P: Pool> Read for Buffer<S, P> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		Ok(self.read_slice(buf)?)
	}
}

impl<S: Store, P: Pool> Write for Buffer<S, P> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		Ok(self.write_slice(buf)?)
	}

	/// Flushes the window to the store.
	fn flush(&mut self) -> io::Result<()> {
		Ok(Buffer::flush(self)?)
	}
}

impl<S: Store, P: Pool> Seek for Buffer<S, P> {
	fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
		Ok(Seekable::seek(self, pos.into())?)
	}
}
