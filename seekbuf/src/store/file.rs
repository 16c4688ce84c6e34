// SPDX-License-Identifier: Apache-2.0

use std::fs::{File, OpenOptions};
use std::io;
use std::io::ErrorKind;
use std::path::Path;
use super::Store;

/// A [`Store`] reading from and writing to a [file](File) at explicit offsets.
/// The file cursor is never used for reads or writes.
#[derive(Debug)]
pub struct FileStore {
	file: File,
}

impl FileStore {
	/// Opens an existing file for reading and writing.
	pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
		OpenOptions::new()
			.read(true)
			.write(true)
			.open(path)
			.map(Into::into)
	}

	/// Opens a file for reading and writing, creating it if it doesn't exist.
	/// Existing contents are kept.
	pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
		OpenOptions::new()
			.read(true)
			.write(true)
			.create(true)
			.truncate(false)
			.open(path)
			.map(Into::into)
	}

	/// Returns a reference to the file.
	pub fn file(&self) -> &File { &self.file }

	/// Consumes the store, returning the file.
	pub fn into_inner(self) -> File { self.file }
}

impl From<File> for FileStore {
	fn from(file: File) -> Self {
		Self { file }
	}
}

cfg_if::cfg_if! {
	if #[cfg(unix)] {
		use std::os::unix::fs::FileExt;

		#[inline]
		fn read_once(file: &File, pos: u64, dst: &mut [u8]) -> io::Result<usize> {
			file.read_at(dst, pos)
		}

		#[inline]
		fn write_once(file: &File, pos: u64, src: &[u8]) -> io::Result<usize> {
			file.write_at(src, pos)
		}
	} else if #[cfg(windows)] {
		use std::os::windows::fs::FileExt;

		#[inline]
		fn read_once(file: &File, pos: u64, dst: &mut [u8]) -> io::Result<usize> {
			file.seek_read(dst, pos)
		}

		#[inline]
		fn write_once(file: &File, pos: u64, src: &[u8]) -> io::Result<usize> {
			file.seek_write(src, pos)
		}
	} else {
		compile_error!("FileStore requires positional file IO (unix or windows)");
	}
}

impl Store for FileStore {
	fn size(&self) -> io::Result<u64> {
		Ok(self.file.metadata()?.len())
	}

	fn read_at(&self, mut pos: u64, dst: &mut [u8]) -> io::Result<usize> {
		let mut read = 0;
		while read < dst.len() {
			match read_once(&self.file, pos, &mut dst[read..]) {
				Ok(0) => break,
				Ok(n) => {
					read += n;
					pos += n as u64;
				}
				Err(err) if err.kind() == ErrorKind::Interrupted => continue,
				Err(err) => return Err(err)
			}
		}
		Ok(read)
	}

	fn write_at(&self, mut pos: u64, mut src: &[u8]) -> io::Result<()> {
		while !src.is_empty() {
			match write_once(&self.file, pos, src) {
				Ok(0) => return Err(ErrorKind::WriteZero.into()),
				Ok(n) => {
					src = &src[n..];
					pos += n as u64;
				}
				Err(err) if err.kind() == ErrorKind::Interrupted => continue,
				Err(err) => return Err(err)
			}
		}
		Ok(())
	}

	fn truncate(&self, size: u64) -> io::Result<()> {
		self.file.set_len(size)
	}

	fn as_file(&self) -> Option<&File> { Some(&self.file) }
}
