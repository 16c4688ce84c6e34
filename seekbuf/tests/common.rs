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

#![allow(dead_code, unused_macros)]

use std::fmt::{Arguments, Debug};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize};
use std::sync::atomic::Ordering::SeqCst;
use seekbuf::{Buffer, BufferOptions};
use seekbuf::store::{MemoryStore, Store};

macro_rules! qc_assert_eq {
	($left:expr,$right:expr) => {{
		let left = $left;
		let right = $right;
		if left == right {
			TestResult::passed()
		} else {
			TestResult::error(
				common::format_qc_assert_error(&left, &right, None)
			)
		}
	}};
    ($left:expr,$right:expr,$($arg:tt)+) => {{
		let left = $left;
		let right = $right;
		if left == right {
			TestResult::passed()
		} else {
			TestResult::error(
				common::format_qc_assert_error(&left, &right, Some(format_args!($($arg)+)))
			)
		}
	}};
}

pub fn format_qc_assert_error<L: Debug, R: Debug>(left: &L, right: &R, msg: Option<Arguments>) -> String {
	if let Some(msg) = msg {
		format!(
			"assertion failed `(left == right)`: {msg}\n \
			left: `{left:?}`,\nright: `{right:?}`",
		)
	} else {
		format!(
			"assertion failed `(left == right)`:\n \
			left: `{left:?}`,\nright: `{right:?}`",
		)
	}
}

/// A memory store counting calls, whose writes can be made to fail.
#[derive(Debug, Default)]
pub struct CountingStore {
	data: MemoryStore,
	reads: AtomicUsize,
	writes: AtomicUsize,
	closes: AtomicUsize,
	fail_writes: AtomicBool,
	fail_truncates: AtomicBool,
	fail_sizes: AtomicBool,
}

impl CountingStore {
	pub fn new(data: Vec<u8>) -> Arc<Self> {
		Arc::new(Self {
			data: data.into(),
			..Self::default()
		})
	}

	pub fn empty() -> Arc<Self> { Self::new(Vec::new()) }

	pub fn reads(&self) -> usize { self.reads.load(SeqCst) }
	pub fn writes(&self) -> usize { self.writes.load(SeqCst) }
	pub fn closes(&self) -> usize { self.closes.load(SeqCst) }

	pub fn reset_counts(&self) {
		self.reads.store(0, SeqCst);
		self.writes.store(0, SeqCst);
	}

	pub fn set_fail_writes(&self, value: bool) {
		self.fail_writes.store(value, SeqCst);
	}

	pub fn set_fail_truncates(&self, value: bool) {
		self.fail_truncates.store(value, SeqCst);
	}

	pub fn set_fail_sizes(&self, value: bool) {
		self.fail_sizes.store(value, SeqCst);
	}

	pub fn bytes(&self) -> Vec<u8> { self.data.to_vec() }
}

impl Store for CountingStore {
	fn size(&self) -> io::Result<u64> {
		if self.fail_sizes.load(SeqCst) {
			return Err(io::Error::new(io::ErrorKind::Other, "store unavailable"))
		}

		self.data.size()
	}

	fn read_at(&self, pos: u64, dst: &mut [u8]) -> io::Result<usize> {
		self.reads.fetch_add(1, SeqCst);
		self.data.read_at(pos, dst)
	}

	fn write_at(&self, pos: u64, src: &[u8]) -> io::Result<()> {
		if self.fail_writes.load(SeqCst) {
			return Err(io::Error::new(io::ErrorKind::Other, "disk full"))
		}

		self.writes.fetch_add(1, SeqCst);
		self.data.write_at(pos, src)
	}

	fn truncate(&self, size: u64) -> io::Result<()> {
		if self.fail_truncates.load(SeqCst) {
			return Err(io::Error::new(io::ErrorKind::Other, "read-only store"))
		}

		self.data.truncate(size)
	}

	fn close(&self) -> io::Result<()> {
		self.closes.fetch_add(1, SeqCst);
		Ok(())
	}
}

/// Opens a buffer with `capacity` over `store`.
pub fn open<S: Store>(store: S, capacity: usize) -> Buffer<S> {
	Buffer::with_options(store, BufferOptions::new().with_capacity(capacity)).unwrap()
}

/// Returns `len` bytes of a repeating, non-zero pattern.
pub fn pattern(len: usize) -> Vec<u8> {
	(0..len).map(|i| (i % 251) as u8 + 1).collect()
}
