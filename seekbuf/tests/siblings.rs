// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::thread;
use pretty_assertions::assert_eq;
use seekbuf::{Buffer, Result};
use seekbuf::store::MemoryStore;
use crate::common::{CountingStore, open, pattern};

mod common;

const ORDERS: [[usize; 3]; 6] = [
	[0, 1, 2],
	[0, 2, 1],
	[1, 0, 2],
	[1, 2, 0],
	[2, 0, 1],
	[2, 1, 0],
];

#[test]
fn store_closes_after_last_sibling() -> Result {
	for order in ORDERS {
		let store = CountingStore::empty();
		let first = open(store.clone(), 8);
		let second = first.sibling()?;
		let third = second.sibling()?;
		assert_eq!(first.shared_state().count(), 3);

		let mut siblings = [Some(first), Some(second), Some(third)];
		for (closed, &i) in order.iter().enumerate() {
			assert_eq!(store.closes(), 0, "closed early in order {order:?}");
			let mut sibling = siblings[i].take().unwrap();
			sibling.close()?;
			assert_eq!(siblings.iter().flatten().count(), 2 - closed);
		}
		assert_eq!(store.closes(), 1, "order {order:?}");
	}
	Ok(())
}

#[test]
fn dropped_siblings_close_store() {
	let store = CountingStore::empty();
	let first = open(store.clone(), 8);
	let second = first.sibling().unwrap();
	drop(first);
	assert_eq!(store.closes(), 0);
	assert!(second.shared_state().is_open());
	drop(second);
	assert_eq!(store.closes(), 1);
}

#[test]
fn closed_buffer_has_no_siblings() -> Result {
	let store = CountingStore::empty();
	let mut first = open(store.clone(), 8);
	let second = first.sibling()?;
	first.close()?;
	assert!(first.sibling().unwrap_err().is_closed());

	let third = second.sibling()?;
	assert_eq!(third.shared_state().count(), 2);
	Ok(())
}

#[test]
fn failed_sibling_detaches() -> Result {
	let store = CountingStore::empty();
	let mut first = open(store.clone(), 8);

	store.set_fail_sizes(true);
	assert!(first.sibling().unwrap_err().is_io());
	assert_eq!(first.shared_state().count(), 1);

	store.set_fail_sizes(false);
	first.close()?;
	assert_eq!(store.closes(), 1);
	Ok(())
}

#[test]
fn siblings_keep_own_windows() -> Result {
	let store = Arc::new(MemoryStore::from(pattern(32)));
	let mut first = open(store.clone(), 16);
	let mut second = first.sibling()?;
	assert_eq!(second.size(), 32);
	assert_eq!(second.byte_order(), first.byte_order());

	first.write_u8_at(3, 0xEE)?;
	first.set_position(9);
	assert_eq!(second.position(), 0);
	assert_eq!(second.read_u8_at(3)?, pattern(32)[3]);

	first.flush()?;
	let mut third = first.sibling()?;
	assert_eq!(third.read_u8_at(3)?, 0xEE);

	second.write_u8_at(40, 1)?;
	assert_eq!(first.size(), 32);
	assert_eq!(second.size(), 41);
	Ok(())
}

#[test]
fn siblings_across_threads() -> Result {
	let store = CountingStore::empty();
	let first = open(store.clone(), 16);
	let handles: Vec<_> = (0..4u8).map(|i| {
		let mut sibling = first.sibling().unwrap();
		thread::spawn(move || -> Result {
			for j in 0..64 {
				sibling.write_u8_at(i as u64 * 64 + j, i + 1)?;
			}
			sibling.close()
		})
	}).collect();

	for handle in handles {
		handle.join().unwrap()?;
	}

	assert_eq!(store.closes(), 0);
	drop(first);
	assert_eq!(store.closes(), 1);

	let bytes = store.bytes();
	assert_eq!(bytes.len(), 256);
	for (i, chunk) in bytes.chunks(64).enumerate() {
		assert!(chunk.iter().all(|&b| b == i as u8 + 1), "region {i}: {chunk:?}");
	}
	Ok(())
}

#[test]
fn sibling_of_file_store() -> Result {
	let file = tempfile::tempfile().unwrap();
	let mut first = Buffer::open(seekbuf::store::FileStore::from(file))?;
	first.write_u64(u64::MAX)?;
	first.flush()?;

	let mut second = first.sibling()?;
	assert_eq!(second.size(), 8);
	assert_eq!(second.read_u64()?, u64::MAX);
	Ok(())
}
