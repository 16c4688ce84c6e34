// SPDX-License-Identifier: Apache-2.0

use flate2::Crc;
use pretty_assertions::assert_eq;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use sha2::{Digest, Sha256};
use seekbuf::Result;
use seekbuf::store::MemoryStore;
use seekbuf::streams::DigestChecksum;
use crate::common::{open, pattern};

#[macro_use]
mod common;

#[quickcheck]
fn crc_matches(data: Vec<u8>, len: u16, capacity: u8) -> TestResult {
	let mut buf = open(MemoryStore::from(&data[..]), 8 + capacity as usize);
	let len = len as usize;
	let mut crc = Crc::new();
	let fed = match buf.update_checksum(&mut crc, len) {
		Ok(fed) => fed,
		Err(error) => return TestResult::error(error.to_string())
	};

	let expected_len = len.min(data.len());
	let mut expected = Crc::new();
	expected.update(&data[..expected_len]);

	if len > 0 && data.is_empty() {
		return qc_assert_eq!(fed, None)
	}
	if fed != Some(expected_len) || buf.position() != expected_len as u64 {
		return TestResult::error(format!("fed {fed:?} of {len} requested over {} bytes", data.len()))
	}
	qc_assert_eq!(crc.sum(), expected.sum())
}

#[test]
fn checksum_end() -> Result {
	let mut buf = open(MemoryStore::from(pattern(100)), 16);
	let mut crc = Crc::new();
	assert_eq!(buf.update_checksum(&mut crc, 0)?, Some(0));
	assert_eq!(buf.update_checksum_at(90, &mut crc, 64)?, Some(10));
	assert_eq!(buf.position(), 0);

	assert_eq!(buf.update_checksum(&mut crc, 1000)?, Some(100));
	assert_eq!(buf.position(), 100);
	assert_eq!(buf.update_checksum(&mut crc, 1)?, None);
	assert_eq!(buf.update_checksum(&mut crc, 0)?, Some(0));
	assert_eq!(buf.update_checksum_at(200, &mut crc, 1)?, None);
	Ok(())
}

#[test]
fn checksum_sees_unflushed_writes() -> Result {
	let mut buf = open(MemoryStore::from(pattern(40)), 16);
	buf.write_slice_at(8, b"abc")?;

	let mut crc = Crc::new();
	buf.update_checksum(&mut crc, 40)?;

	let mut bytes = pattern(40);
	bytes[8..11].copy_from_slice(b"abc");
	let mut expected = Crc::new();
	expected.update(&bytes);
	assert_eq!(crc.sum(), expected.sum());
	Ok(())
}

#[test]
fn sha256() -> Result {
	let mut buf = open(MemoryStore::from(&b"--abc--"[..]), 8);
	buf.set_position(2);
	let mut sha = DigestChecksum(Sha256::new());
	assert_eq!(buf.update_checksum(&mut sha, 3)?, Some(3));

	let hash = sha.into_inner().finalize();
	assert_eq!(
		base16ct::lower::encode_string(&hash),
		"ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
	);
	Ok(())
}
