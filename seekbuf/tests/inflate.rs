// SPDX-License-Identifier: Apache-2.0

use std::error::Error as _;
use std::io::Write;
use std::sync::Arc;
use flate2::{Compression, Decompress};
use flate2::write::ZlibEncoder;
use pretty_assertions::assert_eq;
use seekbuf::Result;
use seekbuf::store::MemoryStore;
use seekbuf::streams::InflateError;
use crate::common::open;

mod common;

const OFFSET: usize = 13;

fn data() -> Vec<u8> {
	b"windows slide over the store one capacity at a time. ".repeat(80)
}

fn compressed(data: &[u8]) -> Vec<u8> {
	let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
	encoder.write_all(data).unwrap();
	encoder.finish().unwrap()
}

/// Places a zlib stream between filler bytes.
fn framed(stream: &[u8]) -> Vec<u8> {
	let mut bytes = vec![0xAA; OFFSET];
	bytes.extend_from_slice(stream);
	bytes.extend_from_slice(&[0xBB; 5]);
	bytes
}

#[test]
fn inflate() -> Result {
	let data = data();
	let stream = compressed(&data);
	let mut buf = open(MemoryStore::from(framed(&stream)), 16);
	buf.set_position(OFFSET as u64);

	let mut out = vec![0; data.len() + 64];
	let inflated = buf.inflate(&mut Decompress::new(true), &mut out)?;
	assert!(inflated.finished);
	assert_eq!(inflated.written, data.len());
	assert_eq!(inflated.read, stream.len());
	assert_eq!(&out[..data.len()], &data[..]);
	assert_eq!(buf.position(), (OFFSET + stream.len()) as u64);
	assert_eq!(buf.read_u8()?, 0xBB);
	Ok(())
}

#[test]
fn inflate_in_parts() -> Result {
	let data = data();
	let stream = compressed(&data);
	let mut buf = open(MemoryStore::from(framed(&stream)), 32);
	buf.set_position(OFFSET as u64);

	let mut inflater = Decompress::new(true);
	let mut out = Vec::new();
	let mut part = [0; 100];
	loop {
		let inflated = buf.inflate(&mut inflater, &mut part)?;
		out.extend_from_slice(&part[..inflated.written]);
		if inflated.finished || inflated.written == 0 { break }
	}
	assert_eq!(out, data);
	Ok(())
}

#[test]
fn inflate_to_buffer() -> Result {
	let data = data();
	let stream = compressed(&data);
	let mut src = open(MemoryStore::from(framed(&stream)), 16);
	src.set_position(OFFSET as u64);

	let store = Arc::new(MemoryStore::new());
	let mut dst = open(store.clone(), 64);
	dst.write_u16(0xFFFF)?;

	let inflated = src.inflate_to(&mut Decompress::new(true), &mut dst, usize::MAX)?;
	assert!(inflated.finished);
	assert_eq!(inflated.written, data.len());
	assert_eq!(dst.position(), 2 + data.len() as u64);
	assert_eq!(dst.size(), 2 + data.len() as u64);
	assert_eq!(src.position(), (OFFSET + stream.len()) as u64);

	dst.close()?;
	assert_eq!(&store.to_vec()[2..], &data[..]);
	Ok(())
}

#[test]
fn inflate_to_limit() -> Result {
	let data = data();
	let stream = compressed(&data);
	let mut src = open(MemoryStore::from(stream), 16);
	let store = Arc::new(MemoryStore::new());
	let mut dst = open(store.clone(), 16);

	let inflated = src.inflate_to(&mut Decompress::new(true), &mut dst, 100)?;
	assert!(!inflated.finished);
	assert_eq!(inflated.written, 100);
	assert_eq!(dst.size(), 100);

	dst.close()?;
	assert_eq!(store.to_vec(), &data[..100]);
	Ok(())
}

#[test]
fn malformed_stream() {
	// A valid zlib header followed by a block of reserved type.
	let stream = [0x78, 0x9C, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
	let mut buf = open(MemoryStore::from(framed(&stream)), 16);
	buf.set_position(OFFSET as u64);

	let mut out = [0; 64];
	let error = buf.inflate(&mut Decompress::new(true), &mut out).unwrap_err();
	assert!(error.is_format());

	let source = error.source().unwrap().downcast_ref::<InflateError>().unwrap();
	assert_eq!(source.written, 0);
	assert_eq!(buf.position(), (OFFSET + source.read) as u64);
}

#[test]
fn truncated_stream() -> Result {
	let data = data();
	let stream = compressed(&data);
	let half = &stream[..stream.len() / 2];
	let mut buf = open(MemoryStore::from(half), 16);

	let mut out = vec![0; data.len()];
	let inflated = buf.inflate(&mut Decompress::new(true), &mut out)?;
	assert!(!inflated.finished);
	assert_eq!(buf.remaining(), 0);
	assert_eq!(&out[..inflated.written], &data[..inflated.written]);
	Ok(())
}
