// SPDX-License-Identifier: Apache-2.0

use std::error::Error as _;
use pretty_assertions::{assert_eq, assert_str_eq};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use seekbuf::{Result, Utf8Error};
use seekbuf::store::MemoryStore;
use seekbuf::streams::{Latin1Decoder, Latin1Encoder, UnmappableChar, Utf8Decoder, Utf8Encoder};
use crate::common::open;

#[macro_use]
mod common;

const TEXT: &str = "héllo wörld ✓ 🦀 ünïcödé, then some plain ascii to span windows";

#[test]
fn utf8_across_windows() -> Result {
	let mut buf = open(MemoryStore::new(), 8);
	assert_eq!(buf.encode(&mut Utf8Encoder, TEXT)?, TEXT.len());
	assert_eq!(buf.position(), TEXT.len() as u64);
	assert_eq!(buf.size(), TEXT.len() as u64);

	buf.set_position(0);
	let mut text = String::new();
	assert_eq!(buf.decode(&mut Utf8Decoder, &mut text, usize::MAX)?, TEXT.len());
	assert_str_eq!(text, TEXT);
	assert_eq!(buf.decode(&mut Utf8Decoder, &mut text, usize::MAX)?, 0);
	Ok(())
}

#[quickcheck]
fn utf8_round_trip(text: String, capacity: u8) -> TestResult {
	let mut buf = open(MemoryStore::new(), 8 + capacity as usize % 32);
	if let Err(error) = buf.encode(&mut Utf8Encoder, &text) {
		return TestResult::error(error.to_string())
	}

	buf.set_position(0);
	let mut decoded = String::new();
	if let Err(error) = buf.decode(&mut Utf8Decoder, &mut decoded, usize::MAX) {
		return TestResult::error(error.to_string())
	}
	qc_assert_eq!(decoded, text)
}

#[test]
fn decode_limit() -> Result {
	let mut buf = open(MemoryStore::from(TEXT.as_bytes()), 8);
	let mut text = String::new();
	assert_eq!(buf.decode(&mut Utf8Decoder, &mut text, 5)?, 5);
	assert_str_eq!(text, "héll");
	assert_eq!(buf.position(), 5);

	// A character that doesn't fit the limit is left for the next call.
	let mut buf = open(MemoryStore::from("aé".as_bytes()), 8);
	let mut text = String::new();
	assert_eq!(buf.decode(&mut Utf8Decoder, &mut text, 2)?, 1);
	assert_str_eq!(text, "a");
	Ok(())
}

#[test]
fn invalid_utf8() {
	let mut buf = open(MemoryStore::from(&b"abc\xFFdef"[..]), 8);
	let mut text = String::new();
	let error = buf.decode(&mut Utf8Decoder, &mut text, usize::MAX).unwrap_err();
	assert!(error.is_format());
	assert_str_eq!(text, "abc");
	assert_eq!(buf.position(), 3);

	let source = error.source().unwrap().downcast_ref::<Utf8Error>().unwrap();
	assert!(source.kind.is_invalid_sequence());
	assert_eq!(source.bytes(), &[0xFF]);
}

#[test]
fn incomplete_utf8_at_end() {
	let mut buf = open(MemoryStore::from(&b"ab\xE2\x9C"[..]), 8);
	let mut text = String::new();
	let error = buf.decode(&mut Utf8Decoder, &mut text, usize::MAX).unwrap_err();
	assert!(error.is_format());
	assert_eq!(buf.position(), 2);

	let source = error.source().unwrap().downcast_ref::<Utf8Error>().unwrap();
	assert!(source.kind.is_incomplete_char());
}

#[test]
fn lines() -> Result {
	let mut buf = open(
		MemoryStore::from("first\nsecond, longer than the window\r\n\nlast".as_bytes()),
		8
	);
	let mut lines = Vec::new();
	let mut line = String::new();
	while buf.next_line(&mut Utf8Decoder, &mut line)? {
		lines.push(line.clone());
		line.clear();
	}

	assert_eq!(lines, ["first", "second, longer than the window", "", "last"]);
	assert_eq!(buf.remaining(), 0);
	Ok(())
}

#[test]
fn lines_with_multibyte_chars() -> Result {
	let text = "ünï\ncödé ✓✓✓✓\n🦀";
	let mut buf = open(MemoryStore::from(text.as_bytes()), 8);
	let mut line = String::new();
	let mut lines = Vec::new();
	while buf.next_line(&mut Utf8Decoder, &mut line)? {
		lines.push(std::mem::take(&mut line));
	}
	assert_eq!(lines, ["ünï", "cödé ✓✓✓✓", "🦀"]);
	Ok(())
}

#[test]
fn latin1() -> Result {
	let mut buf = open(MemoryStore::new(), 8);
	assert_eq!(buf.encode(&mut Latin1Encoder, "café crème")?, 10);
	assert_eq!(buf.size(), 10);
	assert!(buf.matches_at(0, b"caf\xE9 cr\xE8me")?);

	buf.set_position(0);
	let mut text = String::new();
	assert_eq!(buf.decode(&mut Latin1Decoder, &mut text, usize::MAX)?, 10);
	assert_str_eq!(text, "café crème");
	Ok(())
}

#[test]
fn unmappable_latin1() {
	let mut buf = open(MemoryStore::new(), 8);
	let error = buf.encode(&mut Latin1Encoder, "5€").unwrap_err();
	assert!(error.is_format());
	assert_eq!(buf.position(), 1);
	assert_eq!(buf.size(), 1);

	let source = error.source().unwrap().downcast_ref::<UnmappableChar>().unwrap();
	assert_eq!(source.char, '€');
}
