// SPDX-License-Identifier: Apache-2.0

//! The lifecycle token shared by sibling buffers over one store.

use std::io;
use std::num::NonZeroUsize;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering::{Acquire, Relaxed, AcqRel};
use tracing::debug;
use crate::store::Store;

/// The lifecycle state of a shared store.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum State {
	/// The store is open with a number of attached siblings.
	Open(NonZeroUsize),
	/// The store is closed. Nothing may attach to it.
	Closed,
}

impl State {
	/// Returns `true` if the state is [`Open`](Self::Open).
	pub fn is_open(self) -> bool { matches!(self, Self::Open(_)) }

	/// Returns `true` if the state is [`Closed`](Self::Closed).
	pub fn is_closed(self) -> bool { matches!(self, Self::Closed) }

	/// Returns the number of attached siblings.
	pub fn count(self) -> usize {
		match self {
			Self::Open(count) => count.get(),
			Self::Closed => 0
		}
	}

	fn into_bits(self) -> usize { self.count() }

	fn from_bits(bits: usize) -> Self {
		NonZeroUsize::new(bits).map_or(Self::Closed, Self::Open)
	}
}

/// A store shared between sibling buffers, closed by the last to detach.
#[derive(Debug)]
pub struct Shared<S: Store> {
	state: AtomicUsize,
	store: S,
}

impl<S: Store> Shared<S> {
	/// Wraps `store` with one attached buffer.
	pub fn new(store: S) -> Self {
		Self {
			state: AtomicUsize::new(State::Open(NonZeroUsize::MIN).into_bits()),
			store,
		}
	}

	/// Returns the shared store.
	pub fn store(&self) -> &S { &self.store }

	/// Returns the current state.
	pub fn state(&self) -> State {
		State::from_bits(self.state.load(Acquire))
	}

	/// Attaches a sibling, returning the new state, or `None` if the store has
	/// already closed.
	pub fn attach(&self) -> Option<State> {
		let mut current = self.state();
		loop {
			let State::Open(count) = current else {
				debug!("refused to attach to a closed store");
				return None
			};

			let next = State::Open(count.checked_add(1)?);
			match self.state.compare_exchange_weak(
				current.into_bits(),
				next.into_bits(),
				AcqRel,
				Acquire
			) {
				Ok(_) => {
					debug!(siblings = next.count(), "attached sibling");
					return Some(next)
				}
				Err(bits) => current = State::from_bits(bits)
			}
		}
	}

	/// Detaches a sibling. The last sibling to detach closes the store, returning
	/// `true`. Detaching from a closed store does nothing.
	pub fn detach(&self) -> io::Result<bool> {
		let mut current = self.state();
		let next = loop {
			let State::Open(count) = current else { return Ok(false) };

			let next = State::from_bits(count.get() - 1);
			match self.state.compare_exchange_weak(
				current.into_bits(),
				next.into_bits(),
				AcqRel,
				Relaxed
			) {
				Ok(_) => break next,
				Err(bits) => current = State::from_bits(bits)
			}
		};

		if let State::Open(count) = next {
			debug!(siblings = count.get(), "detached sibling");
			return Ok(false)
		}

		debug!("last sibling detached, closing store");
		self.store.close()?;
		Ok(true)
	}
}
