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

//! ## How it works
//!
//! A [`Buffer`] reads and writes a random-access [store](store::Store), usually a
//! file, at arbitrary positions, through a single in-memory *window* over a
//! contiguous range of it. The window's memory is a *block* claimed from a
//! [pool](pool) when the buffer opens and returned when it closes, so short-lived
//! buffers don't allocate.
//!
//! ### Windows
//!
//! An access inside the window costs no IO. An access past the window's resident
//! bytes but within its capacity reads the bytes in between, filling the window
//! as far as it can so the next sequential access lands inside it. Anything else
//! flushes unwritten changes and moves the window: by one capacity if that
//! reaches the access, so scans in either direction touch the store once per
//! window, otherwise to the access itself. Accesses at least as long as the
//! capacity go straight to the store.
//!
//! Writes stay in the window until it moves or is flushed. A failed flush keeps
//! them, to be retried.
//!
//! ### Siblings
//!
//! A buffer can open *siblings*: more buffers over the same store, each with its
//! own window and position. The store closes when the last of them closes.
//! Siblings don't see each other's unflushed writes, and must not write to the
//! same bytes.
//!
//! ### Streams
//!
//! Text decoders and encoders, inflaters, checksums, and transfers to other
//! buffers work on whatever part of the window is resident, one chunk at a time.
//! See [`streams`].

mod buffer;
mod codec;
mod error;
pub mod pool;
mod shared;
mod std_io;
pub mod store;
pub mod streams;
mod window;

pub use buffer::*;
pub use codec::{ByteOrder, FastBytes, MAX_WIDTH, Portable, Primitive};
pub use error::*;
pub use shared::State;
