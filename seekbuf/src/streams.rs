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

//! Consumers that pull bytes through a buffer's window one resident chunk at a
//! time: text codecs, inflaters, checksums, and buffer-to-buffer transfers.
//! Each advances the buffer position by exactly the bytes it consumed.

mod checksum;
mod inflate;
mod seeking;
mod text;
mod transfer;

pub use checksum::*;
pub use inflate::*;
pub use seeking::*;
pub use text::*;
