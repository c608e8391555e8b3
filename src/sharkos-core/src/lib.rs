// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

pub mod message;
pub mod signal;
pub mod status;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use message::{DecodedMessage, FieldValue, Fields, MessageKind, StreamStop};
pub use signal::RadioSignal;
pub use status::StatusReport;
