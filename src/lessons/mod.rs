//! Self-contained lessons on everyday language features.
//!
//! Each module stands alone. Synchronous lessons expose the values they
//! compute plus a `lines()` function with the text a demo prints; the async
//! lesson in [`tasks`] exposes the operations themselves. Run them all with
//! `cargo run --example lessons`.

pub mod basics;
pub mod errors;
pub mod flow;
pub mod queries;
pub mod tasks;
pub mod vehicles;

/// Capitalised boolean, the way the lesson transcripts print it.
pub(crate) fn capitalised(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}
