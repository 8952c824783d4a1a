//! Reversible masking of sensitive tokens
//!
//! Tokens are swapped for generated pseudonyms before text leaves the
//! process and swapped back afterwards.

pub mod masker;
pub mod names;

pub use masker::{Masker, PseudonymGenerator};
pub use names::NamesGenerator;
