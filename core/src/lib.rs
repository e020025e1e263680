//! Core of the `imgconv` batch converter: the extension-driven codec registry,
//! the collision-free output path resolver and the per-file conversion step.

pub mod codec;
pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod output;

pub use codec::{Decoder, Encoder, resolve_decoder, resolve_encoder};
pub use error::ConvertError;
pub use output::{resolve_output_path, reserve_output_path};
