//! Packed 64-bit event codec for event cameras.
//!
//! Each event is stored as one 64-bit word holding polarity, pixel
//! coordinates and a 32-bit time delta relative to an externally tracked
//! time base. Two record variants share the layout: mono (pixel change)
//! events and external trigger events.
//!
//! # Example
//!
//! ```
//! use evarr_core::{mono, trigger};
//!
//! let word = mono::encode(true, 100, 50, 12345);
//! assert_eq!(word, 0x8032006400003039);
//! assert_eq!(mono::decode_x_y_p(word), (100, 50, true));
//! assert_eq!(mono::decode_t(word, 1_000_000), 1_012_345);
//!
//! assert_eq!(trigger::decode_t_p(0x64, 1000), (1100, false));
//! ```
//!
//! # Features
//!
//! - Branch-free per-word encode and decode for both variants
//! - Stride-based iteration over flat little-endian event buffers
//! - Streaming readers and writers for packed word files
//! - CSV output with customizable field ordering
//! - Deterministic synthetic event generation

pub mod buffer;
pub mod mono;
pub mod output;
pub mod packed;
pub mod stream;
pub mod synth;
pub mod trigger;
pub mod types;

// Re-export commonly used types
pub use buffer::{DecodeError, EncodeError, MonoIter, TriggerIter};
pub use output::{FieldOrder, OutputError};
pub use packed::BYTES_PER_EVENT;
pub use stream::{PackedReader, PackedWriter};
pub use synth::SynthConfig;
pub use types::{Encoding, MonoEvent, TriggerEvent};
