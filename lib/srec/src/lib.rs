use std::collections::BTreeMap;

pub mod checksum;
pub mod decoder;
pub mod encoder;
pub mod errors;
pub mod record;

/// Sparse memory image as described by a set of data records: a mapping from
/// each address to the byte stored there. A `BTreeMap` is used on purpose so
/// that iterating over an image always walks the addresses in ascending
/// order, which is what the encoder relies on.
pub type MemoryImage = BTreeMap<u32, u8>;
