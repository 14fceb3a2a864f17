//! Low-level wire readers
//!
//! Everything the decoder reads goes through a single [`BitCursor`]: the varint
//! codec and the fixed/string readers are inherent methods layered on top of it.

pub mod cursor;
pub mod fields;
pub mod varint;

pub use cursor::BitCursor;
pub use fields::{ADDRESS_LEN, HASH_LEN, StringLimit, StringLimitPolicy};
