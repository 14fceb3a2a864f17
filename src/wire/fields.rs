//! Fixed-width blocks and zero-terminated strings

use serde::{Deserialize, Serialize};

use super::BitCursor;
use crate::{Result, TelemetryError};

/// Width of the SHA-1 hashes carried in headers and inventory events.
pub const HASH_LEN: usize = 20;

/// Width of the opaque address carried by the start event.
pub const ADDRESS_LEN: usize = 6;

/// Maximum text length for a string field, excluding the terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLimit {
    pub field: &'static str,
    pub max: usize,
}

impl StringLimit {
    pub const COSTUME_NAME: StringLimit = StringLimit { field: "costume name", max: 32 };
    pub const GAME_MESSAGE: StringLimit = StringLimit { field: "game message", max: 40 };
    pub const PLAYER_STATE: StringLimit = StringLimit { field: "poppet player state", max: 256 };
    pub const POD_COMPUTER_STATE: StringLimit =
        StringLimit { field: "pod computer state", max: 512 };
    pub const MODAL_OVERLAY_STATE: StringLimit =
        StringLimit { field: "modal overlay state", max: 512 };
}

/// What to do when a string runs past its [`StringLimit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringLimitPolicy {
    /// Fail the decode with [`TelemetryError::StringTooLong`].
    #[default]
    Enforce,
    /// Keep the first `max` bytes and skip the rest up to the terminator.
    Truncate,
    /// Accept strings of any length.
    Ignore,
}

impl BitCursor<'_> {
    /// Read a fixed-size block such as a hash or address.
    pub fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.read_array()
    }

    /// Read bytes up to a zero terminator.
    ///
    /// Every byte maps to the character with the same code point, matching how
    /// the clients write these names.
    pub fn read_string(&mut self, limit: StringLimit, policy: StringLimitPolicy) -> Result<String> {
        let mut text = String::new();
        let mut len = 0usize;

        loop {
            let byte = self.read_byte()?;
            if byte == 0 {
                break;
            }

            len += 1;
            if len > limit.max {
                match policy {
                    StringLimitPolicy::Enforce => {
                        return Err(TelemetryError::StringTooLong {
                            field: limit.field,
                            max: limit.max,
                            position: self.position(),
                        });
                    }
                    StringLimitPolicy::Truncate => continue,
                    StringLimitPolicy::Ignore => {}
                }
            }
            text.push(char::from(byte));
        }

        Ok(text)
    }
}
