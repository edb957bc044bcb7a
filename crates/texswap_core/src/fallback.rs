//! Positional rename for files the mapping table does not know about.
//!
//! PAL and NTSC replacement dumps name the same texture almost identically:
//! the character eight positions from the end is a digit that is 4 higher
//! on the PAL side. `abcd5xyz.dds` becomes `abcd1xyz.dds`.

use serde::{Deserialize, Serialize};

use crate::error::FallbackError;

/// Number of trailing characters covered by the digit and the suffix.
const TAIL_LEN: usize = 8;
const DIGIT_OFFSET: i64 = 4;

/// How to treat a digit that drops below zero after the offset is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackMode {
    /// Keep the raw arithmetic, so `0` renders as `-4`.
    #[default]
    Literal,
    /// Reject digits below 4.
    Strict,
}

/// Applies the fallback rename to a full file name (extension included).
pub fn fallback_name(file_name: &str, mode: FallbackMode) -> Result<String, FallbackError> {
    let chars: Vec<char> = file_name.chars().collect();
    if chars.len() < TAIL_LEN {
        return Err(FallbackError::TooShort(file_name.to_string()));
    }

    let split = chars.len() - TAIL_LEN;
    let found = chars[split];
    let digit = found.to_digit(10).ok_or_else(|| FallbackError::NotADigit {
        name: file_name.to_string(),
        found,
    })?;

    let shifted = i64::from(digit) - DIGIT_OFFSET;
    if shifted < 0 && mode == FallbackMode::Strict {
        return Err(FallbackError::NegativeDigit {
            name: file_name.to_string(),
            digit,
        });
    }

    let prefix: String = chars[..split].iter().collect();
    let suffix: String = chars[split + 1..].iter().collect();
    Ok(format!("{prefix}{shifted}{suffix}"))
}
