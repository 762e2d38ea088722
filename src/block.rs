// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/block.rs - GSI8/GSI16 block codec.
 *  Copyright (C) 2026  gsiconv contributors
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

/*!
 * # `block` Module
 *
 * The codec for single GSI blocks, the fixed-width fields that make up one
 * line of a Leica GSI8 or GSI16 file. A block carries a two-digit word
 * index, a four-character information field, a sign, and a zero-padded
 * data string of 8 (GSI8) or 16 (GSI16) digits.
 *
 * ## Usage Example
 *
 * ```
 * use gsiconv::block::{GsiBlock, GsiFormat};
 *
 * fn main() -> Result<(), gsiconv::error::GsiError> {
 *     // Decode one raw block
 *     let block = GsiBlock::decode("81..10+00001234")?;
 *     assert_eq!(block.word_index, 81);
 *     assert_eq!(block.to_print_format(GsiFormat::Gsi8).trim(), "1.234");
 *
 *     // Encode a measured value and serialize it back to the wire format
 *     let block = GsiBlock::encode(GsiFormat::Gsi8, 81, 1, "12.3456")?;
 *     assert_eq!(block.serialize(GsiFormat::Gsi8), "81..46+00123456");
 *
 *     Ok(())
 * }
 * ```
 */

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::GsiError;

/// The two GSI dialects. GSI16 doubles the data width and marks each line
/// with a leading `*`. The format is a property of the whole file, decided
/// once from the first line and passed down to every block operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GsiFormat {
    /// 8 data digits per block, 16-character line chunks.
    Gsi8,
    /// 16 data digits per block, 24-character line chunks, leading `*`.
    Gsi16,
}

impl GsiFormat {
    /// Detects the format of a file from its first line.
    pub fn detect(first_line: &str) -> Self {
        if first_line.starts_with('*') {
            GsiFormat::Gsi16
        } else {
            GsiFormat::Gsi8
        }
    }

    /// Width of the data field in digits.
    pub const fn data_width(self) -> usize {
        match self {
            GsiFormat::Gsi8 => 8,
            GsiFormat::Gsi16 => 16,
        }
    }

    /// Width of one line chunk, block text plus the separating blank.
    pub const fn chunk_width(self) -> usize {
        match self {
            GsiFormat::Gsi8 => 16,
            GsiFormat::Gsi16 => 24,
        }
    }

    /// Column width of one value in print format output.
    pub const fn print_width(self) -> usize {
        self.data_width()
    }

    /// A data field of all zeros, as it appears in the raw line text.
    pub const fn zero_run(self) -> &'static str {
        match self {
            GsiFormat::Gsi8 => "00000000",
            GsiFormat::Gsi16 => "0000000000000000",
        }
    }
}

/// Shortest block that still holds a word index, an information field,
/// a sign, and at least one data character.
const MIN_BLOCK_LEN: usize = 8;

/// One field within a GSI line.
///
/// Blocks are immutable once built, either by [GsiBlock::decode] from a raw
/// chunk or by [GsiBlock::encode] from a semantic value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsiBlock {
    /// Two-digit code identifying the semantic meaning of the block
    /// (11 point number, 21/22 angles, 31-33 distances, 71-79 code and
    /// attributes, 81-88 coordinates and heights).
    pub word_index: u8,
    /// Four-character sub-format tag. The trailing digit selects the unit:
    /// `0` is millimeters, `6` is 1/10 millimeter.
    pub information: String,
    /// `+` or `-`.
    pub sign: char,
    /// Digit string, zero-padded to 8 (GSI8) or 16 (GSI16) characters on
    /// the wire. Point numbers and codes may contain letters.
    pub data: String,
}

impl GsiBlock {
    /// Parses one raw block chunk.
    ///
    /// The chunk is one fixed-width slice of a GSI line; a trailing
    /// separator blank is tolerated and trimmed. The final chunk of a line
    /// may be shorter than the full width.
    pub fn decode(chunk: &str) -> Result<Self, GsiError> {
        let trimmed = chunk.trim_end_matches(' ');
        if trimmed.len() < MIN_BLOCK_LEN || !trimmed.is_ascii() {
            return Err(GsiError::MalformedBlock(chunk.to_string()));
        }

        let word_index = trimmed[0..2]
            .parse::<u8>()
            .map_err(|_| GsiError::MalformedBlock(chunk.to_string()))?;
        let information = trimmed[2..6].to_string();
        let sign = trimmed.as_bytes()[6] as char;
        if sign != '+' && sign != '-' {
            return Err(GsiError::MalformedBlock(chunk.to_string()));
        }
        let data = trimmed[7..].to_string();

        Ok(Self {
            word_index,
            information,
            sign,
            data,
        })
    }

    /// Builds a block from a semantic string value.
    ///
    /// Point numbers (word index 11) carry the running line number in their
    /// information field and store the value verbatim. Coordinates and
    /// heights (word indices 81-88) are parsed as decimals, scaled to
    /// 1/10 millimeter and rounded half-up; the literal value `0` is stored
    /// unscaled. Codes and attributes store the value verbatim.
    pub fn encode(
        format: GsiFormat,
        word_index: u8,
        line_number: usize,
        value: &str,
    ) -> Result<Self, GsiError> {
        let mut sign = '+';
        let information;
        let raw;

        match word_index {
            11 => {
                information = format!("{:04}", line_number % 10_000);
                raw = value.to_string();
            }
            81..=88 => {
                information = String::from("..46");
                if value == "0" {
                    raw = String::from("0");
                } else {
                    let magnitude = match value.strip_prefix('-') {
                        Some(rest) => {
                            sign = '-';
                            rest
                        }
                        None => value.strip_prefix('+').unwrap_or(value),
                    };
                    let parsed = Decimal::from_str(magnitude)
                        .map_err(|_| GsiError::InvalidNumericLiteral(value.to_string()))?;
                    let scaled = (parsed * Decimal::from(10_000u32))
                        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
                    raw = scaled.to_string();
                }
            }
            _ => {
                information = String::from("..46");
                raw = value.to_string();
            }
        }

        let width = format.data_width();
        let data = if raw.len() >= width || raw == "0" {
            raw
        } else {
            format!("{raw:0>width$}")
        };

        Ok(Self {
            word_index,
            information,
            sign,
            data,
        })
    }

    /// Renders the block value for human-readable, column-aligned output.
    ///
    /// Coordinates and heights get a decimal point inserted 3 digits from
    /// the right when the information field ends in `0` (millimeters), 4
    /// otherwise (1/10 millimeter). Other values have their leading zeros
    /// stripped. The result is right-aligned to the format's print width.
    pub fn to_print_format(&self, format: GsiFormat) -> String {
        let printed = match self.word_index {
            81..=88 => {
                let decimals = if self.information.ends_with('0') { 3 } else { 4 };
                let digits = if self.data.len() <= decimals {
                    format!("{:0>width$}", self.data, width = decimals + 1)
                } else {
                    self.data.clone()
                };
                let split = digits.len() - decimals;
                let int_part = digits[..split].trim_start_matches('0');
                let int_part = if int_part.is_empty() { "0" } else { int_part };
                let value = format!("{}.{}", int_part, &digits[split..]);
                if self.sign == '-' {
                    format!("-{value}")
                } else {
                    value
                }
            }
            _ => {
                let stripped = self.data.trim_start_matches('0');
                if stripped.is_empty() {
                    String::from("0")
                } else if stripped.starts_with('.') {
                    format!("0{stripped}")
                } else {
                    stripped.to_string()
                }
            }
        };

        format!("{printed:>width$}", width = format.print_width())
    }

    /// Reassembles the wire form of the block without the separator blank.
    ///
    /// The data field is zero-extended to the target width; narrowing a
    /// GSI16 value to GSI8 keeps the last 8 characters, which loses leading
    /// digits of oversized values.
    pub fn serialize(&self, format: GsiFormat) -> String {
        let width = format.data_width();
        let data = if self.data.len() > width {
            self.data[self.data.len() - width..].to_string()
        } else {
            format!("{:0>width$}", self.data)
        };
        format!("{:02}{}{}{}", self.word_index, self.information, self.sign, data)
    }
}

/// Serializes a whole line of blocks, blank-separated, with the GSI16 `*`
/// marker and the optional trailing blank applied.
pub fn serialize_line(blocks: &[GsiBlock], format: GsiFormat, trailing_blank: bool) -> String {
    let mut line = String::new();
    if format == GsiFormat::Gsi16 {
        line.push('*');
    }
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        line.push_str(&block.serialize(format));
    }
    if trailing_blank && !blocks.is_empty() {
        line.push(' ');
    }
    line
}
