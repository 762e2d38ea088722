// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/decoder.rs - Line decoder for GSI8 and GSI16 files.
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
 * # `decoder` Module
 *
 * This module splits raw GSI lines into ordered lists of [GsiBlock]s. The
 * file format (GSI8 or GSI16) is detected once from the first line and
 * applied to the whole file.
 *
 * ## Usage Example
 *
 * ```
 * use gsiconv::decoder::DecodedGsiFile;
 *
 * fn main() -> Result<(), gsiconv::error::GsiError> {
 *     let lines = vec!["110001+00001001 83..10+00298246 ".to_string()];
 *
 *     let decoded = DecodedGsiFile::from_lines(&lines)?;
 *
 *     for blocks in &decoded.lines {
 *         for block in blocks {
 *             let value = block.to_print_format(decoded.format);
 *             println!("WI {}: {}", block.word_index, value.trim());
 *         }
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

use std::collections::BTreeSet;

use log::{debug, warn};

use crate::block::{GsiBlock, GsiFormat};
use crate::error::{GsiError, SkippedLine};

/// A whole GSI file decoded into block lines.
#[derive(Debug)]
pub struct DecodedGsiFile {
    /// The format detected from the first line.
    pub format: GsiFormat,
    /// One entry per decoded line, blocks sorted ascending by word index.
    pub lines: Vec<Vec<GsiBlock>>,
    /// All distinct word indices observed across the file.
    pub word_indices: BTreeSet<u8>,
    /// Lines rejected during decoding.
    pub skipped: Vec<SkippedLine>,
}

impl DecodedGsiFile {
    /// Decodes a sequence of raw GSI lines.
    ///
    /// A line with any malformed block is skipped whole and recorded;
    /// the remaining lines still decode. Blank lines are ignored.
    ///
    /// # Arguments
    ///
    /// * `lines` - The raw text lines of one file.
    ///
    /// # Returns
    ///
    /// A `Result` containing the decoded file, or [GsiError::EmptyFile] if
    /// there is no first line to detect the format from.
    pub fn from_lines(lines: &[String]) -> Result<Self, GsiError> {
        let first = lines.first().ok_or(GsiError::EmptyFile)?;
        let format = GsiFormat::detect(first);

        let mut decoded = Vec::new();
        let mut word_indices = BTreeSet::new();
        let mut skipped = Vec::new();

        for (index, raw) in lines.iter().enumerate() {
            if raw.trim().is_empty() {
                continue;
            }
            match decode_line(raw, format) {
                Ok(blocks) => {
                    for block in &blocks {
                        word_indices.insert(block.word_index);
                    }
                    decoded.push(blocks);
                }
                Err(reason) => {
                    warn!("skipping line {}: {}", index + 1, reason);
                    skipped.push(SkippedLine {
                        line_number: index + 1,
                        reason,
                    });
                }
            }
        }

        debug!(
            "decoded {} lines ({:?}, {} skipped, word indices {:?})",
            decoded.len(),
            format,
            skipped.len(),
            word_indices
        );

        Ok(Self {
            format,
            lines: decoded,
            word_indices,
            skipped,
        })
    }
}

/// Decodes one raw line into blocks sorted ascending by word index.
///
/// GSI16 lines have their leading `*` stripped before chunking. The final
/// chunk may be shorter than the chunk width. The sort is stable, so blocks
/// sharing a word index keep their original relative order.
pub fn decode_line(raw: &str, format: GsiFormat) -> Result<Vec<GsiBlock>, GsiError> {
    if !raw.is_ascii() {
        return Err(GsiError::MalformedBlock(raw.to_string()));
    }

    let body = match format {
        GsiFormat::Gsi16 => raw.strip_prefix('*').unwrap_or(raw),
        GsiFormat::Gsi8 => raw,
    };

    let width = format.chunk_width();
    let mut blocks = Vec::new();
    let mut start = 0;
    while start < body.len() {
        let end = (start + width).min(body.len());
        blocks.push(GsiBlock::decode(&body[start..end])?);
        start = end;
    }

    blocks.sort_by_key(|block| block.word_index);
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::serialize_line;

    fn own(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn roundtrip_gsi8_line() {
        let raw = "110001+00001234 81..46+00123400 82..46+00056700 83..46+00009000 ";
        let decoded = DecodedGsiFile::from_lines(&own(&[raw])).unwrap();
        assert_eq!(decoded.format, GsiFormat::Gsi8);
        assert_eq!(decoded.lines.len(), 1);

        let blocks = &decoded.lines[0];
        let indices: Vec<u8> = blocks.iter().map(|b| b.word_index).collect();
        assert_eq!(indices, vec![11, 81, 82, 83]);
        assert_eq!(serialize_line(blocks, GsiFormat::Gsi8, true), raw);
    }

    #[test]
    fn decodes_gsi16_with_marker() {
        let raw = "*110001+0000000000001234 81..46+0000000000123400";
        let decoded = DecodedGsiFile::from_lines(&own(&[raw])).unwrap();
        assert_eq!(decoded.format, GsiFormat::Gsi16);
        assert_eq!(decoded.lines[0].len(), 2);
        assert_eq!(decoded.lines[0][1].data, "0000000000123400");
    }

    #[test]
    fn sorts_blocks_by_word_index() {
        let raw = "83..46+00009000 110001+00001234";
        let blocks = decode_line(raw, GsiFormat::Gsi8).unwrap();
        let indices: Vec<u8> = blocks.iter().map(|b| b.word_index).collect();
        assert_eq!(indices, vec![11, 83]);
    }

    #[test]
    fn word_indices_are_distinct_per_line() {
        let raw = "110001+00001234 81..46+00123400 82..46+00056700 ";
        let blocks = decode_line(raw, GsiFormat::Gsi8).unwrap();
        let mut indices: Vec<u8> = blocks.iter().map(|b| b.word_index).collect();
        let total = indices.len();
        indices.dedup();
        assert_eq!(indices.len(), total);
    }

    #[test]
    fn accumulates_word_index_set() {
        let lines = own(&[
            "110001+00001234 81..46+00123400 ",
            "110002+00001235 83..46+00009000 ",
        ]);
        let decoded = DecodedGsiFile::from_lines(&lines).unwrap();
        let indices: Vec<u8> = decoded.word_indices.iter().copied().collect();
        assert_eq!(indices, vec![11, 81, 83]);
    }

    #[test]
    fn skips_malformed_line_and_continues() {
        let lines = own(&[
            "110001+00001234 81..46+00123400 ",
            "garbage",
            "110003+00001236 82..46+00056700 ",
        ]);
        let decoded = DecodedGsiFile::from_lines(&lines).unwrap();
        assert_eq!(decoded.lines.len(), 2);
        assert_eq!(decoded.skipped.len(), 1);
        assert_eq!(decoded.skipped[0].line_number, 2);
        assert!(matches!(
            decoded.skipped[0].reason,
            GsiError::MalformedBlock(_)
        ));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            DecodedGsiFile::from_lines(&[]),
            Err(GsiError::EmptyFile)
        ));
    }

    #[test]
    fn blank_lines_are_ignored() {
        let lines = own(&["110001+00001234 ", "", "   "]);
        let decoded = DecodedGsiFile::from_lines(&lines).unwrap();
        assert_eq!(decoded.lines.len(), 1);
        assert!(decoded.skipped.is_empty());
    }
}
