// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/splitter.rs - Splitting decoded GSI lines into per-code groups.
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
 * # `splitter` Module
 *
 * This module groups decoded GSI lines by their point code (word index
 * 71), one output batch per code. Lines without a usable code can be
 * collected under a reserved sentinel code instead of being dropped.
 *
 * ## Usage Example
 *
 * ```
 * use gsiconv::decoder::DecodedGsiFile;
 * use gsiconv::splitter::{CodeSplit, CodeSplitOptions};
 *
 * fn main() -> Result<(), gsiconv::error::GsiError> {
 *     let lines = vec![
 *         "110001+00001001 71..46+00000003 81..46+00123400 82..46+00056700 ".to_string(),
 *     ];
 *     let decoded = DecodedGsiFile::from_lines(&lines)?;
 *
 *     let options = CodeSplitOptions {
 *         drop_code: true,
 *         include_uncoded: false,
 *     };
 *     let split = CodeSplit::from_decoded(&decoded, &options);
 *     for (code, group) in &split.groups {
 *         println!("code {}: {} lines", code, group.len());
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

use std::collections::BTreeMap;

use log::warn;

use crate::block::{GsiBlock, GsiFormat};
use crate::decoder::DecodedGsiFile;
use crate::error::{GsiError, SkippedLine};

/// Sentinel code collecting lines without a recognizable code.
pub const UNCODED_GROUP: i32 = 987_789;

/// Options for [CodeSplit::from_decoded].
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeSplitOptions {
    /// Write the code value into the output lines.
    pub drop_code: bool,
    /// Collect codeless lines under [UNCODED_GROUP] instead of dropping
    /// them.
    pub include_uncoded: bool,
}

/// Decoded lines grouped by point code, in print format.
#[derive(Debug)]
pub struct CodeSplit {
    /// Output batches keyed ascending by code; line order within a batch
    /// follows the input.
    pub groups: BTreeMap<i32, Vec<String>>,
    /// Lines rejected during splitting.
    pub skipped: Vec<SkippedLine>,
}

impl CodeSplit {
    /// Splits a decoded file into per-code groups.
    ///
    /// A line joins its code group only when a code block was present and
    /// enough coordinate blocks back it up; otherwise it lands in the
    /// uncoded group when requested, or is dropped.
    pub fn from_decoded(decoded: &DecodedGsiFile, options: &CodeSplitOptions) -> Self {
        let mut groups: BTreeMap<i32, Vec<String>> = BTreeMap::new();
        let mut skipped = Vec::new();

        for (index, blocks) in decoded.lines.iter().enumerate() {
            match split_line(blocks, decoded.format, options.drop_code) {
                Ok(line) => {
                    if line.code != -1 && line.score > 1 {
                        groups.entry(line.code).or_default().push(line.text);
                    } else if options.include_uncoded {
                        groups.entry(UNCODED_GROUP).or_default().push(line.text);
                    }
                }
                Err(reason) => {
                    warn!("rejecting line {}: {}", index + 1, reason);
                    skipped.push(SkippedLine {
                        line_number: index + 1,
                        reason,
                    });
                }
            }
        }

        Self { groups, skipped }
    }
}

struct SplitLine {
    code: i32,
    score: u32,
    text: String,
}

/// Walks one line's blocks in word index order, accumulating the output
/// text and the coordinate validity score. The score weights are fixed
/// compatibility constants: easting 1, northing 3, height 6, and a line
/// counts as coded only above a score of 1.
fn split_line(blocks: &[GsiBlock], format: GsiFormat, drop_code: bool) -> Result<SplitLine, GsiError> {
    let mut code = -1;
    let mut score = 0u32;
    let mut text: Option<String> = None;

    for block in blocks {
        match block.word_index {
            11 => text = Some(block.to_print_format(format)),
            71 => {
                let printed = block.to_print_format(format);
                code = printed
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| GsiError::InvalidNumericLiteral(printed.trim().to_string()))?;
                if drop_code {
                    append(&mut text, &printed)?;
                }
            }
            81 => {
                append(&mut text, &block.to_print_format(format))?;
                score += 1;
            }
            82 => {
                append(&mut text, &block.to_print_format(format))?;
                score += 3;
            }
            83 => {
                append(&mut text, &block.to_print_format(format))?;
                score += 6;
            }
            _ => {}
        }
    }

    match text {
        Some(text) => Ok(SplitLine { code, score, text }),
        None => Err(GsiError::MissingPointNumber),
    }
}

fn append(text: &mut Option<String>, value: &str) -> Result<(), GsiError> {
    match text {
        Some(line) => {
            line.push(' ');
            line.push_str(value);
            Ok(())
        }
        None => Err(GsiError::MissingPointNumber),
    }
}
