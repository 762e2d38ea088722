// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/lib.rs - Decoder and converter library for Leica GSI survey files.
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
 * # `gsiconv` Crate
 *
 * A library for decoding, converting, and tidying Leica GSI8 and GSI16
 * survey data files.
 *
 * This crate provides a full pipeline for working with the line-oriented
 * GSI measurement format:
 *
 * 1. [block]: Encodes and decodes single fixed-width GSI blocks.
 * 2. [decoder]: Splits raw GSI lines into ordered block lines.
 * 3. [converter]: Builds GSI lines from foreign coordinate text formats.
 * 4. [splitter]: Groups decoded lines into one batch per point code.
 * 5. [tidy]: Classifies and filters station and control point lines.
 * 6. [levelling]: Turns levelling files into CAD coordinate lines.
 *
 * The library performs no file I/O: every pass consumes a slice of text
 * lines and returns owned results, so reading and writing files stays
 * with the caller.
 *
 * ## Usage Example
 *
 * ```
 * use gsiconv::decoder::DecodedGsiFile;
 * use gsiconv::splitter::{CodeSplit, CodeSplitOptions};
 *
 * fn main() -> Result<(), gsiconv::error::GsiError> {
 *     let lines = vec![
 *         "110001+00001001 71..46+00000002 81..10+00001234 82..10+00005678 ".to_string(),
 *     ];
 *
 *     // Decode the raw lines
 *     let decoded = DecodedGsiFile::from_lines(&lines)?;
 *
 *     // Group the decoded lines by point code
 *     let split = CodeSplit::from_decoded(&decoded, &CodeSplitOptions::default());
 *     for (code, group) in &split.groups {
 *         println!("Code {}: {} lines", code, group.len());
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

pub mod block;
pub mod converter;
pub mod decoder;
pub mod error;
pub mod levelling;
pub mod splitter;
pub mod tidy;
