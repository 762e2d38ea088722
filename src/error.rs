// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/error.rs - Error types for GSI file processing.
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

use thiserror::Error;

/// Errors produced while decoding, encoding, or classifying GSI data.
#[derive(Debug, Error)]
pub enum GsiError {
    /// A raw block substring could not be parsed into word index, sign,
    /// and data fields.
    #[error("malformed block {0:?}")]
    MalformedBlock(String),

    /// A fixed-offset field was requested from a line shorter than the
    /// required offset.
    #[error("line too short: {actual} characters, {needed} required")]
    LineTooShort { needed: usize, actual: usize },

    /// A coordinate or code block appeared before any point number block
    /// initialized the line.
    #[error("coordinate or code block before point number")]
    MissingPointNumber,

    /// A value string could not be parsed as a decimal number.
    #[error("invalid numeric literal {0:?}")]
    InvalidNumericLiteral(String),

    /// A CSV record could not be read from the source.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input had no lines, so the GSI8/GSI16 format could not be
    /// determined.
    #[error("empty input, cannot determine GSI format")]
    EmptyFile,
}

/// A line rejected during a file-level pass, with the reason it was skipped.
///
/// Passes never abort on a bad line; they record it here and keep going.
#[derive(Debug)]
pub struct SkippedLine {
    /// 1-based line number in the input.
    pub line_number: usize,
    /// Why the line was rejected.
    pub reason: GsiError,
}
