// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/levelling.rs - Levelling file to CAD coordinate line transformation.
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
 * # `levelling` Module
 *
 * This module turns a levelling GSI file into single-line coordinate
 * records for CAD import. Measured points get synthetic, evenly spaced
 * X/Y positions laid out along a diagonal, one meter between points and
 * ten meters between station setups, so a height profile becomes visible
 * in a plan view. Heights are rounded to the millimeter.
 *
 * ## Usage Example
 *
 * ```
 * use gsiconv::levelling::{LevellingCad, LevellingOptions};
 *
 * fn main() -> Result<(), gsiconv::error::GsiError> {
 *     let lines = vec![
 *         "110001+00000001".to_string(),
 *         "110002+00000005 32..00+00000000 331.08+00012345 83..00+00298246 ".to_string(),
 *     ];
 *
 *     let cad = LevellingCad::from_lines(&lines, &LevellingOptions::default())?;
 *     for line in &cad.lines {
 *         println!("{}", line);
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

use log::{debug, warn};

use crate::block::{GsiBlock, GsiFormat, serialize_line};
use crate::error::{GsiError, SkippedLine};

/// Options for [LevellingCad::from_lines].
#[derive(Debug, Clone, Copy, Default)]
pub struct LevellingOptions {
    /// Drop change points, the all-zero-numbered temporary points that
    /// only transfer height between setups.
    pub ignore_change_points: bool,
    /// Append one trailing blank to every output line.
    pub trailing_blank: bool,
}

/// A levelling file transformed into CAD coordinate lines.
#[derive(Debug)]
pub struct LevellingCad {
    /// One four-block coordinate line per retained measured point.
    pub lines: Vec<String>,
    /// Lines rejected during the transformation.
    pub skipped: Vec<SkippedLine>,
}

impl LevellingCad {
    /// Transforms a two-line-per-station levelling file.
    ///
    /// A one-chunk line marks a new station setup; a four-chunk line is a
    /// measured point whose last chunk carries the height. Lines with any
    /// other chunk count carry no point data and pass by unconsumed.
    pub fn from_lines(lines: &[String], options: &LevellingOptions) -> Result<Self, GsiError> {
        let first = lines.first().ok_or(GsiError::EmptyFile)?;
        let format = GsiFormat::detect(first);
        let width = format.chunk_width();

        let mut station_counter: i64 = 0;
        let mut point_counter: i64 = 0;
        let mut out = Vec::new();
        let mut skipped = Vec::new();

        for (index, raw) in lines.iter().enumerate() {
            if raw.trim().is_empty() {
                continue;
            }
            if !raw.is_ascii() {
                skipped.push(SkippedLine {
                    line_number: index + 1,
                    reason: GsiError::MalformedBlock(raw.clone()),
                });
                continue;
            }

            let body = match format {
                GsiFormat::Gsi16 => raw.strip_prefix('*').unwrap_or(raw),
                GsiFormat::Gsi8 => raw.as_str(),
            };

            match body.len().div_ceil(width) {
                1 => station_counter += 1,
                4 => {
                    match cad_line(body, width, format, options, station_counter, point_counter + 1)
                    {
                        Ok(Some(line)) => {
                            point_counter += 1;
                            out.push(line);
                        }
                        Ok(None) => {}
                        Err(reason) => {
                            warn!("skipping line {}: {}", index + 1, reason);
                            skipped.push(SkippedLine {
                                line_number: index + 1,
                                reason,
                            });
                        }
                    }
                }
                _ => {}
            }
        }

        debug!(
            "transformed {} points over {} stations ({} skipped)",
            out.len(),
            station_counter,
            skipped.len()
        );

        Ok(Self {
            lines: out,
            skipped,
        })
    }
}

/// Builds one output coordinate line, or `None` for an ignored change
/// point.
fn cad_line(
    body: &str,
    width: usize,
    format: GsiFormat,
    options: &LevellingOptions,
    station: i64,
    point: i64,
) -> Result<Option<String>, GsiError> {
    let point_block = GsiBlock::decode(&body[..width])?;
    let height_block = GsiBlock::decode(&body[3 * width..])?;

    if options.ignore_change_points && point_block.data.chars().all(|c| c == '0') {
        return Ok(None);
    }

    // Synthetic plan position in 1/10 mm: one meter per point, ten meters
    // per station, identical X and Y.
    let position = (point * 10_000 + 100_000 * station).to_string();
    let x = GsiBlock {
        word_index: 81,
        information: String::from("..26"),
        sign: '+',
        data: position.clone(),
    };
    let y = GsiBlock {
        word_index: 82,
        information: String::from("..26"),
        sign: '+',
        data: position,
    };
    let height = rounded_height(&height_block)?;

    Ok(Some(serialize_line(
        &[point_block, x, y, height],
        format,
        options.trailing_blank,
    )))
}

/// Re-encodes a measured height at millimeter resolution in the 1/10 mm
/// unit, rounding half-up away from zero.
fn rounded_height(block: &GsiBlock) -> Result<GsiBlock, GsiError> {
    let raw: i64 = block
        .data
        .parse()
        .map_err(|_| GsiError::MalformedBlock(block.data.clone()))?;
    let millimeters = if block.information.ends_with('0') {
        raw
    } else {
        (raw + 5) / 10
    };
    Ok(GsiBlock {
        word_index: 83,
        information: String::from("..26"),
        sign: block.sign,
        data: (millimeters * 10).to_string(),
    })
}
