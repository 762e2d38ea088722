// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/tidy.rs - Station and control point tidy-up for GSI files.
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
 * # `tidy` Module
 *
 * This module cleans up measurement files after field work: every line is
 * classified as a station setup, a control point measurement, a target
 * (two-face or calibration) measurement, or a plain measurement, and then
 * filtered by the caller's retention flags. Stations and control points
 * are recognized by configurable identifier tokens in the point number
 * field; targets by their nulled-out coordinates.
 *
 * The pass works on the raw line text with fixed field offsets instead of
 * decoded blocks.
 *
 * ## Usage Example
 *
 * ```
 * use gsiconv::tidy::{TidySettings, TidyUp};
 *
 * fn main() -> Result<(), gsiconv::error::GsiError> {
 *     let lines = vec![
 *         "110001+00000012 81..10+00123411 82..10+00056711 83..10+00001011 ".to_string(),
 *     ];
 *     let settings = TidySettings {
 *         free_station_identifier: "FS".to_string(),
 *         known_station_identifier: "ST".to_string(),
 *         control_point_identifier: "STKE".to_string(),
 *         hold_stations: false,
 *         hold_control_points: true,
 *         trailing_blank: true,
 *     };
 *
 *     let tidied = TidyUp::from_lines(&lines, &settings)?;
 *     assert_eq!(tidied.lines.len(), 1);
 *
 *     Ok(())
 * }
 * ```
 */

use log::{debug, warn};

use crate::block::GsiFormat;
use crate::error::{GsiError, SkippedLine};

/// Per-line classification assigned by the tidy pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// A free or known station setup line.
    Station,
    /// A two-face or calibration target measurement; never written out.
    TargetMeasurement,
    /// A control point or stake-out verification measurement.
    ControlPointStakeout,
    /// An ordinary measured point.
    MeasurementValue,
}

/// Caller-supplied identifiers and retention flags.
#[derive(Debug, Clone)]
pub struct TidySettings {
    /// Marker token for free station setups (e.g. `FS`).
    pub free_station_identifier: String,
    /// Marker token for known station setups (e.g. `ST`).
    pub known_station_identifier: String,
    /// Marker token for control/stake-out points (e.g. `STKE`).
    pub control_point_identifier: String,
    /// Keep station lines in the output.
    pub hold_stations: bool,
    /// Keep control point lines in the output.
    pub hold_control_points: bool,
    /// Append one trailing blank to every output line.
    pub trailing_blank: bool,
}

/// A tidied GSI file.
#[derive(Debug)]
pub struct TidyUp {
    /// The retained lines, in input order.
    pub lines: Vec<String>,
    /// Lines rejected during classification.
    pub skipped: Vec<SkippedLine>,
}

struct Classified<'a> {
    text: &'a str,
    point_number: String,
    label: Label,
}

impl TidyUp {
    /// Classifies and filters a measurement file.
    ///
    /// The identifiers are zero-prefixed to match the zero-padded point
    /// number field before any comparison. Leading station and control
    /// point lines whose retention flag is unset are stripped before the
    /// main scan, so a file opening with setup lines starts clean.
    ///
    /// Lines too short for the fixed point number offsets are skipped and
    /// recorded; classification continues with the rest of the file.
    pub fn from_lines(lines: &[String], settings: &TidySettings) -> Result<Self, GsiError> {
        let first = lines.first().ok_or(GsiError::EmptyFile)?;
        let format = GsiFormat::detect(first);

        let prefix = match format {
            GsiFormat::Gsi8 => "000",
            GsiFormat::Gsi16 => "00000000",
        };
        let free_station = format!("{prefix}{}", settings.free_station_identifier);
        let known_station = format!("{prefix}{}", settings.known_station_identifier);
        let control_point = format!("{prefix}{}", settings.control_point_identifier);

        // Strip leading setup lines that would be filtered anyway, so the
        // lookback never starts on a dropped station.
        let mut work: Vec<(usize, &str)> = Vec::new();
        let mut scanning_head = true;
        for (index, raw) in lines.iter().enumerate() {
            if scanning_head {
                let is_station = raw.contains(&free_station) || raw.contains(&known_station);
                let is_control = raw.contains(&control_point);
                if is_station || is_control {
                    let hold = if is_station {
                        settings.hold_stations
                    } else {
                        settings.hold_control_points
                    };
                    if !hold {
                        continue;
                    }
                } else {
                    scanning_head = false;
                }
            }
            work.push((index + 1, raw.as_str()));
        }

        let zero_run = format.zero_run();
        let total = work.len();
        let mut classified: Vec<Classified> = Vec::new();
        let mut skipped = Vec::new();

        for (position, &(line_number, text)) in work.iter().enumerate() {
            let point_number = match point_number_field(text, format) {
                Ok(field) => field.to_string(),
                Err(reason) => {
                    warn!("skipping line {}: {}", line_number, reason);
                    skipped.push(SkippedLine {
                        line_number,
                        reason,
                    });
                    continue;
                }
            };

            let is_last = position + 1 == total;
            let label = if text.matches(zero_run).count() == 3 {
                // All three coordinates nulled out: a target measurement.
                // A second face on the same point number drags the
                // previous line along; a preceding control point keeps
                // its own label.
                if let Some(previous) = classified.last_mut() {
                    if previous.point_number == point_number {
                        previous.label = Label::TargetMeasurement;
                    } else if previous.point_number.contains(&control_point) {
                        previous.label = Label::ControlPointStakeout;
                    }
                }
                Label::TargetMeasurement
            } else if text.contains(&free_station) || text.contains(&known_station) {
                Label::Station
            } else if text.contains(&control_point) {
                match classified.last() {
                    Some(previous) if previous.label == Label::Station => {
                        Label::ControlPointStakeout
                    }
                    Some(previous) if previous.point_number == point_number => {
                        if settings.hold_control_points {
                            Label::ControlPointStakeout
                        } else {
                            Label::TargetMeasurement
                        }
                    }
                    _ if !is_last => Label::MeasurementValue,
                    _ => Label::ControlPointStakeout,
                }
            } else {
                Label::MeasurementValue
            };

            classified.push(Classified {
                text,
                point_number,
                label,
            });
        }

        let mut retained = Vec::new();
        for entry in &classified {
            let keep = match entry.label {
                Label::MeasurementValue => true,
                Label::Station => settings.hold_stations,
                Label::ControlPointStakeout => settings.hold_control_points,
                Label::TargetMeasurement => false,
            };
            if keep {
                retained.push(apply_line_ending(entry.text, settings.trailing_blank));
            }
        }

        debug!(
            "tidied {} lines down to {} ({} skipped)",
            lines.len(),
            retained.len(),
            skipped.len()
        );

        Ok(Self {
            lines: retained,
            skipped,
        })
    }
}

/// The zero-padded point number field of a raw line.
fn point_number_field(line: &str, format: GsiFormat) -> Result<&str, GsiError> {
    let end = match format {
        GsiFormat::Gsi8 => 16,
        GsiFormat::Gsi16 => 24,
    };
    if line.len() < end || !line.is_ascii() {
        return Err(GsiError::LineTooShort {
            needed: end,
            actual: line.len(),
        });
    }
    Ok(&line[8..end])
}

fn apply_line_ending(line: &str, trailing_blank: bool) -> String {
    let trimmed = line.trim_end_matches(' ');
    if trailing_blank {
        format!("{trimmed} ")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(hold_stations: bool, hold_control_points: bool) -> TidySettings {
        TidySettings {
            free_station_identifier: "FS".to_string(),
            known_station_identifier: "ST".to_string(),
            control_point_identifier: "CP".to_string(),
            hold_stations,
            hold_control_points,
            trailing_blank: false,
        }
    }

    fn station(point: &str) -> String {
        format!("110001+00000{point} 84..10+00123400 85..10+00056700 86..10+00001000 ")
    }

    fn measurement(point: &str) -> String {
        format!("110002+{point} 81..10+00123411 82..10+00056711 83..10+00001011 ")
    }

    fn target(point: &str) -> String {
        format!("110003+{point} 81..10+00000000 82..10+00000000 83..10+00000000 ")
    }

    fn control(point: &str) -> String {
        format!("110004+00000{point} 81..10+00123411 82..10+00056711 83..10+00001011 ")
    }

    #[test]
    fn keeps_only_measurements_without_hold_flags() {
        let lines = vec![
            station("FS1"),
            station("FS2"),
            control("CP1"),
            measurement("00000012"),
            measurement("00000013"),
            measurement("00000014"),
            control("CP2"),
        ];
        let tidied = TidyUp::from_lines(&lines, &settings(false, false)).unwrap();
        assert_eq!(tidied.lines.len(), 3);
        assert!(tidied.lines.iter().all(|line| line.contains("110002+")));
    }

    #[test]
    fn holds_stations_and_control_points_on_request() {
        let lines = vec![
            station("FS1"),
            control("CP1"),
            measurement("00000012"),
        ];
        let tidied = TidyUp::from_lines(&lines, &settings(true, true)).unwrap();
        assert_eq!(tidied.lines.len(), 3);

        let tidied = TidyUp::from_lines(&lines, &settings(true, false)).unwrap();
        assert_eq!(tidied.lines.len(), 2);
    }

    #[test]
    fn two_face_target_drags_previous_line_along() {
        let lines = vec![
            measurement("00000077"),
            target("00000077"),
            measurement("00000078"),
        ];
        let tidied = TidyUp::from_lines(&lines, &settings(false, false)).unwrap();
        assert_eq!(tidied.lines.len(), 1);
        assert!(tidied.lines[0].contains("00000078"));
    }

    #[test]
    fn target_after_control_point_keeps_control_label() {
        let lines = vec![
            measurement("00000011"),
            control("CP7"),
            target("00000099"),
            measurement("00000012"),
        ];
        let tidied = TidyUp::from_lines(&lines, &settings(false, true)).unwrap();
        // control point relabeled from measurement and retained, target gone
        assert_eq!(tidied.lines.len(), 3);
        assert!(tidied.lines[1].contains("CP7"));
    }

    #[test]
    fn trailing_control_point_is_classified_as_control() {
        let lines = vec![measurement("00000012"), control("CP9")];
        let tidied = TidyUp::from_lines(&lines, &settings(false, true)).unwrap();
        assert_eq!(tidied.lines.len(), 2);

        let tidied = TidyUp::from_lines(&lines, &settings(false, false)).unwrap();
        assert_eq!(tidied.lines.len(), 1);
    }

    #[test]
    fn control_identifier_mid_file_is_a_measurement() {
        // Not after a station, different point number, not the last line
        let lines = vec![
            measurement("00000012"),
            control("CP5"),
            measurement("00000013"),
        ];
        let tidied = TidyUp::from_lines(&lines, &settings(false, false)).unwrap();
        assert_eq!(tidied.lines.len(), 3);
    }

    #[test]
    fn short_line_is_skipped_and_reported() {
        let lines = vec![measurement("00000012"), "110002+0000".to_string()];
        let tidied = TidyUp::from_lines(&lines, &settings(false, false)).unwrap();
        assert_eq!(tidied.lines.len(), 1);
        assert_eq!(tidied.skipped.len(), 1);
        assert!(matches!(
            tidied.skipped[0].reason,
            GsiError::LineTooShort { needed: 16, .. }
        ));
    }

    #[test]
    fn retention_is_idempotent() {
        let lines = vec![
            station("FS1"),
            measurement("00000012"),
            target("00000099"),
            measurement("00000013"),
        ];
        let once = TidyUp::from_lines(&lines, &settings(false, false)).unwrap();
        let twice = TidyUp::from_lines(&once.lines, &settings(false, false)).unwrap();
        assert_eq!(once.lines, twice.lines);
    }

    #[test]
    fn gsi16_uses_wide_offsets_and_identifiers() {
        let lines = vec![
            "*110001+00000000000000FS 84..26+0000000000123400 85..26+0000000000056700 86..26+0000000000001000 ".to_string(),
            "*110002+0000000000000012 81..26+0000000000123411 82..26+0000000000056711 83..26+0000000000001011 ".to_string(),
        ];
        let tidied = TidyUp::from_lines(&lines, &settings(false, false)).unwrap();
        assert_eq!(tidied.lines.len(), 1);
        assert!(tidied.lines[0].contains("110002+"));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            TidyUp::from_lines(&[], &settings(false, false)),
            Err(GsiError::EmptyFile)
        ));
    }
}
