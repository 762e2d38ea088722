// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/converter.rs - Converters from foreign text formats to GSI lines.
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
 * # `converter` Module
 *
 * This module builds GSI block lines from other line-oriented coordinate
 * formats: plain whitespace-separated text, CSV, cadwork `node.dat`
 * exports, and NIGRA levelling ASCII. Word indices are assigned to the
 * tokens of each source line by a fixed positional convention.
 *
 * ## Usage Example
 *
 * ```
 * use gsiconv::block::GsiFormat;
 * use gsiconv::converter::EncodedGsiFile;
 *
 * let lines = vec!["1001 615432.10 255678.90 262.25".to_string()];
 *
 * let encoded = EncodedGsiFile::from_txt(&lines, GsiFormat::Gsi16, false);
 * for line in encoded.to_lines(true) {
 *     println!("{}", line);
 * }
 * ```
 */

use std::str::FromStr;

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::block::{GsiBlock, GsiFormat, serialize_line};
use crate::error::{GsiError, SkippedLine};

/// Height token that marks "no height measured" in four-column sources.
const HEIGHT_OMITTED: &str = "-9999";

/// GSI block lines built from a foreign source format.
#[derive(Debug)]
pub struct EncodedGsiFile {
    /// The target format every block was encoded for.
    pub format: GsiFormat,
    /// One entry per converted source line.
    pub lines: Vec<Vec<GsiBlock>>,
    /// Source lines rejected during conversion.
    pub skipped: Vec<SkippedLine>,
}

impl EncodedGsiFile {
    /// Converts whitespace- or tab-separated coordinate text.
    ///
    /// `source_has_code` resolves the three-token ambiguity: with a code
    /// the tokens are number/code/height, without they are
    /// number/easting/northing.
    pub fn from_txt(lines: &[String], format: GsiFormat, source_has_code: bool) -> Self {
        let mut out = Vec::new();
        let mut skipped = Vec::new();
        let mut line_number = 0;

        for (index, raw) in lines.iter().enumerate() {
            let tokens: Vec<&str> = raw.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }
            match blocks_from_tokens(format, line_number + 1, &tokens, source_has_code) {
                Ok(blocks) if blocks.is_empty() => {}
                Ok(blocks) => {
                    line_number += 1;
                    out.push(blocks);
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

        Self {
            format,
            lines: out,
            skipped,
        }
    }

    /// Converts CSV data. Each record's fields become the positional
    /// tokens; fully empty records are dropped.
    pub fn from_csv(data: &[u8], delimiter: u8, format: GsiFormat, source_has_code: bool) -> Self {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .has_headers(false)
            .from_reader(data);

        let mut out = Vec::new();
        let mut skipped = Vec::new();
        let mut line_number = 0;

        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(error) => {
                    warn!("skipping CSV record: {}", error);
                    skipped.push(SkippedLine {
                        line_number: 0,
                        reason: GsiError::from(error),
                    });
                    continue;
                }
            };
            let source_line = record
                .position()
                .map(|position| position.line() as usize)
                .unwrap_or(0);

            let tokens: Vec<&str> = record.iter().map(|field| field.trim()).collect();
            if tokens.iter().all(|token| token.is_empty()) {
                continue;
            }
            match blocks_from_tokens(format, line_number + 1, &tokens, source_has_code) {
                Ok(blocks) if blocks.is_empty() => {}
                Ok(blocks) => {
                    line_number += 1;
                    out.push(blocks);
                }
                Err(reason) => {
                    warn!("skipping CSV record at line {}: {}", source_line, reason);
                    skipped.push(SkippedLine {
                        line_number: source_line,
                        reason,
                    });
                }
            }
        }

        Self {
            format,
            lines: out,
            skipped,
        }
    }

    /// Converts a cadwork `node.dat` export: three header lines, then
    /// tab-separated number/x/y/z columns with an optional code column
    /// that is used only when `use_code` is set.
    pub fn from_cadwork(lines: &[String], format: GsiFormat, use_code: bool) -> Self {
        let mut out = Vec::new();
        let mut skipped = Vec::new();
        let mut line_number = 0;

        for (index, raw) in lines.iter().enumerate().skip(3) {
            let columns: Vec<&str> = raw.split('\t').map(|column| column.trim()).collect();
            if columns.iter().all(|column| column.is_empty()) {
                continue;
            }
            if columns.len() < 4 {
                skipped.push(SkippedLine {
                    line_number: index + 1,
                    reason: GsiError::MalformedBlock(raw.to_string()),
                });
                continue;
            }

            let number = line_number + 1;
            let converted = (|| -> Result<Vec<GsiBlock>, GsiError> {
                let mut blocks = vec![GsiBlock::encode(format, 11, number, columns[0])?];
                if use_code && columns.len() > 4 && !columns[4].is_empty() {
                    blocks.push(GsiBlock::encode(format, 71, number, columns[4])?);
                }
                blocks.push(GsiBlock::encode(format, 81, number, columns[1])?);
                blocks.push(GsiBlock::encode(format, 82, number, columns[2])?);
                blocks.push(GsiBlock::encode(format, 83, number, columns[3])?);
                Ok(blocks)
            })();

            match converted {
                Ok(blocks) => {
                    line_number += 1;
                    out.push(blocks);
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

        Self {
            format,
            lines: out,
            skipped,
        }
    }

    /// Converts NIGRA levelling ASCII. Data rows are number/height pairs;
    /// rows whose second token is not a decimal are header noise and are
    /// dropped.
    pub fn from_nigra(lines: &[String], format: GsiFormat) -> Self {
        let mut out = Vec::new();
        let mut skipped = Vec::new();
        let mut line_number = 0;

        for (index, raw) in lines.iter().enumerate() {
            let tokens: Vec<&str> = raw.split_whitespace().collect();
            if tokens.len() < 2 || Decimal::from_str(tokens[1]).is_err() {
                debug!("dropping non-data row {:?}", raw);
                continue;
            }
            let number = line_number + 1;
            let converted = GsiBlock::encode(format, 11, number, tokens[0]).and_then(|point| {
                let height = GsiBlock::encode(format, 83, number, tokens[1])?;
                Ok(vec![point, height])
            });
            match converted {
                Ok(blocks) => {
                    line_number += 1;
                    out.push(blocks);
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

        Self {
            format,
            lines: out,
            skipped,
        }
    }

    /// Serializes the converted lines to GSI text.
    pub fn to_lines(&self, trailing_blank: bool) -> Vec<String> {
        self.lines
            .iter()
            .map(|blocks| serialize_line(blocks, self.format, trailing_blank))
            .collect()
    }
}

/// Assigns word indices to the tokens of one source line.
///
/// | tokens | word indices |
/// |---|---|
/// | 1 | 11 |
/// | 2 | 11, 83 |
/// | 3, code | 11, 71, 83 |
/// | 3, no code | 11, 81, 82 |
/// | 4 | 11, 81, 82, 83 (83 omitted for the `-9999` sentinel) |
/// | 5 | 11, 71, 81, 82, 83 |
///
/// Other token counts produce no blocks, which drops the line.
pub fn blocks_from_tokens(
    format: GsiFormat,
    line_number: usize,
    tokens: &[&str],
    source_has_code: bool,
) -> Result<Vec<GsiBlock>, GsiError> {
    let mut blocks = Vec::new();
    match tokens.len() {
        1 => {
            blocks.push(GsiBlock::encode(format, 11, line_number, tokens[0])?);
        }
        2 => {
            blocks.push(GsiBlock::encode(format, 11, line_number, tokens[0])?);
            blocks.push(GsiBlock::encode(format, 83, line_number, tokens[1])?);
        }
        3 if source_has_code => {
            blocks.push(GsiBlock::encode(format, 11, line_number, tokens[0])?);
            blocks.push(GsiBlock::encode(format, 71, line_number, tokens[1])?);
            blocks.push(GsiBlock::encode(format, 83, line_number, tokens[2])?);
        }
        3 => {
            blocks.push(GsiBlock::encode(format, 11, line_number, tokens[0])?);
            blocks.push(GsiBlock::encode(format, 81, line_number, tokens[1])?);
            blocks.push(GsiBlock::encode(format, 82, line_number, tokens[2])?);
        }
        4 => {
            blocks.push(GsiBlock::encode(format, 11, line_number, tokens[0])?);
            blocks.push(GsiBlock::encode(format, 81, line_number, tokens[1])?);
            blocks.push(GsiBlock::encode(format, 82, line_number, tokens[2])?);
            if tokens[3] != HEIGHT_OMITTED {
                blocks.push(GsiBlock::encode(format, 83, line_number, tokens[3])?);
            }
        }
        5 => {
            blocks.push(GsiBlock::encode(format, 11, line_number, tokens[0])?);
            blocks.push(GsiBlock::encode(format, 71, line_number, tokens[1])?);
            blocks.push(GsiBlock::encode(format, 81, line_number, tokens[2])?);
            blocks.push(GsiBlock::encode(format, 82, line_number, tokens[3])?);
            blocks.push(GsiBlock::encode(format, 83, line_number, tokens[4])?);
        }
        _ => {}
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn own(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    fn indices(blocks: &[GsiBlock]) -> Vec<u8> {
        blocks.iter().map(|block| block.word_index).collect()
    }

    #[test]
    fn two_tokens_are_number_and_height() {
        let encoded = EncodedGsiFile::from_txt(&own(&["1001 262.250"]), GsiFormat::Gsi8, false);
        assert_eq!(indices(&encoded.lines[0]), vec![11, 83]);
        assert_eq!(encoded.lines[0][1].data, "02622500");
    }

    #[test]
    fn three_tokens_depend_on_code_flag() {
        let encoded = EncodedGsiFile::from_txt(&own(&["1001 17 262.250"]), GsiFormat::Gsi8, true);
        assert_eq!(indices(&encoded.lines[0]), vec![11, 71, 83]);

        let encoded =
            EncodedGsiFile::from_txt(&own(&["1001 615432.10 255678.90"]), GsiFormat::Gsi8, false);
        assert_eq!(indices(&encoded.lines[0]), vec![11, 81, 82]);
    }

    #[test]
    fn four_tokens_omit_sentinel_height() {
        let encoded = EncodedGsiFile::from_txt(
            &own(&["1001 615432.10 255678.90 -9999"]),
            GsiFormat::Gsi16,
            false,
        );
        assert_eq!(indices(&encoded.lines[0]), vec![11, 81, 82]);

        let encoded = EncodedGsiFile::from_txt(
            &own(&["1001 615432.10 255678.90 262.25"]),
            GsiFormat::Gsi16,
            false,
        );
        assert_eq!(indices(&encoded.lines[0]), vec![11, 81, 82, 83]);
    }

    #[test]
    fn five_tokens_carry_the_code() {
        let encoded = EncodedGsiFile::from_txt(
            &own(&["1001 17 615432.10 255678.90 262.25"]),
            GsiFormat::Gsi16,
            false,
        );
        assert_eq!(indices(&encoded.lines[0]), vec![11, 71, 81, 82, 83]);
    }

    #[test]
    fn non_numeric_coordinate_is_rejected() {
        let encoded = EncodedGsiFile::from_txt(
            &own(&["1001 A 615432.10 255678.90"]),
            GsiFormat::Gsi16,
            false,
        );
        assert!(encoded.lines.is_empty());
        assert_eq!(encoded.skipped.len(), 1);
        assert!(matches!(
            encoded.skipped[0].reason,
            GsiError::InvalidNumericLiteral(_)
        ));
    }

    #[test]
    fn line_counter_lands_in_point_number_information() {
        let encoded = EncodedGsiFile::from_txt(
            &own(&["1001 262.250", "", "1002 263.750"]),
            GsiFormat::Gsi8,
            false,
        );
        assert_eq!(encoded.lines[0][0].information, "0001");
        assert_eq!(encoded.lines[1][0].information, "0002");
    }

    #[test]
    fn csv_records_become_token_lines() {
        let data = b"1001,615432.10,255678.90,262.25\n1002,615433.20,255679.90,261.80\n";
        let encoded = EncodedGsiFile::from_csv(data, b',', GsiFormat::Gsi16, false);
        assert_eq!(encoded.lines.len(), 2);
        assert_eq!(indices(&encoded.lines[0]), vec![11, 81, 82, 83]);
        assert!(encoded.skipped.is_empty());
    }

    #[test]
    fn csv_semicolon_delimiter() {
        let data = b"1001;615432.10;255678.90\n";
        let encoded = EncodedGsiFile::from_csv(data, b';', GsiFormat::Gsi8, false);
        assert_eq!(indices(&encoded.lines[0]), vec![11, 81, 82]);
    }

    #[test]
    fn cadwork_skips_header_and_reads_columns() {
        let lines = own(&[
            "cadwork node export",
            "version 1",
            "no.\tx\ty\tz\tcode",
            "1\t12.3456\t7.8901\t2.3456\t17",
            "2\t12.4456\t7.9901\t2.4456\t17",
        ]);
        let encoded = EncodedGsiFile::from_cadwork(&lines, GsiFormat::Gsi8, true);
        assert_eq!(encoded.lines.len(), 2);
        assert_eq!(indices(&encoded.lines[0]), vec![11, 71, 81, 82, 83]);

        let encoded = EncodedGsiFile::from_cadwork(&lines, GsiFormat::Gsi8, false);
        assert_eq!(indices(&encoded.lines[0]), vec![11, 81, 82, 83]);
    }

    #[test]
    fn nigra_keeps_only_data_rows() {
        let lines = own(&[
            "NIGRA height listing",
            "point      height",
            "1001   262.250",
            "1002   263.755",
            "",
        ]);
        let encoded = EncodedGsiFile::from_nigra(&lines, GsiFormat::Gsi8);
        assert_eq!(encoded.lines.len(), 2);
        assert_eq!(indices(&encoded.lines[0]), vec![11, 83]);
        assert_eq!(encoded.lines[1][1].data, "02637550");
    }

    #[test]
    fn to_lines_serializes_gsi_text() {
        let encoded = EncodedGsiFile::from_txt(&own(&["1001 262.250"]), GsiFormat::Gsi8, false);
        let lines = encoded.to_lines(true);
        assert_eq!(lines, vec!["110001+00001001 83..46+02622500 ".to_string()]);
    }
}
