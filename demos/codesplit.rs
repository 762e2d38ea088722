// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  codesplit.rs - Code splitting demo for Leica GSI8 and GSI16 files.
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

use std::fs;
use std::path::Path;

use clap::Parser;

use gsiconv::decoder::DecodedGsiFile;
use gsiconv::splitter::{CodeSplit, CodeSplitOptions};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to read.
    file: String,

    /// Write the code value into the output lines.
    #[arg(long)]
    drop_code: bool,

    /// Collect lines without a code in an extra output file.
    #[arg(long)]
    include_uncoded: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let content = match fs::read_to_string(&args.file) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("Error opening file {:?}: {:?}", &args.file, error);
            return;
        }
    };
    let lines: Vec<String> = content.lines().map(String::from).collect();

    let decoded = match DecodedGsiFile::from_lines(&lines) {
        Ok(decoded) => decoded,
        Err(error) => {
            eprintln!("Error decoding file {:?}: {:?}", &args.file, error);
            return;
        }
    };

    let options = CodeSplitOptions {
        drop_code: args.drop_code,
        include_uncoded: args.include_uncoded,
    };
    let split = CodeSplit::from_decoded(&decoded, &options);

    // Write one output file per code next to the input file
    let base_name = Path::new(&args.file)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();
    let input_dir = Path::new(&args.file)
        .parent()
        .unwrap_or_else(|| Path::new("."));

    for (code, group) in &split.groups {
        let filename = input_dir.join(format!("{}_{}.txt", base_name, code));
        let content = group.join("\n") + "\n";
        if let Err(e) = fs::write(&filename, content) {
            eprintln!("Failed to write file {}: {}", filename.display(), e);
        }
    }
}
