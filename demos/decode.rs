// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  decode.rs - Decoder demo for Leica GSI8 and GSI16 files.
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

use clap::Parser;

use gsiconv::decoder::DecodedGsiFile;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to read.
    file: String,
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

    println!("{:?}", decoded);
}
