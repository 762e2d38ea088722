// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  tidyup.rs - Tidy-up demo for Leica GSI8 and GSI16 files.
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

use gsiconv::tidy::{TidySettings, TidyUp};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to read.
    file: String,

    /// Marker token for free station setups.
    #[arg(long, default_value = "FS")]
    free_station: String,

    /// Marker token for known station setups.
    #[arg(long, default_value = "ST")]
    known_station: String,

    /// Marker token for control and stake-out points.
    #[arg(long, default_value = "STKE")]
    control_point: String,

    /// Keep station lines in the output.
    #[arg(long)]
    hold_stations: bool,

    /// Keep control point lines in the output.
    #[arg(long)]
    hold_control_points: bool,
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

    let settings = TidySettings {
        free_station_identifier: args.free_station,
        known_station_identifier: args.known_station,
        control_point_identifier: args.control_point,
        hold_stations: args.hold_stations,
        hold_control_points: args.hold_control_points,
        trailing_blank: true,
    };

    let tidied = match TidyUp::from_lines(&lines, &settings) {
        Ok(tidied) => tidied,
        Err(error) => {
            eprintln!("Error tidying file {:?}: {:?}", &args.file, error);
            return;
        }
    };

    for line in &tidied.lines {
        println!("{}", line);
    }
}
