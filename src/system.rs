/*
 * This file is part of Jetfan.
 *
 * Copyright (C) 2025 Jetfan contributors
 *
 * Jetfan is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Jetfan is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Jetfan. If not, see <https://www.gnu.org/licenses/>.
 */

use std::fs;
use std::path::Path;

pub const DEVICE_TREE_MODEL: &str = "/proc/device-tree/model";
pub const DEFAULT_BOARD_NAME: &str = "Jetson Nano";

/// Board name for the monitor header.
pub fn read_board_name() -> String {
    read_board_name_from(Path::new(DEVICE_TREE_MODEL))
}

pub fn read_board_name_from(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(mut s) => {
            // device-tree strings are NUL terminated
            s.retain(|c| c != '\u{0}');
            let s = s.trim();
            if s.is_empty() { DEFAULT_BOARD_NAME.to_string() } else { s.to_string() }
        }
        Err(_) => DEFAULT_BOARD_NAME.to_string(),
    }
}

pub fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}
