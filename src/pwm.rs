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

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::error::{FanControlError, Result};
use crate::logger;

/// The pwm-fan driver's `target_pwm` control file.
#[derive(Debug, Clone)]
pub struct PwmFan {
    path: PathBuf,
}

impl PwmFan {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Write `duty` (0-255) as decimal text. The file must already exist; the
    /// driver creates it, so a missing file means there is no fan to drive.
    pub fn set_duty(&self, duty: u8) -> Result<()> {
        let written = duty.to_string();
        let mut f = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|source| FanControlError::PwmWrite { path: self.path.clone(), source })?;
        f.write_all(written.as_bytes())
            .map_err(|source| FanControlError::PwmWrite { path: self.path.clone(), source })?;

        logger::log_event(
            "pwm_write",
            json!({
                "path": self.path.display().to_string(),
                "written": written,
            }),
        );
        Ok(())
    }
}
