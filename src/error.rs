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

//! Error type shared by every Jetfan component.

use std::io;
use std::path::PathBuf;

/// Result type alias using FanControlError
pub type Result<T> = std::result::Result<T, FanControlError>;

#[derive(thiserror::Error, Debug)]
pub enum FanControlError {
    // ============================================================================
    // Sensor errors
    // ============================================================================
    #[error("Failed to list thermal zones in {path}: {source}")]
    ZoneList {
        path: PathBuf,
        source: io::Error,
    },

    #[error("No thermal zones found in {0}")]
    NoThermalZones(PathBuf),

    #[error("Failed to read temperature of {zone} after {attempts} attempt(s): {source}")]
    TemperatureRead {
        zone: String,
        attempts: u32,
        source: io::Error,
    },

    #[error("Invalid temperature value {raw:?} in {zone}")]
    TemperatureParse {
        zone: String,
        raw: String,
    },

    #[error("Every thermal zone is excluded ({0:?}); nothing left to drive the fan from")]
    AllZonesExcluded(Vec<String>),

    // ============================================================================
    // Fan errors
    // ============================================================================
    #[error("Failed to write PWM to {path}: {source}")]
    PwmWrite {
        path: PathBuf,
        source: io::Error,
    },

    // ============================================================================
    // Configuration errors
    // ============================================================================
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },

    // ============================================================================
    // Output errors
    // ============================================================================
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl FanControlError {
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
