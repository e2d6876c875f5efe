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

use serde::Serialize;

use crate::error::{FanControlError, Result};

/// Highest value accepted by the pwm-fan `target_pwm` file.
pub const MAX_DUTY: u8 = 255;

/// Linear fan curve between two thresholds.
///
/// Below `fan_on_temp` the fan is stopped, at or above `fan_full_temp` it runs
/// at [`MAX_DUTY`], and in between the duty cycle grows linearly (rounded
/// down). Every call is independent: no hysteresis, no smoothing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FanCurve {
    fan_on_temp: f64,
    fan_full_temp: f64,
}

impl FanCurve {
    pub fn new(fan_on_temp: f64, fan_full_temp: f64) -> Result<Self> {
        validate_curve(fan_on_temp, fan_full_temp)?;
        Ok(Self { fan_on_temp, fan_full_temp })
    }

    pub fn fan_on_temp(&self) -> f64 { self.fan_on_temp }

    pub fn fan_full_temp(&self) -> f64 { self.fan_full_temp }

    pub fn duty_cycle(&self, temp_c: f64) -> u8 {
        duty_cycle(temp_c, self.fan_on_temp, self.fan_full_temp)
    }
}

pub fn validate_curve(fan_on_temp: f64, fan_full_temp: f64) -> Result<()> {
    if !fan_on_temp.is_finite() {
        return Err(FanControlError::invalid_config("fan_on_temp", "must be a finite number"));
    }
    if !fan_full_temp.is_finite() {
        return Err(FanControlError::invalid_config("fan_full_temp", "must be a finite number"));
    }
    if fan_on_temp >= fan_full_temp {
        return Err(FanControlError::invalid_config(
            "fan_full_temp",
            format!("must be greater than fan_on_temp ({} >= {})", fan_on_temp, fan_full_temp),
        ));
    }
    Ok(())
}

pub fn duty_cycle(temp_c: f64, fan_on_temp: f64, fan_full_temp: f64) -> u8 {
    if temp_c < fan_on_temp { return 0; }
    if temp_c >= fan_full_temp { return MAX_DUTY; }
    let range = fan_full_temp - fan_on_temp;
    let scaled = (MAX_DUTY as f64) * (temp_c - fan_on_temp) / range;
    // `as` saturates, which also maps a NaN reading to 0
    scaled.floor().clamp(0.0, MAX_DUTY as f64) as u8
}

/// Duty cycle as a percentage of full speed, for display.
pub fn duty_percent(duty: u8) -> f64 {
    (duty as f64) * 100.0 / (MAX_DUTY as f64)
}
