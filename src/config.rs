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

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::curves::{validate_curve, FanCurve};
use crate::error::{FanControlError, Result};

pub const ENV_MIN_TEMP: &str = "FAN_CONTROL_MIN_TEMP";
pub const ENV_MAX_TEMP: &str = "FAN_CONTROL_MAX_TEMP";
pub const ENV_EXCLUDE_ZONES: &str = "FAN_CONTROL_EXCLUDE_ZONES";
pub const ENV_HISTORY_SIZE: &str = "FAN_CONTROL_HISTORY_SIZE";
pub const ENV_THERMAL_PATH: &str = "FAN_CONTROL_THERMAL_PATH";
pub const ENV_PWM_PATH: &str = "FAN_CONTROL_PWM_PATH";

pub const DEFAULT_FAN_ON_TEMP: i32 = 50;
pub const DEFAULT_FAN_FULL_TEMP: i32 = 70;
// Zone 4 on the Jetson Nano reports a constant 100 °C
pub const DEFAULT_EXCLUDED_ZONE: &str = "thermal_zone4";
pub const DEFAULT_HISTORY_SIZE: usize = 60;
pub const DEFAULT_THERMAL_PATH: &str = "/sys/devices/virtual/thermal";
pub const DEFAULT_PWM_PATH: &str = "/sys/devices/pwm-fan/target_pwm";

/// Settings resolved once at startup and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FanControlConfig {
    pub fan_on_temp: i32,
    pub fan_full_temp: i32,
    pub excluded_zones: BTreeSet<String>,
    pub history_size: usize,
    pub thermal_path: PathBuf,
    pub pwm_path: PathBuf,
}

impl Default for FanControlConfig {
    fn default() -> Self {
        Self {
            fan_on_temp: DEFAULT_FAN_ON_TEMP,
            fan_full_temp: DEFAULT_FAN_FULL_TEMP,
            excluded_zones: default_excluded_zones(),
            history_size: DEFAULT_HISTORY_SIZE,
            thermal_path: PathBuf::from(DEFAULT_THERMAL_PATH),
            pwm_path: PathBuf::from(DEFAULT_PWM_PATH),
        }
    }
}

fn default_excluded_zones() -> BTreeSet<String> {
    BTreeSet::from([DEFAULT_EXCLUDED_ZONE.to_string()])
}

impl FanControlConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var_os(key))
    }

    /// Build the configuration from an arbitrary key lookup. Unset keys fall
    /// back to their defaults; set keys must parse. Paths are taken as raw
    /// OS strings, every other value must be UTF-8.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let text = |key: &str| lookup(key).map(|v| utf8_var(key, v)).transpose();
        let mut cfg = Self::default();

        if let Some(v) = text(ENV_MIN_TEMP)? {
            cfg.fan_on_temp = parse_var(ENV_MIN_TEMP, &v)?;
        }
        if let Some(v) = text(ENV_MAX_TEMP)? {
            cfg.fan_full_temp = parse_var(ENV_MAX_TEMP, &v)?;
        }
        if let Some(v) = text(ENV_EXCLUDE_ZONES)? {
            let zones = parse_zone_list(&v);
            if !zones.is_empty() {
                cfg.excluded_zones = zones;
            }
        }
        if let Some(v) = text(ENV_HISTORY_SIZE)? {
            cfg.history_size = parse_var(ENV_HISTORY_SIZE, &v)?;
        }
        if let Some(v) = lookup(ENV_THERMAL_PATH).filter(|v| !v.is_empty()) {
            cfg.thermal_path = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_PWM_PATH).filter(|v| !v.is_empty()) {
            cfg.pwm_path = PathBuf::from(v);
        }

        validate_config(&cfg)?;
        Ok(cfg)
    }

    pub fn curve(&self) -> Result<FanCurve> {
        FanCurve::new(self.fan_on_temp as f64, self.fan_full_temp as f64)
    }

    pub fn is_excluded(&self, zone: &str) -> bool {
        self.excluded_zones.contains(zone)
    }
}

fn utf8_var(key: &str, raw: OsString) -> Result<String> {
    raw.into_string()
        .map_err(|raw| FanControlError::invalid_config(key, format!("{:?}: not valid UTF-8", raw)))
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| FanControlError::invalid_config(key, format!("{:?}: {}", raw, e)))
}

/// Split a whitespace separated list of zone identifiers.
pub fn parse_zone_list(raw: &str) -> BTreeSet<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

pub fn validate_config(cfg: &FanControlConfig) -> Result<()> {
    validate_curve(cfg.fan_on_temp as f64, cfg.fan_full_temp as f64)?;
    if cfg.history_size == 0 {
        return Err(FanControlError::invalid_config(ENV_HISTORY_SIZE, "must be at least 1"));
    }
    Ok(())
}

/// Reject a configuration whose exclusions cover every zone actually present.
pub fn validate_zone_coverage(cfg: &FanControlConfig, readings: &BTreeMap<String, f64>) -> Result<()> {
    if readings.keys().all(|zone| cfg.is_excluded(zone)) {
        return Err(FanControlError::AllZonesExcluded(readings.keys().cloned().collect()));
    }
    Ok(())
}
