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
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::error::{FanControlError, Result};
use crate::logger;

pub const ZONE_PREFIX: &str = "thermal_zone";

/// Attempts made on a zone whose read times out before giving up.
pub const MAX_READ_ATTEMPTS: u32 = 3;

/// Zone name -> degrees Celsius, ordered by zone name.
pub type ZoneReadings = BTreeMap<String, f64>;

/// Raw access to thermal zones. Split out from the parsing and retry logic so
/// those can be exercised without a sysfs tree.
#[cfg_attr(test, mockall::automock)]
pub trait ZoneReader {
    /// Names of the zones currently present, e.g. `thermal_zone0`.
    fn list_zones(&self) -> Result<Vec<String>>;

    /// Untrimmed contents of a zone's temperature file (millidegrees).
    fn read_raw(&self, zone: &str) -> io::Result<String>;
}

/// Reads `<root>/thermal_zoneN/temp`.
#[derive(Debug, Clone)]
pub struct SysfsZoneReader {
    root: PathBuf,
}

impl SysfsZoneReader {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn temp_path(&self, zone: &str) -> PathBuf {
        self.root.join(zone).join("temp")
    }
}

impl ZoneReader for SysfsZoneReader {
    fn list_zones(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|source| FanControlError::ZoneList {
            path: self.root.clone(),
            source,
        })?;

        let mut zones: Vec<String> = entries
            .flatten()
            .filter_map(|ent| ent.file_name().to_str().map(str::to_string))
            .filter(|name| name.starts_with(ZONE_PREFIX))
            .collect();

        if zones.is_empty() {
            return Err(FanControlError::NoThermalZones(self.root.clone()));
        }
        zones.sort();
        Ok(zones)
    }

    fn read_raw(&self, zone: &str) -> io::Result<String> {
        let mut s = String::new();
        fs::File::open(self.temp_path(zone))?.read_to_string(&mut s)?;
        Ok(s)
    }
}

/// Convert the millidegree text of a zone file to degrees Celsius.
pub fn parse_millidegrees(zone: &str, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    let mc = trimmed.parse::<i64>().map_err(|_| FanControlError::TemperatureParse {
        zone: zone.to_string(),
        raw: trimmed.to_string(),
    })?;
    Ok((mc as f64) / 1000.0)
}

/// Read one zone. Only timeouts are retried, up to [`MAX_READ_ATTEMPTS`]
/// attempts in total; any other error is returned straight away.
pub fn read_temperature<R: ZoneReader + ?Sized>(reader: &R, zone: &str) -> Result<f64> {
    let mut attempt = 1;
    loop {
        match reader.read_raw(zone) {
            Ok(raw) => return parse_millidegrees(zone, &raw),
            Err(e) if e.kind() == io::ErrorKind::TimedOut && attempt < MAX_READ_ATTEMPTS => {
                logger::log_event(
                    "read_retry",
                    json!({ "zone": zone, "attempt": attempt, "error": e.to_string() }),
                );
                attempt += 1;
            }
            Err(source) => {
                return Err(FanControlError::TemperatureRead {
                    zone: zone.to_string(),
                    attempts: attempt,
                    source,
                })
            }
        }
    }
}

/// Read every zone. The first zone that cannot be read aborts the whole pass.
pub fn read_all<R: ZoneReader + ?Sized>(reader: &R) -> Result<ZoneReadings> {
    let mut out = ZoneReadings::new();
    for zone in reader.list_zones()? {
        let temp = read_temperature(reader, &zone)?;
        out.insert(zone, temp);
    }
    Ok(out)
}

/// Hottest temperature among the zones not listed in `excluded`.
pub fn max_temperature(readings: &ZoneReadings, excluded: &BTreeSet<String>) -> Result<f64> {
    readings
        .iter()
        .filter(|(zone, _)| !excluded.contains(zone.as_str()))
        .map(|(_, t)| *t)
        .fold(None, |acc: Option<f64>, t| Some(acc.map_or(t, |a| a.max(t))))
        .ok_or_else(|| FanControlError::AllZonesExcluded(readings.keys().cloned().collect()))
}
