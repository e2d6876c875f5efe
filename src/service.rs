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

use std::thread;
use std::time::Duration;

use serde_json::json;

use crate::config::{validate_zone_coverage, FanControlConfig};
use crate::curves::FanCurve;
use crate::error::Result;
use crate::logger;
use crate::pwm::PwmFan;
use crate::thermal::{self, SysfsZoneReader, ZoneReader};
use crate::ui::{CycleReport, Presenter};

/// Pause between cycles. Not adjusted for the time a cycle takes.
pub const CYCLE_INTERVAL: Duration = Duration::from_secs(1);

/// Sensor reader, curve and fan wired together from one configuration.
pub struct FanController<R: ZoneReader> {
    config: FanControlConfig,
    curve: FanCurve,
    reader: R,
    fan: PwmFan,
}

impl FanController<SysfsZoneReader> {
    pub fn from_config(config: FanControlConfig) -> Result<Self> {
        let reader = SysfsZoneReader::new(&config.thermal_path);
        Self::with_reader(config, reader)
    }
}

impl<R: ZoneReader> FanController<R> {
    pub fn with_reader(config: FanControlConfig, reader: R) -> Result<Self> {
        let curve = config.curve()?;
        let fan = PwmFan::new(&config.pwm_path);
        Ok(Self { config, curve, reader, fan })
    }

    pub fn config(&self) -> &FanControlConfig { &self.config }

    /// Read the zones once and make sure at least one of them drives the fan.
    pub fn preflight(&self) -> Result<()> {
        let readings = thermal::read_all(&self.reader)?;
        validate_zone_coverage(&self.config, &readings)?;
        logger::log_event(
            "zones",
            json!({
                "zones": readings.keys().collect::<Vec<_>>(),
                "excluded": &self.config.excluded_zones,
            }),
        );
        Ok(())
    }

    /// Read every zone and derive the duty cycle from the hottest
    /// non-excluded one. Nothing is written.
    pub fn sample(&self) -> Result<CycleReport> {
        let readings = thermal::read_all(&self.reader)?;
        let max_temp = thermal::max_temperature(&readings, &self.config.excluded_zones)?;
        let duty = self.curve.duty_cycle(max_temp);
        Ok(CycleReport { readings, max_temp, duty })
    }

    pub fn apply(&self, report: &CycleReport) -> Result<()> {
        self.fan.set_duty(report.duty)
    }

    pub fn run_cycle(&self) -> Result<CycleReport> {
        let report = self.sample()?;
        self.apply(&report)?;
        Ok(report)
    }

    /// Sample, present, drive, sleep; forever. Returns only on error.
    pub fn run(&self, presenter: &mut dyn Presenter) -> Result<()> {
        self.run_with_interval(presenter, CYCLE_INTERVAL, None)
    }

    /// Same loop with an explicit pause and an optional cycle limit.
    pub fn run_with_interval(
        &self,
        presenter: &mut dyn Presenter,
        interval: Duration,
        max_cycles: Option<usize>,
    ) -> Result<()> {
        let mut cycles = 0usize;
        loop {
            let report = self.sample()?;
            presenter.present(&report)?;
            self.apply(&report)?;
            cycles += 1;
            if max_cycles.is_some_and(|max| cycles >= max) {
                return Ok(());
            }
            thread::sleep(interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FanControlError;
    use crate::test_utils::test_utils::{create_mock_thermal_dir, create_test_config};
    use crate::ui::SummaryPresenter;
    use std::fs;

    fn setup(zones: &[(&str, &str)]) -> (tempfile::TempDir, FanController<SysfsZoneReader>) {
        let dir = create_mock_thermal_dir(zones);
        let config = create_test_config(&dir);
        fs::write(&config.pwm_path, "0").unwrap();
        let controller = FanController::from_config(config).unwrap();
        (dir, controller)
    }

    #[test]
    fn test_run_cycle_writes_duty_from_hottest_zone() {
        let (dir, controller) = setup(&[
            ("thermal_zone0", "41500"),
            ("thermal_zone1", "60000"),
            ("thermal_zone4", "100000"),
        ]);

        let report = controller.run_cycle().unwrap();
        assert_eq!(report.max_temp, 60.0);
        assert_eq!(report.duty, 127);
        assert_eq!(report.readings.len(), 3);
        assert_eq!(fs::read_to_string(dir.path().join("target_pwm")).unwrap(), "127");
    }

    #[test]
    fn test_run_cycle_cool_board_stops_fan() {
        let (dir, controller) = setup(&[("thermal_zone0", "30000"), ("thermal_zone4", "100000")]);
        let report = controller.run_cycle().unwrap();
        assert_eq!(report.duty, 0);
        assert_eq!(fs::read_to_string(dir.path().join("target_pwm")).unwrap(), "0");
    }

    #[test]
    fn test_sample_does_not_touch_fan() {
        let (dir, controller) = setup(&[("thermal_zone0", "70000")]);
        let report = controller.sample().unwrap();
        assert_eq!(report.duty, 255);
        assert_eq!(fs::read_to_string(dir.path().join("target_pwm")).unwrap(), "0");
    }

    #[test]
    fn test_missing_fan_file_is_fatal() {
        let (dir, controller) = setup(&[("thermal_zone0", "65000")]);
        fs::remove_file(dir.path().join("target_pwm")).unwrap();
        assert!(matches!(controller.run_cycle(), Err(FanControlError::PwmWrite { .. })));
    }

    #[test]
    fn test_preflight_rejects_fully_excluded_board() {
        let (_dir, controller) = setup(&[("thermal_zone4", "100000")]);
        assert!(matches!(controller.preflight(), Err(FanControlError::AllZonesExcluded(_))));
    }

    #[test]
    fn test_preflight_accepts_usable_zone() {
        let (_dir, controller) = setup(&[("thermal_zone0", "40000"), ("thermal_zone4", "100000")]);
        assert!(controller.preflight().is_ok());
    }

    #[test]
    fn test_run_with_cycle_limit_presents_each_cycle() {
        let (_dir, controller) = setup(&[("thermal_zone0", "72000")]);
        let mut presenter = SummaryPresenter::new(Vec::new());
        controller
            .run_with_interval(&mut presenter, Duration::from_millis(1), Some(3))
            .unwrap();

        let text = String::from_utf8(presenter.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().all(|l| l == "temperature=72.0 fan_speed=255"));
    }

    #[test]
    fn test_run_stops_on_sensor_failure() {
        let (dir, controller) = setup(&[("thermal_zone0", "50000")]);
        fs::write(dir.path().join("thermal_zone0/temp"), "broken").unwrap();
        let mut presenter = SummaryPresenter::new(Vec::new());
        let res = controller.run_with_interval(&mut presenter, Duration::from_millis(1), Some(5));
        assert!(matches!(res, Err(FanControlError::TemperatureParse { .. })));
        assert!(presenter.into_inner().is_empty());
    }
}
