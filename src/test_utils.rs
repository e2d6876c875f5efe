/*
 * Test utilities and mock helpers for Jetfan
 *
 * Builders for fake sysfs trees and sample readings shared by the unit tests.
 */

#[cfg(test)]
pub mod test_utils {
    use crate::config::FanControlConfig;
    use crate::thermal::ZoneReadings;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    /// Creates a temporary thermal directory with one `<zone>/temp` file per entry
    pub fn create_mock_thermal_dir(zones: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for (zone, millidegrees) in zones {
            let zone_dir = temp_dir.path().join(zone);
            fs::create_dir_all(&zone_dir).unwrap();
            fs::write(zone_dir.join("temp"), format!("{}\n", millidegrees)).unwrap();
        }
        temp_dir
    }

    /// Readings resembling a Jetson Nano at moderate load
    pub fn create_mock_readings() -> ZoneReadings {
        let mut readings = ZoneReadings::new();
        readings.insert("thermal_zone0".to_string(), 41.5);
        readings.insert("thermal_zone1".to_string(), 60.0);
        readings.insert("thermal_zone2".to_string(), 39.0);
        readings.insert("thermal_zone4".to_string(), 100.0);
        readings
    }

    /// Config pointing at a mock thermal dir and a pwm file inside it
    pub fn create_test_config(dir: &TempDir) -> FanControlConfig {
        FanControlConfig {
            thermal_path: dir.path().to_path_buf(),
            pwm_path: dir.path().join("target_pwm"),
            excluded_zones: BTreeSet::from(["thermal_zone4".to_string()]),
            history_size: 5,
            ..FanControlConfig::default()
        }
    }

    /// Asserts that two floating point numbers are approximately equal
    pub fn assert_approx_eq(a: f64, b: f64, tolerance: f64) {
        assert!(
            (a - b).abs() < tolerance,
            "Values {} and {} are not approximately equal (tolerance: {})",
            a, b, tolerance
        );
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::*;
    use std::fs;

    #[test]
    fn test_mock_thermal_dir_layout() {
        let dir = create_mock_thermal_dir(&[("thermal_zone0", "41500")]);
        let raw = fs::read_to_string(dir.path().join("thermal_zone0/temp")).unwrap();
        assert_eq!(raw.trim(), "41500");
    }

    #[test]
    fn test_mock_readings() {
        let readings = create_mock_readings();
        assert_eq!(readings.len(), 4);
        assert_approx_eq(readings["thermal_zone0"], 41.5, 1e-9);
    }

    #[test]
    fn test_test_config_paths() {
        let dir = create_mock_thermal_dir(&[]);
        let cfg = create_test_config(&dir);
        assert_eq!(cfg.thermal_path, dir.path());
        assert!(cfg.pwm_path.ends_with("target_pwm"));
    }

    #[test]
    #[should_panic]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq(1.0, 1.1, 0.01);
    }
}
