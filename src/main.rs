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

use anyhow::Context;
use serde_json::json;

use jetfan::config::FanControlConfig;
use jetfan::logger;
use jetfan::service::FanController;
use jetfan::system;
use jetfan::ui;

const USAGE: &str = "\
Usage: jetfan [--logging] [--help]

Drives the pwm-fan from the hottest thermal zone, once per second.

Options:
  --logging   append JSON events to /var/log/jetfan/events.json
  --help      show this message

Environment:
  FAN_CONTROL_MIN_TEMP       fan starts above this temperature (default 50)
  FAN_CONTROL_MAX_TEMP       fan runs at full speed from here (default 70)
  FAN_CONTROL_EXCLUDE_ZONES  space separated zones to ignore (default thermal_zone4)
  FAN_CONTROL_HISTORY_SIZE   samples kept per zone in the live view (default 60)
  FAN_CONTROL_THERMAL_PATH   thermal zone directory (default /sys/devices/virtual/thermal)
  FAN_CONTROL_PWM_PATH       fan control file (default /sys/devices/pwm-fan/target_pwm)";

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    if args.iter().any(|a| a == "--logging") {
        logger::init_logging();
        if !logger::is_enabled() {
            eprintln!("jetfan: warning: could not open an event log, continuing without one");
        }
        logger::log_event("startup", json!({ "args": args }));
    }

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        logger::log_event("fatal_error", json!({ "error": format!("{err:#}") }));
        logger::shutdown_logging();
        std::process::exit(1);
    }

    Ok(())
}

fn run() -> anyhow::Result<()> {
    let config = FanControlConfig::from_env().context("invalid configuration")?;
    logger::log_event("config", serde_json::to_value(&config)?);

    if !system::is_root() {
        eprintln!(
            "jetfan: warning: not running as root, writing {} will probably fail",
            config.pwm_path.display()
        );
        logger::log_event("not_root", json!({ "euid_root": false }));
    }

    let controller = FanController::from_config(config).context("failed to set up fan control")?;
    controller.preflight().context("startup check failed")?;

    let board = system::read_board_name();
    let mut presenter = ui::stdout_presenter(controller.config(), &board);
    controller.run(presenter.as_mut()).context("control loop stopped")?;
    Ok(())
}
