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

//! Jetfan - thermal-zone driven PWM fan control
//!
//! Reads the board's thermal zones, maps the hottest one onto a linear fan
//! curve and writes the resulting duty cycle to the pwm-fan driver, with an
//! optional live terminal view.

pub mod config;
pub mod curves;
pub mod error;
pub mod history;
pub mod logger;
pub mod pwm;
pub mod service;
pub mod system;
pub mod thermal;
pub mod ui;

pub use error::{FanControlError, Result};

#[cfg(test)]
pub mod test_utils;
