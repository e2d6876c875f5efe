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

//! Output of each control cycle: a colored live table when attached to a
//! terminal, one `key=value` summary line otherwise.

use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::tty::IsTty;

use crate::config::FanControlConfig;
use crate::curves::duty_percent;
use crate::error::Result;
use crate::history::ZoneHistory;
use crate::thermal::ZoneReadings;

/// Bottom and top of the color scale (°C).
pub const COLOR_MIN_TEMP: f64 = 10.0;
pub const COLOR_MAX_TEMP: f64 = 85.0;

const HEADER_WIDTH: usize = 80;

/// Everything one iteration of the control loop produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub readings: ZoneReadings,
    pub max_temp: f64,
    pub duty: u8,
}

pub trait Presenter {
    fn present(&mut self, report: &CycleReport) -> Result<()>;
}

/// Python-style float text: integral values keep one decimal (`60.0`).
pub fn format_temp(temp_c: f64) -> String {
    if temp_c.is_finite() && temp_c.fract() == 0.0 {
        format!("{:.1}", temp_c)
    } else {
        format!("{}", temp_c)
    }
}

/// `temperature=<value> fan_speed=<duty>`
pub fn summary_line(report: &CycleReport) -> String {
    format!("temperature={} fan_speed={}", format_temp(report.max_temp), report.duty)
}

/// Maps a temperature onto a hue running from blue (cold) to red (hot).
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    min_value: f64,
    max_value: f64,
    min_hue: f64,
    max_hue: f64,
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::new(COLOR_MIN_TEMP, COLOR_MAX_TEMP)
    }
}

impl ColorScale {
    pub fn new(min_value: f64, max_value: f64) -> Self {
        Self { min_value, max_value, min_hue: 2.0 / 3.0, max_hue: 0.0 }
    }

    pub fn hue(&self, value: f64) -> f64 {
        let value = value.clamp(self.min_value, self.max_value);
        let ratio = (value - self.min_value) / (self.max_value - self.min_value);
        self.min_hue + (self.max_hue - self.min_hue) * ratio
    }

    pub fn rgb(&self, value: f64) -> (u8, u8, u8) {
        let (r, g, b) = hls_to_rgb(self.hue(value), 0.5, 1.0);
        ((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
    }

    pub fn color(&self, value: f64) -> Color {
        let (r, g, b) = self.rgb(value);
        Color::Rgb { r, g, b }
    }
}

/// HLS to RGB, all components in 0..=1.
pub fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

/// One line per cycle, flushed, suitable for a log file or journal.
pub struct SummaryPresenter<W: Write> {
    out: W,
}

impl<W: Write> SummaryPresenter<W> {
    pub fn new(out: W) -> Self { Self { out } }

    pub fn into_inner(self) -> W { self.out }
}

impl<W: Write> Presenter for SummaryPresenter<W> {
    fn present(&mut self, report: &CycleReport) -> Result<()> {
        writeln!(self.out, "{}", summary_line(report))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Full-screen table: zone, colored temperature, history sparkline, then the
/// max temperature and fan speed.
pub struct TerminalPresenter<W: Write> {
    out: W,
    title: String,
    colors: ColorScale,
    history: ZoneHistory,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, board_name: &str, history_size: usize) -> Self {
        Self {
            out,
            title: format!(" {} temperature monitor ", board_name),
            colors: ColorScale::default(),
            history: ZoneHistory::new(history_size),
        }
    }

    pub fn history(&self) -> &ZoneHistory { &self.history }

    pub fn into_inner(self) -> W { self.out }

    fn render(&mut self, report: &CycleReport) -> io::Result<()> {
        let out = &mut self.out;
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        queue!(out, Print(format!("{:=^width$}\n\n", self.title, width = HEADER_WIDTH)))?;

        for (zone, temp) in &report.readings {
            queue!(
                out,
                Print(format!("{} ", zone)),
                SetForegroundColor(self.colors.color(*temp)),
                Print(format!("{:>5}", format_temp(*temp))),
                ResetColor,
                Print(" ")
            )?;
            for sample in self.history.samples(zone) {
                queue!(out, SetBackgroundColor(self.colors.color(sample)), Print(" "), ResetColor)?;
            }
            queue!(out, Print("\n"))?;
        }
        queue!(out, Print("\n"))?;

        queue!(
            out,
            Print(">>> Max temp: "),
            SetForegroundColor(self.colors.color(report.max_temp)),
            Print(format_temp(report.max_temp)),
            ResetColor,
            Print(" °C\n"),
            Print(format!(
                ">>> Fan speed: {:.0}% ({})\n\n",
                duty_percent(report.duty),
                report.duty
            ))
        )?;
        out.flush()
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present(&mut self, report: &CycleReport) -> Result<()> {
        self.history.record(&report.readings);
        self.render(report)?;
        Ok(())
    }
}

/// Pick the presenter for stdout once, at startup.
pub fn stdout_presenter(config: &FanControlConfig, board_name: &str) -> Box<dyn Presenter> {
    let out = io::stdout();
    if out.is_tty() {
        Box::new(TerminalPresenter::<Stdout>::new(out, board_name, config.history_size))
    } else {
        Box::new(SummaryPresenter::new(out))
    }
}
