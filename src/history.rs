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

use std::collections::{BTreeMap, VecDeque};

use crate::thermal::ZoneReadings;

/// Bounded per-zone temperature history, oldest sample first. Only the
/// terminal presenter keeps one.
#[derive(Debug, Clone)]
pub struct ZoneHistory {
    capacity: usize,
    zones: BTreeMap<String, VecDeque<f64>>,
}

impl ZoneHistory {
    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), zones: BTreeMap::new() }
    }

    pub fn capacity(&self) -> usize { self.capacity }

    pub fn push(&mut self, zone: &str, temp_c: f64) {
        let capacity = self.capacity;
        let buf = self
            .zones
            .entry(zone.to_string())
            .or_insert_with(|| VecDeque::with_capacity(capacity));
        if buf.len() == capacity {
            buf.pop_front();
        }
        buf.push_back(temp_c);
    }

    pub fn record(&mut self, readings: &ZoneReadings) {
        for (zone, temp) in readings {
            self.push(zone, *temp);
        }
    }

    pub fn samples(&self, zone: &str) -> impl Iterator<Item = f64> + '_ {
        self.zones.get(zone).into_iter().flat_map(|buf| buf.iter().copied())
    }

    pub fn len(&self, zone: &str) -> usize {
        self.zones.get(zone).map_or(0, VecDeque::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_evicts_oldest() {
        let mut history = ZoneHistory::new(3);
        for t in [1.0, 2.0, 3.0, 4.0, 5.0] {
            history.push("thermal_zone0", t);
        }
        assert_eq!(history.len("thermal_zone0"), 3);
        assert_eq!(history.samples("thermal_zone0").collect::<Vec<_>>(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_zones_are_independent() {
        let mut history = ZoneHistory::new(2);
        let mut readings = ZoneReadings::new();
        readings.insert("a".to_string(), 10.0);
        readings.insert("b".to_string(), 20.0);
        history.record(&readings);
        readings.insert("a".to_string(), 11.0);
        history.record(&readings);

        assert_eq!(history.samples("a").collect::<Vec<_>>(), vec![10.0, 11.0]);
        assert_eq!(history.samples("b").collect::<Vec<_>>(), vec![20.0, 20.0]);
        assert_eq!(history.len("missing"), 0);
        assert_eq!(history.samples("missing").count(), 0);
    }

    #[test]
    fn test_zero_capacity_keeps_latest() {
        let mut history = ZoneHistory::new(0);
        history.push("z", 1.0);
        history.push("z", 2.0);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.samples("z").collect::<Vec<_>>(), vec![2.0]);
    }
}
