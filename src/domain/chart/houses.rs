//! House cusp table and house assignment.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::EngineError;

/// The 12 house cusps of a chart, in ecliptic order.
///
/// Cusp arcs may wrap past 360 (a cusp at 350 followed by one at 20 is an
/// ordinary 30-degree house). Construction rejects tables that cannot
/// partition the circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseTable {
    cusps: [f64; 12],
}

impl HouseTable {
    /// Builds a house table from cusp longitudes.
    ///
    /// Fails with [`EngineError::MalformedHouseTable`] when fewer than 12
    /// finite cusps are supplied, and with [`EngineError::CoincidentCusps`]
    /// when two consecutive cusps coincide (a zero-width house cannot
    /// contain anything).
    pub fn new(cusps: &[f64]) -> Result<Self, EngineError> {
        let usable: Vec<f64> = cusps
            .iter()
            .copied()
            .filter(|c| c.is_finite())
            .map(|c| c.rem_euclid(360.0))
            .collect();

        if usable.len() < 12 {
            return Err(EngineError::malformed_house_table(usable.len()));
        }

        let mut table = [0.0; 12];
        table.copy_from_slice(&usable[..12]);

        for i in 0..12 {
            let span = (table[(i + 1) % 12] - table[i]).rem_euclid(360.0);
            if span == 0.0 {
                return Err(EngineError::coincident_cusps((i + 1) as u8));
            }
        }

        Ok(Self { cusps: table })
    }

    /// Longitude of the cusp opening the given house.
    ///
    /// # Panics
    ///
    /// Panics when `house` is outside 1..=12.
    pub fn cusp(&self, house: u8) -> f64 {
        assert!(
            (1..=12).contains(&house),
            "house number out of range: {house}"
        );
        self.cusps[house as usize - 1]
    }

    /// All 12 cusps in ecliptic order.
    pub fn cusps(&self) -> &[f64; 12] {
        &self.cusps
    }

    /// Returns the house (1..=12) whose cusp-to-next-cusp arc contains the
    /// longitude.
    ///
    /// Walks the arcs in ecliptic order; a longitude exactly on a cusp
    /// belongs to the house that cusp opens.
    pub fn assign_house(&self, longitude: f64) -> u8 {
        let lon = longitude.rem_euclid(360.0);
        for i in 0..12 {
            let start = self.cusps[i];
            let end = self.cusps[(i + 1) % 12];
            let span = (end - start).rem_euclid(360.0);
            let offset = (lon - start).rem_euclid(360.0);
            if offset < span {
                return (i + 1) as u8;
            }
        }
        // Arcs of a validated table cover the circle; the first house is
        // only reachable here through float noise on an exact boundary.
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equal_houses(first_cusp: f64) -> HouseTable {
        let cusps: Vec<f64> = (0..12).map(|i| first_cusp + 30.0 * i as f64).collect();
        HouseTable::new(&cusps).unwrap()
    }

    #[test]
    fn assigns_houses_in_simple_table() {
        let table = equal_houses(0.0);
        assert_eq!(table.assign_house(0.0), 1);
        assert_eq!(table.assign_house(29.999), 1);
        assert_eq!(table.assign_house(30.0), 2);
        assert_eq!(table.assign_house(185.0), 7);
        assert_eq!(table.assign_house(359.9), 12);
    }

    #[test]
    fn handles_wrap_past_360() {
        // Ascendant at 350: first house spans 350..20.
        let table = equal_houses(350.0);
        assert_eq!(table.assign_house(355.0), 1);
        assert_eq!(table.assign_house(10.0), 1);
        assert_eq!(table.assign_house(20.0), 2);
        assert_eq!(table.assign_house(345.0), 12);
    }

    #[test]
    fn longitude_on_cusp_opens_that_house() {
        let table = equal_houses(15.0);
        assert_eq!(table.assign_house(45.0), 2);
        assert_eq!(table.assign_house(15.0), 1);
    }

    #[test]
    fn uneven_houses_are_respected() {
        // Quadrant-style table with houses of different widths.
        let cusps = [
            10.0, 42.0, 68.0, 100.0, 135.0, 160.0, 190.0, 222.0, 248.0, 280.0, 315.0, 340.0,
        ];
        let table = HouseTable::new(&cusps).unwrap();
        assert_eq!(table.assign_house(41.0), 1);
        assert_eq!(table.assign_house(42.0), 2);
        assert_eq!(table.assign_house(350.0), 12);
        assert_eq!(table.assign_house(5.0), 12);
    }

    #[test]
    fn rejects_short_tables() {
        let err = HouseTable::new(&[0.0, 30.0, 60.0]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::MalformedHouseTable { found: 3 }
        ));
    }

    #[test]
    fn rejects_non_finite_cusps() {
        let mut cusps = [0.0; 12];
        for (i, c) in cusps.iter_mut().enumerate() {
            *c = 30.0 * i as f64;
        }
        cusps[5] = f64::NAN;
        let err = HouseTable::new(&cusps).unwrap_err();
        assert!(matches!(
            err,
            EngineError::MalformedHouseTable { found: 11 }
        ));
    }

    #[test]
    fn rejects_coincident_cusps() {
        // Cusps 2 and 3 coincide, so house 2 has zero width.
        let cusps = [
            0.0, 30.0, 30.0, 90.0, 120.0, 150.0, 180.0, 210.0, 240.0, 270.0, 300.0, 330.0,
        ];
        let err = HouseTable::new(&cusps).unwrap_err();
        assert!(matches!(err, EngineError::CoincidentCusps { house: 2 }));
    }

    #[test]
    fn cusp_returns_each_house_opening() {
        let table = equal_houses(10.0);
        assert!((table.cusp(1) - 10.0).abs() < 1e-9);
        assert!((table.cusp(12) - 340.0).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "house number out of range")]
    fn cusp_rejects_house_zero() {
        equal_houses(0.0).cusp(0);
    }

    #[test]
    #[should_panic(expected = "house number out of range")]
    fn cusp_rejects_house_thirteen() {
        equal_houses(0.0).cusp(13);
    }

    #[test]
    fn cusps_normalize_into_circle() {
        let cusps: Vec<f64> = (0..12).map(|i| 370.0 + 30.0 * i as f64).collect();
        let table = HouseTable::new(&cusps).unwrap();
        assert!((table.cusp(1) - 10.0).abs() < 1e-9);
    }
}
