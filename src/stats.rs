use serde::Serialize;

use crate::table::CellValue;

/// Load-supply metrics for one feeder row, derived from its slot readings.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct FeederStats {
    /// Slots with a reading strictly above zero.
    #[serde(rename = "SUPPLY_Hrs")]
    pub supply_hrs: usize,
    #[serde(rename = "TOTAL_LOAD")]
    pub total_load: f64,
    /// Mean of the positive readings, zero when there are none.
    #[serde(rename = "AVRG_LOAD")]
    pub avrg_load: f64,
    /// Slots holding the outage marker.
    #[serde(skip)]
    pub marker_slots: usize,
}

impl FeederStats {
    pub fn from_slots(slots: &[CellValue]) -> Self {
        let mut s = FeederStats::default();

        for cell in slots {
            let load = cell.load();

            if load > 0.0 {
                s.supply_hrs += 1;
                s.total_load += load;
            }

            if cell.is_marker() {
                s.marker_slots += 1;
            }
        }

        s.avrg_load = Self::avg(s.total_load, s.supply_hrs);
        s
    }

    pub fn avg(total: f64, count: usize) -> f64 {
        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }
}
