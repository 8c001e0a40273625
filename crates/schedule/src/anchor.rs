use std::fmt;

use chrono::{NaiveTime, Timelike};

/// Number of 10-minute slots in a 24-hour cycle.
pub const SLOTS_PER_DAY: u16 = 144;

/// Minutes per grid slot.
pub const SLOT_MINUTES: u16 = 10;

/// A point in the 24-hour cycle, aligned to the 10-minute grid.
///
/// Stored as an integer slot index (`hour * 6 + minute / 10`) so comparison
/// against quantized wall-clock times is exact. Fractional-hour values only
/// exist at the configuration boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorTime(u16);

impl AnchorTime {
    /// Build from a fractional-hour value as written in schedule files
    /// (e.g. `4.5` for 04:30). Must be a multiple of 1/6 in `[0, 24)`.
    pub fn from_hours(hours: f64) -> Option<Self> {
        if !hours.is_finite() {
            return None;
        }
        let slots = hours * 6.0;
        let rounded = slots.round();
        if (slots - rounded).abs() > 1e-9 {
            return None;
        }
        let slot = rounded as i64;
        if (0..i64::from(SLOTS_PER_DAY)).contains(&slot) {
            Some(Self(slot as u16))
        } else {
            None
        }
    }

    /// Quantize a wall-clock time down to the nearest grid point.
    ///
    /// Idempotent on grid-aligned times. Rounding down is what lets a driver
    /// that fires a few minutes late still land on the intended anchor.
    pub fn quantize(t: NaiveTime) -> Self {
        Self((t.hour() as u16) * 6 + (t.minute() as u16) / SLOT_MINUTES)
    }

    /// Slot index in `0..144`.
    pub fn slot(self) -> u16 {
        self.0
    }

    /// Fractional hours, the form used in schedule files.
    pub fn as_hours(self) -> f64 {
        f64::from(self.0) / 6.0
    }

    /// Minutes from `prev` forward to `self` around the 24-hour cycle.
    ///
    /// A zero raw gap means a full cycle: a single-anchor pattern looks back
    /// an entire day, not zero minutes.
    pub fn gap_minutes(self, prev: AnchorTime) -> u32 {
        let diff = (self.0 + SLOTS_PER_DAY - prev.0) % SLOTS_PER_DAY;
        let slots = if diff == 0 { SLOTS_PER_DAY } else { diff };
        u32::from(slots) * u32::from(SLOT_MINUTES)
    }
}

impl fmt::Display for AnchorTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = u32::from(self.0) * u32::from(SLOT_MINUTES);
        write!(f, "{:02}:{:02}", minutes / 60, minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn from_hours_on_grid() {
        assert_eq!(AnchorTime::from_hours(0.0).unwrap().slot(), 0);
        assert_eq!(AnchorTime::from_hours(4.5).unwrap().slot(), 27);
        assert_eq!(AnchorTime::from_hours(23.5).unwrap().slot(), 141);
        // 23:50, the last representable grid point
        assert_eq!(
            AnchorTime::from_hours(23.0 + 5.0 / 6.0).unwrap().slot(),
            143
        );
    }

    #[test]
    fn from_hours_rejects_off_grid() {
        assert!(AnchorTime::from_hours(0.25).is_none());
        assert!(AnchorTime::from_hours(10.01).is_none());
        assert!(AnchorTime::from_hours(-0.5).is_none());
        assert!(AnchorTime::from_hours(24.0).is_none());
        assert!(AnchorTime::from_hours(f64::NAN).is_none());
    }

    #[test]
    fn quantize_rounds_down() {
        assert_eq!(AnchorTime::quantize(at(0, 8)), AnchorTime::from_hours(0.0).unwrap());
        assert_eq!(AnchorTime::quantize(at(4, 36)), AnchorTime::from_hours(4.5).unwrap());
        assert_eq!(AnchorTime::quantize(at(23, 59)), AnchorTime::from_hours(23.0 + 5.0 / 6.0).unwrap());
    }

    #[test]
    fn quantize_is_idempotent_on_grid_points() {
        for slot in [0u16, 27, 60, 93, 141] {
            let anchor = AnchorTime(slot);
            let minutes = u32::from(slot) * 10;
            let t = at(minutes / 60, minutes % 60);
            assert_eq!(AnchorTime::quantize(t), anchor);
        }
    }

    #[test]
    fn gap_within_day() {
        let a = AnchorTime::from_hours(4.5).unwrap();
        let b = AnchorTime::from_hours(10.0).unwrap();
        assert_eq!(b.gap_minutes(a), 330);
    }

    #[test]
    fn gap_wraps_past_midnight() {
        let last = AnchorTime::from_hours(23.5).unwrap();
        let first = AnchorTime::from_hours(0.0).unwrap();
        assert_eq!(first.gap_minutes(last), 30);
    }

    #[test]
    fn gap_to_self_is_full_day() {
        let a = AnchorTime::from_hours(10.0).unwrap();
        assert_eq!(a.gap_minutes(a), 1440);
    }

    #[test]
    fn display_as_clock_time() {
        assert_eq!(AnchorTime::from_hours(4.5).unwrap().to_string(), "04:30");
        assert_eq!(AnchorTime::from_hours(0.0).unwrap().to_string(), "00:00");
    }
}
