use chrono::NaiveDateTime;

use crate::anchor::AnchorTime;

/// Outcome of checking a pattern's anchors against "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub triggered: bool,
    pub lookback_minutes: u32,
}

impl Trigger {
    /// The normal "not a trigger instant" outcome. Not an error.
    pub const MISS: Trigger = Trigger {
        triggered: false,
        lookback_minutes: 0,
    };
}

/// Decide whether `now` is a trigger instant for the given anchor set.
///
/// `now` is quantized down to the 10-minute grid before comparison, so a
/// driver that fires a few minutes late still lands on the intended anchor.
/// On a hit, the look-back spans the circular gap since the previous anchor,
/// wrapping across midnight when the hit is the first anchor of the day.
/// The gap rule means no interval is skipped or double-counted as anchors
/// are added to or removed from a pattern.
///
/// `anchors` must be ascending and unique (normalized at config load).
pub fn evaluate(now: NaiveDateTime, anchors: &[AnchorTime]) -> Trigger {
    let quantized = AnchorTime::quantize(now.time());
    let Ok(idx) = anchors.binary_search(&quantized) else {
        return Trigger::MISS;
    };
    let prev = anchors[(idx + anchors.len() - 1) % anchors.len()];
    Trigger {
        triggered: true,
        lookback_minutes: quantized.gap_minutes(prev),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn anchors(hours: &[f64]) -> Vec<AnchorTime> {
        let mut anchors: Vec<AnchorTime> = hours
            .iter()
            .map(|&h| AnchorTime::from_hours(h).unwrap())
            .collect();
        anchors.sort_unstable();
        anchors
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 4, 19)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn reference_anchor_set() {
        let anchors = anchors(&[0.0, 4.5, 10.0, 15.5, 23.5]);
        let cases = [
            (at(0, 8, 0), 30),
            (at(4, 36, 0), 270),
            (at(10, 6, 59), 330),
            (at(15, 39, 0), 330),
            (at(23, 37, 0), 480),
        ];
        for (now, expected) in cases {
            let trigger = evaluate(now, &anchors);
            assert!(trigger.triggered, "expected trigger at {now}");
            assert_eq!(trigger.lookback_minutes, expected, "at {now}");
        }
    }

    #[test]
    fn off_anchor_time_is_a_miss() {
        let anchors = anchors(&[0.0, 4.5, 10.0, 15.5, 23.5]);
        // 00:37 quantizes to 00:30, which is not an anchor.
        assert_eq!(evaluate(at(0, 37, 0), &anchors), Trigger::MISS);
        assert_eq!(evaluate(at(12, 0, 0), &anchors), Trigger::MISS);
    }

    #[test]
    fn single_anchor_looks_back_a_full_day() {
        let anchors = anchors(&[9.0]);
        let trigger = evaluate(at(9, 3, 0), &anchors);
        assert!(trigger.triggered);
        assert_eq!(trigger.lookback_minutes, 1440);
    }

    #[test]
    fn lookback_matches_circular_gap_at_every_anchor() {
        let hours = [0.0, 4.5, 10.0, 15.5, 23.5];
        let anchors = anchors(&hours);
        for (i, anchor) in anchors.iter().enumerate() {
            let prev = anchors[(i + anchors.len() - 1) % anchors.len()];
            let minutes = u32::from(anchor.slot()) * 10;
            let now = at(minutes / 60, minutes % 60, 0);
            let trigger = evaluate(now, &anchors);
            assert!(trigger.triggered);
            assert_eq!(trigger.lookback_minutes, anchor.gap_minutes(prev));
        }
    }

    #[test]
    fn jitter_within_the_slot_still_triggers() {
        let anchors = anchors(&[4.5]);
        for minute in 30..40 {
            let trigger = evaluate(at(4, minute, 11), &anchors);
            assert!(trigger.triggered, "04:{minute:02} should land on 04:30");
            assert_eq!(trigger.lookback_minutes, 1440);
        }
        assert!(!evaluate(at(4, 40, 0), &anchors).triggered);
        assert!(!evaluate(at(4, 29, 59), &anchors).triggered);
    }
}
