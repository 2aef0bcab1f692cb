use chrono::{DateTime, Datelike, Days, Duration, Utc};
use std::collections::HashSet;

use crate::models::availability::AvailabilitySlot;

/// Derives the concrete open booking instants for a counselor.
///
/// Pure function of its inputs: `slots` is the counselor's recurring weekly
/// availability in store order, `busy` the instants already held by a pending
/// or confirmed session, and `now` the explicit current time. Calling it
/// twice against unchanged stores yields identical output.
///
/// For each slot, each of the next `horizon_days` calendar days (today
/// included) whose weekday matches the slot is expanded into concrete
/// instants: the window is walked from its start in fixed `granularity`
/// increments, and an instant is yielded only when a full increment still
/// fits before the window's exclusive end. A window shorter than one
/// increment therefore yields nothing, and a trailing partial increment is
/// skipped. An instant is open when it lies strictly after `now` and is not
/// busy.
///
/// Output order is slot-major, then day ascending, then time ascending. No
/// global sort or dedup is applied: overlapping slots produce duplicate
/// instants, matching how the slots were authored.
pub fn resolve_open_slots(
    slots: &[AvailabilitySlot],
    busy: &HashSet<DateTime<Utc>>,
    now: DateTime<Utc>,
    horizon_days: u32,
    granularity: Duration,
) -> Vec<DateTime<Utc>> {
    debug_assert!(granularity > Duration::zero());

    let today = now.date_naive();
    let mut open = Vec::new();

    for slot in slots {
        for offset in 0..horizon_days {
            let date = match today.checked_add_days(Days::new(offset as u64)) {
                Some(d) => d,
                None => break,
            };
            if date.weekday().num_days_from_monday() as i16 != slot.day_of_week {
                continue;
            }

            let window_end = date.and_time(slot.end_time).and_utc();
            let mut t = date.and_time(slot.start_time).and_utc();
            while t + granularity <= window_end {
                if t > now && !busy.contains(&t) {
                    open.push(t);
                }
                t += granularity;
            }
        }
    }

    open
}

/// Returns whether some slot covers the given instant.
///
/// Coverage means the weekday matches and the time of day falls within the
/// half-open window `[start_time, end_time)`.
pub fn availability_covers(slots: &[AvailabilitySlot], at: DateTime<Utc>) -> bool {
    let weekday = at.weekday().num_days_from_monday() as i16;
    let time_of_day = at.time();
    slots
        .iter()
        .any(|s| s.day_of_week == weekday && s.start_time <= time_of_day && time_of_day < s.end_time)
}

/// Merges overlapping or touching same-day windows into single slots.
///
/// Off by default; enabled with the `MERGE_OVERLAPPING_SLOTS` flag for
/// deployments that want deduplicated resolver output. The result is sorted
/// by day then start time, and a merged window carries the id of its
/// earliest contributing slot.
pub fn merge_overlapping_slots(slots: &[AvailabilitySlot]) -> Vec<AvailabilitySlot> {
    let mut sorted: Vec<AvailabilitySlot> = slots.to_vec();
    sorted.sort_by_key(|s| (s.day_of_week, s.start_time, s.end_time));

    let mut merged: Vec<AvailabilitySlot> = Vec::with_capacity(sorted.len());
    for slot in sorted {
        if let Some(last) = merged.last_mut() {
            if last.day_of_week == slot.day_of_week && slot.start_time <= last.end_time {
                if slot.end_time > last.end_time {
                    last.end_time = slot.end_time;
                }
                continue;
            }
        }
        merged.push(slot);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone};
    use uuid::Uuid;

    fn slot(day_of_week: i16, start: (u32, u32), end: (u32, u32)) -> AvailabilitySlot {
        AvailabilitySlot {
            id: Uuid::new_v4(),
            counselor_id: Uuid::new_v4(),
            day_of_week,
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    // Friday 2025-01-03, noon. The following Monday is 2025-01-06.
    fn friday_noon() -> DateTime<Utc> {
        at(2025, 1, 3, 12, 0)
    }

    const HOUR: i64 = 60;

    #[test]
    fn resolved_instants_match_weekday_and_window() {
        let slots = vec![slot(0, (9, 0), (11, 0)), slot(3, (14, 0), (16, 0))];
        let open = resolve_open_slots(
            &slots,
            &HashSet::new(),
            friday_noon(),
            7,
            Duration::minutes(HOUR),
        );

        assert!(!open.is_empty());
        for t in &open {
            let covering = slots.iter().find(|s| {
                s.day_of_week == t.weekday().num_days_from_monday() as i16
            });
            let s = covering.expect("instant on a day with no slot");
            assert!(s.start_time <= t.time());
            assert!(t.time() < s.end_time);
        }
    }

    #[test]
    fn monday_slot_expands_to_hourly_instants() {
        let slots = vec![slot(0, (9, 0), (11, 0))];
        let open = resolve_open_slots(
            &slots,
            &HashSet::new(),
            friday_noon(),
            7,
            Duration::minutes(HOUR),
        );

        assert_eq!(open, vec![at(2025, 1, 6, 9, 0), at(2025, 1, 6, 10, 0)]);
    }

    #[test]
    fn busy_instants_are_excluded() {
        let slots = vec![slot(0, (9, 0), (11, 0))];
        let busy: HashSet<_> = [at(2025, 1, 6, 9, 0)].into_iter().collect();
        let open = resolve_open_slots(&slots, &busy, friday_noon(), 7, Duration::minutes(HOUR));

        assert_eq!(open, vec![at(2025, 1, 6, 10, 0)]);
    }

    #[test]
    fn instants_not_after_now_are_excluded() {
        // A Friday morning slot resolved on Friday noon: today's instants are
        // already past, and the next Friday falls outside a 7-day horizon.
        let slots = vec![slot(4, (9, 0), (11, 0))];
        let open = resolve_open_slots(
            &slots,
            &HashSet::new(),
            friday_noon(),
            7,
            Duration::minutes(HOUR),
        );
        assert!(open.is_empty());

        // A wider horizon reaches the next Friday.
        let open = resolve_open_slots(
            &slots,
            &HashSet::new(),
            friday_noon(),
            8,
            Duration::minutes(HOUR),
        );
        assert_eq!(open, vec![at(2025, 1, 10, 9, 0), at(2025, 1, 10, 10, 0)]);
    }

    #[test]
    fn resolution_is_idempotent() {
        let slots = vec![slot(0, (9, 0), (12, 0)), slot(2, (8, 0), (9, 0))];
        let busy: HashSet<_> = [at(2025, 1, 6, 10, 0)].into_iter().collect();

        let first = resolve_open_slots(&slots, &busy, friday_noon(), 7, Duration::minutes(HOUR));
        let second = resolve_open_slots(&slots, &busy, friday_noon(), 7, Duration::minutes(HOUR));
        assert_eq!(first, second);
    }

    #[test]
    fn overlapping_slots_yield_duplicate_instants() {
        let slots = vec![slot(0, (9, 0), (11, 0)), slot(0, (10, 0), (12, 0))];
        let open = resolve_open_slots(
            &slots,
            &HashSet::new(),
            friday_noon(),
            7,
            Duration::minutes(HOUR),
        );

        // Slot-major order, 10:00 appearing once per authored slot.
        assert_eq!(
            open,
            vec![
                at(2025, 1, 6, 9, 0),
                at(2025, 1, 6, 10, 0),
                at(2025, 1, 6, 10, 0),
                at(2025, 1, 6, 11, 0),
            ]
        );
    }

    #[test]
    fn window_end_is_exclusive() {
        let slots = vec![slot(0, (9, 0), (10, 0))];
        let open = resolve_open_slots(
            &slots,
            &HashSet::new(),
            friday_noon(),
            7,
            Duration::minutes(HOUR),
        );

        assert_eq!(open, vec![at(2025, 1, 6, 9, 0)]);
    }

    #[test]
    fn window_shorter_than_granularity_yields_nothing() {
        let slots = vec![slot(0, (9, 0), (9, 30))];
        let open = resolve_open_slots(
            &slots,
            &HashSet::new(),
            friday_noon(),
            7,
            Duration::minutes(HOUR),
        );
        assert!(open.is_empty());
    }

    #[test]
    fn trailing_partial_increment_is_skipped() {
        let slots = vec![slot(0, (9, 0), (10, 30))];
        let open = resolve_open_slots(
            &slots,
            &HashSet::new(),
            friday_noon(),
            7,
            Duration::minutes(HOUR),
        );

        // 10:00 would leave only half an increment before the window ends.
        assert_eq!(open, vec![at(2025, 1, 6, 9, 0)]);
    }

    #[test]
    fn granularity_is_configurable() {
        let slots = vec![slot(0, (9, 0), (10, 0))];
        let open = resolve_open_slots(
            &slots,
            &HashSet::new(),
            friday_noon(),
            7,
            Duration::minutes(30),
        );

        assert_eq!(open, vec![at(2025, 1, 6, 9, 0), at(2025, 1, 6, 9, 30)]);
    }

    #[test]
    fn output_follows_store_order_not_chronological_order() {
        // Wednesday slot listed before the Monday slot: output keeps store
        // order rather than sorting globally by time.
        let slots = vec![slot(2, (9, 0), (10, 0)), slot(0, (9, 0), (10, 0))];
        let open = resolve_open_slots(
            &slots,
            &HashSet::new(),
            friday_noon(),
            7,
            Duration::minutes(HOUR),
        );

        assert_eq!(open, vec![at(2025, 1, 8, 9, 0), at(2025, 1, 6, 9, 0)]);
    }

    #[test]
    fn covers_inside_window_and_rejects_boundary_end() {
        let slots = vec![slot(0, (9, 0), (10, 0))];

        assert!(availability_covers(&slots, at(2025, 1, 6, 9, 0)));
        assert!(availability_covers(&slots, at(2025, 1, 6, 9, 59)));
        // end_time is exclusive.
        assert!(!availability_covers(&slots, at(2025, 1, 6, 10, 0)));
        // Same time on the wrong weekday.
        assert!(!availability_covers(&slots, at(2025, 1, 7, 9, 0)));
    }

    #[test]
    fn merge_joins_overlapping_and_touching_windows() {
        let slots = vec![
            slot(0, (9, 0), (11, 0)),
            slot(0, (10, 0), (12, 0)),
            slot(0, (12, 0), (13, 0)),
            slot(1, (9, 0), (10, 0)),
        ];
        let merged = merge_overlapping_slots(&slots);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].day_of_week, 0);
        assert_eq!(merged[0].start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(merged[0].end_time, NaiveTime::from_hms_opt(13, 0, 0).unwrap());
        assert_eq!(merged[1].day_of_week, 1);
    }

    #[test]
    fn merge_leaves_disjoint_windows_alone() {
        let slots = vec![slot(0, (9, 0), (10, 0)), slot(0, (11, 0), (12, 0))];
        let merged = merge_overlapping_slots(&slots);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn merged_slots_deduplicate_resolver_output() {
        let slots = vec![slot(0, (9, 0), (11, 0)), slot(0, (10, 0), (12, 0))];
        let merged = merge_overlapping_slots(&slots);
        let open = resolve_open_slots(
            &merged,
            &HashSet::new(),
            friday_noon(),
            7,
            Duration::minutes(HOUR),
        );

        assert_eq!(
            open,
            vec![at(2025, 1, 6, 9, 0), at(2025, 1, 6, 10, 0), at(2025, 1, 6, 11, 0)]
        );
    }
}
