use chrono::{DateTime, Utc};

use crate::error::PolicyReason;
use crate::model::reservation::Reservation;

/// A reservation interval must be non-empty: `starts_at < ends_at`.
pub fn validate_interval(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> Result<(), PolicyReason> {
    if starts_at >= ends_at {
        return Err(PolicyReason::InvalidInterval);
    }
    Ok(())
}

/// Standard half-open interval overlap: [a_start, a_end) and
/// [b_start, b_end) overlap iff a_start < b_end && b_start < a_end.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// First existing pending/confirmed reservation whose interval overlaps the
/// requested slot. Cancelled rows never block.
pub fn find_conflict<'a>(
    existing: &'a [Reservation],
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> Option<&'a Reservation> {
    existing
        .iter()
        .filter(|r| r.blocks_slot())
        .find(|r| overlaps(starts_at, ends_at, r.starts_at, r.ends_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, hour, minute, 0).unwrap()
    }

    fn reservation(starts: DateTime<Utc>, ends: DateTime<Utc>, status: &str) -> Reservation {
        Reservation {
            id: "res-1".into(),
            resource_id: "room-1".into(),
            organizer_id: "user-1".into(),
            starts_at: starts,
            ends_at: ends,
            status: status.into(),
            agenda: None,
            attendees: "[]".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_and_inverted_intervals_rejected() {
        assert_eq!(
            validate_interval(at(14, 0), at(14, 0)),
            Err(PolicyReason::InvalidInterval)
        );
        assert_eq!(
            validate_interval(at(15, 0), at(14, 0)),
            Err(PolicyReason::InvalidInterval)
        );
        assert_eq!(validate_interval(at(14, 0), at(15, 0)), Ok(()));
    }

    #[test]
    fn overlapping_slot_conflicts() {
        let existing = vec![reservation(at(14, 0), at(15, 0), "confirmed")];
        assert!(find_conflict(&existing, at(14, 30), at(15, 30)).is_some());
    }

    #[test]
    fn back_to_back_slots_do_not_conflict() {
        let existing = vec![reservation(at(14, 0), at(15, 0), "confirmed")];
        assert!(find_conflict(&existing, at(15, 0), at(16, 0)).is_none());
        assert!(find_conflict(&existing, at(13, 0), at(14, 0)).is_none());
    }

    #[test]
    fn containment_conflicts_both_ways() {
        let existing = vec![reservation(at(14, 0), at(15, 0), "pending")];
        assert!(find_conflict(&existing, at(14, 15), at(14, 45)).is_some());
        assert!(find_conflict(&existing, at(13, 0), at(16, 0)).is_some());
    }

    #[test]
    fn cancelled_reservations_free_the_slot() {
        let existing = vec![reservation(at(14, 0), at(15, 0), "cancelled")];
        assert!(find_conflict(&existing, at(14, 0), at(15, 0)).is_none());
    }

    #[test]
    fn reactivating_a_cancelled_slot_conflicts_with_its_rebooking() {
        // A booking is cancelled, which frees its slot for someone else.
        let cancelled = reservation(at(14, 0), at(15, 0), "cancelled");
        assert!(find_conflict(&[cancelled], at(14, 0), at(15, 0)).is_none());

        // Once the slot is rebooked, checking the original interval against
        // the active set again must report a conflict, so the cancelled
        // reservation cannot quietly come back to life.
        let rebooked = vec![reservation(at(14, 0), at(15, 0), "pending")];
        assert!(find_conflict(&rebooked, at(14, 0), at(15, 0)).is_some());
    }

    #[test]
    fn pending_reservations_block_like_confirmed() {
        let existing = vec![reservation(at(14, 0), at(15, 0), "pending")];
        assert!(find_conflict(&existing, at(14, 59), at(16, 0)).is_some());
    }
}
