use crate::error::PolicyReason;
use crate::model::attendance::WorkMode;
use crate::model::work_location::WorkLocation;

use super::geofence::{self, Coordinates};

/// Facts gathered from persisted state for one clock-in attempt, assembled by
/// the handler so the decision itself stays pure.
pub struct ClockInFacts<'a> {
    /// An open attendance log already exists for this user today.
    pub already_clocked_in: bool,
    /// Coordinates supplied with the request, if any.
    pub coordinates: Option<Coordinates>,
    /// Whether the request named a work location at all.
    pub location_id_given: bool,
    /// The referenced location, when the id resolved to a non-archived row.
    pub location: Option<&'a WorkLocation>,
    /// An approved, non-archived remote schedule exists for this user today.
    pub remote_approved: bool,
}

/// Decides whether a clock-in is allowed and, if so, whether the resulting
/// log is `verified`. ONSITE requires geofence containment, REMOTE requires
/// an approved schedule, FIELD is always accepted unverified.
pub fn authorize_clock_in(mode: WorkMode, facts: &ClockInFacts) -> Result<bool, PolicyReason> {
    if facts.already_clocked_in {
        return Err(PolicyReason::AlreadyClockedIn);
    }

    match mode {
        WorkMode::Onsite => {
            if !facts.location_id_given {
                return Err(PolicyReason::LocationDataRequired);
            }
            let point = facts
                .coordinates
                .ok_or(PolicyReason::LocationDataRequired)?;
            // An id that resolves to no usable location never verifies.
            let location = facts
                .location
                .ok_or(PolicyReason::LocationVerificationFailed)?;
            let center = Coordinates {
                latitude: location.latitude,
                longitude: location.longitude,
            };
            if !geofence::within_radius(point, center, location.radius_meters) {
                return Err(PolicyReason::LocationVerificationFailed);
            }
            Ok(true)
        }
        WorkMode::Remote => {
            if facts.remote_approved {
                Ok(true)
            } else {
                Err(PolicyReason::RemoteNotApproved)
            }
        }
        WorkMode::Field => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn hq() -> WorkLocation {
        WorkLocation {
            id: "loc-1".into(),
            name: "Seoul HQ".into(),
            latitude: 37.5665,
            longitude: 126.9780,
            radius_meters: 100.0,
            allowed_modes: "[\"ONSITE\"]".into(),
            archived: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn base_facts(location: Option<&WorkLocation>) -> ClockInFacts<'_> {
        ClockInFacts {
            already_clocked_in: false,
            coordinates: None,
            location_id_given: location.is_some(),
            location,
            remote_approved: false,
        }
    }

    #[test]
    fn open_log_rejects_any_mode() {
        for mode in [WorkMode::Onsite, WorkMode::Remote, WorkMode::Field] {
            let mut facts = base_facts(None);
            facts.already_clocked_in = true;
            assert_eq!(
                authorize_clock_in(mode, &facts),
                Err(PolicyReason::AlreadyClockedIn)
            );
        }
    }

    #[test]
    fn onsite_within_fence_is_verified() {
        let loc = hq();
        let mut facts = base_facts(Some(&loc));
        facts.coordinates = Some(Coordinates {
            latitude: 37.5665 + 0.00045, // ~50 m away
            longitude: 126.9780,
        });
        assert_eq!(authorize_clock_in(WorkMode::Onsite, &facts), Ok(true));
    }

    #[test]
    fn onsite_outside_fence_fails_verification() {
        let loc = hq();
        let mut facts = base_facts(Some(&loc));
        facts.coordinates = Some(Coordinates {
            latitude: 37.5665 + 0.0045, // ~500 m away
            longitude: 126.9780,
        });
        assert_eq!(
            authorize_clock_in(WorkMode::Onsite, &facts),
            Err(PolicyReason::LocationVerificationFailed)
        );
    }

    #[test]
    fn onsite_without_coordinates_needs_location_data() {
        let loc = hq();
        let facts = base_facts(Some(&loc));
        assert_eq!(
            authorize_clock_in(WorkMode::Onsite, &facts),
            Err(PolicyReason::LocationDataRequired)
        );
    }

    #[test]
    fn onsite_without_location_id_needs_location_data() {
        let mut facts = base_facts(None);
        facts.coordinates = Some(Coordinates {
            latitude: 37.5665,
            longitude: 126.9780,
        });
        assert_eq!(
            authorize_clock_in(WorkMode::Onsite, &facts),
            Err(PolicyReason::LocationDataRequired)
        );
    }

    #[test]
    fn onsite_with_unresolved_location_fails_verification() {
        let mut facts = base_facts(None);
        facts.location_id_given = true;
        facts.coordinates = Some(Coordinates {
            latitude: 37.5665,
            longitude: 126.9780,
        });
        assert_eq!(
            authorize_clock_in(WorkMode::Onsite, &facts),
            Err(PolicyReason::LocationVerificationFailed)
        );
    }

    #[test]
    fn remote_requires_approved_schedule() {
        let facts = base_facts(None);
        assert_eq!(
            authorize_clock_in(WorkMode::Remote, &facts),
            Err(PolicyReason::RemoteNotApproved)
        );

        let mut approved = base_facts(None);
        approved.remote_approved = true;
        assert_eq!(authorize_clock_in(WorkMode::Remote, &approved), Ok(true));
    }

    #[test]
    fn field_is_always_accepted_unverified() {
        let facts = base_facts(None);
        assert_eq!(authorize_clock_in(WorkMode::Field, &facts), Ok(false));
    }
}
