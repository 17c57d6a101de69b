//! Pure policy rules. Every function here is deterministic: the current
//! time and all persisted facts are passed in by the caller, never read
//! ambiently.

pub mod attendance;
pub mod geofence;
pub mod leave;
pub mod reservation;
pub mod summary;
pub mod week;
