pub mod attendance;
pub mod leave;
pub mod location;
pub mod notification;
pub mod remote_schedule;
pub mod reservation;
