pub mod attendance;
pub mod leave;
pub mod remote_schedule;
pub mod reservation;
pub mod resource;
pub mod user;
pub mod weekly_summary;
pub mod work_location;
