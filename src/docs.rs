use crate::api::attendance::{
    ClockInRequest, ClockOutRequest, WeeklyAlertResponse,
};
use crate::api::leave::{
    CreateBalance, CreateLeaveRequest, SetLeaveStatus, UpdateBalance,
};
use crate::api::location::CreateWorkLocation;
use crate::api::remote_schedule::{CreateRemoteSchedule, ReviewRemoteSchedule};
use crate::api::reservation::{CreateReservation, CreateResource, UpdateReservation};
use crate::model::attendance::{AttendanceLog, WorkMode};
use crate::model::leave::{LeaveBalance, LeaveRequest, LeaveStatus, LeaveType};
use crate::model::remote_schedule::{RemoteSchedule, RemoteStatus};
use crate::model::reservation::{Reservation, ReservationStatus};
use crate::model::resource::{Resource, ResourceType};
use crate::model::weekly_summary::WeeklySummary;
use crate::model::work_location::WorkLocation;
use crate::rules::leave::{LeaveReminder, ReminderLevel};
use crate::rules::summary::{AlertLevel, WeeklyAlert};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Workforce Attendance API",
        version = "1.0.0",
        description = r#"
## Workforce Attendance & Policy Engine

This API powers attendance, scheduling, and resource reservation for an
organization.

### Key Features
- **Attendance**
  - GPS-gated clock-in/out with ONSITE, REMOTE, and FIELD work modes
  - Weekly worked-time accumulation with 52-hour overtime alerts
- **Remote Work**
  - Request, approve, deny, and cancel remote-work days
- **Reservations**
  - Conflict-free booking of meeting rooms, Zoom accounts, and equipment
- **Leave**
  - Balance-backed leave requests with business-day accounting

### Response Format
- JSON-based RESTful responses
- Named error codes on every rejection

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::list_attendance,
        crate::api::attendance::get_weekly_summary,
        crate::api::attendance::weekly_alert,

        crate::api::reservation::create_reservation,
        crate::api::reservation::update_reservation,
        crate::api::reservation::list_reservations,
        crate::api::reservation::create_resource,
        crate::api::reservation::list_resources,

        crate::api::leave::create_balance,
        crate::api::leave::list_balances,
        crate::api::leave::update_balance,
        crate::api::leave::create_leave_request,
        crate::api::leave::list_leave_requests,
        crate::api::leave::get_leave_request,
        crate::api::leave::set_leave_status,
        crate::api::leave::leave_reminder,

        crate::api::location::create_location,
        crate::api::location::list_locations,
        crate::api::location::archive_location,

        crate::api::remote_schedule::create_schedule,
        crate::api::remote_schedule::review_schedule,
        crate::api::remote_schedule::cancel_schedule,
        crate::api::remote_schedule::list_schedules,

        crate::api::notification::pending_approvals
    ),
    components(
        schemas(
            WorkMode,
            AttendanceLog,
            ClockInRequest,
            ClockOutRequest,
            WeeklySummary,
            WeeklyAlert,
            AlertLevel,
            WeeklyAlertResponse,
            LeaveReminder,
            ReminderLevel,
            WorkLocation,
            CreateWorkLocation,
            RemoteSchedule,
            RemoteStatus,
            CreateRemoteSchedule,
            ReviewRemoteSchedule,
            Resource,
            ResourceType,
            CreateResource,
            Reservation,
            ReservationStatus,
            CreateReservation,
            UpdateReservation,
            LeaveBalance,
            LeaveRequest,
            LeaveStatus,
            LeaveType,
            CreateBalance,
            UpdateBalance,
            CreateLeaveRequest,
            SetLeaveStatus
        )
    ),
    tags(
        (name = "Attendance", description = "Clock-in/out and weekly summaries"),
        (name = "Remote", description = "Remote-work schedule approvals"),
        (name = "Reservations", description = "Resource booking APIs"),
        (name = "Leave", description = "Leave balances and requests"),
        (name = "Locations", description = "Geofenced work locations"),
        (name = "Notifications", description = "Alert computations"),
    )
)]
pub struct ApiDoc;
