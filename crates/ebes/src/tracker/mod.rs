//! Role-based dashboards over recruitment activity.
//!
//! Requests carry an `x-user-id` header that the router resolves into a
//! [`Principal`]; the service then scopes every read to what that user owns
//! or manages and feeds the records to the scoring engine.

pub mod domain;
pub mod memory;
pub mod params;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    Assignments, Client, LoginRequest, NewRoleRequest, Placement, Principal, RoleUpdate,
    SubmissionRequest, Team, User, UserRole, UserSummary,
};
pub use memory::InMemoryTrackerRepository;
pub use repository::{EntryFilter, RepositoryError, RoleFilter, StatusFilter, TrackerRepository};
pub use router::{tracker_router, USER_HEADER};
pub use service::{TrackerError, TrackerService};
