//! Data models for GreenRide platform entities.
//!
//! Everything the console renders deserializes into one of these:
//!
//! - `AdminIdentity`: the signed-in operations admin, with role and permissions
//! - `Ride`: ride records with status and fare details
//! - `Driver`: fleet drivers with availability status and ratings
//! - `FeedbackEntry`: rider feedback with star ratings
//! - `RevenuePoint`: daily revenue rollups

pub mod driver;
pub mod feedback;
pub mod identity;
pub mod ride;
pub mod revenue;

pub use driver::{Driver, DriverStatus};
pub use feedback::FeedbackEntry;
pub use identity::{AdminIdentity, AdminRole, Permission};
pub use ride::{Ride, RideStatus};
pub use revenue::RevenuePoint;
