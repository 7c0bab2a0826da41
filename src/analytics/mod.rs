//! Weekly activity calendar
//!
//! The analytics backend reports per-day activity (posts, registrations,
//! campaign purchases, spins). [`calendar`] holds the week arithmetic and the
//! decoded day statistics; [`client`] fetches them.

pub mod calendar;
#[cfg(feature = "rest")]
pub mod client;

pub use calendar::{DailyDetails, DayStats, WeekRange, WeeklyStats, start_of_week};
#[cfg(feature = "rest")]
pub use client::AnalyticsClient;
