//! Week ranges and per-day activity statistics

use crate::core::error::{FetchError, ParseError, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::AddAssign;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Monday of the week containing `date`
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Parse a `YYYY-MM-DD` date, also accepting a full timestamp
pub fn parse_day(value: &str) -> Result<NaiveDate> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, DATE_FORMAT).map_err(|_| {
        ParseError::Date {
            value: value.to_string(),
        }
        .into()
    })
}

/// A Monday to Sunday week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekRange {
    start: NaiveDate,
}

impl WeekRange {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            start: start_of_week(date),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    pub fn days(&self) -> [NaiveDate; 7] {
        std::array::from_fn(|i| self.start + Duration::days(i as i64))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start..=self.end()).contains(&date)
    }

    /// The week `weeks` weeks later (earlier when negative)
    pub fn shift(&self, weeks: i64) -> Self {
        Self {
            start: self.start + Duration::weeks(weeks),
        }
    }

    pub fn next(&self) -> Self {
        self.shift(1)
    }

    pub fn previous(&self) -> Self {
        self.shift(-1)
    }

    /// Heading shown above the week, e.g. `June 2024`
    pub fn month_label(&self) -> String {
        self.start.format("%B %Y").to_string()
    }

    /// Query parameters of the weekly analytics request
    pub fn query_string(&self) -> String {
        format!(
            "startDate={}&endDate={}&groupBy=day",
            self.start.format(DATE_FORMAT),
            self.end().format(DATE_FORMAT)
        )
    }
}

/// Activity of a single day
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub posts: u64,
    pub likes: u64,
    pub comments: u64,
    pub registered_users: u64,
    pub campaigns_bought: u64,
    pub coins_bought: f64,
    pub total_payments: f64,
    pub spins: u64,
    pub notifications: u64,
}

impl AddAssign for DayStats {
    fn add_assign(&mut self, other: Self) {
        self.posts += other.posts;
        self.likes += other.likes;
        self.comments += other.comments;
        self.registered_users += other.registered_users;
        self.campaigns_bought += other.campaigns_bought;
        self.coins_bought += other.coins_bought;
        self.total_payments += other.total_payments;
        self.spins += other.spins;
        self.notifications += other.notifications;
    }
}

fn count(value: Option<f64>) -> u64 {
    value.filter(|v| *v > 0.0).map(|v| v as u64).unwrap_or(0)
}

#[derive(Debug, Default, Deserialize)]
struct Counter {
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    count: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CampaignCounter {
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    count: Option<f64>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    total_revenue: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpinCounter {
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    count: Option<f64>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    total_coins_won: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct NotificationCounter {
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    total: Option<f64>,
}

/// One entry of the weekly analytics response
#[derive(Debug, Deserialize)]
struct DayEntry {
    date: String,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    posts: Option<Counter>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    likes: Option<Counter>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    comments: Option<Counter>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    registrations: Option<Counter>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    campaigns: Option<CampaignCounter>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    spins: Option<SpinCounter>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    notifications: Option<NotificationCounter>,
}

impl DayEntry {
    fn stats(&self) -> DayStats {
        let counter = |c: &Option<Counter>| count(c.as_ref().and_then(|c| c.count));
        let campaigns = self.campaigns.as_ref();
        let spins = self.spins.as_ref();

        DayStats {
            posts: counter(&self.posts),
            likes: counter(&self.likes),
            comments: counter(&self.comments),
            registered_users: counter(&self.registrations),
            campaigns_bought: count(campaigns.and_then(|c| c.count)),
            coins_bought: spins.and_then(|s| s.total_coins_won).unwrap_or(0.0),
            total_payments: campaigns.and_then(|c| c.total_revenue).unwrap_or(0.0),
            spins: count(spins.and_then(|s| s.count)),
            notifications: count(self.notifications.as_ref().and_then(|n| n.total)),
        }
    }
}

/// Day statistics of one week, keyed by date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklyStats {
    days: BTreeMap<NaiveDate, DayStats>,
}

impl WeeklyStats {
    /// Decode the `data` array of the weekly analytics response
    ///
    /// Entries whose date cannot be read are skipped with a warning.
    pub fn from_entries(entries: &serde_json::Value) -> Result<Self> {
        let entries: Vec<DayEntry> = serde_json::from_value(entries.clone()).map_err(|e| {
            FetchError::Decode {
                url: "analytics response".to_string(),
                message: e.to_string(),
            }
        })?;

        let mut days = BTreeMap::new();
        for entry in entries {
            match parse_day(&entry.date) {
                Ok(day) => {
                    days.insert(day, entry.stats());
                }
                Err(e) => tracing::warn!(error = %e, "Skipping analytics entry"),
            }
        }
        Ok(Self { days })
    }

    /// Stats of `date`, `None` when the backend reported nothing for it
    pub fn get(&self, date: NaiveDate) -> Option<&DayStats> {
        self.days.get(&date)
    }

    /// One entry per day of `week`, zeroed where there is no data
    pub fn for_week(&self, week: &WeekRange) -> [(NaiveDate, DayStats); 7] {
        week.days()
            .map(|day| (day, self.days.get(&day).copied().unwrap_or_default()))
    }

    /// Sum over every reported day
    pub fn totals(&self) -> DayStats {
        self.days.values().fold(DayStats::default(), |mut total, day| {
            total += *day;
            total
        })
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    pub total_posts: Option<f64>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    pub total_registrations: Option<f64>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    pub total_campaigns: Option<f64>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    pub total_spins: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostActivity {
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    pub likes_count: Option<f64>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    pub comments_count: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpinActivity {
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    pub coins: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PurchasedPackage {
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_number")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignActivity {
    #[serde(default, deserialize_with = "crate::core::lenient::lenient")]
    pub purchased_package: Option<PurchasedPackage>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DailyActivity {
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_vec")]
    pub posts: Vec<PostActivity>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_vec")]
    pub spins: Vec<SpinActivity>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_vec")]
    pub campaigns: Vec<CampaignActivity>,
    #[serde(default, deserialize_with = "crate::core::lenient::lenient_vec")]
    pub registrations: Vec<serde_json::Value>,
}

/// Detailed activity of one day (`GET /api/date/<day>`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DailyDetails {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub summary: DailySummary,
    #[serde(default)]
    pub details: DailyActivity,
}

impl DailyDetails {
    pub fn day(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(|d| parse_day(d).ok())
    }

    /// Collapse the detail lists into day totals
    ///
    /// Comments only count when the summary reports posts for the day.
    /// Notifications are not part of the daily detail and stay at 0.
    pub fn to_day_stats(&self) -> DayStats {
        let summary = &self.summary;
        let posts = &self.details.posts;
        let has_posts = count(summary.total_posts) > 0;

        let likes: f64 = posts.iter().filter_map(|p| p.likes_count).sum();
        let comments: f64 = if has_posts {
            posts.iter().filter_map(|p| p.comments_count).sum()
        } else {
            0.0
        };

        DayStats {
            posts: count(summary.total_posts),
            likes: count(Some(likes)),
            comments: count(Some(comments)),
            registered_users: count(summary.total_registrations),
            campaigns_bought: count(summary.total_campaigns),
            coins_bought: self.details.spins.iter().filter_map(|s| s.coins).sum(),
            total_payments: self
                .details
                .campaigns
                .iter()
                .filter_map(|c| c.purchased_package.as_ref()?.price)
                .sum(),
            spins: count(summary.total_spins),
            notifications: 0,
        }
    }
}
