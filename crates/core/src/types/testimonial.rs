//! Customer testimonials and their moderation states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TestimonialId;

/// Moderation state of a testimonial. Only approved entries are shown on
/// the public site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TestimonialStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for TestimonialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A customer testimonial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: TestimonialId,
    pub customer_name: String,
    pub content: String,
    /// Rating, 0 to 5.
    pub rating: f32,
    pub status: TestimonialStatus,
    pub created_at: DateTime<Utc>,
}
