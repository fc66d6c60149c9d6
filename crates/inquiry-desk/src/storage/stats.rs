//! Aggregate counts over the inquiry collection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::inquiry::{Inquiry, InquiryStatus};

/// Dashboard statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryStats {
    /// Number of stored inquiries.
    pub total_inquiries: usize,
    /// Inquiries with status `new`.
    pub new_inquiries: usize,
    /// Inquiries with status `active`.
    pub active_clients: usize,
    /// Inquiries with status `completed`.
    pub completed_clients: usize,
    /// Count of inquiries per distinct certification string.
    pub certification_breakdown: BTreeMap<String, usize>,
}

impl InquiryStats {
    /// Tally a collection.
    #[must_use]
    pub fn from_inquiries(inquiries: &[Inquiry]) -> Self {
        let mut stats = Self {
            total_inquiries: inquiries.len(),
            ..Self::default()
        };

        for inquiry in inquiries {
            match inquiry.status {
                InquiryStatus::New => stats.new_inquiries += 1,
                InquiryStatus::Active => stats.active_clients += 1,
                InquiryStatus::Completed => stats.completed_clients += 1,
                InquiryStatus::Other(_) => {}
            }
            *stats
                .certification_breakdown
                .entry(inquiry.certification.clone())
                .or_insert(0) += 1;
        }

        stats
    }
}
