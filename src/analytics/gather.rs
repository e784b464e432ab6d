use std::time::Duration;

use serde::Deserialize;

use crate::config::AnalyticsConfig;
use crate::leetcode::{bounded, LeetCodeProvider, ProviderError, Submission};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    #[default]
    Standard,
    Enhanced,
}

impl FetchMode {
    pub fn from_flag(enhanced: bool) -> Self {
        if enhanced {
            FetchMode::Enhanced
        } else {
            FetchMode::Standard
        }
    }

    pub fn is_enhanced(self) -> bool {
        self == FetchMode::Enhanced
    }

    pub fn submission_limit(self, config: &AnalyticsConfig) -> usize {
        match self {
            FetchMode::Standard => config.standard_submission_limit,
            FetchMode::Enhanced => config.enhanced_submission_limit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatheredSubmissions {
    pub mode: FetchMode,
    /// Newest first.
    pub submissions: Vec<Submission>,
    /// Lifetime submission count from the profile; only looked up in
    /// enhanced mode and `None` when that lookup failed.
    pub profile_total: Option<u64>,
}

impl GatheredSubmissions {
    /// Share of the lifetime submissions that made it into the window.
    pub fn coverage_percent(&self) -> Option<u32> {
        self.profile_total
            .map(|total| super::percent(self.submissions.len() as u64, total).min(100))
    }
}

/// Collects the submission window for `username`.
///
/// The recent-submissions call is mandatory and its failure is returned as
/// is. In enhanced mode the profile is fetched alongside it for context only;
/// any failure there degrades to `profile_total: None`.
pub async fn gather(
    provider: &dyn LeetCodeProvider,
    username: &str,
    mode: FetchMode,
    config: &AnalyticsConfig,
    call_timeout: Duration,
) -> Result<GatheredSubmissions, ProviderError> {
    let limit = mode.submission_limit(config);

    let (mut submissions, profile_total) = match mode {
        FetchMode::Standard => {
            let submissions =
                bounded(call_timeout, provider.recent_submissions(username, limit)).await?;
            (submissions, None)
        }
        FetchMode::Enhanced => {
            let (recent, profile) = tokio::join!(
                bounded(call_timeout, provider.recent_submissions(username, limit)),
                bounded(call_timeout, provider.user_profile(username)),
            );
            let submissions = recent?;
            let profile_total = match profile {
                Ok(profile) => Some(profile.submissions("All")).filter(|&total| total > 0),
                Err(e) => {
                    tracing::info!(username, error = %e, "Submission total unavailable, continuing without it");
                    None
                }
            };
            (submissions, profile_total)
        }
    };

    // Stable: equal timestamps keep the provider's order.
    submissions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let gathered = GatheredSubmissions {
        mode,
        submissions,
        profile_total,
    };

    match gathered.coverage_percent() {
        Some(coverage) => tracing::info!(
            username,
            fetched = gathered.submissions.len(),
            lifetime = ?gathered.profile_total,
            coverage,
            "Gathered submissions"
        ),
        None => tracing::info!(
            username,
            fetched = gathered.submissions.len(),
            ?mode,
            "Gathered submissions"
        ),
    }

    Ok(gathered)
}
