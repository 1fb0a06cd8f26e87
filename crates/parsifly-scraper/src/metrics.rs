//! Engagement ratios derived from a post's raw counters.

use parsifly_core::EngagementBasis;

/// Raw counters an engagement calculation needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngagementCounts {
    pub followers: u64,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

/// Engagement percentages. Always finite and non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EngagementRates {
    pub er_followers: f64,
    pub er_likes_comments: f64,
    pub er_shares: f64,
}

/// Computes the three engagement rates for `counts`.
///
/// With [`EngagementBasis::Followers`] (Instagram, which exposes no view
/// count) the likes+comments rate is taken against followers and the share
/// rate is always zero.
#[must_use]
pub fn compute_engagement(counts: &EngagementCounts, basis: EngagementBasis) -> EngagementRates {
    let interactions = counts.likes.saturating_add(counts.comments);
    let er_followers = percent(interactions, counts.followers);

    match basis {
        EngagementBasis::Views => EngagementRates {
            er_followers,
            er_likes_comments: percent(interactions, counts.views),
            er_shares: percent(counts.shares, counts.views),
        },
        EngagementBasis::Followers => EngagementRates {
            er_followers,
            er_likes_comments: er_followers,
            er_shares: 0.0,
        },
    }
}

/// `numerator / denominator * 100`, or `0.0` when the denominator is zero.
#[allow(clippy::cast_precision_loss)]
fn percent(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64 * 100.0
}
