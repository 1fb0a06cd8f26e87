//! Normalization from raw platform dataset items to [`parsifly_core::Post`].
//!
//! Each platform has one extractor that reads its own field names into a
//! [`RawPostFields`]; [`build_post`] then derives the fields every platform
//! shares (hook, caption length, engagement rates, timestamp).

use parsifly_core::{Platform, Post, PostTimestamp};
use serde_json::Value;

use crate::fields::{count_at, lookup, seconds_at, string_at};
use crate::metrics::{compute_engagement, EngagementCounts};
use crate::timestamp::normalize_timestamp;

/// Platform-neutral values pulled out of one raw item.
#[derive(Debug, Default)]
struct RawPostFields {
    account_url: String,
    post_url: String,
    timestamp: PostTimestamp,
    caption: String,
    counts: EngagementCounts,
    duration: f64,
}

/// Maps one raw dataset item to a canonical [`Post`]. Never fails: missing or
/// malformed fields fall back to empty strings and zeros.
#[must_use]
pub fn adapt(platform: Platform, item: &Value) -> Post {
    let fields = match platform {
        Platform::TikTok => extract_tiktok(item),
        Platform::Instagram => extract_instagram(item),
        Platform::YouTube => extract_youtube(item),
    };
    build_post(platform, fields)
}

/// Maps a whole dataset, skipping items that are not JSON objects.
#[must_use]
pub fn adapt_all(platform: Platform, items: &[Value]) -> Vec<Post> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            if item.is_object() {
                Some(adapt(platform, item))
            } else {
                tracing::warn!(%platform, index, "skipping non-object dataset item");
                None
            }
        })
        .collect()
}

fn extract_tiktok(item: &Value) -> RawPostFields {
    RawPostFields {
        account_url: prefixed_url("https://www.tiktok.com/@", &string_at(item, "authorMeta.name")),
        post_url: string_at(item, "webVideoUrl").trim().to_string(),
        timestamp: normalize_timestamp(lookup(item, "createTime")),
        caption: string_at(item, "text"),
        counts: EngagementCounts {
            followers: count_at(item, "authorMeta.followerCount"),
            views: count_at(item, "playCount"),
            likes: count_at(item, "diggCount"),
            comments: count_at(item, "commentCount"),
            shares: count_at(item, "shareCount"),
        },
        duration: seconds_at(item, "video.duration"),
    }
}

fn extract_instagram(item: &Value) -> RawPostFields {
    RawPostFields {
        account_url: prefixed_url("https://www.instagram.com/", &string_at(item, "username")),
        post_url: string_at(item, "postUrl").trim().to_string(),
        timestamp: normalize_timestamp(lookup(item, "timestamp")),
        caption: string_at(item, "text"),
        counts: EngagementCounts {
            followers: count_at(item, "followersCount"),
            likes: count_at(item, "likesCount"),
            comments: count_at(item, "commentsCount"),
            ..EngagementCounts::default()
        },
        duration: 0.0,
    }
}

fn extract_youtube(item: &Value) -> RawPostFields {
    RawPostFields {
        account_url: prefixed_url(
            "https://www.youtube.com/channel/",
            &string_at(item, "channelId"),
        ),
        post_url: prefixed_url("https://www.youtube.com/watch?v=", &string_at(item, "videoId")),
        timestamp: normalize_timestamp(lookup(item, "publishedAt")),
        caption: string_at(item, "description"),
        counts: EngagementCounts {
            followers: count_at(item, "subscriberCount"),
            views: count_at(item, "viewCount"),
            likes: count_at(item, "likeCount"),
            comments: count_at(item, "commentCount"),
            shares: 0,
        },
        duration: seconds_at(item, "duration"),
    }
}

/// `prefix + id`, or `""` when the id is blank.
fn prefixed_url(prefix: &str, id: &str) -> String {
    let id = id.trim();
    if id.is_empty() {
        String::new()
    } else {
        format!("{prefix}{id}")
    }
}

/// Text before the first `.` of the caption.
fn hook_of(caption: &str) -> String {
    caption.split('.').next().unwrap_or_default().to_string()
}

fn build_post(platform: Platform, fields: RawPostFields) -> Post {
    let rates = compute_engagement(&fields.counts, platform.engagement_basis());
    Post {
        account_url: fields.account_url,
        post_url: fields.post_url,
        timestamp: fields.timestamp,
        hook: hook_of(&fields.caption),
        caption_length: fields.caption.split_whitespace().count(),
        caption: fields.caption,
        followers: fields.counts.followers,
        views: fields.counts.views,
        likes: fields.counts.likes,
        comments: fields.counts.comments,
        shares: fields.counts.shares,
        duration: fields.duration,
        er_followers: rates.er_followers,
        er_likes_comments: rates.er_likes_comments,
        er_shares: rates.er_shares,
        analysis: None,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
