use super::*;
use serde_json::json;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn tiktok_item() -> Value {
    json!({
        "authorMeta": {"name": "x", "followerCount": 1000},
        "webVideoUrl": "u",
        "createTime": 1_700_000_000,
        "text": "Hello. World",
        "playCount": 100,
        "diggCount": 10,
        "commentCount": 5,
        "shareCount": 1,
        "video": {"duration": 15}
    })
}

// ---------------------------------------------------------------------------
// TikTok
// ---------------------------------------------------------------------------

#[test]
fn tiktok_item_maps_all_fields() {
    let post = adapt(Platform::TikTok, &tiktok_item());

    assert_eq!(post.account_url, "https://www.tiktok.com/@x");
    assert_eq!(post.post_url, "u");
    assert_eq!(post.timestamp.to_string(), "2023-11-14T22:13:20Z");
    assert_eq!(post.hook, "Hello");
    assert_eq!(post.caption, "Hello. World");
    assert_eq!(post.caption_length, 2);
    assert_eq!(post.followers, 1000);
    assert_eq!(post.views, 100);
    assert_eq!(post.likes, 10);
    assert_eq!(post.comments, 5);
    assert_eq!(post.shares, 1);
    assert!(approx(post.duration, 15.0));
    assert!(approx(post.er_followers, 1.5));
    assert!(approx(post.er_likes_comments, 15.0));
    assert!(approx(post.er_shares, 1.0));
    assert!(post.analysis.is_none());
}

#[test]
fn tiktok_numeric_strings_are_accepted() {
    let item = json!({
        "authorMeta": {"name": "x", "followerCount": "2000"},
        "playCount": "400",
        "diggCount": "20",
        "commentCount": 20,
        "shareCount": "4"
    });
    let post = adapt(Platform::TikTok, &item);
    assert_eq!(post.followers, 2000);
    assert_eq!(post.views, 400);
    assert!(approx(post.er_followers, 2.0));
    assert!(approx(post.er_likes_comments, 10.0));
    assert!(approx(post.er_shares, 1.0));
}

#[test]
fn tiktok_missing_author_gives_empty_account_url() {
    let item = json!({"authorMeta": {"name": ""}, "text": "hi"});
    let post = adapt(Platform::TikTok, &item);
    assert_eq!(post.account_url, "");
}

// ---------------------------------------------------------------------------
// Instagram
// ---------------------------------------------------------------------------

#[test]
fn instagram_item_uses_follower_basis() {
    let item = json!({
        "username": "natgeo",
        "postUrl": "https://www.instagram.com/p/abc/",
        "timestamp": "2024-03-01T12:00:00.000Z",
        "text": "Wild. Life. Today",
        "likesCount": 300,
        "commentsCount": 100,
        "followersCount": 2000,
        "videoViewCount": 50_000
    });
    let post = adapt(Platform::Instagram, &item);

    assert_eq!(post.account_url, "https://www.instagram.com/natgeo");
    assert_eq!(post.post_url, "https://www.instagram.com/p/abc/");
    assert_eq!(post.timestamp.to_string(), "2024-03-01T12:00:00Z");
    assert_eq!(post.hook, "Wild");
    assert_eq!(post.caption_length, 3);
    assert_eq!(post.views, 0);
    assert_eq!(post.shares, 0);
    assert!(approx(post.duration, 0.0));
    assert!(approx(post.er_followers, 20.0));
    assert!(approx(post.er_likes_comments, 20.0));
    assert!(approx(post.er_shares, 0.0));
}

#[test]
fn instagram_zero_followers_gives_zero_rates() {
    let item = json!({
        "username": "natgeo",
        "likesCount": 300,
        "commentsCount": 100,
        "followersCount": 0
    });
    let post = adapt(Platform::Instagram, &item);
    assert!(approx(post.er_followers, 0.0));
    assert!(approx(post.er_likes_comments, 0.0));
}

// ---------------------------------------------------------------------------
// YouTube
// ---------------------------------------------------------------------------

#[test]
fn youtube_item_builds_urls_from_ids() {
    let item = json!({
        "channelId": "UC123",
        "videoId": "dQw4w9WgXcQ",
        "publishedAt": "2024-03-01T12:00:00Z",
        "description": "Never gonna give you up",
        "viewCount": 1000,
        "likeCount": 40,
        "commentCount": 10,
        "subscriberCount": 500,
        "duration": "0:58"
    });
    let post = adapt(Platform::YouTube, &item);

    assert_eq!(post.account_url, "https://www.youtube.com/channel/UC123");
    assert_eq!(post.post_url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    assert_eq!(post.hook, "Never gonna give you up");
    assert_eq!(post.caption_length, 5);
    assert_eq!(post.shares, 0);
    assert!(approx(post.duration, 58.0));
    assert!(approx(post.er_followers, 10.0));
    assert!(approx(post.er_likes_comments, 5.0));
    assert!(approx(post.er_shares, 0.0));
}

#[test]
fn youtube_missing_video_id_gives_empty_post_url() {
    let post = adapt(Platform::YouTube, &json!({"channelId": "UC123"}));
    assert_eq!(post.post_url, "");
    assert_eq!(post.account_url, "https://www.youtube.com/channel/UC123");
}

// ---------------------------------------------------------------------------
// Shared behaviour
// ---------------------------------------------------------------------------

#[test]
fn empty_item_yields_defaults_on_every_platform() {
    for platform in Platform::ALL {
        let post = adapt(platform, &json!({}));
        let value = serde_json::to_value(&post).unwrap();
        let object = value.as_object().unwrap();
        assert!(
            object.values().all(|v| !v.is_null()),
            "{platform}: null field in {value}"
        );
        assert_eq!(post.account_url, "");
        assert_eq!(post.hook, "");
        assert_eq!(post.caption_length, 0);
        assert_eq!(post.timestamp, PostTimestamp::Missing);
        assert_eq!(value["timestamp"], "");
    }
}

#[test]
fn null_and_wrong_typed_fields_fall_back() {
    let item = json!({
        "authorMeta": null,
        "webVideoUrl": null,
        "createTime": "not a time",
        "text": 42,
        "playCount": "lots",
        "diggCount": -3,
        "video": "short"
    });
    let post = adapt(Platform::TikTok, &item);
    assert_eq!(post.account_url, "");
    assert_eq!(post.post_url, "");
    assert_eq!(post.timestamp, PostTimestamp::Unparsed("not a time".to_string()));
    assert_eq!(post.caption, "42");
    assert_eq!(post.views, 0);
    assert_eq!(post.likes, 0);
    assert!(approx(post.duration, 0.0));
}

#[test]
fn caption_without_period_is_its_own_hook() {
    let item = json!({"text": "  spaced   out caption  "});
    let post = adapt(Platform::TikTok, &item);
    assert_eq!(post.hook, "  spaced   out caption  ");
    assert_eq!(post.caption_length, 3);
}

#[test]
fn adapt_all_skips_non_objects_and_keeps_order() {
    let items = vec![
        json!({"text": "first"}),
        json!("garbage"),
        json!(null),
        json!({"text": "second"}),
    ];
    let posts = adapt_all(Platform::TikTok, &items);
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].caption, "first");
    assert_eq!(posts[1].caption, "second");
}
