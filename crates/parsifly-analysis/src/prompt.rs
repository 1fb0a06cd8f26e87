//! Analyst prompt construction.

use std::fmt::Write as _;

use parsifly_core::Post;

use crate::types::ClassificationRequest;

/// Captions are cut to this many characters before prompting.
pub const MAX_CAPTION_CHARS: usize = 1000;

pub const SYSTEM_PROMPT: &str = "You are an expert social media analyst. Analyze the provided post data and return your analysis strictly in the requested JSON format.";

const INSTRUCTIONS: &str = r#"
Based on this data, please provide the following in JSON format:
1.  category: A relevant category for the post (e.g., Education, Humor, Fitness, Lifestyle, Travel, Technology, News, etc.). Use "N/A" if unclear.
2.  theme: A specific theme or topic within the category (e.g., "Motivation", "Tutorials", "Comedy Sketch", "Healthy Recipe", "Travel Vlog", "Product Review"). Use "N/A" if unclear.
3.  viralityScore: An estimated virality score between 0.0 and 1.0, considering the engagement metrics relative to views and followers. Higher scores indicate stronger virality potential.
4.  erRating: A qualitative engagement rating (LOW, AVERAGE, GOOD, BEST) based on the metrics and virality score.
5.  reasoning: A brief explanation (1-2 sentences) for the assigned category, theme, score, and rating.

Return ONLY the JSON object. Example:
{
  "category": "Fitness",
  "theme": "Workout Tutorial",
  "viralityScore": 0.65,
  "erRating": "GOOD",
  "reasoning": "High engagement relative to views suggests strong audience interest in the workout shown."
}
"#;

/// First [`MAX_CAPTION_CHARS`] characters of `caption`, on a char boundary.
#[must_use]
pub fn caption_snippet(caption: &str) -> &str {
    match caption.char_indices().nth(MAX_CAPTION_CHARS) {
        Some((byte_index, _)) => &caption[..byte_index],
        None => caption,
    }
}

/// Builds the classification prompt for `post`.
#[must_use]
pub fn build_request(post: &Post) -> ClassificationRequest {
    let mut user_prompt = String::from("\nAnalyze the following social media post data:\n\n");
    // Writing to a String cannot fail.
    let _ = write!(
        user_prompt,
        "Caption: \"{caption}\"\n\
         Views: {views}\n\
         Likes: {likes}\n\
         Comments: {comments}\n\
         Shares: {shares}\n\
         Duration (s): {duration}\n\
         Followers at time of post: {followers}\n\
         Engagement Rate (vs Followers): {er_followers:.2}%\n\
         Likes+Comments Rate: {er_likes_comments:.2}%\n\
         Share Rate (vs Views): {er_shares:.2}%\n",
        caption = caption_snippet(&post.caption),
        views = post.views,
        likes = post.likes,
        comments = post.comments,
        shares = post.shares,
        duration = post.duration,
        followers = post.followers,
        er_followers = post.er_followers,
        er_likes_comments = post.er_likes_comments,
        er_shares = post.er_shares,
    );
    user_prompt.push_str(INSTRUCTIONS);

    ClassificationRequest {
        system_prompt: SYSTEM_PROMPT.to_string(),
        user_prompt,
    }
}
