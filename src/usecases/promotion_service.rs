//! Promotion: per-platform posts for an upcoming event, plus hashtag ideas.

use crate::domain::{
    DomainError, HashtagRequest, HashtagSuggestions, SocialPostRequest, SocialPostSet,
};
use crate::ports::LlmPort;
use crate::usecases::generator::StructuredPrompt;
use std::sync::Arc;
use tracing::{info, warn};

/// Upper bound on suggested hashtags.
pub const MAX_HASHTAGS: usize = 10;

pub const SOCIAL_POSTS_PROMPT: &str = r#"You are a social media expert tasked with generating engaging posts for events.

Given the following event details, create tailored social media posts for each of the specified platforms.
The posts should be optimized for each platform, using appropriate formatting, emojis, and hashtags.

Event Title: {{title}}
Description: {{description}}
Date: {{date}}
Time: {{time}}
Target Audience: {{targetAudience}}
Tone: {{tone}}
Platforms: {{platforms}}
Hashtags: {{hashtags}}

The output should be a JSON object where the keys are the platform names and the values are the generated social media posts.
Example:
{
  "linkedin": "Join us for an exciting event! [Event Title] on [Date] at [Time]. [Description] #Event #Networking",
  "x": "[Event Title] - [Date] [Time]! [Description] #Event #[RelevantHashtag]",
  "instagram": "📣 Announcing: [Event Title]! 📍 [Date], [Time]. [Description] #Event #[RelevantHashtag]",
  "facebook": "We're excited to announce [Event Title]! Happening on [Date] at [Time]. [Description] #Event #Community",
  "threads": "[Event Title] - [Date] [Time] - [Description] #Event #[RelevantHashtag]"
}"#;

pub const HASHTAGS_PROMPT: &str = r#"You are a social media expert. Generate relevant and trending hashtags based on the following event details to maximize visibility and reach.

Event Title: {{eventTitle}}
Event Description: {{eventDescription}}
Target Audience: {{targetAudience}}
Tone: {{tone}}

Return only the list of hashtags, with no other text. Include both general and trending hashtags. Limit the list to a maximum of 10 hashtags."#;

pub struct PromotionService {
    llm: Arc<dyn LlmPort>,
    posts_prompt: StructuredPrompt<SocialPostRequest, SocialPostSet>,
    hashtags_prompt: StructuredPrompt<HashtagRequest, HashtagSuggestions>,
}

impl PromotionService {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self {
            llm,
            posts_prompt: StructuredPrompt::new("generateSocialMediaPostsPrompt", SOCIAL_POSTS_PROMPT),
            hashtags_prompt: StructuredPrompt::new("suggestHashtagsPrompt", HASHTAGS_PROMPT),
        }
    }

    /// Generate one post per requested platform. The model decides the final
    /// key set; gaps are logged, not fixed up.
    pub async fn generate_posts(
        &self,
        request: &SocialPostRequest,
    ) -> Result<SocialPostSet, DomainError> {
        let request = request.clone().with_unique_platforms();
        let posts = self.posts_prompt.generate(self.llm.as_ref(), &request).await?;

        let missing = posts.missing_platforms(&request.platforms);
        if !missing.is_empty() {
            let ids: Vec<&str> = missing.iter().map(|p| p.id()).collect();
            warn!(missing = ?ids, "model skipped requested platforms");
        }
        let unexpected = posts.unexpected_keys(&request.platforms);
        if !unexpected.is_empty() {
            warn!(keys = ?unexpected, "model answered for platforms nobody asked for");
        }

        info!(
            title = %request.title,
            requested = request.platforms.len(),
            generated = posts.len(),
            "social posts generated"
        );
        Ok(posts)
    }

    pub async fn suggest_hashtags(
        &self,
        request: &HashtagRequest,
    ) -> Result<HashtagSuggestions, DomainError> {
        let raw = self.hashtags_prompt.generate(self.llm.as_ref(), request).await?;
        let suggestions = HashtagSuggestions {
            hashtags: normalize_hashtags(&raw.hashtags),
        };
        info!(
            title = %request.event_title,
            raw = raw.hashtags.len(),
            kept = suggestions.hashtags.len(),
            "hashtags suggested"
        );
        Ok(suggestions)
    }
}

/// `#`-prefix, strip whitespace, drop case-insensitive duplicates and cap at
/// [`MAX_HASHTAGS`]. First spelling wins.
pub fn normalize_hashtags(raw: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    let mut out = Vec::new();
    for tag in raw {
        let compact: String = tag.chars().filter(|c| !c.is_whitespace()).collect();
        let body = compact.trim_start_matches('#');
        if body.is_empty() {
            continue;
        }
        let key = body.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(format!("#{body}"));
        if out.len() == MAX_HASHTAGS {
            break;
        }
    }
    out
}
