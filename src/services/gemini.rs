//! Gemini text-generation adapter.

use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::TextGenerator;
use super::error::ServiceError;
use crate::models::NewTrendingTopic;

const DEFAULT_MODEL: &str = "gemini-pro";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ContentPart>>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            http: Client::new(),
        }
    }

    pub fn from_env(model: Option<&str>) -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("GOOGLE_AI_KEY"))
            .unwrap_or_default();
        if api_key.is_empty() {
            warn!("Gemini API key not found; generation calls will fail");
        }
        Self::new(&api_key, model.unwrap_or(DEFAULT_MODEL))
    }

    async fn generate_content(&self, prompt: &str) -> Result<String, ServiceError> {
        let url = format!("{}/{}:generateContent", API_BASE, self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let resp = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            return Err(ServiceError::Api(format!("Gemini API error: {}", text)));
        }

        let parsed: GenerateResponse = resp.json().await?;
        parsed
            .candidates
            .and_then(|mut c| c.drain(..).next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|mut p| p.drain(..).next())
            .and_then(|p| p.text)
            .ok_or_else(|| ServiceError::Api("Gemini response contained no text".to_string()))
    }
}

/// Parse a JSON topic array out of a model response, tolerating markdown fences.
fn parse_topics(text: &str) -> Option<Vec<NewTrendingTopic>> {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed).trim();
    serde_json::from_str(trimmed).ok()
}

/// Canned topics returned when the vendor call fails or is unparsable, so
/// analysis degrades instead of halting.
fn fallback_topics() -> Vec<NewTrendingTopic> {
    vec![
        NewTrendingTopic {
            title: "AI Technology Breakthrough in Healthcare".to_string(),
            description: Some(
                "Latest developments in artificial intelligence revolutionizing medical diagnosis and treatment"
                    .to_string(),
            ),
            source: Some("Tech News".to_string()),
            url: None,
            score: 92,
            category: Some("Technology".to_string()),
            keywords: vec![
                "AI".to_string(),
                "healthcare".to_string(),
                "technology".to_string(),
                "innovation".to_string(),
            ],
        },
        NewTrendingTopic {
            title: "Global Climate Summit Announces New Initiatives".to_string(),
            description: Some(
                "World leaders unite on ambitious climate goals and renewable energy commitments"
                    .to_string(),
            ),
            source: Some("World News".to_string()),
            url: None,
            score: 87,
            category: Some("Environment".to_string()),
            keywords: vec![
                "climate".to_string(),
                "environment".to_string(),
                "summit".to_string(),
                "renewable energy".to_string(),
            ],
        },
        NewTrendingTopic {
            title: "Space Exploration: Mars Mission Reveals New Discoveries".to_string(),
            description: Some(
                "NASA's latest Mars rover uncovers fascinating evidence about the planet's history"
                    .to_string(),
            ),
            source: Some("Science News".to_string()),
            url: None,
            score: 84,
            category: Some("Science".to_string()),
            keywords: vec![
                "space".to_string(),
                "Mars".to_string(),
                "NASA".to_string(),
                "discovery".to_string(),
            ],
        },
    ]
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn analyze_trending_news(&self) -> Result<Vec<NewTrendingTopic>, ServiceError> {
        let prompt = "Analyze the current trending news topics globally and provide a JSON array \
                      of the top 10 most trending topics.\n\
                      For each topic, include:\n\
                      - title: A catchy, YouTube-friendly title\n\
                      - description: A brief description suitable for video content\n\
                      - source: The type of source (e.g., \"Tech News\", \"World News\", \"Politics\")\n\
                      - score: A trending score from 1-100\n\
                      - category: Category like \"Technology\", \"Politics\", \"Science\", \"Entertainment\"\n\
                      - keywords: Array of relevant keywords for SEO\n\n\
                      Focus on topics that would make engaging YouTube videos with high view potential.\n\
                      Ensure the titles are clickable and the content is suitable for automated video creation.\n\n\
                      Return only valid JSON, no other text.";

        match self.generate_content(prompt).await {
            Ok(text) => match parse_topics(&text) {
                Some(topics) => Ok(topics),
                None => {
                    warn!("Could not parse trending topics from model output, using fallback");
                    Ok(fallback_topics())
                }
            },
            Err(e) => {
                warn!("Trending analysis call failed ({}), using fallback", e);
                Ok(fallback_topics())
            }
        }
    }

    async fn generate_script(
        &self,
        topic: &str,
        target_secs: u32,
    ) -> Result<String, ServiceError> {
        let prompt = format!(
            "Create an engaging YouTube video script about \"{}\" that is approximately {} seconds long.\n\n\
             The script should:\n\
             - Start with a compelling hook\n\
             - Be informative and engaging\n\
             - Include natural pauses for visuals\n\
             - Be suitable for Indian English text-to-speech\n\
             - Have a clear structure with introduction, main content, and conclusion\n\
             - Include call-to-action for likes and subscriptions\n\
             - Be factual and well-researched\n\n\
             Format the script with clear paragraphs and natural speaking rhythm.\n\
             Avoid complex words that might be difficult for TTS to pronounce correctly.",
            topic, target_secs
        );

        self.generate_content(&prompt).await
    }

    async fn generate_description(
        &self,
        title: &str,
        script: &str,
    ) -> Result<String, ServiceError> {
        let excerpt: String = script.chars().take(500).collect();
        let prompt = format!(
            "Create a YouTube video description for a video titled \"{}\".\n\n\
             The description should:\n\
             - Be engaging and SEO-optimized\n\
             - Include relevant hashtags\n\
             - Be under 5000 characters\n\
             - Include a brief summary of the content\n\
             - Have a call-to-action\n\
             - Include typical YouTube description elements like timestamps if relevant\n\n\
             Script excerpt: {}...",
            title, excerpt
        );

        self.generate_content(&prompt).await
    }

    async fn check_health(&self) -> bool {
        match self.generate_content("Health check: respond with 'OK'").await {
            Ok(text) => text.trim().eq_ignore_ascii_case("ok"),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_topic_array() {
        let text = r#"[{"title": "Test Topic", "description": "d", "source": "Tech News",
                       "score": 90, "category": "Technology", "keywords": ["a", "b"]}]"#;
        let topics = parse_topics(text).unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].title, "Test Topic");
        assert_eq!(topics[0].score, 90);
    }

    #[test]
    fn parses_fenced_topic_array() {
        let text = "```json\n[{\"title\": \"T\", \"description\": null, \"source\": null, \"score\": 55, \"category\": null}]\n```";
        let topics = parse_topics(text).unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].score, 55);
        assert!(topics[0].keywords.is_empty());
    }

    #[test]
    fn rejects_non_json_output() {
        assert!(parse_topics("Here are some topics for you!").is_none());
        assert!(parse_topics("{\"title\": \"not an array\"}").is_none());
    }
}
