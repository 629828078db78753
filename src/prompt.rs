//! Generation prompt assembly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;
use utoipa::ToSchema;

use crate::config::LengthLimits;
use crate::extractor::ExtractedContent;
use crate::topics::TopicAnalysis;

const PROMPT_KEYWORDS: usize = 10;
const META_PROMPT_KEYWORDS: usize = 5;
const META_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Technical,
    Persuasive,
    Educational,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Professional,
        Tone::Casual,
        Tone::Technical,
        Tone::Persuasive,
        Tone::Educational,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Technical => "technical",
            Tone::Persuasive => "persuasive",
            Tone::Educational => "educational",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            Tone::Professional => {
                "Use a professional, authoritative tone suitable for business readers."
            }
            Tone::Casual => "Use a friendly, conversational tone that is easy to read and engaging.",
            Tone::Technical => "Use precise technical language suitable for an expert audience.",
            Tone::Persuasive => "Use persuasive language that encourages action and engagement.",
            Tone::Educational => {
                "Use clear, instructive language suitable for teaching and learning."
            }
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = BlogConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str() == s)
            .ok_or_else(|| BlogConfigError::UnknownTone(s.to_string()))
    }
}

/// Instruction sentence for a tone name; unknown names get the professional one.
pub fn tone_instruction(tone: &str) -> &'static str {
    tone.parse::<Tone>().unwrap_or_default().instruction()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlogConfigError {
    #[error("Blog length must be between {min} and {max} words")]
    LengthOutOfRange { min: u32, max: u32 },

    #[error("Tone must be one of: professional, casual, technical, persuasive, educational")]
    UnknownTone(String),
}

/// What the caller wants written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BlogConfig {
    pub length: u32,
    pub tone: Tone,
    pub include_cta: bool,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            length: LengthLimits::default().default,
            tone: Tone::default(),
            include_cta: true,
        }
    }
}

impl BlogConfig {
    pub fn validate(&self, limits: &LengthLimits) -> Result<(), BlogConfigError> {
        if !(limits.min..=limits.max).contains(&self.length) {
            return Err(BlogConfigError::LengthOutOfRange {
                min: limits.min,
                max: limits.max,
            });
        }
        Ok(())
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

pub fn build_blog_prompt(
    content: &ExtractedContent,
    keywords: &[String],
    topics: &TopicAnalysis,
    config: &BlogConfig,
) -> String {
    let keyword_line = keywords
        .iter()
        .take(PROMPT_KEYWORDS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = format!(
        "You are an expert SEO content writer. Generate a high-quality, original blog post based on the following information.

SOURCE INFORMATION:
Website URL: {url}
Website Title: {title}
Content Summary: {description}

TOPIC ANALYSIS:
Main Keywords: {keyword_line}
Content Category: {category}
Content Intent: {intent}
Topic Summary: {summary}

BLOG REQUIREMENTS:
- Target Length: Approximately {length} words
- Tone: {tone}
- SEO Optimized: Yes (naturally incorporate keywords)
- Original Content: Do not copy from source, write original analysis and insights

STRUCTURE REQUIREMENTS:
1. Create an engaging, SEO-friendly title (H1)
2. Write a compelling introduction (2-3 paragraphs)
3. Organize content with clear H2 and H3 headings
4. Use short paragraphs (3-4 sentences each)
5. Include relevant examples and explanations
6. Write a strong conclusion
",
        url = or_placeholder(&content.url, "N/A"),
        title = or_placeholder(&content.title, "N/A"),
        description = or_placeholder(&content.description, "Content about the topic"),
        category = topics.category,
        intent = topics.intent,
        summary = topics.topic_summary,
        length = config.length,
        tone = config.tone.instruction(),
    );

    if config.include_cta {
        prompt.push_str("7. End with a call-to-action (CTA) encouraging reader engagement\n");
    }

    prompt.push_str(
        "
WRITING GUIDELINES:
- Write naturally and engagingly
- Use transition words for better flow
- Incorporate keywords naturally (avoid keyword stuffing)
- Provide valuable insights and unique perspectives
- Use active voice
- Include specific examples where appropriate
- Make content scannable with bullet points or numbered lists where relevant

Generate the complete blog post now. Use proper markdown formatting for headings.
",
    );

    debug!(
        "Built prompt for {}-word {} blog",
        config.length, config.tone
    );
    prompt
}

/// Prompt asking the model for a 150-160 character meta description.
pub fn build_meta_description_prompt(content: &str, keywords: &[String]) -> String {
    let keyword_line = keywords
        .iter()
        .take(META_PROMPT_KEYWORDS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let preview: String = content.chars().take(META_PREVIEW_CHARS).collect();

    format!(
        "Generate a compelling SEO meta description for the following blog post.

Main Keywords: {keyword_line}

Blog Content Preview:
{preview}...

Requirements:
- Length: 150-160 characters
- Include primary keyword naturally
- Make it compelling and click-worthy
- Summarize the main value proposition
- Use active voice

Generate only the meta description text, nothing else.
"
    )
}
