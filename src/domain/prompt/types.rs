use serde::Serialize;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: MessageRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: MessageRole::User, content: content.into() }
    }
}

/// Payload sent to the completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    /// Content of the last user message.
    pub fn user_prompt(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Generation stage; each has its own template and sampling profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Titles,
    HeadingPlan,
    Article,
    Continuation,
    Summary,
}

impl Stage {
    pub const ALL: [Stage; 5] =
        [Stage::Titles, Stage::HeadingPlan, Stage::Article, Stage::Continuation, Stage::Summary];

    pub fn template_name(&self) -> &'static str {
        match self {
            Stage::Titles => "titles",
            Stage::HeadingPlan => "heading_plan",
            Stage::Article => "article",
            Stage::Continuation => "continuation",
            Stage::Summary => "summary",
        }
    }

    pub fn from_name(name: &str) -> Option<Stage> {
        let wanted = name.trim().to_ascii_lowercase().replace('-', "_");
        Stage::ALL.into_iter().find(|stage| stage.template_name() == wanted)
    }

    pub fn system_message(&self) -> &'static str {
        match self {
            Stage::Titles => "You are a skilled copywriter.",
            Stage::HeadingPlan => "You are an experienced SEO content planner.",
            Stage::Article | Stage::Continuation | Stage::Summary => {
                "You are a professional SEO writer."
            }
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            Stage::Titles => 0.6,
            Stage::HeadingPlan => 0.3,
            Stage::Article => 0.2,
            Stage::Continuation => 0.18,
            Stage::Summary => 0.15,
        }
    }

    pub fn max_tokens(&self) -> u32 {
        match self {
            Stage::Titles => 400,
            Stage::HeadingPlan => 600,
            Stage::Article => 3200,
            Stage::Continuation => 1600,
            Stage::Summary => 700,
        }
    }
}
