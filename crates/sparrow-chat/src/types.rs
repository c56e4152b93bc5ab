use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry of an outbound chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
    Error,
}

/// The fixed phases of a generation turn, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Analyze,
    Structure,
    Generate,
    Apply,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Analyze,
        Phase::Structure,
        Phase::Generate,
        Phase::Apply,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Phase::Analyze => "analyze",
            Phase::Structure => "structure",
            Phase::Generate => "generate",
            Phase::Apply => "apply",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Phase::Analyze => "Analyzing request",
            Phase::Structure => "Planning file structure",
            Phase::Generate => "Generating code",
            Phase::Apply => "Applying changes",
        }
    }
}

/// Progress marker shown under an assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStep {
    pub id: String,
    pub title: String,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AgentStep {
    /// The four phase steps, the first one running.
    pub fn initial() -> Vec<AgentStep> {
        Phase::ALL
            .iter()
            .map(|phase| AgentStep {
                id: phase.id().to_string(),
                title: phase.title().to_string(),
                status: if *phase == Phase::Analyze {
                    StepStatus::Running
                } else {
                    StepStatus::Pending
                },
                description: None,
            })
            .collect()
    }
}

/// A transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<AgentStep>>,
}

impl Message {
    pub fn step(&self, phase: Phase) -> Option<&AgentStep> {
        self.steps
            .as_ref()?
            .iter()
            .find(|s| s.id == phase.id())
    }
}

/// An ephemeral conversation. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis().to_string(),
            title: "New Chat".to_string(),
            messages: Vec::new(),
            created_at: now,
        }
    }

    /// Append a message and return its index.
    pub fn push(&mut self, role: Role, content: impl Into<String>, steps: Option<Vec<AgentStep>>) -> usize {
        let index = self.messages.len();
        self.messages.push(Message {
            id: format!("{}-{}", self.id, index + 1),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            steps,
        });
        index
    }

    /// Project name used when a session starts a fresh project.
    pub fn project_name(&self) -> String {
        let tail: String = self
            .id
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("Project {}", tail)
    }
}
