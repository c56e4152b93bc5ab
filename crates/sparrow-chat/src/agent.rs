//! One generation turn: prompt in, project changes out.

use std::sync::atomic::{AtomicBool, Ordering};

use sparrow::{CodeBlock, ProjectSink, extract_code_blocks, extract_file_paths};

use crate::backend::ChatBackend;
use crate::error::{ChatError, Result};
use crate::models::select_model;
use crate::types::{AgentStep, ChatMessage, ChatSession, Phase, Role, StepStatus};

/// Instructions sent ahead of every user prompt.
pub const SYSTEM_PROMPT: &str = r#"You are Sparrow AI, an expert React + TypeScript developer.
You build modern, responsive web applications using Vite, React, and Tailwind CSS.

ALWAYS follow this format:
1. ## File Structure: List all files with their full paths (e.g., src/components/Button.tsx)
2. ## Code Files: Provide complete code for each file using code blocks with file names.

Example:
## File Structure
- package.json
- src/App.tsx

## Code Files
```tsx file="src/App.tsx"
import React from 'react';
export default function App() { return <div>Hello</div>; }
```
"#;

const TITLE_MAX_CHARS: usize = 50;

/// What a successful turn produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub model: String,
    pub content: String,
    pub files: Vec<String>,
    pub blocks: Vec<CodeBlock>,
}

/// Drives a [`ChatBackend`] through the four phases of a turn.
///
/// At most one turn runs at a time per agent; an overlapping
/// [`send`](Self::send) fails with [`ChatError::Busy`] and leaves its
/// session untouched.
#[derive(Debug)]
pub struct ChatAgent<B> {
    backend: B,
    model: Option<String>,
    in_flight: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ChatError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<B: ChatBackend> ChatAgent<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            model: None,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Pin a model id. `None` selects by prompt length on every turn.
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn model_for(&self, prompt: &str) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| select_model(prompt).id.to_string())
    }

    pub fn send(
        &self,
        session: &mut ChatSession,
        prompt: &str,
        sink: &mut dyn ProjectSink,
    ) -> Result<Generation> {
        self.send_observed(session, prompt, sink, &mut |_: &AgentStep| {})
    }

    /// Like [`send`](Self::send), calling `observer` after every step
    /// transition.
    pub fn send_observed(
        &self,
        session: &mut ChatSession,
        prompt: &str,
        sink: &mut dyn ProjectSink,
        observer: &mut dyn FnMut(&AgentStep),
    ) -> Result<Generation> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ChatError::EmptyPrompt);
        }
        let _guard = InFlight::acquire(&self.in_flight)?;

        if session.messages.is_empty() {
            session.title = title_from_prompt(prompt);
        }
        session.push(Role::User, prompt, None);
        let index = session.push(Role::Assistant, "", Some(AgentStep::initial()));
        let mut turn = Turn {
            session,
            index,
            observer,
        };

        let model = self.model_for(prompt);
        tracing::info!(model = %model, chars = prompt.len(), "starting generation");

        turn.advance(Phase::Analyze, Phase::Structure);
        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];
        let reply = match self.backend.chat(&messages, &model) {
            Ok(reply) => reply,
            Err(e) => {
                turn.fail(&e);
                return Err(e);
            }
        };
        let content = reply.text();

        turn.advance(Phase::Structure, Phase::Generate);
        let files = extract_file_paths(&content);
        let blocks = extract_code_blocks(&content);
        tracing::debug!(files = files.len(), blocks = blocks.len(), "extracted reply");

        turn.advance(Phase::Generate, Phase::Apply);
        if let Err(e) = sink.apply_generation(&files, &blocks).map_err(ChatError::Apply) {
            turn.fail(&e);
            return Err(e);
        }
        turn.set(Phase::Apply, StepStatus::Completed, None);
        turn.session.messages[index].content = content.clone();

        Ok(Generation {
            model,
            content,
            files,
            blocks,
        })
    }
}

fn title_from_prompt(prompt: &str) -> String {
    let first_line = prompt.lines().next().unwrap_or_default().trim();
    if first_line.chars().count() > TITLE_MAX_CHARS {
        let truncated: String = first_line.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", truncated.trim_end())
    } else {
        first_line.to_string()
    }
}

/// Step bookkeeping for the assistant message of the current turn.
struct Turn<'a> {
    session: &'a mut ChatSession,
    index: usize,
    observer: &'a mut dyn FnMut(&AgentStep),
}

impl Turn<'_> {
    fn set(&mut self, phase: Phase, status: StepStatus, description: Option<String>) {
        let steps = self.session.messages[self.index]
            .steps
            .get_or_insert_with(AgentStep::initial);
        if let Some(step) = steps.iter_mut().find(|s| s.id == phase.id()) {
            step.status = status;
            step.description = description;
            (self.observer)(step);
        }
    }

    fn advance(&mut self, done: Phase, next: Phase) {
        self.set(done, StepStatus::Completed, None);
        self.set(next, StepStatus::Running, None);
    }

    fn fail(&mut self, error: &ChatError) {
        tracing::warn!("generation failed: {}", error);
        let running = self.session.messages[self.index]
            .steps
            .as_ref()
            .and_then(|steps| steps.iter().find(|s| s.status == StepStatus::Running))
            .and_then(|s| Phase::ALL.into_iter().find(|p| p.id() == s.id));
        if let Some(phase) = running {
            self.set(phase, StepStatus::Error, Some(error.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::ChatReply;
    use serde_json::json;
    use sparrow::{Project, SinkError};
    use std::sync::Mutex;
    use std::sync::mpsc;
    use std::thread;

    const REPLY: &str = "Here you go.\n\n## File Structure\n- package.json\n- src/App.tsx\n- src/components/Button.tsx\n\n## Code Files\n```tsx file=\"src/App.tsx\"\nexport default function App() { return null; }\n```\n\n```tsx file=\"src/components/Button.tsx\"\nexport const Button = () => null;\n```\n";

    struct Canned(ChatReply);

    impl ChatBackend for Canned {
        fn chat(&self, messages: &[ChatMessage], _model: &str) -> Result<ChatReply> {
            assert_eq!(messages.len(), 2);
            assert_eq!(messages[0].role, Role::System);
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl ChatBackend for Failing {
        fn chat(&self, _messages: &[ChatMessage], _model: &str) -> Result<ChatReply> {
            Err(ChatError::Provider {
                status: 429,
                body: "rate limited".into(),
            })
        }
    }

    #[derive(Default)]
    struct Recording {
        created: Vec<Vec<String>>,
        generated: Vec<String>,
    }

    impl ProjectSink for Recording {
        fn create_project_files(&mut self, paths: &[String]) -> std::result::Result<(), SinkError> {
            self.created.push(paths.to_vec());
            Ok(())
        }

        fn code_generated(&mut self, block: &CodeBlock) -> std::result::Result<(), SinkError> {
            self.generated.push(block.filename.clone());
            Ok(())
        }
    }

    struct Rejecting;

    impl ProjectSink for Rejecting {
        fn create_project_files(&mut self, _paths: &[String]) -> std::result::Result<(), SinkError> {
            Err("disk full".into())
        }

        fn code_generated(&mut self, _block: &CodeBlock) -> std::result::Result<(), SinkError> {
            Ok(())
        }
    }

    fn statuses(session: &ChatSession) -> Vec<StepStatus> {
        session.messages[1]
            .steps
            .as_ref()
            .unwrap()
            .iter()
            .map(|s| s.status)
            .collect()
    }

    #[test]
    fn test_successful_turn_applies_in_order() {
        let agent = ChatAgent::new(Canned(ChatReply::Text(REPLY.into())));
        let mut session = ChatSession::new();
        let mut sink = Recording::default();

        let generation = agent.send(&mut session, "build a button", &mut sink).unwrap();

        assert_eq!(
            sink.created,
            vec![vec![
                "package.json".to_string(),
                "src/App.tsx".to_string(),
                "src/components/Button.tsx".to_string()
            ]]
        );
        assert_eq!(sink.generated, vec!["src/App.tsx", "src/components/Button.tsx"]);
        assert_eq!(generation.model, "google/gemini-2.0-flash-exp:free");
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[1].content, REPLY);
        assert_eq!(session.title, "build a button");
        assert!(statuses(&session).iter().all(|s| *s == StepStatus::Completed));
        assert!(!agent.is_busy());
    }

    #[test]
    fn test_structured_reply_is_unwrapped() {
        let reply = ChatReply::Structured(json!({
            "choices": [{"message": {"role": "assistant", "content": REPLY}}]
        }));
        let agent = ChatAgent::new(Canned(reply));
        let mut session = ChatSession::new();
        let mut project = Project::empty("p", chrono::Utc::now());

        agent.send(&mut session, "go", &mut project).unwrap();

        let button = project.find_by_path("src/components/Button.tsx").unwrap();
        assert_eq!(button.content, "export const Button = () => null;");
        assert!(project.find_by_path("package.json").is_some());
    }

    #[test]
    fn test_empty_extraction_is_success() {
        let agent = ChatAgent::new(Canned(ChatReply::Text("Sorry, no code today.".into())));
        let mut session = ChatSession::new();
        let mut sink = Recording::default();

        let generation = agent.send(&mut session, "hello", &mut sink).unwrap();

        assert!(generation.files.is_empty());
        assert!(sink.created.is_empty());
        assert!(sink.generated.is_empty());
        assert!(statuses(&session).iter().all(|s| *s == StepStatus::Completed));
    }

    #[test]
    fn test_backend_failure_marks_running_step() {
        let agent = ChatAgent::new(Failing);
        let mut session = ChatSession::new();
        let mut sink = Recording::default();

        let err = agent.send(&mut session, "go", &mut sink).unwrap_err();

        assert!(matches!(err, ChatError::Provider { status: 429, .. }));
        assert_eq!(
            statuses(&session),
            vec![
                StepStatus::Completed,
                StepStatus::Error,
                StepStatus::Pending,
                StepStatus::Pending
            ]
        );
        let failed = session.messages[1].step(Phase::Structure).unwrap();
        assert!(failed.description.as_deref().unwrap().contains("rate limited"));
        assert_eq!(session.messages[1].content, "");
        assert!(sink.created.is_empty() && sink.generated.is_empty());
        assert!(!agent.is_busy());
    }

    #[test]
    fn test_sink_failure_marks_apply_step() {
        let agent = ChatAgent::new(Canned(ChatReply::Text(REPLY.into())));
        let mut session = ChatSession::new();

        let err = agent.send(&mut session, "go", &mut Rejecting).unwrap_err();

        assert!(matches!(err, ChatError::Apply(_)));
        assert_eq!(statuses(&session)[3], StepStatus::Error);
        assert_eq!(statuses(&session)[2], StepStatus::Completed);
    }

    #[test]
    fn test_empty_prompt_rejected() {
        let agent = ChatAgent::new(Failing);
        let mut session = ChatSession::new();
        let err = agent.send(&mut session, "   ", &mut Recording::default()).unwrap_err();
        assert!(matches!(err, ChatError::EmptyPrompt));
        assert!(session.messages.is_empty());
    }

    #[test]
    fn test_observer_sees_transitions() {
        let agent = ChatAgent::new(Canned(ChatReply::Text(REPLY.into())));
        let mut session = ChatSession::new();
        let mut seen = Vec::new();

        agent
            .send_observed(&mut session, "go", &mut Recording::default(), &mut |step: &AgentStep| {
                seen.push((step.id.clone(), step.status));
            })
            .unwrap();

        assert_eq!(seen.first(), Some(&("analyze".to_string(), StepStatus::Completed)));
        assert_eq!(seen.last(), Some(&("apply".to_string(), StepStatus::Completed)));
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn test_pinned_model_overrides_selection() {
        let agent = ChatAgent::new(Failing).with_model(Some("openai/gpt-oss-20b:free".into()));
        assert_eq!(agent.model_for(&"x".repeat(200_000)), "openai/gpt-oss-20b:free");
        let agent = ChatAgent::new(Failing);
        assert_eq!(agent.model_for(&"x".repeat(200_000)), "x-ai/grok-4.1-fast:free");
    }

    #[test]
    fn test_title_truncated() {
        let title = title_from_prompt(&"word ".repeat(30));
        assert!(title.ends_with("..."));
        assert!(title.chars().count() <= TITLE_MAX_CHARS + 3);
        assert_eq!(title_from_prompt("short\nsecond line"), "short");
    }

    struct Gated {
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl ChatBackend for Gated {
        fn chat(&self, _messages: &[ChatMessage], _model: &str) -> Result<ChatReply> {
            self.entered.lock().unwrap().send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
            Ok(ChatReply::Text(String::new()))
        }
    }

    #[test]
    fn test_overlapping_send_is_busy() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let agent = ChatAgent::new(Gated {
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        });

        thread::scope(|s| {
            let first = s.spawn(|| {
                let mut session = ChatSession::new();
                agent
                    .send(&mut session, "first", &mut Recording::default())
                    .map(|_| ())
            });

            entered_rx.recv().unwrap();
            assert!(agent.is_busy());

            let mut session = ChatSession::new();
            let err = agent
                .send(&mut session, "second", &mut Recording::default())
                .unwrap_err();
            assert!(matches!(err, ChatError::Busy));
            assert!(session.messages.is_empty());

            release_tx.send(()).unwrap();
            first.join().unwrap().unwrap();
        });

        assert!(!agent.is_busy());
    }
}
