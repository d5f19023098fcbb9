//! Terminal front end for the sales chat engine
//!
//! Plain lines go to whichever form the conversation currently shows.
//! `/topics`, `/topic <id>`, `/reset` and `/quit` are commands.

use sales_chat::clock::SystemClock;
use sales_chat::config::ChatConfig;
use sales_chat::controller::ChatController;
use sales_chat::runtime::{ChatRuntime, Intent, ViewEvent};
use sales_chat::state_machine::{ConversationState, LeadStage, MessageId};
use sales_chat::topics::TopicTable;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Input(String),
    Topic(String),
    Topics,
    Reset,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let Some(command) = line.strip_prefix('/') else {
            return Some(Command::Input(line.to_string()));
        };

        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, arg)| (name, arg.trim()));
        match name {
            "topic" if !arg.is_empty() => Some(Command::Topic(arg.to_string())),
            "topics" => Some(Command::Topics),
            "reset" => Some(Command::Reset),
            "quit" | "exit" => Some(Command::Quit),
            _ => Some(Command::Input(line.to_string())),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so the transcript on stdout stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sales_chat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ChatConfig::from_env()?;
    let topics = match &config.topics_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading topic table");
            TopicTable::load(path)?
        }
        None => TopicTable::builtin()?,
    };
    let topics = Arc::new(topics);
    tracing::info!(
        topics = topics.len(),
        reply_delay_ms = config.reply_delay.as_millis(),
        "Topic table ready"
    );

    let controller = ChatController::new(Arc::clone(&topics), SystemClock, &config);
    let (runtime, handle) = ChatRuntime::new(controller);
    let views = handle.subscribe();
    let runtime_task = tokio::spawn(runtime.run());
    let render_task = tokio::spawn(render(views));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let intent = match Command::parse(&line) {
            None => continue,
            Some(Command::Quit) => break,
            Some(Command::Topics) => {
                print_menu(&topics);
                continue;
            }
            Some(Command::Topic(id)) => Intent::SelectTopic(id),
            Some(Command::Reset) => Intent::Reset,
            Some(Command::Input(text)) => Intent::SubmitInput(text),
        };
        handle.send(intent).await?;
    }

    drop(handle);
    runtime_task.await?;
    render_task.await?;
    Ok(())
}

/// Print each message once, plus the typing indicator and input prompt.
async fn render(mut views: tokio::sync::broadcast::Receiver<ViewEvent>) {
    let mut transcript = Transcript::default();

    loop {
        let state = match views.recv().await {
            Ok(ViewEvent::StateChanged { state }) => state,
            // A terminal scrolls on its own
            Ok(ViewEvent::ScrollToLatest) => continue,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Renderer fell behind");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        for line in transcript.update(&state) {
            println!("{line}");
        }
    }
}

/// What the terminal has already printed
#[derive(Debug, Default)]
struct Transcript {
    /// Id of the greeting that opened the printed conversation
    seed: Option<MessageId>,
    shown: usize,
    was_typing: bool,
    stage: Option<LeadStage>,
}

impl Transcript {
    /// Lines to print for a new snapshot.
    fn update(&mut self, state: &ConversationState) -> Vec<String> {
        let mut lines = Vec::new();

        // Reset replaces the seed greeting, even when nothing followed it
        let seed = state.messages.first().map(|m| m.id);
        if seed != self.seed {
            if self.seed.is_some() {
                lines.push("--- conversation reset ---".to_string());
            }
            *self = Self {
                seed,
                ..Self::default()
            };
        }

        for message in state.messages.iter().skip(self.shown) {
            lines.push(format!(
                "[{}] {}: {}",
                message.sent_at, message.sender, message.text
            ));
        }
        self.shown = state.messages.len();

        if state.is_typing && !self.was_typing {
            lines.push("Bot is typing...".to_string());
        }
        self.was_typing = state.is_typing;

        if self.stage != Some(state.lead_stage) {
            lines.push(prompt(state.lead_stage).to_string());
            self.stage = Some(state.lead_stage);
        }

        lines
    }
}

fn prompt(stage: LeadStage) -> &'static str {
    match stage {
        LeadStage::AwaitingName => "(enter your name)",
        LeadStage::AwaitingContact => "(enter your email or phone number)",
        LeadStage::Active => "(type a message, or /topics to see what I can help with)",
    }
}

fn print_menu(topics: &TopicTable) {
    for topic in topics.menu() {
        println!("  /topic {:<14} {}", topic.id, topic.display_label);
    }
}
