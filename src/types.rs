use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Duration;

//
// ---------- Error Types ----------
//
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("WebDriver connection failed: {0}")]
    ConnectionError(String),

    #[error("Browser operation failed: {0}")]
    OperationError(String),

    #[error("Invalid widget configuration: {0}")]
    ConfigError(String),

    #[error("Chatbot backend request failed: {0}")]
    BackendError(String),

    #[error("Malformed page event: {0}")]
    EventError(String),
}

//
// ---------- Theme ----------
//
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

impl Theme {
    /// Name used for the page's `*-theme` body classes and saved preference.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(ChatError::ConfigError(format!("unknown theme '{other}'"))),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ---------- Widget Config ----------
//
/// Configuration options for a widget session.
#[derive(Debug, Clone)]
pub struct WidgetOptions {
    /// Whether the browser should run in headless mode.
    pub headless: bool,
    /// Optional window dimensions (width, height).
    pub window_size: Option<(u32, u32)>,
    /// Optional proxy URL to use for HTTP/HTTPS traffic.
    pub proxy: Option<String>,
    /// Optional user agent string override.
    pub user_agent: Option<String>,
    /// Address of the WebDriver server.
    pub webdriver_url: String,
    /// Page the widget is mounted on.
    pub start_url: String,
    /// Chatbot endpoint receiving `{"message"}` POSTs.
    pub endpoint: String,
    /// Timeout for backend requests.
    pub timeout: Duration,
    /// How often the page event queue is drained.
    pub poll_interval: Duration,
    /// Theme applied when the page has no saved preference.
    pub theme: Theme,
    /// Transcript cap; oldest messages are dropped past it.
    pub max_messages: usize,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            headless: false,
            window_size: Some((1280, 800)),
            proxy: None,
            user_agent: None,
            webdriver_url: "http://localhost:4444".to_string(),
            start_url: "about:blank".to_string(),
            endpoint: "http://127.0.0.1:5000/chat".to_string(),
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(500),
            theme: Theme::Light,
            max_messages: 200,
        }
    }
}

impl WidgetOptions {
    /// Creates a new `WidgetOptions` instance with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets headless mode (true = no UI).
    pub fn headless(mut self, enabled: bool) -> Self {
        self.headless = enabled;
        self
    }

    /// Sets the browser window size.
    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = Some((width, height));
        self
    }

    /// Sets a proxy server for the browser session.
    pub fn proxy(mut self, proxy_url: &str) -> Self {
        self.proxy = Some(proxy_url.to_string());
        self
    }

    /// Overrides the browser's default user agent string.
    pub fn user_agent(mut self, ua: &str) -> Self {
        self.user_agent = Some(ua.to_string());
        self
    }

    /// Sets the WebDriver server address.
    pub fn webdriver_url(mut self, url: &str) -> Self {
        self.webdriver_url = url.to_string();
        self
    }

    /// Sets the page the widget is mounted on.
    pub fn start_url(mut self, url: &str) -> Self {
        self.start_url = url.to_string();
        self
    }

    /// Sets the chatbot endpoint URL.
    pub fn endpoint(mut self, url: &str) -> Self {
        self.endpoint = url.to_string();
        self
    }

    /// Sets the backend request timeout (in seconds).
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(seconds);
        self
    }

    /// Sets the event poll interval (in milliseconds).
    pub fn poll_interval(mut self, millis: u64) -> Self {
        self.poll_interval = Duration::from_millis(millis);
        self
    }

    /// Sets the fallback theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Sets the transcript cap.
    pub fn max_messages(mut self, max: usize) -> Self {
        self.max_messages = max;
        self
    }
}

//
// ---------- Messages ----------
//
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Sent,
    Received,
}

/// One chat turn as it appears in a bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub kind: MessageKind,
    /// Plain text for sent bubbles, rendered HTML for received ones.
    pub body: String,
    /// Local wall-clock time, `HH:MM`.
    pub time: String,
}

impl ChatMessage {
    pub fn new(kind: MessageKind, body: impl Into<String>) -> Self {
        Self {
            kind,
            body: body.into(),
            time: Local::now().format("%H:%M").to_string(),
        }
    }
}

/// In-memory record of the current conversation. Never persisted.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    max_messages: usize,
}

impl Transcript {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages,
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        if self.max_messages > 0 && self.messages.len() >= self.max_messages {
            self.messages.remove(0);
        }
        self.messages.push(message);
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn all(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

//
// ---------- UI State ----------
//
/// Widget state, owned by the controller and passed around explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiState {
    /// The welcome screen has been dismissed.
    pub chat_active: bool,
    pub sidebar_open: bool,
    pub theme_popup_open: bool,
    pub file_popup_open: bool,
    /// A typing indicator is currently shown.
    pub typing: bool,
}
