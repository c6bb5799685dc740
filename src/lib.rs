pub mod bot;
pub mod browser;
pub mod controller;
pub mod markdown;
pub mod types;
pub mod widget;

pub use bot::BotClient;
pub use browser::BrowserClient;
pub use controller::{ChatController, UiEvent, UiUpdate};
pub use types::{ChatError, ChatMessage, MessageKind, Theme, Transcript, UiState, WidgetOptions};
