//! Event dispatch for the chat widget.
//!
//! The page reports intents; the controller owns all widget state and turns
//! each intent into a list of concrete page updates. It performs no I/O of
//! its own, so every transition is synchronous and runs to completion.

use serde::Deserialize;

use crate::markdown;
use crate::types::{ChatError, ChatMessage, MessageKind, Theme, Transcript, UiState};

/// Fixed apology shown when the backend round trip fails.
pub const REQUEST_FAILED_APOLOGY: &str = "Error connecting to server. Please try again.";

/// Label of the typing indicator bubble.
pub const TYPING_LABEL: &str = "KCHATAI is thinking...";

/// Intent reported by the page. The page never decides state transitions;
/// it only records what the user did.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// Enter pressed (or send clicked) with the current input text.
    Submit { text: String },
    NewChat,
    ToolsToggled,
    ThemeMenuToggled,
    ThemePicked { theme: Theme },
    /// A document-level click, with flags for the regions it landed in.
    OutsideClick {
        #[serde(default)]
        in_theme_popup: bool,
        #[serde(default)]
        in_sidebar: bool,
    },
    FileUploadOpened,
    FileUploadClosed,
    FileAttached,
    PhotoAttached,
    VoiceRecordRequested,
    VoiceChatRequested,
}

/// Concrete page update the driver applies by injecting JavaScript.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Hide the welcome screen.
    ActivateChat,
    /// Bring the welcome screen back.
    ShowWelcome,
    AppendMessage(ChatMessage),
    ShowTyping,
    HideTyping,
    ClearMessages,
    SetSidebar(bool),
    SetThemePopup(bool),
    SetFilePopup(bool),
    ApplyTheme(Theme),
    Alert(&'static str),
}

/// Decodes the drained page event queue.
pub fn parse_events(raw: serde_json::Value) -> Result<Vec<UiEvent>, ChatError> {
    serde_json::from_value(raw).map_err(|e| ChatError::EventError(e.to_string()))
}

/// Owns the widget state and transcript; one per browser session.
#[derive(Debug)]
pub struct ChatController {
    state: UiState,
    transcript: Transcript,
    theme: Theme,
}

impl ChatController {
    pub fn new(theme: Theme, max_messages: usize) -> Self {
        Self {
            state: UiState::default(),
            transcript: Transcript::new(max_messages),
            theme,
        }
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Dispatches one page intent and returns the updates to apply.
    ///
    /// For [`UiEvent::Submit`] the returned updates cover the sent half of
    /// the turn; the driver performs the backend round trip and feeds the
    /// outcome back through [`Self::reply_received`].
    pub fn handle(&mut self, event: UiEvent) -> Vec<UiUpdate> {
        match event {
            UiEvent::Submit { text } => self.submit(&text),
            UiEvent::NewChat => self.new_chat(),
            UiEvent::ToolsToggled => {
                self.state.sidebar_open = !self.state.sidebar_open;
                vec![UiUpdate::SetSidebar(self.state.sidebar_open)]
            }
            UiEvent::ThemeMenuToggled => {
                self.state.theme_popup_open = !self.state.theme_popup_open;
                vec![UiUpdate::SetThemePopup(self.state.theme_popup_open)]
            }
            UiEvent::ThemePicked { theme } => {
                self.theme = theme;
                self.state.theme_popup_open = false;
                vec![UiUpdate::ApplyTheme(theme), UiUpdate::SetThemePopup(false)]
            }
            UiEvent::OutsideClick {
                in_theme_popup,
                in_sidebar,
            } => {
                let mut updates = Vec::new();
                if self.state.theme_popup_open && !in_theme_popup {
                    self.state.theme_popup_open = false;
                    updates.push(UiUpdate::SetThemePopup(false));
                }
                if self.state.sidebar_open && !in_sidebar {
                    self.state.sidebar_open = false;
                    updates.push(UiUpdate::SetSidebar(false));
                }
                updates
            }
            UiEvent::FileUploadOpened => {
                self.state.file_popup_open = true;
                vec![UiUpdate::SetFilePopup(true)]
            }
            UiEvent::FileUploadClosed => {
                self.state.file_popup_open = false;
                vec![UiUpdate::SetFilePopup(false)]
            }
            UiEvent::FileAttached => self.attach("📁 File attached"),
            UiEvent::PhotoAttached => self.attach("📷 Photo attached"),
            UiEvent::VoiceRecordRequested => vec![UiUpdate::Alert("Voice recording coming soon")],
            UiEvent::VoiceChatRequested => vec![UiUpdate::Alert("Voice chat coming soon")],
        }
    }

    /// Feeds the outcome of the backend round trip back into the widget.
    ///
    /// Raw errors never reach a bubble; a failed request shows the fixed
    /// apology instead. Both paths run through the markdown formatter, as
    /// every received bubble does.
    pub fn reply_received(&mut self, outcome: Result<String, ChatError>) -> Vec<UiUpdate> {
        self.state.typing = false;

        let reply = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("backend request failed: {e}");
                REQUEST_FAILED_APOLOGY.to_string()
            }
        };

        let message = ChatMessage::new(MessageKind::Received, markdown::render(&reply));
        self.transcript.push(message.clone());
        vec![UiUpdate::HideTyping, UiUpdate::AppendMessage(message)]
    }

    fn submit(&mut self, text: &str) -> Vec<UiUpdate> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let mut updates = Vec::new();
        if !self.state.chat_active {
            self.state.chat_active = true;
            updates.push(UiUpdate::ActivateChat);
        }

        let message = ChatMessage::new(MessageKind::Sent, text);
        self.transcript.push(message.clone());
        updates.push(UiUpdate::AppendMessage(message));

        self.state.typing = true;
        updates.push(UiUpdate::ShowTyping);
        updates
    }

    fn new_chat(&mut self) -> Vec<UiUpdate> {
        self.transcript.clear();
        self.state.chat_active = false;
        self.state.sidebar_open = false;
        vec![
            UiUpdate::ClearMessages,
            UiUpdate::ShowWelcome,
            UiUpdate::SetSidebar(false),
        ]
    }

    fn attach(&mut self, label: &'static str) -> Vec<UiUpdate> {
        self.state.file_popup_open = false;
        let mut updates = vec![UiUpdate::SetFilePopup(false)];

        if !self.state.chat_active {
            self.state.chat_active = true;
            updates.push(UiUpdate::ActivateChat);
        }

        let message = ChatMessage::new(MessageKind::Sent, label);
        self.transcript.push(message.clone());
        updates.push(UiUpdate::AppendMessage(message));
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn controller() -> ChatController {
        ChatController::new(Theme::Light, 50)
    }

    fn body_of(update: &UiUpdate) -> &str {
        match update {
            UiUpdate::AppendMessage(m) => &m.body,
            other => panic!("expected AppendMessage, got {other:?}"),
        }
    }

    #[test]
    fn first_submit_activates_chat_and_shows_typing() {
        let mut c = controller();
        let updates = c.handle(UiEvent::Submit {
            text: "hello".into(),
        });

        assert!(matches!(updates[0], UiUpdate::ActivateChat));
        assert_eq!(body_of(&updates[1]), "hello");
        assert!(matches!(updates[2], UiUpdate::ShowTyping));
        assert!(c.state().chat_active);
        assert!(c.state().typing);
        assert_eq!(c.transcript().len(), 1);
    }

    #[test]
    fn second_submit_does_not_reactivate() {
        let mut c = controller();
        c.handle(UiEvent::Submit { text: "one".into() });
        c.reply_received(Ok("fine".into()));

        let updates = c.handle(UiEvent::Submit { text: "two".into() });
        assert!(!updates.iter().any(|u| matches!(u, UiUpdate::ActivateChat)));
    }

    #[test]
    fn blank_submit_is_ignored() {
        let mut c = controller();
        assert!(c.handle(UiEvent::Submit { text: "   ".into() }).is_empty());
        assert!(!c.state().chat_active);
        assert!(c.transcript().is_empty());
    }

    #[test]
    fn submitted_text_is_trimmed() {
        let mut c = controller();
        let updates = c.handle(UiEvent::Submit {
            text: "  hi there  ".into(),
        });
        assert_eq!(body_of(&updates[1]), "hi there");
    }

    #[test]
    fn reply_is_rendered_as_markdown() {
        let mut c = controller();
        c.handle(UiEvent::Submit { text: "hi".into() });

        let updates = c.reply_received(Ok("**bold**".into()));
        assert!(matches!(updates[0], UiUpdate::HideTyping));
        assert_eq!(body_of(&updates[1]), "<p><strong>bold</strong></p>");
        assert!(!c.state().typing);
    }

    #[test]
    fn failed_reply_shows_the_apology() {
        let mut c = controller();
        c.handle(UiEvent::Submit { text: "hi".into() });

        let updates =
            c.reply_received(Err(ChatError::ConnectionError("refused".into())));
        assert_eq!(
            body_of(&updates[1]),
            format!("<p>{REQUEST_FAILED_APOLOGY}</p>")
        );
    }

    #[test]
    fn new_chat_resets_state_and_transcript() {
        let mut c = controller();
        c.handle(UiEvent::Submit { text: "hi".into() });
        c.reply_received(Ok("yo".into()));
        c.handle(UiEvent::ToolsToggled);

        let updates = c.handle(UiEvent::NewChat);
        assert_eq!(
            updates,
            vec![
                UiUpdate::ClearMessages,
                UiUpdate::ShowWelcome,
                UiUpdate::SetSidebar(false),
            ]
        );
        assert!(!c.state().chat_active);
        assert!(!c.state().sidebar_open);
        assert!(c.transcript().is_empty());
    }

    #[test]
    fn sidebar_and_theme_popup_toggle() {
        let mut c = controller();
        assert_eq!(
            c.handle(UiEvent::ToolsToggled),
            vec![UiUpdate::SetSidebar(true)]
        );
        assert_eq!(
            c.handle(UiEvent::ToolsToggled),
            vec![UiUpdate::SetSidebar(false)]
        );
        assert_eq!(
            c.handle(UiEvent::ThemeMenuToggled),
            vec![UiUpdate::SetThemePopup(true)]
        );
    }

    #[test]
    fn picking_a_theme_closes_the_popup() {
        let mut c = controller();
        c.handle(UiEvent::ThemeMenuToggled);

        let updates = c.handle(UiEvent::ThemePicked { theme: Theme::Dark });
        assert_eq!(
            updates,
            vec![
                UiUpdate::ApplyTheme(Theme::Dark),
                UiUpdate::SetThemePopup(false),
            ]
        );
        assert_eq!(c.theme(), Theme::Dark);
        assert!(!c.state().theme_popup_open);
    }

    #[test]
    fn outside_click_dismisses_open_surfaces_only() {
        let mut c = controller();
        c.handle(UiEvent::ToolsToggled);
        c.handle(UiEvent::ThemeMenuToggled);

        // Click inside the popup but outside the sidebar.
        let updates = c.handle(UiEvent::OutsideClick {
            in_theme_popup: true,
            in_sidebar: false,
        });
        assert_eq!(updates, vec![UiUpdate::SetSidebar(false)]);
        assert!(c.state().theme_popup_open);

        // Nothing open, nothing to do.
        let updates = c.handle(UiEvent::OutsideClick {
            in_theme_popup: true,
            in_sidebar: true,
        });
        assert!(updates.is_empty());
    }

    #[test]
    fn attaching_a_file_activates_chat_and_adds_a_sent_bubble() {
        let mut c = controller();
        c.handle(UiEvent::FileUploadOpened);
        assert!(c.state().file_popup_open);

        let updates = c.handle(UiEvent::FileAttached);
        assert_eq!(updates[0], UiUpdate::SetFilePopup(false));
        assert!(matches!(updates[1], UiUpdate::ActivateChat));
        assert_eq!(body_of(&updates[2]), "📁 File attached");
        assert!(!c.state().file_popup_open);
    }

    #[test]
    fn voice_stubs_alert() {
        let mut c = controller();
        assert_eq!(
            c.handle(UiEvent::VoiceRecordRequested),
            vec![UiUpdate::Alert("Voice recording coming soon")]
        );
    }

    #[test]
    fn events_decode_from_the_page_queue() {
        let raw = json!([
            {"type": "submit", "text": "hi"},
            {"type": "theme_picked", "theme": "dark"},
            {"type": "outside_click", "in_theme_popup": true},
            {"type": "new_chat"},
        ]);

        let events = parse_events(raw).unwrap();
        assert_eq!(
            events,
            vec![
                UiEvent::Submit { text: "hi".into() },
                UiEvent::ThemePicked { theme: Theme::Dark },
                UiEvent::OutsideClick {
                    in_theme_popup: true,
                    in_sidebar: false,
                },
                UiEvent::NewChat,
            ]
        );
    }

    #[test]
    fn malformed_events_are_an_error() {
        let raw = json!([{"type": "teleport"}]);
        assert!(matches!(
            parse_events(raw),
            Err(ChatError::EventError(_))
        ));
    }
}
