//! JavaScript snippets injected into the hosting page.
//!
//! The widget is mounted once per session. Afterwards the page only records
//! user intents onto an in-page queue; the driver drains the queue, lets the
//! controller decide, and applies the resulting updates with the scripts
//! below. Payloads travel through `arguments[..]`, never spliced into
//! script text.

use serde_json::{Value, json};

use crate::controller::{TYPING_LABEL, UiUpdate};

/// Name of the in-page intent queue.
pub const EVENT_QUEUE: &str = "__kchat_events";

/// Installs the widget stylesheet, DOM and listeners. Idempotent; takes the
/// fallback theme name as `arguments[0]` (used when the page has no saved
/// preference).
pub const MOUNT: &str = r##"
if (document.getElementById('kchat-root')) return;

window.__kchat_events = [];
const queue = function (event) { window.__kchat_events.push(event); };
const fallbackTheme = arguments[0];

const style = document.createElement('style');
style.textContent = `
#kchat-root{position:fixed;inset:0;display:flex;flex-direction:column;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;z-index:9999;background:#fafafa;color:#1c1c1c}
body.dark-theme #kchat-root{background:#1e1e1e;color:#cccccc}
#welcome-screen{flex:1;display:flex;flex-direction:column;align-items:center;justify-content:center;gap:8px;transition:opacity .3s}
#welcome-screen.hidden{display:none}
#welcome-screen h1{font-size:28px;font-weight:600}
#welcome-screen p{opacity:.6}
#chat-messages-container{flex:1;overflow-y:auto;padding:20px;display:flex;flex-direction:column;gap:10px}
#welcome-screen:not(.hidden)~#chat-messages-container{flex:0}
.message{max-width:75%;padding:10px 14px;border-radius:12px;font-size:14px;line-height:1.5;word-wrap:break-word}
.message-sent{align-self:flex-end;background:#d3e6fd}
.message-received{align-self:flex-start;background:#ececec}
body.dark-theme .message-sent{background:#2a3d55}
body.dark-theme .message-received{background:#2d2d2d}
.message-typing{font-style:italic;opacity:.6}
.message-time{display:block;font-size:11px;opacity:.55;margin-top:4px;text-align:right}
.message h2{font-size:17px;margin:6px 0 4px}
.message h3{font-size:15px;margin:5px 0 3px}
.message ul{margin:4px 0;padding-left:20px}
.message p{margin:3px 0}
#kchat-input-bar{display:flex;gap:8px;padding:14px 20px;border-top:1px solid #d8d8d8;align-items:center}
body.dark-theme #kchat-input-bar{border-color:#3c3c3c}
#chat-input{flex:1;padding:10px 14px;border:1px solid #c8c8c8;border-radius:8px;font-size:14px;outline:none;background:inherit;color:inherit}
#kchat-input-bar button{padding:8px 12px;border:none;border-radius:8px;background:transparent;font-size:15px;cursor:pointer;color:inherit}
#send-button{background:#1a73e8;color:#fff;font-weight:600}
#sidebar{position:fixed;top:0;right:0;bottom:0;width:230px;background:#f1f1f1;padding:60px 14px 14px;transform:translateX(100%);transition:transform .25s;display:flex;flex-direction:column;gap:8px;z-index:10000}
body.dark-theme #sidebar{background:#252526}
#sidebar.active{transform:translateX(0)}
.sidebar-option{padding:10px 12px;border:none;border-radius:8px;background:transparent;text-align:left;font-size:14px;cursor:pointer;color:inherit}
.sidebar-option:hover{background:rgba(128,128,128,.15)}
#theme-popup{position:fixed;right:250px;top:100px;display:none;flex-direction:column;gap:4px;background:#fff;border:1px solid #d8d8d8;border-radius:10px;padding:8px;z-index:10001}
body.dark-theme #theme-popup{background:#2d2d2d;border-color:#3c3c3c}
#theme-popup.active{display:flex}
#theme-popup button{padding:8px 24px;border:none;border-radius:6px;background:transparent;cursor:pointer;color:inherit}
#theme-popup button:hover{background:rgba(128,128,128,.15)}
#file-upload-popup{position:fixed;inset:0;display:none;align-items:center;justify-content:center;background:rgba(0,0,0,.35);z-index:10002}
#file-upload-popup.active{display:flex}
#file-upload-popup .upload-card{display:flex;flex-direction:column;gap:8px;background:#fff;border-radius:12px;padding:20px;min-width:220px}
body.dark-theme #file-upload-popup .upload-card{background:#2d2d2d}
#file-upload-popup button{padding:10px 16px;border:none;border-radius:8px;background:rgba(128,128,128,.12);cursor:pointer;font-size:14px;color:inherit}
`;
document.head.appendChild(style);

const root = document.createElement('div');
root.id = 'kchat-root';
root.innerHTML = `
<div id="welcome-screen">
  <h1>KCHATAI</h1>
  <p>Ask me anything to get started.</p>
</div>
<div id="chat-messages-container"></div>
<div id="kchat-input-bar">
  <button id="attach-button" title="Attach a file">&#128206;</button>
  <input id="chat-input" type="text" placeholder="Type a message..." autocomplete="off" />
  <button id="voice-record-button" title="Voice note">&#127908;</button>
  <button id="voice-chat-button" title="Voice chat">&#128266;</button>
  <button id="send-button">Send</button>
  <button id="tools-button" class="tool-icon" title="More tools">&#8942;</button>
</div>
<div id="sidebar">
  <button id="new-chat-button" class="sidebar-option">New chat</button>
  <button id="theme-button" class="sidebar-option">Theme</button>
</div>
<div id="theme-popup">
  <button data-theme="light">Light</button>
  <button data-theme="dark">Dark</button>
  <button data-theme="system">System</button>
</div>
<div id="file-upload-popup">
  <div class="upload-card">
    <button id="select-file-button">&#128193; File</button>
    <button id="select-photo-button">&#128247; Photo</button>
    <button id="close-upload-button">Close</button>
  </div>
</div>
`;
document.body.appendChild(root);

const input = document.getElementById('chat-input');
const submit = function () {
    queue({ type: 'submit', text: input.value });
    input.value = '';
};
input.addEventListener('keypress', function (e) {
    if (e.key === 'Enter') submit();
});
document.getElementById('send-button').addEventListener('click', submit);

document.getElementById('tools-button').addEventListener('click', function () {
    queue({ type: 'tools_toggled' });
});
document.getElementById('new-chat-button').addEventListener('click', function () {
    queue({ type: 'new_chat' });
});
document.getElementById('theme-button').addEventListener('click', function () {
    queue({ type: 'theme_menu_toggled' });
});
document.querySelectorAll('#theme-popup [data-theme]').forEach(function (btn) {
    btn.addEventListener('click', function () {
        queue({ type: 'theme_picked', theme: btn.getAttribute('data-theme') });
    });
});
document.getElementById('attach-button').addEventListener('click', function () {
    queue({ type: 'file_upload_opened' });
});
document.getElementById('close-upload-button').addEventListener('click', function () {
    queue({ type: 'file_upload_closed' });
});
document.getElementById('select-file-button').addEventListener('click', function () {
    queue({ type: 'file_attached' });
});
document.getElementById('select-photo-button').addEventListener('click', function () {
    queue({ type: 'photo_attached' });
});
document.getElementById('voice-record-button').addEventListener('click', function () {
    queue({ type: 'voice_record_requested' });
});
document.getElementById('voice-chat-button').addEventListener('click', function () {
    queue({ type: 'voice_chat_requested' });
});

document.addEventListener('click', function (e) {
    queue({
        type: 'outside_click',
        in_theme_popup: !!(e.target.closest('#theme-popup') || e.target.closest('.sidebar-option')),
        in_sidebar: !!(e.target.closest('#sidebar') || e.target.closest('.tool-icon'))
    });
});

let saved = null;
try { saved = localStorage.getItem('kchat-theme'); } catch (err) { saved = null; }
if (['light', 'dark', 'system'].indexOf(saved) < 0) saved = null;
queue({ type: 'theme_picked', theme: saved || fallbackTheme });
"##;

/// Returns and clears the queued intents as a JSON array.
pub const DRAIN_EVENTS: &str = r##"
const events = window.__kchat_events || [];
window.__kchat_events = [];
return events;
"##;

/// Appends one bubble. `arguments`: kind (`sent`/`received`), body, time.
/// Sent bodies go through `textContent`; received bodies are pre-rendered
/// HTML and go through `innerHTML`.
const APPEND_MESSAGE: &str = r##"
const container = document.getElementById('chat-messages-container');
if (!container) return;
const kind = arguments[0];
const msg = document.createElement('div');
msg.classList.add('message', 'message-' + kind);
if (kind === 'received') {
    msg.innerHTML = arguments[1];
} else {
    msg.textContent = arguments[1];
}
const time = document.createElement('span');
time.className = 'message-time';
time.textContent = arguments[2];
msg.appendChild(time);
container.appendChild(msg);
container.scrollTop = container.scrollHeight;
"##;

/// Shows the typing indicator bubble. `arguments`: label.
const SHOW_TYPING: &str = r##"
const container = document.getElementById('chat-messages-container');
if (!container) return;
const stale = document.getElementById('typing-indicator');
if (stale) stale.remove();
const typing = document.createElement('div');
typing.id = 'typing-indicator';
typing.className = 'message message-received message-typing';
typing.textContent = arguments[0];
container.appendChild(typing);
container.scrollTop = container.scrollHeight;
"##;

const HIDE_TYPING: &str = r##"
const typing = document.getElementById('typing-indicator');
if (typing) typing.remove();
"##;

const ACTIVATE_CHAT: &str = r##"
const welcome = document.getElementById('welcome-screen');
if (welcome) welcome.classList.add('hidden');
"##;

const SHOW_WELCOME: &str = r##"
const welcome = document.getElementById('welcome-screen');
if (welcome) welcome.classList.remove('hidden');
"##;

const CLEAR_MESSAGES: &str = r##"
const container = document.getElementById('chat-messages-container');
if (container) container.innerHTML = '';
"##;

const SET_SIDEBAR: &str = r##"
const sidebar = document.getElementById('sidebar');
if (sidebar) sidebar.classList.toggle('active', arguments[0]);
"##;

const SET_THEME_POPUP: &str = r##"
const popup = document.getElementById('theme-popup');
if (popup) popup.classList.toggle('active', arguments[0]);
"##;

const SET_FILE_POPUP: &str = r##"
const popup = document.getElementById('file-upload-popup');
if (popup) popup.classList.toggle('active', arguments[0]);
"##;

/// Applies a theme to the page body. `arguments`: theme name; `system`
/// resolves through `matchMedia`. Saves the choice for the next mount.
const APPLY_THEME: &str = r##"
const theme = arguments[0];
const body = document.body;
body.classList.remove('dark-theme', 'light-theme');
if (theme === 'system') {
    if (window.matchMedia('(prefers-color-scheme: dark)').matches) {
        body.classList.add('dark-theme');
    } else {
        body.classList.add('light-theme');
    }
} else {
    body.classList.add(theme + '-theme');
}
try { localStorage.setItem('kchat-theme', theme); } catch (err) {}
"##;

const ALERT: &str = r##"
window.alert(arguments[0]);
"##;

/// Script and argument list for one update.
pub fn update_script(update: &UiUpdate) -> (&'static str, Vec<Value>) {
    match update {
        UiUpdate::ActivateChat => (ACTIVATE_CHAT, vec![]),
        UiUpdate::ShowWelcome => (SHOW_WELCOME, vec![]),
        UiUpdate::AppendMessage(message) => (
            APPEND_MESSAGE,
            vec![json!(message.kind), json!(message.body), json!(message.time)],
        ),
        UiUpdate::ShowTyping => (SHOW_TYPING, vec![json!(TYPING_LABEL)]),
        UiUpdate::HideTyping => (HIDE_TYPING, vec![]),
        UiUpdate::ClearMessages => (CLEAR_MESSAGES, vec![]),
        UiUpdate::SetSidebar(open) => (SET_SIDEBAR, vec![json!(open)]),
        UiUpdate::SetThemePopup(open) => (SET_THEME_POPUP, vec![json!(open)]),
        UiUpdate::SetFilePopup(open) => (SET_FILE_POPUP, vec![json!(open)]),
        UiUpdate::ApplyTheme(theme) => (APPLY_THEME, vec![json!(theme.as_str())]),
        UiUpdate::Alert(text) => (ALERT, vec![json!(text)]),
    }
}
