use clap::{Parser, Subcommand};
use kchat::types::Theme;

#[derive(Parser, Debug)]
#[command(name = "kc", about = r#"
 __  __     ______     __  __     ______     ______
/\ \/ /    /\  ___\   /\ \_\ \   /\  __ \   /\__  _\
\ \  _"-.  \ \ \____  \ \  __ \  \ \  __ \  \/_/\ \/
 \ \_\ \_\  \ \_____\  \ \_\ \_\  \ \_\ \_\    \ \_\
  \/_/\/_/   \/_____/   \/_/\/_/   \/_/\/_/     \/_/
    "#, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the chat widget in a browser session
    Open {
        /// Chatbot endpoint receiving {"message"} POSTs
        #[arg(short, long, default_value = "http://127.0.0.1:5000/chat")]
        endpoint: String,

        /// Page to host the widget on
        #[arg(short, long, default_value = "about:blank")]
        url: String,

        /// WebDriver server address
        #[arg(long, default_value = "http://localhost:4444")]
        webdriver: String,

        /// Run the browser without a visible window
        #[arg(long)]
        headless: bool,

        /// Theme used when the page has no saved preference
        #[arg(long, default_value = "light")]
        theme: Theme,

        /// Backend request timeout, in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,

        /// How often the page event queue is drained, in milliseconds
        #[arg(long, default_value_t = 500)]
        poll_interval: u64,
    },
}
