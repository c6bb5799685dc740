mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use kchat::{
    BotClient, BrowserClient, ChatController, ChatError, UiEvent, UiUpdate,
    controller::parse_events,
    types::WidgetOptions,
    widget,
};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Open {
            endpoint,
            url,
            webdriver,
            headless,
            theme,
            timeout,
            poll_interval,
        } => {
            let options = WidgetOptions::new()
                .endpoint(&endpoint)
                .start_url(&url)
                .webdriver_url(&webdriver)
                .headless(headless)
                .theme(theme)
                .timeout(timeout)
                .poll_interval(poll_interval);

            let bot = BotClient::new(&options.endpoint, options.timeout)
                .context("failed to build the chatbot client")?;
            let mut controller = ChatController::new(options.theme, options.max_messages);
            let tick = options.poll_interval;
            let start_url = options.start_url.clone();

            let mut browser = BrowserClient::connect(options)
                .await
                .context("failed to reach the WebDriver server")?;

            browser.navigate(&start_url).await?;
            browser
                .inject_js(widget::MOUNT, vec![json!(controller.theme().as_str())])
                .await?;
            browser.wait_for_selector("#kchat-root").await?;

            log::info!("widget mounted on {start_url}, polling for events");
            println!("💬 Chat widget ready at {start_url}. Type in the browser. Ctrl+C to exit.");

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    () = tokio::time::sleep(tick) => {
                        if let Err(e) = pump(&mut browser, &mut controller, &bot).await {
                            log::warn!("event pump failed: {e}");
                        }
                    }
                }
            }

            println!("👋 Closing browser session.");
            browser.shutdown().await?;
        }
    }

    Ok(())
}

/// Drains the page event queue once and dispatches everything it finds.
///
/// Submissions run their backend round trip inline, so at most one request
/// is in flight and replies land in the order messages were sent.
async fn pump(
    browser: &mut BrowserClient,
    controller: &mut ChatController,
    bot: &BotClient,
) -> Result<(), ChatError> {
    let raw = browser.execute(widget::DRAIN_EVENTS, vec![]).await?;
    let events = parse_events(raw)?;

    for event in events {
        match event {
            UiEvent::Submit { text } => {
                let updates = controller.handle(UiEvent::Submit { text: text.clone() });
                if updates.is_empty() {
                    continue;
                }
                apply(browser, &updates).await?;

                log::info!("forwarding message ({} chars)", text.trim().len());
                let outcome = bot.send_message(text.trim()).await;
                let updates = controller.reply_received(outcome);
                apply(browser, &updates).await?;
            }
            other => {
                let updates = controller.handle(other);
                apply(browser, &updates).await?;
            }
        }
    }

    Ok(())
}

async fn apply(browser: &mut BrowserClient, updates: &[UiUpdate]) -> Result<(), ChatError> {
    for update in updates {
        let (script, args) = widget::update_script(update);
        browser.inject_js(script, args).await?;
    }
    Ok(())
}
