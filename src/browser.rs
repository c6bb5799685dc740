use fantoccini::{Client, ClientBuilder, wd::Capabilities};
use serde_json::{Value, json};

use crate::types::{ChatError, WidgetOptions};

/// WebDriver session hosting the widget, powered by `fantoccini`.
pub struct BrowserClient {
    /// The underlying WebDriver client instance.
    client: Client,
    /// Configuration options used to initialize the browser.
    options: WidgetOptions,
}

impl BrowserClient {
    /// Connects to the WebDriver server with the given options and returns
    /// a `BrowserClient`.
    pub async fn connect(options: WidgetOptions) -> Result<Self, ChatError> {
        let mut caps = Capabilities::new();

        let mut firefox_options = json!({
            "args": if options.headless {
                vec!["-headless"]
            } else {
                vec![]
            }
        });

        if let Some(ua) = &options.user_agent {
            firefox_options["prefs"] = json!({
                "general.useragent.override": ua
            });
        }

        caps.insert("moz:firefoxOptions".to_string(), firefox_options);

        if let Some(proxy) = &options.proxy {
            caps.insert(
                "proxy".to_string(),
                json!({
                    "proxyType": "manual",
                    "httpProxy": proxy,
                    "sslProxy": proxy
                }),
            );
        }

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&options.webdriver_url)
            .await
            .map_err(|e| ChatError::ConnectionError(e.to_string()))?;

        if let Some((width, height)) = options.window_size {
            client
                .set_window_size(width, height)
                .await
                .map_err(|e| ChatError::OperationError(e.to_string()))?;
        }

        Ok(Self { client, options })
    }

    /// Configuration this session was opened with.
    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }

    /// Navigates the session to the given URL.
    pub async fn navigate(&mut self, url: &str) -> Result<(), ChatError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| ChatError::OperationError(e.to_string()))
    }

    /// Executes a script with JSON arguments and returns its result.
    pub async fn execute(&mut self, script: &str, args: Vec<Value>) -> Result<Value, ChatError> {
        self.client
            .execute(script, args)
            .await
            .map_err(|e| ChatError::OperationError(e.to_string()))
    }

    /// Executes a script, discarding its result.
    pub async fn inject_js(&mut self, script: &str, args: Vec<Value>) -> Result<(), ChatError> {
        self.execute(script, args).await.map(|_| ())
    }

    /// Waits for a specific CSS selector to be present on the page.
    pub async fn wait_for_selector(&mut self, selector: &str) -> Result<(), ChatError> {
        self.client
            .wait()
            .for_element(fantoccini::Locator::Css(selector))
            .await
            .map(|_| ())
            .map_err(|e| {
                ChatError::OperationError(format!(
                    "Page not ready (waiting for '{selector}'): {e}"
                ))
            })
    }

    /// Shuts down the browser session and closes the webdriver.
    pub async fn shutdown(self) -> Result<(), ChatError> {
        self.client
            .close()
            .await
            .map_err(|e| ChatError::OperationError(e.to_string()))
    }
}
