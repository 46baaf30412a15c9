//! Interaction shell: the menu-driven front end over [`PixelblazeClient`].
//!
//! The shell turns user actions into client calls and client results into
//! screens.  It never touches a terminal directly; everything the user sees or
//! types goes through the [`UserInterface`] trait, so the same shell drives
//! the stdio terminal in `main.rs` and the recording UI in the tests below.
//!
//! # Main menu
//!
//! ```text
//!   a  Patterns     list patterns, pick one, activate it
//!   b  Brightness   show brightness, enter a new value
//!   r  Refresh      drop the cached pattern list and fetch it again
//!   q  Exit         close the connection and return
//! ```
//!
//! Every client call is preceded by a "please wait" screen.  A failing call
//! is reported with a notice and the shell goes back to the main menu; it
//! never retries on its own.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::application::client::PixelblazeClient;
use crate::application::store::{ConfigStore, StoreError};
use crate::domain::config::{device_url, DEFAULT_HOST, DEVICE_URL_KEY};
use crate::domain::error::ClientError;

// ── Actions ───────────────────────────────────────────────────────────────────

/// A main-menu action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Choose and activate a pattern.
    Patterns,
    /// Show and change the brightness.
    Brightness,
    /// Re-fetch the pattern list from the device.
    Refresh,
    /// Leave the shell.
    Exit,
}

impl Action {
    /// Maps a menu key to its action.  Case-insensitive.
    ///
    /// ```rust
    /// use pixelblaze_client::application::shell::Action;
    ///
    /// assert_eq!(Action::from_key('A'), Some(Action::Patterns));
    /// assert_eq!(Action::from_key('x'), None);
    /// ```
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'a' => Some(Action::Patterns),
            'b' => Some(Action::Brightness),
            'r' => Some(Action::Refresh),
            'q' => Some(Action::Exit),
            _ => None,
        }
    }

    /// Menu label shown next to the key.
    pub fn label(self) -> &'static str {
        match self {
            Action::Patterns => "Patterns",
            Action::Brightness => "Brightness",
            Action::Refresh => "Refresh",
            Action::Exit => "Exit",
        }
    }

    /// The key that selects this action.
    pub fn key(self) -> char {
        match self {
            Action::Patterns => 'a',
            Action::Brightness => 'b',
            Action::Refresh => 'r',
            Action::Exit => 'q',
        }
    }

    /// All actions in menu order.
    pub const ALL: [Action; 4] = [
        Action::Patterns,
        Action::Brightness,
        Action::Refresh,
        Action::Exit,
    ];
}

// ── User interface seam ───────────────────────────────────────────────────────

/// Everything the shell needs from a screen and an input device.
#[async_trait]
pub trait UserInterface: Send {
    /// Shows `items` and returns the index picked, or `None` if cancelled.
    async fn choose(&mut self, title: &str, items: &[String]) -> Option<usize>;

    /// Asks for a line of text pre-filled with `initial`.  `None` if cancelled.
    async fn prompt_text(&mut self, label: &str, initial: &str) -> Option<String>;

    /// Shows a message the user must acknowledge.
    async fn notice(&mut self, title: &str, text: &str);

    /// Shows a "please wait" indicator before a slow operation.
    async fn waiting(&mut self, title: &str, text: &str);

    /// Waits for the next main-menu action.
    async fn next_action(&mut self) -> Action;
}

// ── Brightness input ──────────────────────────────────────────────────────────

/// Why a brightness entry was rejected.
#[derive(Debug, Error, PartialEq)]
pub enum BrightnessError {
    #[error("{0:?} is not a number")]
    NotANumber(String),

    #[error("brightness must be between 0.0 and 1.0, got {0}")]
    OutOfRange(f64),
}

/// Parses user input as a brightness in `0.0..=1.0`.
///
/// # Errors
///
/// Returns [`BrightnessError`] for non-numeric or out-of-range input.
pub fn parse_brightness(input: &str) -> Result<f64, BrightnessError> {
    let trimmed = input.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| BrightnessError::NotANumber(trimmed.to_string()))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(BrightnessError::OutOfRange(value))
    }
}

// ── Device URL setup ──────────────────────────────────────────────────────────

/// Returns the stored device URL, asking the user for a hostname first if
/// none is stored yet.
///
/// The URL built from the hostname is persisted before it is returned.
/// Returns `Ok(None)` if the user cancels or enters nothing.
///
/// # Errors
///
/// Returns [`StoreError`] if the new URL cannot be persisted.
pub async fn ensure_device_url(
    store: &mut dyn ConfigStore,
    ui: &mut dyn UserInterface,
) -> Result<Option<String>, StoreError> {
    if let Some(url) = store.get(DEVICE_URL_KEY) {
        return Ok(Some(url));
    }

    let Some(host) = ui.prompt_text("Pixelblaze hostname", DEFAULT_HOST).await else {
        return Ok(None);
    };
    if host.trim().is_empty() {
        return Ok(None);
    }

    let url = device_url(&host);
    store.set(DEVICE_URL_KEY, &url)?;
    info!("device URL set to {}", url);
    Ok(Some(url))
}

// ── Shell ─────────────────────────────────────────────────────────────────────

/// Menu loop that owns the client and the user interface.
pub struct Shell<U: UserInterface> {
    client: PixelblazeClient,
    ui: U,
}

impl<U: UserInterface> Shell<U> {
    pub fn new(client: PixelblazeClient, ui: U) -> Self {
        Self { client, ui }
    }

    pub fn client(&self) -> &PixelblazeClient {
        &self.client
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    /// Runs the main menu until the user picks [`Action::Exit`], then closes
    /// the connection.
    pub async fn run(&mut self) {
        loop {
            let action = self.ui.next_action().await;
            if !self.dispatch(action).await {
                break;
            }
        }
        self.close().await;
        info!("shell exited");
    }

    /// Closes the device connection.  Safe to call after [`Shell::run`] has
    /// returned or was dropped part-way.
    pub async fn close(&mut self) {
        self.client.close().await;
    }

    /// Runs one action.  Returns `false` for [`Action::Exit`].
    ///
    /// Client errors are shown to the user and swallowed.
    pub async fn dispatch(&mut self, action: Action) -> bool {
        let result = match action {
            Action::Patterns => self.choose_pattern().await,
            Action::Brightness => self.choose_brightness().await,
            Action::Refresh => self.refresh_patterns().await,
            Action::Exit => return false,
        };

        if let Err(e) = result {
            warn!("{} failed: {}", action.label(), e);
            self.ui.notice(&error_title(&e), &e.to_string()).await;
        }
        true
    }

    /// Lists patterns, lets the user pick one and activates it.
    ///
    /// # Errors
    ///
    /// Propagates any [`ClientError`] from listing or activation.
    pub async fn choose_pattern(&mut self) -> Result<(), ClientError> {
        self.ui.waiting("Patterns", "Loading patterns...").await;
        let catalog = self.client.list_patterns().await?;

        if catalog.is_empty() {
            self.ui.notice("Patterns", "No patterns on the device").await;
            return Ok(());
        }

        let names: Vec<String> = catalog.iter().map(|p| p.name.clone()).collect();
        let Some(pattern) = self
            .ui
            .choose("Patterns", &names)
            .await
            .and_then(|index| catalog.get(index))
        else {
            return Ok(());
        };

        self.ui
            .waiting("Patterns", &format!("Activating {}...", pattern.name))
            .await;
        self.client.set_pattern(&pattern.id).await?;
        self.ui
            .notice("Patterns", &format!("{} activated", pattern.name))
            .await;
        Ok(())
    }

    /// Shows the brightness, asks for a new value and sends it.
    ///
    /// Input that is not a number in `0.0..=1.0` is reported and not sent.
    ///
    /// # Errors
    ///
    /// Propagates any [`ClientError`] from the client.
    pub async fn choose_brightness(&mut self) -> Result<(), ClientError> {
        self.ui.waiting("Brightness", "Reading brightness...").await;
        let current = self.client.get_brightness().await?;

        let Some(input) = self
            .ui
            .prompt_text("Brightness (0.0 - 1.0)", &current.to_string())
            .await
        else {
            return Ok(());
        };

        let value = match parse_brightness(&input) {
            Ok(value) => value,
            Err(e) => {
                self.ui.notice("Brightness", &e.to_string()).await;
                return Ok(());
            }
        };

        self.ui.waiting("Brightness", "Setting brightness...").await;
        self.client.set_brightness(value).await?;
        self.ui
            .notice("Brightness", &format!("Brightness set to {value}"))
            .await;
        Ok(())
    }

    /// Drops the cached catalog and fetches it again.
    ///
    /// # Errors
    ///
    /// Propagates any [`ClientError`] from the listing.
    pub async fn refresh_patterns(&mut self) -> Result<(), ClientError> {
        self.ui.waiting("Patterns", "Reloading patterns...").await;
        let catalog = self.client.refresh_patterns().await?;
        self.ui
            .notice("Patterns", &format!("{} patterns loaded", catalog.len()))
            .await;
        Ok(())
    }
}

fn error_title(e: &ClientError) -> String {
    let kind = e.kind();
    let mut title = kind[..1].to_ascii_uppercase();
    title.push_str(&kind[1..]);
    title.push_str(" error");
    title
}

// ── Tests ─────────────────────────────────────────────────────────────────────
