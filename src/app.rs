//! Application state and command handling for the line-driven console

use admission_wizard::admission;
use admission_wizard::storage::{DraftStore, FileDraftStore, MemoryDraftStore};
use admission_wizard::wizard::{AutosaveHandle, SharedController, WizardOptions, WizardView};
use admission_wizard::{Attachment, WizardConfig, WizardController, WizardError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const HELP: &str = "\
Commands:
  set <field> <value>          store a field value
  check <field>                validate the stored value of a field
  attach <key> <file> <bytes>  attach a document
  detach <key>                 remove a document
  next | back                  move between steps
  save                         save the draft now
  submit                       submit from the last step
  show                         print the current state
  quit                         save and exit";

/// One console command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set { field: String, value: String },
    Check { field: String },
    Attach { key: String, file_name: String, size_bytes: u64 },
    Detach { key: String },
    Next,
    Back,
    Save,
    Submit,
    Show,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line; returns a usage message on bad input
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();

        match verb.to_ascii_lowercase().as_str() {
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err("usage: set <field> <value>".to_string());
                }
                Ok(Self::Set {
                    field: field.to_string(),
                    value: value.trim().to_string(),
                })
            }
            "check" => match args.next() {
                Some(field) => Ok(Self::Check {
                    field: field.to_string(),
                }),
                None => Err("usage: check <field>".to_string()),
            },
            "attach" => match (args.next(), args.next(), args.next()) {
                (Some(key), Some(file), Some(size)) => {
                    let size_bytes = size
                        .parse()
                        .map_err(|_| format!("invalid size in bytes: {size}"))?;
                    Ok(Self::Attach {
                        key: key.to_string(),
                        file_name: file.to_string(),
                        size_bytes,
                    })
                }
                _ => Err("usage: attach <key> <file> <bytes>".to_string()),
            },
            "detach" => match args.next() {
                Some(key) => Ok(Self::Detach {
                    key: key.to_string(),
                }),
                None => Err("usage: detach <key>".to_string()),
            },
            "next" => Ok(Self::Next),
            "back" | "prev" => Ok(Self::Back),
            "save" => Ok(Self::Save),
            "submit" => Ok(Self::Submit),
            "show" | "" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command: {other} (try 'help')")),
        }
    }
}

/// Main application struct
pub struct App {
    /// Wizard session shared with the autosave task
    pub controller: SharedController,
    autosave: Option<AutosaveHandle>,
    /// Whether the app should quit
    quit: bool,
    /// Feedback for the last command
    pub status_message: Option<String>,
}

impl App {
    /// Build the app from configuration: file-backed drafts when a draft
    /// directory is known, in-memory otherwise
    pub async fn new(config: &WizardConfig) -> Self {
        let store: Arc<dyn DraftStore> = match config.draft_dir() {
            Some(dir) => {
                tracing::info!("Drafts stored in {}", dir.display());
                Arc::new(FileDraftStore::new(dir))
            }
            None => {
                tracing::warn!("No data directory available; drafts will not outlive this run");
                Arc::new(MemoryDraftStore::new())
            }
        };
        Self::with_store(store, config.wizard_options(), config.autosave_interval()).await
    }

    pub async fn with_store(
        store: Arc<dyn DraftStore>,
        options: WizardOptions,
        autosave_interval: Option<Duration>,
    ) -> Self {
        let controller = WizardController::open(admission::registry(), store, options).await;
        let controller = Arc::new(Mutex::new(controller));
        let autosave =
            autosave_interval.map(|period| AutosaveHandle::spawn(controller.clone(), period));

        Self {
            controller,
            autosave,
            quit: false,
            status_message: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub async fn view(&self) -> WizardView {
        self.controller.lock().await.view()
    }

    /// Drain warnings raised since the last call
    pub async fn take_warnings(&self) -> Vec<String> {
        self.controller.lock().await.take_warnings()
    }

    /// Apply one command. Wizard errors become the status message; they
    /// never end the session.
    pub async fn handle_command(&mut self, command: Command) {
        let result = self.dispatch(command).await;
        self.status_message = match result {
            Ok(message) => message,
            Err(e) => Some(describe(&e)),
        };
    }

    async fn dispatch(&mut self, command: Command) -> Result<Option<String>, WizardError> {
        let mut controller = self.controller.lock().await;
        match command {
            Command::Set { field, value } => {
                controller.set_field(&field, value)?;
                Ok(None)
            }
            Command::Check { field } => {
                let valid = controller.blur_field(&field)?;
                Ok(Some(match controller.errors().field_error(&field) {
                    Some(message) if !valid => format!("{field}: {message}"),
                    _ => format!("{field}: ok"),
                }))
            }
            Command::Attach {
                key,
                file_name,
                size_bytes,
            } => {
                controller.attach_document(&key, Attachment::new(file_name, size_bytes))?;
                Ok(Some(format!("{key} attached")))
            }
            Command::Detach { key } => {
                let removed = controller.remove_document(&key)?;
                Ok(removed.map(|a| format!("{} removed", a.file_name)))
            }
            Command::Next => {
                let step = controller.advance().await?;
                Ok(Some(format!("Now on step {step}")))
            }
            Command::Back => {
                let step = controller.retreat()?;
                Ok(Some(format!("Now on step {step}")))
            }
            Command::Save => {
                controller.save_draft().await?;
                Ok(Some("Draft saved".to_string()))
            }
            Command::Submit => {
                let id = controller.submit().await?;
                Ok(Some(format!("Application submitted successfully: {id}")))
            }
            Command::Show => Ok(None),
            Command::Help => Ok(Some(HELP.to_string())),
            Command::Quit => {
                if controller.is_dirty() && !controller.is_submitted() {
                    // Failure is already recorded as a warning
                    let _ = controller.save_draft().await;
                }
                self.quit = true;
                Ok(None)
            }
        }
    }

    /// Stop background work
    pub async fn shutdown(mut self) {
        if let Some(handle) = self.autosave.take() {
            handle.shutdown().await;
        }
    }
}

fn describe(error: &WizardError) -> String {
    match error {
        WizardError::Validation(errors) => {
            let lines: Vec<String> = errors
                .iter()
                .map(|(field, message)| format!("  {field}: {message}"))
                .collect();
            format!("Please fix the following:\n{}", lines.join("\n"))
        }
        other => other.to_string(),
    }
}
