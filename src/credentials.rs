use anyhow::{Context, Result};
use std::io::{IsTerminal, Write};

use crate::config::Config;

/// Tri-state key availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAvailability {
    /// Not yet checked
    Unknown,
    /// A usable credential is configured
    Available,
    /// No credential found; selection may fix it
    Unavailable,
}

/// The host's credential capability, injected so the gate can be tested
/// with a scripted double.
pub trait CredentialSource {
    /// Probe for an existing credential.
    fn has_selected_key(&self) -> Result<bool>;

    /// Run the selection flow. Blocks until the user completes or cancels.
    fn open_select_key(&mut self) -> Result<()>;
}

/// Gate over key availability. A gate built without a source models a host
/// that exposes no credential capability and is fail-open: availability is
/// assumed without invoking anything.
///
/// `Available` is terminal for the session; neither operation downgrades it.
pub struct KeyGate<S> {
    source: Option<S>,
    state: KeyAvailability,
}

impl<S: CredentialSource> KeyGate<S> {
    pub fn new(source: Option<S>) -> Self {
        Self {
            source,
            state: KeyAvailability::Unknown,
        }
    }

    pub fn availability(&self) -> KeyAvailability {
        self.state
    }

    /// Probe the source for an existing credential. Probe failures are
    /// logged and reported as `Unavailable`, never propagated.
    pub fn check_availability(&mut self) -> KeyAvailability {
        if self.state == KeyAvailability::Available {
            return self.state;
        }

        let Some(source) = &self.source else {
            self.state = KeyAvailability::Available;
            return self.state;
        };

        self.state = match source.has_selected_key() {
            Ok(true) => KeyAvailability::Available,
            Ok(false) => KeyAvailability::Unavailable,
            Err(e) => {
                tracing::warn!("Credential probe failed: {:#}", e);
                KeyAvailability::Unavailable
            }
        };
        self.state
    }

    /// Run the selection round trip. On success, availability is reported
    /// optimistically without a second probe; the credential store may lag
    /// behind the completed selection. Failures are logged, not raised.
    pub fn request_selection(&mut self) -> KeyAvailability {
        if self.state == KeyAvailability::Available {
            return self.state;
        }

        let Some(source) = &mut self.source else {
            self.state = KeyAvailability::Available;
            return self.state;
        };

        self.state = match source.open_select_key() {
            Ok(()) => KeyAvailability::Available,
            Err(e) => {
                tracing::warn!("Key selection failed: {:#}", e);
                KeyAvailability::Unavailable
            }
        };
        self.state
    }
}

/// Production credential source: probes the environment variable and the
/// config file, and selects by prompting for a key on stdin, persisting it
/// to the config file.
pub struct HostCredentials {
    config: Config,
}

impl HostCredentials {
    /// Detect whether a usable selection UI exists. A non-interactive stdin
    /// has none, which the gate treats as "assume pre-configured".
    pub fn detect(config: &Config) -> Option<Self> {
        if !std::io::stdin().is_terminal() {
            tracing::debug!("stdin is not a terminal; assuming key is pre-configured");
            return None;
        }
        Some(Self {
            config: config.clone(),
        })
    }
}

impl CredentialSource for HostCredentials {
    fn has_selected_key(&self) -> Result<bool> {
        if std::env::var("GEMINI_API_KEY").map_or(false, |v| !v.is_empty()) {
            return Ok(true);
        }
        Ok(self.config.api.key.is_some())
    }

    fn open_select_key(&mut self) -> Result<()> {
        println!("A Gemini API key is required. Get one at https://aistudio.google.com/apikey");
        print!("Paste your API key: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .context("Failed to read API key from stdin")?;

        let key = line.trim();
        if key.is_empty() {
            anyhow::bail!("No API key entered");
        }

        self.config.set("api.key", key)?;
        self.config.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Scripted source that counts invocations.
    struct Scripted {
        probe: Result<bool, ()>,
        select_ok: bool,
        probe_calls: Cell<usize>,
        select_calls: usize,
    }

    impl Scripted {
        fn new(probe: Result<bool, ()>, select_ok: bool) -> Self {
            Self {
                probe,
                select_ok,
                probe_calls: Cell::new(0),
                select_calls: 0,
            }
        }
    }

    impl CredentialSource for Scripted {
        fn has_selected_key(&self) -> Result<bool> {
            self.probe_calls.set(self.probe_calls.get() + 1);
            match self.probe {
                Ok(v) => Ok(v),
                Err(()) => anyhow::bail!("probe exploded"),
            }
        }

        fn open_select_key(&mut self) -> Result<()> {
            self.select_calls += 1;
            if self.select_ok {
                Ok(())
            } else {
                anyhow::bail!("user cancelled")
            }
        }
    }

    #[test]
    fn no_capability_is_fail_open() {
        let mut gate: KeyGate<Scripted> = KeyGate::new(None);
        assert_eq!(gate.availability(), KeyAvailability::Unknown);
        assert_eq!(gate.check_availability(), KeyAvailability::Available);
    }

    #[test]
    fn probe_true_is_available() {
        let mut gate = KeyGate::new(Some(Scripted::new(Ok(true), true)));
        assert_eq!(gate.check_availability(), KeyAvailability::Available);
    }

    #[test]
    fn probe_false_then_selection_succeeds_without_second_probe() {
        let mut gate = KeyGate::new(Some(Scripted::new(Ok(false), true)));

        assert_eq!(gate.check_availability(), KeyAvailability::Unavailable);
        assert_eq!(gate.request_selection(), KeyAvailability::Available);

        let source = gate.source.as_ref().unwrap();
        assert_eq!(source.probe_calls.get(), 1);
        assert_eq!(source.select_calls, 1);
    }

    #[test]
    fn probe_error_is_unavailable_not_propagated() {
        let mut gate = KeyGate::new(Some(Scripted::new(Err(()), true)));
        assert_eq!(gate.check_availability(), KeyAvailability::Unavailable);
    }

    #[test]
    fn selection_failure_stays_unavailable() {
        let mut gate = KeyGate::new(Some(Scripted::new(Ok(false), false)));

        assert_eq!(gate.check_availability(), KeyAvailability::Unavailable);
        assert_eq!(gate.request_selection(), KeyAvailability::Unavailable);
        assert_eq!(gate.availability(), KeyAvailability::Unavailable);
    }

    #[test]
    fn available_is_terminal() {
        let mut gate = KeyGate::new(Some(Scripted::new(Ok(true), false)));

        assert_eq!(gate.check_availability(), KeyAvailability::Available);
        assert_eq!(gate.check_availability(), KeyAvailability::Available);
        assert_eq!(gate.request_selection(), KeyAvailability::Available);

        let source = gate.source.as_ref().unwrap();
        assert_eq!(source.probe_calls.get(), 1);
        assert_eq!(source.select_calls, 0);
    }
}
