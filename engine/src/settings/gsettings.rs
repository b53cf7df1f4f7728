use super::{
    Listener, ListenerId, ListenerRegistry, SettingsKey, SettingsStore, StoreError,
    StoreOperation,
};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};

/// Default name of the settings command-line tool.
pub const GSETTINGS_PROGRAM: &str = "gsettings";

/// Settings store backed by the desktop settings daemon.
///
/// Reads and writes go through `gsettings get` / `gsettings set`. Writes made
/// by other processes are picked up by a [`ChangeMonitor`]; the owner feeds
/// them back through [`GsettingsStore::notify_external`] on its own thread.
#[derive(Debug)]
pub struct GsettingsStore {
    program: PathBuf,
    listeners: ListenerRegistry,
}

impl GsettingsStore {
    pub fn new() -> Self {
        Self::with_program(GSETTINGS_PROGRAM)
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Start watching `key` for writes from any process.
    pub fn monitor(&self, key: &SettingsKey) -> Result<ChangeMonitor, StoreError> {
        ChangeMonitor::spawn(&self.program, key)
    }

    /// Deliver a change observed by a [`ChangeMonitor`] to local listeners.
    pub fn notify_external(&self, key: &SettingsKey) -> usize {
        self.listeners.notify(key)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn run(
        &self,
        operation: StoreOperation,
        key: &SettingsKey,
        args: &[&str],
    ) -> Result<String, StoreError> {
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                StoreError::unavailable(
                    operation,
                    key,
                    format!("failed to run '{}': {e}", self.program.display()),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StoreError::unavailable(
                operation,
                key,
                format!(
                    "'{}' exited with {}: {}",
                    self.program.display(),
                    output.status,
                    stderr.trim()
                ),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for GsettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for GsettingsStore {
    fn get(&self, key: &SettingsKey) -> Result<String, StoreError> {
        let raw = self.run(StoreOperation::Read, key, &["get", key.schema(), key.key()])?;
        parse_gvariant_string(&raw).ok_or_else(|| StoreError::InvalidValue {
            key: key.to_string(),
            raw: raw.trim().to_string(),
        })
    }

    fn set(&self, key: &SettingsKey, value: &str) -> Result<(), StoreError> {
        let quoted = quote_gvariant_string(value);
        self.run(
            StoreOperation::Write,
            key,
            &["set", key.schema(), key.key(), quoted.as_str()],
        )?;
        log::info!("Set {key} to '{value}'");
        self.listeners.notify(key);
        Ok(())
    }

    fn subscribe(&self, key: &SettingsKey, listener: Listener) -> ListenerId {
        self.listeners.subscribe(key, listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

/// Running `gsettings monitor` process for one key.
///
/// A reader thread parses the monitor output and sends each new value over a
/// channel. The process is killed when the monitor is stopped or dropped.
pub struct ChangeMonitor {
    child: Child,
    receiver: flume::Receiver<String>,
    reader: Option<JoinHandle<()>>,
}

impl ChangeMonitor {
    pub fn spawn(program: &Path, key: &SettingsKey) -> Result<Self, StoreError> {
        let mut child = Command::new(program)
            .args(["monitor", key.schema(), key.key()])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                StoreError::unavailable(
                    StoreOperation::Monitor,
                    key,
                    format!("failed to run '{}': {e}", program.display()),
                )
            })?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            return Err(StoreError::unavailable(
                StoreOperation::Monitor,
                key,
                "monitor process has no output stream",
            ));
        };

        let (sender, receiver) = flume::unbounded();
        let watched = key.key().to_string();
        let reader = thread::Builder::new()
            .name("gsettings-monitor".to_string())
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let Ok(line) = line else { break };
                    match parse_monitor_line(&watched, &line) {
                        Some(value) => {
                            if sender.send(value).is_err() {
                                break;
                            }
                        }
                        None => log::debug!("Ignoring monitor output: {line}"),
                    }
                }
            });

        let reader = match reader {
            Ok(handle) => handle,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(StoreError::unavailable(
                    StoreOperation::Monitor,
                    key,
                    format!("failed to start monitor reader: {e}"),
                ));
            }
        };

        log::debug!("Monitoring {key} (pid {})", child.id());
        Ok(Self {
            child,
            receiver,
            reader: Some(reader),
        })
    }

    /// Values observed so far. Disconnects once the monitor process exits.
    pub fn receiver(&self) -> &flume::Receiver<String> {
        &self.receiver
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for ChangeMonitor {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
    }
}

/// Quote `value` as a GVariant string literal.
pub fn quote_gvariant_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\\' | '\'' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// Decode a printed GVariant string such as `'Adwaita'` or `"it's"`.
pub fn parse_gvariant_string(text: &str) -> Option<String> {
    let text = text.trim();
    let text = text.strip_prefix("@s ").unwrap_or(text);

    let mut chars = text.chars();
    let quote = chars.next().filter(|c| *c == '\'' || *c == '"')?;

    let mut value = String::new();
    let mut escaped = false;
    let mut closed = false;
    for c in chars.by_ref() {
        if escaped {
            value.push(match c {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => other,
            });
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            closed = true;
            break;
        } else {
            value.push(c);
        }
    }

    if closed && chars.next().is_none() {
        Some(value)
    } else {
        None
    }
}

/// Decode a `gsettings monitor` line (`icon-theme: 'Adwaita'`) for `key`.
pub fn parse_monitor_line(key: &str, line: &str) -> Option<String> {
    let rest = line.strip_prefix(key)?.strip_prefix(':')?;
    parse_gvariant_string(rest)
}
