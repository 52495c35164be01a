use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, RwLock};

use coffer_types::{AccountId, Amount};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Observations emitted by the ledger engine.
///
/// Events are best-effort observability, not part of the consistency
/// contract: the engine emits them after state has been committed, and
/// a sink failure never rolls an operation back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEvent {
    Deposited {
        account: AccountId,
        amount: Amount,
        new_balance: Amount,
    },
    Withdrawn {
        account: AccountId,
        amount: Amount,
        new_balance: Amount,
    },
    InterestAccrued {
        account: AccountId,
        amount: Amount,
    },
}

/// Append-only, ordered event sink. At-least-once delivery is fine.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &LedgerEvent);
}

/// Sink that records events in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: RwLock<Vec<LedgerEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events emitted so far, in order.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.read().map(|e| e.clone()).unwrap_or_default()
    }

    /// Drain and return all recorded events.
    pub fn take(&self) -> Vec<LedgerEvent> {
        self.events
            .write()
            .map(|mut e| std::mem::take(&mut *e))
            .unwrap_or_default()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &LedgerEvent) {
        if let Ok(mut events) = self.events.write() {
            events.push(event.clone());
        }
    }
}

/// Sink that appends one JSON line per event to a log file.
pub struct JsonlSink {
    file: Mutex<File>,
}

impl JsonlSink {
    /// Open (or create) the log file in append mode.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl EventSink for JsonlSink {
    fn emit(&self, event: &LedgerEvent) {
        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "failed to serialize ledger event; dropping");
                return;
            }
        };
        match self.file.lock() {
            Ok(mut file) => {
                if let Err(e) = writeln!(file, "{line}") {
                    warn!(error = %e, "failed to append ledger event; dropping");
                }
            }
            Err(_) => warn!("event log lock poisoned; dropping event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn memory_sink_preserves_order() {
        let sink = MemorySink::new();
        let account = AccountId::ephemeral();

        sink.emit(&LedgerEvent::InterestAccrued {
            account,
            amount: 7,
        });
        sink.emit(&LedgerEvent::Deposited {
            account,
            amount: 100,
            new_balance: 107,
        });

        let events = sink.take();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], LedgerEvent::InterestAccrued { .. }));
        assert!(matches!(events[1], LedgerEvent::Deposited { .. }));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn jsonl_sink_appends_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let sink = JsonlSink::open(&path).unwrap();
        let account = AccountId::ephemeral();

        sink.emit(&LedgerEvent::Deposited {
            account,
            amount: 1,
            new_balance: 1,
        });
        sink.emit(&LedgerEvent::Withdrawn {
            account,
            amount: 1,
            new_balance: 0,
        });

        let mut contents = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: LedgerEvent = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(
            first,
            LedgerEvent::Deposited {
                account,
                amount: 1,
                new_balance: 1
            }
        );
    }
}
