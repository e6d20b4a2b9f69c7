// Persistence capability for match checks.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration;
use tracing::debug;

use matchscout_core::db::Database;

use crate::engine::{CheckStatus, MatchCheck};

/// Somewhere to record completed match checks.
///
/// Recording is best effort from the engine's point of view: an error is
/// logged and the check is still returned to the caller.
pub trait LookupSink: Send + Sync {
    fn record(&self, check: &MatchCheck) -> Result<()>;
}

/// SQLite-backed sink that also enforces the retention window on each write.
pub struct HistorySink {
    db: Arc<Database>,
    retention: Duration,
}

impl HistorySink {
    pub fn new(db: Arc<Database>, retention_days: u32) -> Self {
        Self {
            db,
            retention: Duration::days(i64::from(retention_days)),
        }
    }
}

impl LookupSink for HistorySink {
    fn record(&self, check: &MatchCheck) -> Result<()> {
        let payload = serde_json::to_value(check).context("failed to serialize match check")?;
        self.db.record_lookup(
            &check.battle_tag,
            check.status == CheckStatus::InGame,
            &payload,
            check.checked_at,
        )?;

        let purged = self.db.purge_older_than(check.checked_at - self.retention)?;
        if purged > 0 {
            debug!(purged, "expired match checks removed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::at;

    fn check(tag: &str, when: &str, status: CheckStatus) -> MatchCheck {
        MatchCheck {
            status,
            battle_tag: tag.to_string(),
            ongoing: None,
            opponents: Vec::new(),
            checked_at: at(when),
        }
    }

    #[test]
    fn records_and_reads_back() {
        let db = Arc::new(Database::open(":memory:").unwrap());
        let sink = HistorySink::new(Arc::clone(&db), 30);

        sink.record(&check("Me#1234", "2025-03-10T12:00:00Z", CheckStatus::NotInGame)).unwrap();
        sink.record(&check("Me#1234", "2025-03-10T12:05:00Z", CheckStatus::InGame)).unwrap();

        let stored = db.recent_lookups(10).unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored[0].is_in_game);
        assert_eq!(stored[0].payload["status"], serde_json::json!("in_game"));
        assert_eq!(stored[1].payload["battle_tag"], serde_json::json!("Me#1234"));
    }

    #[test]
    fn applies_retention_on_write() {
        let db = Arc::new(Database::open(":memory:").unwrap());
        let sink = HistorySink::new(Arc::clone(&db), 7);

        sink.record(&check("Old#1234", "2025-01-01T00:00:00Z", CheckStatus::NotInGame)).unwrap();
        sink.record(&check("New#1234", "2025-03-10T00:00:00Z", CheckStatus::NotInGame)).unwrap();

        let stored = db.recent_lookups(10).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].battle_tag, "New#1234");
    }
}
