use crate::db::Database;
use crate::error::{PlotCareError, Result};
use crate::models::{
    AlertKind, AlertRecord, Priority, Reminder, ReminderKind, ReminderStatistics,
    ReminderStatus, StoredAlert, StoredReminder,
};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::warn;

/// A pending alert of the same kind for the same plot within this window is not recorded again.
const ALERT_DEDUP_WINDOW_HOURS: i64 = 1;

// Timestamps are stored at second precision so that text comparison orders them.
fn ts(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| {
            warn!(timestamp = %raw, "Unparseable timestamp in ledger, using now");
            Utc::now()
        })
}

// Reminder Queries

impl Database {
    /// Record reminders as pending. Reminders already in the ledger are skipped.
    /// Returns how many rows were inserted.
    pub fn record_reminders(&self, reminders: &[Reminder], now: DateTime<Utc>) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let mut inserted = 0;
            {
                let mut stmt = tx.prepare(
                    r#"
                    INSERT OR IGNORE INTO reminders
                        (garden_label, kind, title, description, due_date, priority, tips,
                         status, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'pending', ?8)
                    "#,
                )?;
                for reminder in reminders {
                    inserted += stmt.execute(params![
                        reminder.garden_label,
                        reminder.kind.as_str(),
                        reminder.title,
                        reminder.description,
                        ts(reminder.due_date),
                        reminder.priority.as_str(),
                        reminder.tips,
                        ts(now),
                    ])?;
                }
            }
            tx.commit()?;
            Ok(inserted)
        })
    }

    pub fn list_reminders(&self, status: Option<ReminderStatus>) -> Result<Vec<StoredReminder>> {
        self.with_conn(|conn| {
            let reminders = match status {
                Some(status) => {
                    let mut stmt = conn.prepare(
                        "SELECT * FROM reminders WHERE status = ?1 ORDER BY due_date, id",
                    )?;
                    let rows = stmt
                        .query_map([status.as_str()], row_to_reminder)?
                        .collect::<rusqlite::Result<Vec<_>>>()?;
                    rows
                }
                None => {
                    let mut stmt = conn.prepare("SELECT * FROM reminders ORDER BY due_date, id")?;
                    let rows = stmt
                        .query_map([], row_to_reminder)?
                        .collect::<rusqlite::Result<Vec<_>>>()?;
                    rows
                }
            };
            Ok(reminders)
        })
    }

    pub fn get_reminder(&self, id: i64) -> Result<Option<StoredReminder>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT * FROM reminders WHERE id = ?1", [id], row_to_reminder)
                .optional()
                .map_err(Into::into)
        })
    }

    pub fn complete_reminder(&self, id: i64, now: DateTime<Utc>) -> Result<()> {
        self.set_reminder_status(id, ReminderStatus::Completed, Some(now))
    }

    pub fn ignore_reminder(&self, id: i64) -> Result<()> {
        self.set_reminder_status(id, ReminderStatus::Ignored, None)
    }

    fn set_reminder_status(
        &self,
        id: i64,
        status: ReminderStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let updated = self.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE reminders SET status = ?1, completed_at = ?2 WHERE id = ?3",
                params![status.as_str(), completed_at.map(ts), id],
            )?)
        })?;

        if updated == 0 {
            return Err(PlotCareError::NotFound(format!("reminder {}", id)));
        }
        tracing::debug!(id, status = %status, "Reminder status updated");
        Ok(())
    }

    pub fn reminder_statistics(&self) -> Result<ReminderStatistics> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT status, COUNT(*) FROM reminders GROUP BY status")?;
            let counts = stmt
                .query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let mut stats = ReminderStatistics::default();
            for (status, count) in counts {
                let count = count.max(0) as u64;
                stats.total += count;
                match ReminderStatus::from_str(&status) {
                    Some(ReminderStatus::Pending) => stats.pending += count,
                    Some(ReminderStatus::Completed) => stats.completed += count,
                    Some(ReminderStatus::Ignored) => stats.ignored += count,
                    None => warn!(status = %status, "Unknown reminder status in ledger"),
                }
            }
            Ok(stats)
        })
    }
}

fn row_to_reminder(row: &Row) -> rusqlite::Result<StoredReminder> {
    let kind_str: String = row.get("kind")?;
    let priority_str: String = row.get("priority")?;
    let status_str: String = row.get("status")?;
    let due_date_str: String = row.get("due_date")?;
    let created_at_str: String = row.get("created_at")?;
    let completed_at_str: Option<String> = row.get("completed_at")?;

    let kind = ReminderKind::from_str(&kind_str).unwrap_or_else(|| {
        warn!(kind = %kind_str, "Unknown reminder kind in ledger, defaulting to StageTask");
        ReminderKind::StageTask
    });
    let priority = Priority::from_str(&priority_str).unwrap_or_else(|| kind.priority());
    let status = ReminderStatus::from_str(&status_str).unwrap_or_else(|| {
        warn!(status = %status_str, "Unknown reminder status in ledger, defaulting to Pending");
        ReminderStatus::Pending
    });

    Ok(StoredReminder {
        id: row.get("id")?,
        reminder: Reminder {
            kind,
            title: row.get("title")?,
            description: row.get("description")?,
            due_date: parse_ts(&due_date_str),
            priority,
            garden_label: row.get("garden_label")?,
            tips: row.get("tips")?,
        },
        status,
        created_at: parse_ts(&created_at_str),
        completed_at: completed_at_str.as_deref().map(parse_ts),
    })
}

// Alert Queries

impl Database {
    /// Record alerts, skipping any plot/kind pair that already has a pending
    /// alert newer than the dedup window. Returns how many rows were inserted.
    pub fn record_alerts(&self, alerts: &[AlertRecord], now: DateTime<Utc>) -> Result<usize> {
        let window_start = ts(now - Duration::hours(ALERT_DEDUP_WINDOW_HOURS));

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let mut inserted = 0;
            for alert in alerts {
                let recent: i64 = tx.query_row(
                    r#"
                    SELECT COUNT(*) FROM alerts
                    WHERE garden_label = ?1 AND kind = ?2 AND status = 'pending'
                      AND created_at >= ?3
                    "#,
                    params![alert.garden_label, alert.kind.as_str(), window_start],
                    |row| row.get(0),
                )?;
                if recent > 0 {
                    tracing::debug!(
                        garden = %alert.garden_label,
                        kind = alert.kind.as_str(),
                        "Skipping duplicate alert"
                    );
                    continue;
                }

                inserted += tx.execute(
                    r#"
                    INSERT INTO alerts
                        (garden_label, kind, title, description, priority, action, status, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', ?7)
                    "#,
                    params![
                        alert.garden_label,
                        alert.kind.as_str(),
                        alert.title,
                        alert.description,
                        alert.priority.as_str(),
                        alert.action,
                        ts(now),
                    ],
                )?;
            }
            tx.commit()?;
            Ok(inserted)
        })
    }

    pub fn list_alerts(&self, status: Option<ReminderStatus>) -> Result<Vec<StoredAlert>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM alerts WHERE ?1 IS NULL OR status = ?1 ORDER BY created_at DESC, id DESC",
            )?;
            let alerts = stmt
                .query_map([status.map(|s| s.as_str())], row_to_alert)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(alerts)
        })
    }

    pub fn acknowledge_alert(&self, id: i64) -> Result<()> {
        let updated = self.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE alerts SET status = 'completed' WHERE id = ?1",
                [id],
            )?)
        })?;

        if updated == 0 {
            return Err(PlotCareError::NotFound(format!("alert {}", id)));
        }
        Ok(())
    }
}

fn row_to_alert(row: &Row) -> rusqlite::Result<StoredAlert> {
    let kind_str: String = row.get("kind")?;
    let priority_str: String = row.get("priority")?;
    let status_str: String = row.get("status")?;
    let created_at_str: String = row.get("created_at")?;

    let kind = AlertKind::from_str(&kind_str).unwrap_or_else(|| {
        warn!(kind = %kind_str, "Unknown alert kind in ledger, defaulting to SoilDry");
        AlertKind::SoilDry
    });

    Ok(StoredAlert {
        id: row.get("id")?,
        alert: AlertRecord {
            kind,
            title: row.get("title")?,
            description: row.get("description")?,
            priority: Priority::from_str(&priority_str).unwrap_or_else(|| kind.priority()),
            garden_label: row.get("garden_label")?,
            action: row.get("action")?,
        },
        status: ReminderStatus::from_str(&status_str).unwrap_or(ReminderStatus::Pending),
        created_at: parse_ts(&created_at_str),
    })
}

// Settings Queries

impl Database {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
            Ok(())
        })
    }
}
