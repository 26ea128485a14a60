//! `impactwatch clean` command implementation.

use crate::cli::open_store;
use crate::config::Config;
use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};

/// Run the clean command.
///
/// Removes sessions that have not been updated within the given duration.
/// Without `--before`, the configured retention period is used.
///
/// # Errors
///
/// Returns an error if the duration is invalid or storage cannot be opened.
pub fn run(config: &Config, before: Option<&str>, all: bool) -> Result<()> {
    let cutoff = if all {
        DateTime::<Utc>::MAX_UTC
    } else {
        let age = match before {
            Some(raw) => parse_duration(raw)?,
            None => Duration::days(i64::from(config.cleanup.retention_days)),
        };
        Utc::now()
            .checked_sub_signed(age)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    };

    let mut store = open_store(config)?;
    let removed = store.prune_older_than(cutoff);

    if removed == 0 {
        println!("No sessions to clean.");
    } else {
        println!("Cleaned {removed} session(s).");
    }

    Ok(())
}

/// Parse a duration string like "7d", "30d", "24h".
///
/// # Errors
///
/// Returns an error if the duration format is invalid.
fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    if s.is_empty() {
        return Err(Error::InvalidInput("Duration cannot be empty".to_string()));
    }

    let parse_err = |_| Error::InvalidInput(format!("Invalid duration: {s}"));

    let (number, unit): (&str, fn(i64) -> Option<Duration>) =
        if let Some(n) = s.strip_suffix('d') {
            (n, Duration::try_days)
        } else if let Some(n) = s.strip_suffix('h') {
            (n, Duration::try_hours)
        } else if let Some(n) = s.strip_suffix('m') {
            (n, Duration::try_minutes)
        } else {
            (s, Duration::try_days)
        };

    let num: i64 = number.parse().map_err(parse_err)?;
    if num < 0 {
        return Err(Error::InvalidInput(format!("Invalid duration: {s}")));
    }
    unit(num).ok_or_else(|| Error::InvalidInput(format!("Duration out of range: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SessionStore;
    use crate::storage::MemoryBackend;

    #[test]
    fn parse_duration_days() {
        assert_eq!(parse_duration("7d").unwrap(), Duration::days(7));
    }

    #[test]
    fn parse_duration_hours() {
        assert_eq!(parse_duration("24h").unwrap(), Duration::hours(24));
    }

    #[test]
    fn parse_duration_minutes() {
        assert_eq!(parse_duration("30m").unwrap(), Duration::minutes(30));
    }

    #[test]
    fn parse_duration_no_unit_defaults_to_days() {
        assert_eq!(parse_duration("14").unwrap(), Duration::days(14));
    }

    #[test]
    fn parse_duration_rejects_garbage() {
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("-3d").is_err());
        assert!(parse_duration("999999999999d").is_err());
    }

    #[test]
    fn parse_duration_rejects_blank() {
        assert!(matches!(parse_duration(""), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_duration("   "), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn clean_all_removes_everything() {
        let mut store = SessionStore::open(Box::new(MemoryBackend::new()));
        store.create_session("one");
        store.create_session("two");

        let removed = store.prune_older_than(DateTime::<Utc>::MAX_UTC);

        assert_eq!(removed, 2);
        assert!(store.sessions().is_empty());
        assert!(store.active_id().is_none());
    }

    #[test]
    fn clean_keeps_recent_sessions() {
        let mut store = SessionStore::open(Box::new(MemoryBackend::new()));
        store.create_session("recent");

        let removed = store.prune_older_than(Utc::now() - Duration::days(7));

        assert_eq!(removed, 0);
        assert_eq!(store.sessions().len(), 1);
    }
}
