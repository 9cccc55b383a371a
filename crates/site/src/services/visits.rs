//! Session-scoped visitor counter.
//!
//! Tracks how many distinct calendar days a visitor has come by. The counter
//! lives entirely in the session under two string-encoded keys (`visits` and
//! `last_visit`); nothing here touches the persistent store.

use chrono::{DateTime, SecondsFormat, Utc};
use tower_sessions::Session;

use crate::models::session_keys;

/// Counter value synthesized for a session with no recorded visits.
const FIRST_VISIT: i64 = 1;

/// Decide the next counter state from the stored one.
///
/// The counter advances once per calendar-day boundary crossed, not per
/// elapsed 24 hours: a visit at 23:59 followed by one at 00:01 counts as two
/// days.
fn advance(
    visits: i64,
    last_visit: DateTime<Utc>,
    now: DateTime<Utc>,
) -> (i64, DateTime<Utc>) {
    let days = now
        .date_naive()
        .signed_duration_since(last_visit.date_naive())
        .num_days();

    if days >= 1 {
        (visits + 1, now)
    } else {
        (visits, last_visit)
    }
}

/// Touch the visitor counter for this session and return the visit count.
///
/// Missing or unparseable stored values are synthesized to defaults (count 1,
/// last visit now) rather than treated as errors. Both keys are always
/// written back, even when nothing changed.
///
/// # Errors
///
/// Returns the session store's error if a read or write fails.
pub async fn touch(session: &Session) -> Result<i64, tower_sessions::session::Error> {
    let now = Utc::now();

    let visits = session
        .get::<String>(session_keys::VISITS)
        .await?
        .and_then(|raw| raw.parse::<i64>().ok())
        .unwrap_or(FIRST_VISIT);

    let last_visit = session
        .get::<String>(session_keys::LAST_VISIT)
        .await?
        .and_then(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        })
        .unwrap_or(now);

    let (visits, last_visit) = advance(visits, last_visit, now);

    session
        .insert(session_keys::VISITS, visits.to_string())
        .await?;
    session
        .insert(
            session_keys::LAST_VISIT,
            last_visit.to_rfc3339_opts(SecondsFormat::Secs, true),
        )
        .await?;

    Ok(visits)
}
