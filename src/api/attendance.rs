//! Punch in / punch out.
//!
//! The store does not enforce "one open record per employee per day"; these
//! two actions do. A read followed by a write is not atomic, so two
//! concurrent calls, from one store handle or from two devices, can both
//! succeed and leave two open records.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use crate::error::PortalError;
use crate::model::attendance::{AttendancePatch, AttendanceRecord, GeoPoint};
use crate::model::user::User;
use crate::store::CollectionStore;
use crate::utils::id::new_id;

fn open_today<'a>(
    records: &'a [AttendanceRecord],
    employee_id: &'a str,
    today: NaiveDate,
) -> impl Iterator<Item = &'a AttendanceRecord> {
    records
        .iter()
        .filter(move |r| r.employee_id == employee_id && r.date == today && r.is_open())
}

/// Open today's attendance record for `user`.
pub async fn check_in(
    store: &CollectionStore,
    user: &User,
    now: NaiveDateTime,
    location: Option<GeoPoint>,
) -> Result<AttendanceRecord, PortalError> {
    let today = now.date();
    let attendance = store.read::<AttendanceRecord>().await;

    if open_today(&attendance, &user.id, today).next().is_some() {
        return Err(PortalError::AlreadyCheckedIn);
    }

    let record = AttendanceRecord {
        id: new_id("att"),
        employee_id: user.id.clone(),
        employee_name: user.name.clone(),
        date: today,
        check_in_time: now.time(),
        check_out_time: None,
        location,
    };
    let record = store.insert_front(record).await;

    info!(employee_id = %user.id, date = %today, "Checked in");
    Ok(record)
}

/// Close today's open record for `user`.
pub async fn check_out(
    store: &CollectionStore,
    user: &User,
    now: NaiveDateTime,
) -> Result<(), PortalError> {
    let today = now.date();
    let attendance = store.read::<AttendanceRecord>().await;
    let open: Vec<String> = open_today(&attendance, &user.id, today)
        .map(|r| r.id.clone())
        .collect();

    if open.is_empty() {
        return Err(PortalError::NotCheckedIn);
    }
    if open.len() > 1 {
        warn!(employee_id = %user.id, open = open.len(), "Several open check-ins today, closing all");
    }

    for id in open {
        store
            .patch::<AttendanceRecord>(
                &id,
                AttendancePatch {
                    check_out_time: Some(now.time()),
                    ..Default::default()
                },
            )
            .await;
    }

    info!(employee_id = %user.id, date = %today, "Checked out");
    Ok(())
}

/// Punch button: check in if not currently in, otherwise check out.
/// Returns true if the user is checked in afterwards.
pub async fn punch(
    store: &CollectionStore,
    user: &User,
    now: NaiveDateTime,
) -> Result<bool, PortalError> {
    match check_in(store, user, now, None).await {
        Ok(_) => Ok(true),
        Err(PortalError::AlreadyCheckedIn) => check_out(store, user, now).await.map(|_| false),
        Err(e) => Err(e),
    }
}
