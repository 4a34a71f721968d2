use chrono::{DateTime, Datelike, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QuerySelect, Set};

use crate::entities::receipt_counter::{self, Entity as ReceiptCounter};
use crate::errors::ServiceError;

/// Receipt/order number prefixes, one per record kind.
pub const PREFIX_ADVANCE: &str = "ADV";
pub const PREFIX_CUTTING: &str = "CUT";
pub const PREFIX_LOAN: &str = "LON";
pub const PREFIX_SALE: &str = "SAL";
pub const PREFIX_BATCH: &str = "MFG";

/// `YYMM` period a number is scoped to.
pub fn period_of(now: DateTime<Utc>) -> String {
    format!("{:02}{:02}", now.year() % 100, now.month())
}

pub fn format_receipt_number(prefix: &str, period: &str, seq: i32) -> String {
    format!("{}{}{:04}", prefix, period, seq)
}

/// Returns the next receipt number for `prefix` in the period containing
/// `now`, e.g. `ADV25010001`.
///
/// The (prefix, period) counter row is read and incremented on the caller's
/// connection. Pass the surrounding transaction so the increment commits or
/// rolls back together with the insert that consumes the number.
///
/// The read takes the row lock (`SELECT ... FOR UPDATE`), so under
/// read-committed isolation a concurrent transaction blocks until the first
/// one commits and then sees the incremented value. Two transactions can
/// never observe the same sequence, which replaces the collision-prone
/// count-rows-then-format scheme this module descends from. SQLite has no
/// row locks; the lock clause is dropped there and writers are serialized by
/// the database itself.
pub async fn next_receipt_number<C: ConnectionTrait>(
    conn: &C,
    prefix: &str,
    now: DateTime<Utc>,
) -> Result<String, ServiceError> {
    let period = period_of(now);

    let seq = match ReceiptCounter::find_by_id((prefix.to_string(), period.clone()))
        .lock_exclusive()
        .one(conn)
        .await?
    {
        Some(counter) => {
            let seq = counter.next_seq;
            let mut active: receipt_counter::ActiveModel = counter.into();
            active.next_seq = Set(seq + 1);
            active.update(conn).await?;
            seq
        }
        None => {
            // First number of the period. A concurrent first-insert loses on
            // the composite primary key and surfaces as a constraint error.
            receipt_counter::ActiveModel {
                prefix: Set(prefix.to_string()),
                period: Set(period.clone()),
                next_seq: Set(2),
            }
            .insert(conn)
            .await?;
            1
        }
    };

    Ok(format_receipt_number(prefix, &period, seq))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn period_is_two_digit_year_and_month() {
        let jan = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(period_of(jan), "2501");

        let dec = Utc.with_ymd_and_hms(2031, 12, 1, 0, 0, 0).unwrap();
        assert_eq!(period_of(dec), "3112");
    }

    #[test]
    fn number_is_prefix_period_and_zero_padded_seq() {
        assert_eq!(format_receipt_number("ADV", "2501", 1), "ADV25010001");
        assert_eq!(format_receipt_number("SAL", "2612", 142), "SAL26120142");
        assert_eq!(format_receipt_number("CUT", "2508", 10000), "CUT250810000");
    }
}
