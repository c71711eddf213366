use diesel::{PgConnection, QueryResult, RunQueryDsl, insert_into};

use crate::domain::entities::notifications::{
    InsertClientNotificationEntity, InsertNotificationEntity,
};
use crate::domain::entities::transactions::InsertTransactionEntity;
use crate::domain::value_objects::audit::MutationSideEffects;
use crate::infrastructure::postgres::schema::{client_notifications, notifications, transactions};

/// Writes every audit and notification row on the mutation's own connection,
/// inside its open transaction. A failed insert here rolls the whole
/// mutation back.
pub fn apply(conn: &mut PgConnection, side_effects: &MutationSideEffects) -> QueryResult<()> {
    for row in &side_effects.transactions {
        record_transaction(conn, row)?;
    }
    for row in &side_effects.notifications {
        create_notification(conn, row)?;
    }
    for row in &side_effects.client_notifications {
        create_client_notification(conn, row)?;
    }
    Ok(())
}

pub fn record_transaction(
    conn: &mut PgConnection,
    row: &InsertTransactionEntity,
) -> QueryResult<usize> {
    insert_into(transactions::table).values(row).execute(conn)
}

pub fn create_notification(
    conn: &mut PgConnection,
    row: &InsertNotificationEntity,
) -> QueryResult<usize> {
    insert_into(notifications::table).values(row).execute(conn)
}

pub fn create_client_notification(
    conn: &mut PgConnection,
    row: &InsertClientNotificationEntity,
) -> QueryResult<usize> {
    insert_into(client_notifications::table)
        .values(row)
        .execute(conn)
}
