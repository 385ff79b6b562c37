use db::{
    notification::{self, Status},
    ActiveValue, ConnectionTrait, DbErr, EntityTrait,
};

/// Text of a notification announcing a new match with the provided user.
pub fn match_text(username: &str) -> String {
    format!("You have matched with {username}")
}

/// Enqueue an unread notification for the provided user.
///
/// When called inside of a transaction, the notification is delivered
/// only if that transaction commits.
pub async fn enqueue<C: ConnectionTrait>(db: &C, user_id: i64, text: String) -> Result<(), DbErr> {
    notification::Entity::insert(notification::ActiveModel {
        user_id: ActiveValue::Set(user_id),
        text: ActiveValue::Set(text),
        status: ActiveValue::Set(Status::Unread),
        created_at: ActiveValue::Set(db::now()),
        ..Default::default()
    })
    .exec_without_returning(db)
    .await?;

    Ok(())
}
