use blogcollab_common::NotificationKind;
use tracing::warn;

use super::Principal;
use crate::entity::notification;
use crate::error::AppError;
use crate::store::{ContentStore, NewNotification};

pub struct NotificationService<'a> {
    store: &'a dyn ContentStore,
}

impl<'a> NotificationService<'a> {
    pub fn new(store: &'a dyn ContentStore) -> Self {
        Self { store }
    }

    pub async fn notify(
        &self,
        user_id: i32,
        kind: NotificationKind,
        message: String,
        related_id: Option<i32>,
    ) -> Result<notification::Model, AppError> {
        let model = self
            .store
            .create_notification(NewNotification {
                user_id,
                kind,
                message,
                related_id,
            })
            .await?;
        Ok(model)
    }

    /// Record a notification after the write it describes has committed.
    /// A failure here is logged and swallowed: the caller's operation
    /// already succeeded and must not be reported as failed.
    pub async fn notify_best_effort(
        &self,
        user_id: i32,
        kind: NotificationKind,
        message: String,
        related_id: Option<i32>,
    ) {
        if let Err(e) = self.notify(user_id, kind, message, related_id).await {
            warn!(user_id, %kind, error = ?e, "Failed to record notification");
        }
    }

    /// Newest first.
    pub async fn list_for(&self, principal: Principal) -> Result<Vec<notification::Model>, AppError> {
        Ok(self.store.list_notifications(principal.id).await?)
    }

    pub async fn unread_count(&self, principal: Principal) -> Result<u64, AppError> {
        Ok(self.store.count_unread_notifications(principal.id).await?)
    }

    /// Notifications addressed to someone else are reported as missing.
    pub async fn mark_read(
        &self,
        principal: Principal,
        id: i32,
    ) -> Result<notification::Model, AppError> {
        let not_found = || AppError::NotFound("Notification not found".into());
        let existing = self.store.get_notification(id).await?.ok_or_else(not_found)?;
        if existing.user_id != principal.id {
            return Err(not_found());
        }
        self.store
            .mark_notification_read(id)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn mark_all_read(&self, principal: Principal) -> Result<u64, AppError> {
        Ok(self.store.mark_all_notifications_read(principal.id).await?)
    }
}
