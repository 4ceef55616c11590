//! Notification service.

use crate::error::Result;
use crate::session::SessionManager;
use eventhub_core::model::{Notificacao, NotificacaoDraft, Paginated};
use eventhub_core::{CredentialStore, HttpRequest, Navigator, Transport, endpoints};
use serde::Deserialize;

#[derive(Deserialize)]
struct UnreadCount {
    #[serde(default)]
    unread: u64,
}

/// `/v1/notificacoes/`
pub struct Notificacoes<'a, T, S, N> {
    session: &'a SessionManager<T, S, N>,
}

impl<T, S, N> Clone for Notificacoes<'_, T, S, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, S, N> Copy for Notificacoes<'_, T, S, N> {}

impl<'a, T, S, N> Notificacoes<'a, T, S, N>
where
    T: Transport,
    S: CredentialStore,
    N: Navigator,
{
    pub(crate) const fn new(session: &'a SessionManager<T, S, N>) -> Self {
        Self { session }
    }

    /// One page of the signed-in user's notifications.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error.
    pub async fn list(self, page: u32) -> Result<Paginated<Notificacao>> {
        self.session
            .fetch(HttpRequest::get(endpoints::NOTIFICACOES).with_query("page", page.max(1)))
            .await
    }

    /// One notification.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error.
    pub async fn get(self, id: u64) -> Result<Notificacao> {
        self.session
            .fetch(HttpRequest::get(endpoints::notificacao_detail(id)))
            .await
    }

    /// Create a notification.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error.
    pub async fn create(self, draft: &NotificacaoDraft) -> Result<Notificacao> {
        let request = HttpRequest::post(endpoints::NOTIFICACOES).with_json(draft)?;
        self.session.fetch(request).await
    }

    /// Mark a notification as read.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn mark_read(self, id: u64) -> Result<()> {
        self.session
            .execute(HttpRequest::post(endpoints::notificacao_mark_read(id)))
            .await
    }

    /// Number of unread notifications; 0 when the backend omits the field.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error.
    pub async fn unread_count(self) -> Result<u64> {
        let count: UnreadCount = self
            .session
            .fetch(HttpRequest::get(endpoints::NOTIFICACOES_UNREAD_COUNT))
            .await?;
        Ok(count.unread)
    }

    /// Delete a notification.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn delete(self, id: u64) -> Result<()> {
        self.session
            .execute(HttpRequest::delete(endpoints::notificacao_detail(id)))
            .await
    }
}
