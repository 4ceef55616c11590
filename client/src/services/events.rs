//! Event service.

use crate::error::Result;
use crate::session::SessionManager;
use eventhub_core::model::{Evento, EventoDraft, Paginated};
use eventhub_core::{CredentialStore, HttpRequest, Navigator, Transport, endpoints};

/// `/v1/eventos/`
pub struct Events<'a, T, S, N> {
    session: &'a SessionManager<T, S, N>,
}

impl<T, S, N> Clone for Events<'_, T, S, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, S, N> Copy for Events<'_, T, S, N> {}

impl<'a, T, S, N> Events<'a, T, S, N>
where
    T: Transport,
    S: CredentialStore,
    N: Navigator,
{
    pub(crate) const fn new(session: &'a SessionManager<T, S, N>) -> Self {
        Self { session }
    }

    /// One page of events. Pages start at 1.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error.
    pub async fn list(self, page: u32) -> Result<Paginated<Evento>> {
        self.session
            .fetch(HttpRequest::get(endpoints::EVENTOS).with_query("page", page.max(1)))
            .await
    }

    /// One event, including its subscriptions.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error (404 for an unknown id).
    pub async fn get(self, id: u64) -> Result<Evento> {
        self.session
            .fetch(HttpRequest::get(endpoints::evento_detail(id)))
            .await
    }

    /// Publish a new event (organizers only).
    ///
    /// # Errors
    ///
    /// Returns the request or decode error; validation failures arrive as a
    /// 400 `ApiError::Status` with the field errors in the body.
    pub async fn create(self, draft: &EventoDraft) -> Result<Evento> {
        let request = HttpRequest::post(endpoints::EVENTOS).with_json(draft)?;
        self.session.fetch(request).await.inspect_err(|err| {
            tracing::warn!(%err, "event creation rejected");
        })
    }

    /// Replace an event's fields.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error.
    pub async fn update(self, id: u64, draft: &EventoDraft) -> Result<Evento> {
        let request = HttpRequest::put(endpoints::evento_detail(id)).with_json(draft)?;
        self.session.fetch(request).await
    }

    /// Delete an event.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn delete(self, id: u64) -> Result<()> {
        self.session
            .execute(HttpRequest::delete(endpoints::evento_detail(id)))
            .await
    }
}
