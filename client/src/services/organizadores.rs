//! Organizer service.

use crate::error::Result;
use crate::session::SessionManager;
use eventhub_core::model::{Organizador, OrganizadorDetalhado, OrganizadorDraft, Paginated};
use eventhub_core::{CredentialStore, HttpRequest, Navigator, Transport, endpoints};

/// `/v1/organizadores/`
pub struct Organizadores<'a, T, S, N> {
    session: &'a SessionManager<T, S, N>,
}

impl<T, S, N> Clone for Organizadores<'_, T, S, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, S, N> Copy for Organizadores<'_, T, S, N> {}

impl<'a, T, S, N> Organizadores<'a, T, S, N>
where
    T: Transport,
    S: CredentialStore,
    N: Navigator,
{
    pub(crate) const fn new(session: &'a SessionManager<T, S, N>) -> Self {
        Self { session }
    }

    /// Create an organizer profile.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error.
    pub async fn create(self, draft: &OrganizadorDraft) -> Result<Organizador> {
        let request = HttpRequest::post(endpoints::ORGANIZADORES).with_json(draft)?;
        self.session.fetch(request).await
    }

    /// One page of organizers.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error.
    pub async fn list(self, page: u32) -> Result<Paginated<Organizador>> {
        self.session
            .fetch(HttpRequest::get(endpoints::ORGANIZADORES).with_query("page", page.max(1)))
            .await
    }

    /// One organizer with their events.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error.
    pub async fn get(self, id: u64) -> Result<OrganizadorDetalhado> {
        self.session
            .fetch(HttpRequest::get(endpoints::organizador_detail(id)))
            .await
    }
}
