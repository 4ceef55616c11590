//! Participant service.

use crate::error::Result;
use crate::session::SessionManager;
use eventhub_core::model::{Paginated, Participante, ParticipanteDetalhado};
use eventhub_core::{CredentialStore, HttpRequest, Navigator, Transport, endpoints};

/// `/v1/participantes/`
pub struct Participantes<'a, T, S, N> {
    session: &'a SessionManager<T, S, N>,
}

impl<T, S, N> Clone for Participantes<'_, T, S, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, S, N> Copy for Participantes<'_, T, S, N> {}

impl<'a, T, S, N> Participantes<'a, T, S, N>
where
    T: Transport,
    S: CredentialStore,
    N: Navigator,
{
    pub(crate) const fn new(session: &'a SessionManager<T, S, N>) -> Self {
        Self { session }
    }

    /// One page of participants.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error.
    pub async fn list(self, page: u32) -> Result<Paginated<Participante>> {
        self.session
            .fetch(HttpRequest::get(endpoints::PARTICIPANTES).with_query("page", page.max(1)))
            .await
    }

    /// One participant with their subscriptions.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error.
    pub async fn get(self, id: u64) -> Result<ParticipanteDetalhado> {
        self.session
            .fetch(HttpRequest::get(endpoints::participante_detail(id)))
            .await
    }
}
