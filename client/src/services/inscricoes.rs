//! Subscription service.

use crate::error::Result;
use crate::session::SessionManager;
use eventhub_core::model::{Inscricao, InscricaoDraft, InscricaoStatus, Paginated, SubscribeOutcome};
use eventhub_core::{CredentialStore, HttpRequest, Navigator, Transport, endpoints};
use serde_json::json;

/// List filters. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InscricaoFilters {
    /// Page number, 1 when unset
    pub page: Option<u32>,
    /// Only subscriptions in this status
    pub status: Option<InscricaoStatus>,
    /// Only subscriptions to this event
    pub evento: Option<u64>,
    /// Free-text search
    pub search: Option<String>,
}

impl InscricaoFilters {
    fn apply(&self, mut request: HttpRequest) -> HttpRequest {
        request = request.with_query("page", self.page.unwrap_or(1).max(1));
        if let Some(status) = self.status {
            request = request.with_query("status", status.as_str());
        }
        if let Some(evento) = self.evento {
            request = request.with_query("evento", evento);
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            request = request.with_query("search", search);
        }
        request
    }
}

/// `/v1/inscricoes/`
pub struct Inscricoes<'a, T, S, N> {
    session: &'a SessionManager<T, S, N>,
}

impl<T, S, N> Clone for Inscricoes<'_, T, S, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, S, N> Copy for Inscricoes<'_, T, S, N> {}

impl<'a, T, S, N> Inscricoes<'a, T, S, N>
where
    T: Transport,
    S: CredentialStore,
    N: Navigator,
{
    pub(crate) const fn new(session: &'a SessionManager<T, S, N>) -> Self {
        Self { session }
    }

    /// The signed-in participant's subscriptions.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error.
    pub async fn list(self, filters: &InscricaoFilters) -> Result<Paginated<Inscricao>> {
        self.session
            .fetch(filters.apply(HttpRequest::get(endpoints::INSCRICOES)))
            .await
    }

    /// Subscriptions to the signed-in organizer's events.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error.
    pub async fn list_for_organizer(
        self,
        filters: &InscricaoFilters,
    ) -> Result<Paginated<Inscricao>> {
        self.session
            .fetch(filters.apply(HttpRequest::get(endpoints::INSCRICOES_ORGANIZADOR)))
            .await
    }

    /// One subscription.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error.
    pub async fn get(self, id: u64) -> Result<Inscricao> {
        self.session
            .fetch(HttpRequest::get(endpoints::inscricao_detail(id)))
            .await
    }

    /// Create a subscription from explicit fields.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error.
    pub async fn create(self, draft: &InscricaoDraft) -> Result<Inscricao> {
        let request = HttpRequest::post(endpoints::INSCRICOES).with_json(draft)?;
        self.session.fetch(request).await
    }

    /// Subscribe the signed-in participant to an event.
    ///
    /// Paid events start as [`InscricaoStatus::Pendente`].
    ///
    /// # Errors
    ///
    /// Returns the request or decode error (400 when already subscribed or
    /// the event is full).
    pub async fn subscribe(self, evento_id: u64) -> Result<SubscribeOutcome> {
        let request =
            HttpRequest::post(endpoints::INSCRICOES).with_body(json!({ "evento_id": evento_id }));
        self.session.fetch(request).await
    }

    /// Replace a subscription's fields.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error.
    pub async fn update(self, id: u64, draft: &InscricaoDraft) -> Result<Inscricao> {
        let request = HttpRequest::put(endpoints::inscricao_detail(id)).with_json(draft)?;
        self.session.fetch(request).await
    }

    /// Delete a subscription.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn delete(self, id: u64) -> Result<()> {
        self.session
            .execute(HttpRequest::delete(endpoints::inscricao_detail(id)))
            .await
    }

    /// Cancel a subscription, keeping its record.
    ///
    /// # Errors
    ///
    /// Returns the request or decode error.
    pub async fn cancel(self, id: u64) -> Result<Inscricao> {
        self.session
            .fetch(HttpRequest::post(endpoints::inscricao_cancel(id)))
            .await
    }
}
