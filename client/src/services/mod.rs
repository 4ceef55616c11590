//! Typed resource services.
//!
//! Each service borrows the [`SessionManager`] and turns its calls into
//! authenticated requests, so token refresh applies to all of them.
//!
//! ```no_run
//! # use eventhub_client::{SessionManager, ReqwestTransport, FileCredentialStore};
//! # use eventhub_client::services::inscricoes::InscricaoFilters;
//! # use eventhub_core::Navigator;
//! # struct Nav;
//! # impl Navigator for Nav { fn redirect(&self, _: &str) {} }
//! # async fn demo(session: SessionManager<ReqwestTransport, FileCredentialStore, Nav>) -> eventhub_client::Result<()> {
//! let page = session.events().list(1).await?;
//! for evento in &page.results {
//!     println!("{} ({})", evento.titulo, evento.local);
//! }
//! let mine = session.inscricoes().list(&InscricaoFilters::default()).await?;
//! let unread = session.notificacoes().unread_count().await?;
//! # Ok(())
//! # }
//! ```

pub mod events;
pub mod inscricoes;
pub mod notificacoes;
pub mod organizadores;
pub mod participantes;

use crate::session::SessionManager;
use eventhub_core::{CredentialStore, Navigator, Transport};

pub use events::Events;
pub use inscricoes::{InscricaoFilters, Inscricoes};
pub use notificacoes::Notificacoes;
pub use organizadores::Organizadores;
pub use participantes::Participantes;

impl<T, S, N> SessionManager<T, S, N>
where
    T: Transport,
    S: CredentialStore,
    N: Navigator,
{
    /// Event service (`/v1/eventos/`).
    pub const fn events(&self) -> Events<'_, T, S, N> {
        Events::new(self)
    }

    /// Subscription service (`/v1/inscricoes/`).
    pub const fn inscricoes(&self) -> Inscricoes<'_, T, S, N> {
        Inscricoes::new(self)
    }

    /// Notification service (`/v1/notificacoes/`).
    pub const fn notificacoes(&self) -> Notificacoes<'_, T, S, N> {
        Notificacoes::new(self)
    }

    /// Participant service (`/v1/participantes/`).
    pub const fn participantes(&self) -> Participantes<'_, T, S, N> {
        Participantes::new(self)
    }

    /// Organizer service (`/v1/organizadores/`).
    pub const fn organizadores(&self) -> Organizadores<'_, T, S, N> {
        Organizadores::new(self)
    }
}
