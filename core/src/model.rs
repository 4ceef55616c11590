//! Domain types exchanged with the EventHub backend.
//!
//! Field names follow the backend's JSON (Portuguese, `snake_case`) so the
//! types deserialize without per-field renames; the few camelCase fields the
//! backend computes per user are renamed explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Attends events.
    Participante,
    /// Publishes events.
    Organizador,
}

/// The signed-in user, as persisted next to the tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User id
    pub id: u64,
    /// Login name
    pub username: String,
    /// Email address
    pub email: String,
    /// Account role
    pub role: Role,
    /// Participant profile linked to this user, if any
    #[serde(default)]
    pub participante_id: Option<u64>,
}

impl UserSummary {
    /// Whether the user publishes events.
    #[must_use]
    pub fn is_organizer(&self) -> bool {
        self.role == Role::Organizador
    }
}

/// Token pair returned by login and register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    /// Short-lived bearer credential
    pub access: String,
    /// Long-lived credential used to mint new access tokens
    pub refresh: String,
}

/// An established session: credential pair plus identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Short-lived bearer credential
    pub access_token: String,
    /// Long-lived credential used to mint new access tokens
    pub refresh_token: String,
    /// Who is signed in
    pub user: UserSummary,
}

/// Page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Total number of items across all pages
    pub count: u64,
    /// URL of the next page
    pub next: Option<String>,
    /// URL of the previous page
    pub previous: Option<String>,
    /// Items on this page
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// How an event takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// On site
    Presencial,
    /// Online
    Virtual,
    /// Both
    Hibrido,
}

/// Lifecycle of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InscricaoStatus {
    /// Awaiting confirmation (paid events)
    Pendente,
    /// Confirmed
    Confirmada,
    /// Cancelled
    Cancelada,
}

impl InscricaoStatus {
    /// Query-string form used by the list filters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pendente => "pendente",
            Self::Confirmada => "confirmada",
            Self::Cancelada => "cancelada",
        }
    }
}

/// An event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evento {
    /// Event id
    pub id: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
    /// Soft-delete flag
    #[serde(default)]
    pub is_deleted: bool,
    /// Soft-delete time
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Title
    pub titulo: String,
    /// Description
    pub descricao: String,
    /// Start time
    pub data_inicio: DateTime<Utc>,
    /// End time
    pub data_fim: DateTime<Utc>,
    /// Venue or link
    pub local: String,
    /// Seat limit
    pub capacidade: u32,
    /// Open for subscriptions
    pub is_active: bool,
    /// Attendance mode
    pub tipo: EventKind,
    /// Price as the backend's decimal string
    pub preco: String,
    /// Organizer id
    #[serde(default)]
    pub organizer: Option<u64>,
    /// Organizer display name
    #[serde(default)]
    pub organizer_nome: Option<String>,
    /// Whether the signed-in user holds an active subscription
    #[serde(default, rename = "isInscrito")]
    pub is_inscrito: Option<bool>,
    /// Status of the signed-in user's subscription
    #[serde(default, rename = "inscricaoStatus")]
    pub inscricao_status: Option<InscricaoStatus>,
    /// Subscriptions, present on the detail endpoint
    #[serde(default)]
    pub inscricoes: Option<Vec<Inscricao>>,
    /// Subscription count, present on the detail endpoint
    #[serde(default)]
    pub total_inscricoes: Option<u64>,
}

impl Evento {
    /// Whether the event is free of charge.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.preco
            .trim()
            .parse::<f64>()
            .is_ok_and(|price| price <= 0.0)
    }
}

/// Fields accepted when creating or updating an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventoDraft {
    /// Title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    /// Start time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_inicio: Option<DateTime<Utc>>,
    /// End time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_fim: Option<DateTime<Utc>>,
    /// Venue or link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<String>,
    /// Seat limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacidade: Option<u32>,
    /// Attendance mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo: Option<EventKind>,
    /// Price as a decimal string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preco: Option<String>,
    /// Open for subscriptions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// A participant's subscription to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inscricao {
    /// Subscription id
    pub id: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
    /// Participant id
    pub participante: u64,
    /// Event id
    pub evento: u64,
    /// Participant display name
    #[serde(default)]
    pub participante_nome: String,
    /// Event title
    #[serde(default)]
    pub evento_titulo: String,
    /// Current status
    pub status: InscricaoStatus,
    /// When the subscription was made
    pub data_inscricao: DateTime<Utc>,
}

/// Fields accepted when creating or updating a subscription.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InscricaoDraft {
    /// Participant id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participante: Option<u64>,
    /// Event id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evento: Option<u64>,
    /// Status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InscricaoStatus>,
}

/// Result of subscribing the signed-in participant to an event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubscribeOutcome {
    /// Human-readable confirmation
    pub message: String,
    /// The created subscription
    pub inscricao: Inscricao,
    /// Whether the event is paid (subscription then starts as pending)
    #[serde(default)]
    pub evento_pago: Option<bool>,
    /// Backend status string
    #[serde(default)]
    pub status: Option<String>,
}

/// A backend notification addressed to a participant or an organizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notificacao {
    /// Notification id
    pub id: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
    /// Recipient participant
    #[serde(default)]
    pub participante: Option<u64>,
    /// Recipient organizer
    #[serde(default)]
    pub organizador: Option<u64>,
    /// Related event
    pub evento: u64,
    /// Participant display name
    #[serde(default)]
    pub participante_nome: Option<String>,
    /// Event title
    #[serde(default)]
    pub evento_titulo: String,
    /// Message text
    pub mensagem: String,
    /// Read flag
    pub is_read: bool,
}

/// Fields accepted when creating a notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NotificacaoDraft {
    /// Recipient participant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participante: Option<u64>,
    /// Recipient organizer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizador: Option<u64>,
    /// Related event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evento: Option<u64>,
    /// Message text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensagem: Option<String>,
}

/// A participant profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participante {
    /// Participant id
    pub id: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
    /// Display name
    pub nome: String,
    /// Email address
    pub email: String,
    /// Linked user id
    pub user: u64,
}

/// A participant profile with its subscriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipanteDetalhado {
    /// Base profile
    #[serde(flatten)]
    pub participante: Participante,
    /// Subscriptions
    #[serde(default)]
    pub inscricoes: Vec<Inscricao>,
    /// Subscription count
    #[serde(default)]
    pub total_inscricoes: u64,
}

/// An organizer profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organizador {
    /// Organizer id
    pub id: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
    /// Display name
    pub nome: String,
    /// Email address
    pub email: String,
    /// Phone number
    #[serde(default)]
    pub telefone: Option<String>,
    /// Company
    #[serde(default)]
    pub empresa: Option<String>,
    /// Linked user id
    #[serde(default)]
    pub user: Option<u64>,
}

/// An organizer profile with its events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizadorDetalhado {
    /// Base profile
    #[serde(flatten)]
    pub organizador: Organizador,
    /// Published events
    #[serde(default)]
    pub eventos: Vec<Evento>,
    /// Event count
    #[serde(default)]
    pub total_eventos: u64,
}

/// Fields accepted when creating an organizer profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizadorDraft {
    /// Display name
    pub nome: String,
    /// Email address
    pub email: String,
    /// Phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    /// Company
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empresa: Option<String>,
}

/// Account creation payload.
///
/// `empresa` and `telefone` are only sent for organizers; build with
/// [`Registration::participant`] or [`Registration::organizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Login name
    pub username: String,
    /// Password
    pub password: String,
    /// Account role
    pub role: Role,
    /// Display name
    pub nome: String,
    /// Email address
    pub email: String,
    /// Company (organizers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empresa: Option<String>,
    /// Phone number (organizers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
}

impl Registration {
    /// Registration for a participant account.
    #[must_use]
    pub fn participant(
        username: impl Into<String>,
        password: impl Into<String>,
        nome: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role: Role::Participante,
            nome: nome.into(),
            email: email.into(),
            empresa: None,
            telefone: None,
        }
    }

    /// Registration for an organizer account.
    #[must_use]
    pub fn organizer(
        username: impl Into<String>,
        password: impl Into<String>,
        nome: impl Into<String>,
        email: impl Into<String>,
        empresa: impl Into<String>,
        telefone: Option<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role: Role::Organizador,
            nome: nome.into(),
            email: email.into(),
            empresa: Some(empresa.into()),
            telefone: telefone.filter(|t| !t.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn evento_deserializes_backend_payload() {
        let evento: Evento = serde_json::from_value(json!({
            "id": 12,
            "created_at": "2025-03-01T10:00:00-03:00",
            "updated_at": "2025-03-01T10:00:00Z",
            "titulo": "RustConf",
            "descricao": "Talks",
            "data_inicio": "2025-06-01T09:00:00Z",
            "data_fim": "2025-06-01T18:00:00Z",
            "local": "Auditorio",
            "capacidade": 100,
            "is_active": true,
            "tipo": "hibrido",
            "preco": "0.00",
            "organizer": 3,
            "isInscrito": true,
            "inscricaoStatus": "confirmada"
        }))
        .unwrap();

        assert_eq!(evento.tipo, EventKind::Hibrido);
        assert_eq!(evento.inscricao_status, Some(InscricaoStatus::Confirmada));
        assert_eq!(evento.is_inscrito, Some(true));
        assert!(evento.is_free());
        assert!(!evento.is_deleted);
        assert_eq!(evento.created_at.to_rfc3339(), "2025-03-01T13:00:00+00:00");
    }

    #[test]
    fn registration_omits_organizer_fields_for_participants() {
        let participant = serde_json::to_value(Registration::participant(
            "ana", "pw", "Ana", "ana@example.com",
        ))
        .unwrap();
        assert_eq!(participant["role"], "participante");
        assert!(participant.get("empresa").is_none());
        assert!(participant.get("telefone").is_none());

        let organizer = serde_json::to_value(Registration::organizer(
            "bia",
            "pw",
            "Bia",
            "bia@example.com",
            "Acme",
            Some("  ".to_string()),
        ))
        .unwrap();
        assert_eq!(organizer["role"], "organizador");
        assert_eq!(organizer["empresa"], "Acme");
        assert!(organizer.get("telefone").is_none());
    }

    #[test]
    fn drafts_skip_unset_fields() {
        let draft = EventoDraft {
            titulo: Some("Meetup".to_string()),
            capacidade: Some(30),
            ..EventoDraft::default()
        };
        assert_eq!(
            serde_json::to_value(draft).unwrap(),
            json!({ "titulo": "Meetup", "capacidade": 30 })
        );
    }

    #[test]
    fn detailed_participant_flattens_base_fields() {
        let detail: ParticipanteDetalhado = serde_json::from_value(json!({
            "id": 5,
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z",
            "nome": "Ana",
            "email": "ana@example.com",
            "user": 9,
            "total_inscricoes": 0
        }))
        .unwrap();
        assert_eq!(detail.participante.nome, "Ana");
        assert!(detail.inscricoes.is_empty());
    }
}
