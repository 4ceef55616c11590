//! Backend endpoint table.
//!
//! Paths are relative to the API base URL and always end with a slash, the
//! way the Django REST backend routes them.

/// Obtain a token pair from username and password.
pub const LOGIN: &str = "/token/";
/// Exchange a refresh token for a new access token.
pub const REFRESH: &str = "/token/refresh/";
/// Create an account (participant or organizer) and sign in.
pub const REGISTER: &str = "/v1/auth/register/";
/// The authenticated user's profile.
pub const ME: &str = "/v1/auth/me/";

/// Event collection.
pub const EVENTOS: &str = "/v1/eventos/";
/// Subscription collection.
pub const INSCRICOES: &str = "/v1/inscricoes/";
/// Subscriptions to the signed-in organizer's events.
pub const INSCRICOES_ORGANIZADOR: &str = "/v1/inscricoes/organizador/";
/// Notification collection.
pub const NOTIFICACOES: &str = "/v1/notificacoes/";
/// Unread notification counter.
pub const NOTIFICACOES_UNREAD_COUNT: &str = "/v1/notificacoes/unread_count/";
/// Participant collection.
pub const PARTICIPANTES: &str = "/v1/participantes/";
/// Organizer collection.
pub const ORGANIZADORES: &str = "/v1/organizadores/";

/// `/v1/eventos/{id}/`
#[must_use]
pub fn evento_detail(id: u64) -> String {
    format!("{EVENTOS}{id}/")
}

/// `/v1/inscricoes/{id}/`
#[must_use]
pub fn inscricao_detail(id: u64) -> String {
    format!("{INSCRICOES}{id}/")
}

/// `/v1/inscricoes/{id}/cancel/`
#[must_use]
pub fn inscricao_cancel(id: u64) -> String {
    format!("{INSCRICOES}{id}/cancel/")
}

/// `/v1/notificacoes/{id}/`
#[must_use]
pub fn notificacao_detail(id: u64) -> String {
    format!("{NOTIFICACOES}{id}/")
}

/// `/v1/notificacoes/{id}/mark_read/`
#[must_use]
pub fn notificacao_mark_read(id: u64) -> String {
    format!("{NOTIFICACOES}{id}/mark_read/")
}

/// `/v1/participantes/{id}/`
#[must_use]
pub fn participante_detail(id: u64) -> String {
    format!("{PARTICIPANTES}{id}/")
}

/// `/v1/organizadores/{id}/`
#[must_use]
pub fn organizador_detail(id: u64) -> String {
    format!("{ORGANIZADORES}{id}/")
}

/// Whether `path` addresses the login endpoint.
///
/// Accepts relative paths and absolute URLs; any query string is ignored.
/// The refresh endpoint shares the `/token/` prefix but is not a login call.
#[must_use]
pub fn is_login(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.ends_with(LOGIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn detail_paths_keep_trailing_slash() {
        assert_eq!(evento_detail(7), "/v1/eventos/7/");
        assert_eq!(inscricao_cancel(3), "/v1/inscricoes/3/cancel/");
        assert_eq!(notificacao_mark_read(9), "/v1/notificacoes/9/mark_read/");
    }

    #[test]
    fn login_detection() {
        assert!(is_login(LOGIN));
        assert!(is_login("https://api.example.com/api/token/"));
        assert!(is_login("/token/?next=/dashboard"));
        assert!(!is_login(REFRESH));
        assert!(!is_login(EVENTOS));
    }

    proptest! {
        #[test]
        fn query_never_changes_login_detection(query in "[a-z0-9=&]{0,24}") {
            let login_url = format!("{LOGIN}?{query}");
            let refresh_url = format!("{REFRESH}?{query}");
            prop_assert!(is_login(&login_url));
            prop_assert!(!is_login(&refresh_url));
        }
    }
}
