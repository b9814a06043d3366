//! Sesión del cliente
//!
//! Este módulo define el objeto de sesión explícito que reemplaza al
//! estado global de autenticación: se puebla en el login, se limpia en el
//! logout o ante un 401, y el resto del código sólo lo lee.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::car::ResourceId;

/// Identidad del usuario o admin logueado
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: ResourceId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Sesión con token bearer opaco y su vencimiento
#[derive(Debug, Default)]
pub struct Session {
    token: Option<String>,
    user: Option<SessionUser>,
    expires_at: Option<DateTime<Utc>>,
}

/// Sesión compartida entre el cliente HTTP y las vistas
pub type SharedSession = Arc<RwLock<Session>>;

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crear el handle compartido que se pasa a cada componente
    pub fn shared() -> SharedSession {
        Arc::new(RwLock::new(Session::new()))
    }

    /// Poblar la sesión tras un login exitoso
    pub fn login(&mut self, token: String, user: SessionUser, expires_in_hours: i64) {
        log::info!("💾 Sesión iniciada para '{}'", user.email);
        self.token = Some(token);
        self.user = Some(user);
        self.expires_at = Some(Utc::now() + chrono::Duration::hours(expires_in_hours));
    }

    /// Restaurar un token persistido por el colaborador de auth
    ///
    /// Sin identidad ni vencimiento conocidos: el backend decide con un 401
    /// si el token sigue siendo válido.
    pub fn resume(&mut self, token: String) {
        log::info!("🔑 Sesión restaurada desde token persistido");
        self.token = Some(token);
        self.user = None;
        self.expires_at = None;
    }

    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() > expires_at,
            None => false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && !self.is_expired()
    }

    /// Token para el header Authorization; None si no hay sesión vigente
    pub fn bearer_token(&self) -> Option<&str> {
        if self.is_expired() {
            return None;
        }
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Limpiar la sesión: logout explícito o respuesta 401 del backend
    pub fn clear(&mut self) {
        if let Some(user) = &self.user {
            log::info!("🧹 Sesión cerrada para '{}'", user.email);
        }
        self.token = None;
        self.user = None;
        self.expires_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_user() -> SessionUser {
        SessionUser {
            id: ResourceId::Numeric(1),
            name: "Ana Torres".to_string(),
            email: "ana@example.com".to_string(),
            is_admin: false,
        }
    }

    #[test]
    fn test_session_lifecycle() {
        let mut session = Session::new();
        assert!(!session.is_authenticated());
        assert_eq!(session.bearer_token(), None);

        session.login("tok-123".to_string(), demo_user(), 24);
        assert!(session.is_authenticated());
        assert_eq!(session.bearer_token(), Some("tok-123"));

        session.clear();
        assert!(!session.is_authenticated());
        assert_eq!(session.bearer_token(), None);
        assert!(session.user().is_none());
    }

    #[test]
    fn test_expired_session_hides_token() {
        let mut session = Session::new();
        session.login("tok-123".to_string(), demo_user(), -1);
        assert!(session.is_expired());
        assert_eq!(session.bearer_token(), None);
        assert!(!session.is_authenticated());
    }
}
