//! Contexto de sesión del cliente
//!
//! Estado global explícito de la aplicación cliente: token de acceso y rol
//! (ámbito de sesión, nunca persistidos) y la preferencia de modo oscuro
//! (persistida indefinidamente, apagada por defecto). Sin globals
//! ambientales: el contexto se crea al arrancar y se pasa a quien lo use.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::models::role::Role;

/// Preferencias que sobreviven entre sesiones
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredPreferences {
    dark_mode: bool,
}

/// Estado de sesión del cliente
#[derive(Debug)]
pub struct SessionContext {
    token: Option<String>,
    role: Option<Role>,
    dark_mode: bool,
    prefs_path: PathBuf,
}

impl SessionContext {
    /// Inicializar al arrancar: lee las preferencias persistidas; el token
    /// y el rol siempre empiezan vacíos
    pub fn load(prefs_path: PathBuf) -> Self {
        let dark_mode = fs::read_to_string(&prefs_path)
            .ok()
            .and_then(|raw| serde_json::from_str::<StoredPreferences>(&raw).ok())
            .map(|prefs| prefs.dark_mode)
            .unwrap_or(false);

        Self {
            token: None,
            role: None,
            dark_mode,
            prefs_path,
        }
    }

    pub fn login(&mut self, token: String, role: Role) {
        self.token = Some(token);
        self.role = Some(role);
        log::info!("🔑 Sesión iniciada con rol '{}'", role);
    }

    /// Cerrar sesión: limpia token y rol; el modo oscuro se conserva
    pub fn logout(&mut self) {
        self.token = None;
        self.role = None;
        log::info!("👋 Sesión cerrada");
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Alternar el modo oscuro y persistirlo inmediatamente
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.persist_preferences();
        self.dark_mode
    }

    fn persist_preferences(&self) {
        let prefs = StoredPreferences {
            dark_mode: self.dark_mode,
        };
        let serialized = match serde_json::to_string(&prefs) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("⚠️ No se pudieron serializar las preferencias: {}", e);
                return;
            }
        };
        // fallo de disco no es fatal: la preferencia sigue viva en memoria
        if let Err(e) = fs::write(&self.prefs_path, serialized) {
            log::warn!("⚠️ No se pudieron guardar las preferencias: {}", e);
        }
    }
}
