//! Roles de acceso del sistema
//!
//! Dos roles: mantenimiento (ciclo CRUD completo) y ventas (solo lectura).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rol extraído del token de acceso
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Maintenance,
    Sales,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Maintenance => "maintenance",
            Role::Sales => "sales",
        }
    }

    /// Parsear el rol tal como viaja en los claims del JWT
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "maintenance" => Some(Role::Maintenance),
            "sales" => Some(Role::Sales),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
