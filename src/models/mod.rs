//! Modelos del sistema
//!
//! Tipos de dominio compartidos por el servidor y el núcleo cliente.

pub mod filters;
pub mod record;
pub mod role;
pub mod warranty;

pub use filters::{FilterSet, ListingScope, PageWindow};
pub use record::Record;
pub use role::Role;
pub use warranty::{WarrantyInfo, WarrantyStatus};
