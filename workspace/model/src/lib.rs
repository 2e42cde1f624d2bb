pub mod accounts;
pub mod datasets;
pub mod entities;
pub mod error;

mod table;

pub use accounts::{AccountRepository, CsvAccountStore, InMemoryAccountStore};
pub use datasets::{IllnessTable, SymptomCatalog};
pub use error::{ModelError, Result};
