pub mod settings;
pub mod directory_loader;

pub use settings::Settings;
pub use directory_loader::{DirectoryDocument, DirectoryError, DirectorySnapshot, TenantData};
