pub mod tenant_directory;
pub mod whatsapp_sender;

pub use tenant_directory::{DirectoryStats, TenantDirectory};
pub use whatsapp_sender::WhatsAppTemplateSender;
