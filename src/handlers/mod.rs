pub mod directory;
pub mod dispatch;
pub mod health;

pub use directory::*;
pub use dispatch::*;
pub use health::*;
