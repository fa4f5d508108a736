//! Browser implementations of the console's collaborator interfaces.

pub mod import;
pub mod navigator;
pub mod reload;
pub mod storage;
pub mod timer;

pub use import::dynamic_import;
pub use navigator::RouterNavigator;
pub use reload::LocationReloader;
pub use storage::LocalStorage;
pub use timer::BrowserTimer;
