pub mod init;
pub mod menu;
pub mod predict;
pub mod visualize;

pub use init::init_accounts;
pub use menu::run_menu;
pub use predict::predict;
pub use visualize::visualize;
