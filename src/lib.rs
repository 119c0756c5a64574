pub mod app;
pub mod common;
pub mod settings;

pub use app::Application;
pub use settings::ClientSettings;
