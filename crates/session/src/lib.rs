pub mod collaborators;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod journal;
pub mod logging;
pub mod style;

pub use collaborators::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use events::*;
pub use journal::*;
pub use style::*;
