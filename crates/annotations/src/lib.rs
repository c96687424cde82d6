pub mod list_view;
pub mod store;

pub use list_view::*;
pub use store::*;
