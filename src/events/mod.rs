mod listeners;
mod page;
mod pointer;

pub use listeners::Listeners;
pub use page::{wire_page_handlers, wire_page_restore, ThemeWatch};
pub use pointer::wire_pointer_handlers;
