//! Locale routing and message catalogs.

mod messages;
mod routing;

pub use messages::Messages;
pub use routing::LocaleRouting;
