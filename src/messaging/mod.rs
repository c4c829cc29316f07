pub mod formatter;
pub mod publisher;

pub use formatter::{escape_markdown, format_greeting, format_header, format_listing};
pub use publisher::Publisher;
