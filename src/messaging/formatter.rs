use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use crate::scanner::Listing;

/// Characters Telegram's MarkdownV2 treats as syntax anywhere in text.
const RESERVED: &[char] = &[
    '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

pub const GREETING: &str = "🤖 Car Data Bot is now active!\n\nI will post the latest car deals from popular automotive websites.";

pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Inside `(...)` of an inline link only `)` and `\` need escaping.
pub fn escape_link_target(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());
    for c in url.chars() {
        if c == ')' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Blank optional fields are treated as missing.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.trim().is_empty())
}

pub fn format_listing(listing: &Listing) -> String {
    let mut message = format!("🚗 *{}*\n\n", escape_markdown(&listing.title));
    message.push_str(&format!("💰 Price: *{}*\n", escape_markdown(&listing.price)));

    if let Some(year) = present(&listing.year) {
        message.push_str(&format!("📅 Year: {}\n", escape_markdown(year)));
    }
    if let Some(mileage) = present(&listing.mileage) {
        message.push_str(&format!("🛣️ Mileage: {}\n", escape_markdown(mileage)));
    }
    if let Some(location) = present(&listing.location) {
        message.push_str(&format!("📍 Location: {}\n", escape_markdown(location)));
    }
    if let Some(description) = present(&listing.description) {
        message.push_str(&format!("\n{}\n", escape_markdown(description)));
    }

    message.push_str(&format!(
        "\n🔗 [View Listing]({})\n",
        escape_link_target(&listing.url)
    ));
    message.push_str(&format!("📊 Source: {}", escape_markdown(&listing.source)));

    message
}

/// Batch announcement, e.g. `Monday, October 19, 2026 at 03:04 PM`.
pub fn format_header<Tz>(count: usize, timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let when = timestamp.format("%A, %B %-d, %Y at %I:%M %p").to_string();

    format!(
        "📢 *Latest Car Deals Update*\n\n{}\n\nFound {} new deals:",
        escape_markdown(&when),
        count
    )
}

pub fn format_greeting() -> String {
    escape_markdown(GREETING)
}
