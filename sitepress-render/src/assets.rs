//! Static assets bundled into every generated site.

/// The shared stylesheet written to `css/style.css` in each conversion.
pub const STYLESHEET: &str = include_str!("../assets/style.css");

/// Link target used by generated pages, relative to the conversion root.
pub const STYLESHEET_HREF: &str = "css/style.css";
