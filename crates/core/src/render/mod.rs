//! Document rendering.
//!
//! Turns a calculated document and resolved customization settings into
//! semantic markup plus a matching stylesheet. Sections are emitted only
//! when enabled and non-empty; payment details that are not configured
//! are left out rather than printed as placeholders.
//!
//! # Modules
//!
//! - `html` - Escaping and value formatting
//! - `style` - Stylesheet generation
//! - `renderer` - Section assembly and batch rendering

pub mod html;
pub mod renderer;
mod sections;
pub mod style;


pub use html::{escape_html, format_date, format_money};
pub use renderer::{DocumentRenderer, RenderedDocument};
pub use style::stylesheet;
