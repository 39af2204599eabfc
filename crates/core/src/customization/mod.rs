//! Render customization.
//!
//! Settings are layered, later layers winning:
//! 1. the built-in template for the document type (or a stored default)
//! 2. company branding
//! 3. named presets
//! 4. conditional rules evaluated against the document
//! 5. the caller's override
//! 6. context flags (preview, print, mobile)
//!
//! Every layer is a [`SettingsPatch`]: top-level sections merge field by
//! field, and inside `elements` each element merges field by field.
//!
//! # Modules
//!
//! - `types` - Concrete settings sections and their patch counterparts
//! - `template` - Built-in templates and presets
//! - `rules` - Conditional rules and the facts they read
//! - `resolver` - The layering itself

#[macro_use]
mod macros;

pub mod resolver;
pub mod rules;
pub mod template;
pub mod types;


pub use resolver::{CustomizationResolver, ResolveContext};
pub use rules::{ConditionalRule, DocumentFacts, RuleCondition};
pub use template::{Preset, builtin_template};
pub use types::{
    Alignment, BankDetails, Branding, ColorPalette, CustomizationRecord, CustomizationSettings,
    ElementsConfig, ElementsPatch, LayoutConfig, MobileMoneyDetails, PageSize, PaymentDetails,
    RenderFormat, SettingsPatch, TypographyConfig,
};
