//! Platform-neutral rich reply model.
//!
//! Handlers build [`Embed`] values and hand them to a [`ChatSession`](crate::ChatSession);
//! the session adapter converts them into whatever the messaging library expects.

use serde::{Deserialize, Serialize};

/// Colour used for successful replies.
pub const COLOR_SUCCESS: u32 = 0x00ff00;
/// Colour used for command handler errors.
pub const COLOR_ERROR: u32 = 0xff0000;
/// Colour used for dispatcher warnings (cooldown, unknown command, permissions).
pub const COLOR_WARNING: u32 = 0xad2e2e;

/// A single titled field inside an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Field heading.
    pub name: String,
    /// Field body.
    pub value: String,
    /// Whether the field may be laid out next to its neighbours.
    pub inline: bool,
}

/// A structured, styled reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    /// Optional title line.
    pub title: Option<String>,
    /// Optional description body.
    pub description: Option<String>,
    /// Side-bar colour as `0xRRGGBB`.
    pub color: u32,
    /// Ordered fields.
    pub fields: Vec<EmbedField>,
    /// Optional footer text.
    pub footer: Option<String>,
}

impl Embed {
    /// Creates an empty embed with the given colour.
    pub fn new(color: u32) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Sets the footer text.
    #[must_use]
    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Looks up a field by its heading.
    #[cfg(any(test, feature = "testing"))]
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}
