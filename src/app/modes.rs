//! Input mode state types.
//!
//! The plugin is either in `Normal` mode (navigation, sorting, delete and
//! restore commands) or editing one of the two query fields.

/// The query field receiving typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryField {
    Name,
    City,
}

impl QueryField {
    /// The other field, for Tab switching.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Name => Self::City,
            Self::City => Self::Name,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::City => "City",
        }
    }
}

/// Current input handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigation and command keys are active.
    Normal,

    /// Characters are appended to the focused query field.
    Query(QueryField),
}
