//! Indentation configuration for generated text.

/// Indentation style for generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    /// Spaces with the specified width (e.g., 2 or 4).
    Spaces(u8),
    /// Tab character.
    Tab,
}

impl Indent {
    /// 4-space indentation (Java sources).
    pub const JAVA: Self = Self::Spaces(4);

    /// 2-space indentation (XML mapping documents).
    pub const XML: Self = Self::Spaces(2);

    /// Convert to the string representation for one indent level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spaces(2) => "  ",
            Self::Spaces(4) => "    ",
            Self::Spaces(8) => "        ",
            // Fallback to 4 whitespaces
            Self::Spaces(_) => "    ",
            Self::Tab => "\t",
        }
    }

    /// Width of one level in columns, counting a tab as one.
    pub fn width(&self) -> usize {
        self.as_str().len()
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::JAVA
    }
}
