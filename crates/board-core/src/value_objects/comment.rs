//! Comment policy - how the comment field of a submission is constrained

/// Fixed comments offered by the preset variant of the form
pub const PRESET_COMMENTS: [&str; 5] = [
    "Great experience! Would definitely recommend.",
    "Good service but room for improvement.",
    "Average experience, nothing special.",
    "Below expectations, needs work.",
    "Very disappointing experience.",
];

/// Constraint applied to the comment field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentPolicy {
    /// Any text whose character count lies in `min..=max`
    FreeText { min: usize, max: usize },
    /// Exactly one of a fixed list of strings
    Preset(Vec<String>),
}

impl CommentPolicy {
    /// Default free-text bounds
    pub const FREE_TEXT_MIN: usize = 1;
    pub const FREE_TEXT_MAX: usize = 500;

    /// Free text within the default bounds
    pub fn free_text() -> Self {
        Self::FreeText {
            min: Self::FREE_TEXT_MIN,
            max: Self::FREE_TEXT_MAX,
        }
    }

    /// Selection from [`PRESET_COMMENTS`]
    pub fn presets() -> Self {
        Self::Preset(PRESET_COMMENTS.iter().map(ToString::to_string).collect())
    }

    /// Check whether a comment satisfies this policy
    pub fn accepts(&self, comment: &str) -> bool {
        match self {
            Self::FreeText { min, max } => {
                let len = comment.chars().count();
                len >= *min && len <= *max
            }
            Self::Preset(options) => options.iter().any(|o| o == comment),
        }
    }

    /// Message shown next to the field when [`accepts`](Self::accepts) fails
    pub fn error_message(&self) -> String {
        match self {
            Self::FreeText { min, max } => {
                format!("Comment must be between {min} and {max} characters")
            }
            Self::Preset(_) => "Please select a comment".to_string(),
        }
    }

    /// Preset options, empty for free text
    pub fn options(&self) -> &[String] {
        match self {
            Self::FreeText { .. } => &[],
            Self::Preset(options) => options,
        }
    }
}

impl Default for CommentPolicy {
    fn default() -> Self {
        Self::presets()
    }
}
