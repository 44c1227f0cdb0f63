use serde::{Deserialize, Serialize};

/// Optional presentation attributes of a block
///
/// Every field is independently optional. Field names serialize in
/// camelCase (`backgroundColor`, `fontFamily`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
}

impl Style {
    /// True when no attribute is set
    pub fn is_empty(&self) -> bool {
        self.background_color.is_none()
            && self.color.is_none()
            && self.font_family.is_none()
            && self.font_size.is_none()
    }
}
