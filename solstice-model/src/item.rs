use std::fmt;

/// Metadata a gallery item contributes to the visible-range summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemMetadata {
    /// Capture date, `YYYY-MM-DD`.
    pub date: Option<String>,
    pub address: Option<String>,
}

impl ItemMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Date string, ignoring blanks.
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref().filter(|d| !d.is_empty())
    }

    /// Address string, ignoring blanks.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref().filter(|a| !a.is_empty())
    }
}

/// Photo identifiers arrive either as numeric database ids or opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PhotoId {
    Number(u64),
    Text(String),
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoId::Number(id) => write!(f, "{id}"),
            PhotoId::Text(id) => f.write_str(id),
        }
    }
}

impl From<u64> for PhotoId {
    fn from(value: u64) -> Self {
        PhotoId::Number(value)
    }
}

impl From<&str> for PhotoId {
    fn from(value: &str) -> Self {
        PhotoId::Text(value.to_string())
    }
}

/// A photo entry as rendered by the gallery grid and viewer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhotoItem {
    pub id: PhotoId,
    pub url: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub meta: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub date: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: Option<String>,
}

impl PhotoItem {
    pub fn new(id: impl Into<PhotoId>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: None,
            meta: None,
            date: None,
            address: None,
        }
    }

    /// Metadata used when the item registers for visibility tracking.
    pub fn metadata(&self) -> ItemMetadata {
        ItemMetadata {
            date: self.date.clone(),
            address: self.address.clone(),
        }
    }
}
