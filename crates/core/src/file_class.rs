//! File classes and accepted file formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed category of file store.
///
/// Each class carries two policy flags:
/// - `incoming`: arriving files trigger a notification, so the store gets a channel.
/// - `many`: a tenant may own more than one store of this class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileClass {
    PlaylistImport,
    PlaylistExport,
    Asrun,
    ContentServiceAsset,
    ContentServiceTimeline,
    ContentServiceBrowse,
    DataTranslation,
}

impl FileClass {
    /// Every member of the enumeration, in declaration order.
    pub const ALL: [FileClass; 7] = [
        Self::PlaylistImport,
        Self::PlaylistExport,
        Self::Asrun,
        Self::ContentServiceAsset,
        Self::ContentServiceTimeline,
        Self::ContentServiceBrowse,
        Self::DataTranslation,
    ];

    /// Parse from the wire name (e.g. `PLAYLIST_IMPORT`).
    pub fn parse(s: &str) -> crate::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| crate::Error::InvalidFileClass(s.to_string()))
    }

    /// Get the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlaylistImport => "PLAYLIST_IMPORT",
            Self::PlaylistExport => "PLAYLIST_EXPORT",
            Self::Asrun => "ASRUN",
            Self::ContentServiceAsset => "CONTENT_SERVICE_ASSET",
            Self::ContentServiceTimeline => "CONTENT_SERVICE_TIMELINE",
            Self::ContentServiceBrowse => "CONTENT_SERVICE_BROWSE",
            Self::DataTranslation => "DATA_TRANSLATION",
        }
    }

    /// Whether arriving files are announced on a notification channel.
    pub fn incoming(&self) -> bool {
        !matches!(self, Self::PlaylistExport | Self::Asrun)
    }

    /// Whether a tenant may own more than one store of this class.
    pub fn many(&self) -> bool {
        !matches!(self, Self::ContentServiceBrowse)
    }

    /// Whether stores of this class may carry free-form metadata.
    pub fn allows_metadata(&self) -> bool {
        matches!(self, Self::DataTranslation)
    }
}

impl fmt::Display for FileClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileClass {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::parse(s)
    }
}

/// Accepted file format of a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Pxf,
    Xml,
    Json,
    Csv,
    Txt,
}

impl FileFormat {
    /// Parse from the wire name (e.g. `pxf`).
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s {
            "pxf" => Ok(Self::Pxf),
            "xml" => Ok(Self::Xml),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "txt" => Ok(Self::Txt),
            _ => Err(crate::Error::InvalidFileFormat(s.to_string())),
        }
    }

    /// Get the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pxf => "pxf",
            Self::Xml => "xml",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Txt => "txt",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
