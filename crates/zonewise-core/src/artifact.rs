//! Typed artifacts derived from assistant text.
//!
//! An [`Artifact`] is a closed union keyed by kind. Map, table and report
//! artifacts all carry a [`ZoningData`] payload; comparison carries several.
//! On the wire the kind is the `type` field and the payload is `data`.

use serde::{Deserialize, Serialize};

use crate::ids::ArtifactId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Map,
    Table,
    Report,
    Comparison,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Table => "table",
            Self::Report => "report",
            Self::Comparison => "comparison",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed vocabulary of district categories. Never null on an artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoneType {
    Residential,
    Commercial,
    Industrial,
    Agricultural,
    MixedUse,
    Other,
    Unknown,
}

impl ZoneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
            Self::Industrial => "industrial",
            Self::Agricultural => "agricultural",
            Self::MixedUse => "mixed-use",
            Self::Other => "other",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ZoneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum distances from the property lines, in feet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Setbacks {
    pub front: f64,
    pub side: f64,
    pub rear: f64,
}

/// Normalized zoning facts scraped from an answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoningData {
    pub zone_code: Option<String>,
    pub jurisdiction: Option<String>,
    pub setbacks: Option<Setbacks>,
    pub max_height: Option<f64>,
    pub zone_type: ZoneType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonData {
    pub zones: Vec<ZoningData>,
}

/// Map centre as `[longitude, latitude]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates(pub f64, pub f64);

impl Coordinates {
    pub fn longitude(&self) -> f64 {
        self.0
    }

    pub fn latitude(&self) -> f64 {
        self.1
    }
}

/// Display-routing hints for the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetadata {
    pub jurisdiction: Option<String>,
    pub zone_code: Option<String>,
    pub coordinates: Coordinates,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ArtifactBody {
    Map(ZoningData),
    Table(ZoningData),
    Report(ZoningData),
    Comparison(ComparisonData),
}

impl ArtifactBody {
    /// Wrap a zoning payload in the variant for `kind`.
    /// Comparison wraps the single entry in a one-element list.
    pub fn for_kind(kind: ArtifactKind, data: ZoningData) -> Self {
        match kind {
            ArtifactKind::Map => Self::Map(data),
            ArtifactKind::Table => Self::Table(data),
            ArtifactKind::Report => Self::Report(data),
            ArtifactKind::Comparison => Self::Comparison(ComparisonData { zones: vec![data] }),
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Map(_) => ArtifactKind::Map,
            Self::Table(_) => ArtifactKind::Table,
            Self::Report(_) => ArtifactKind::Report,
            Self::Comparison(_) => ArtifactKind::Comparison,
        }
    }

    /// The single-zone payload, if this kind carries one.
    pub fn zoning(&self) -> Option<&ZoningData> {
        match self {
            Self::Map(d) | Self::Table(d) | Self::Report(d) => Some(d),
            Self::Comparison(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: ArtifactId,
    pub title: String,
    #[serde(flatten)]
    pub body: ArtifactBody,
    pub metadata: ArtifactMetadata,
}

impl Artifact {
    pub fn kind(&self) -> ArtifactKind {
        self.body.kind()
    }
}
