use serde::{Deserialize, Serialize};

/// One zoning district row from the structured record store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoningRecord {
    pub zone_code: String,
    pub jurisdiction: String,
    #[serde(default)]
    pub zone_name: Option<String>,
    #[serde(default)]
    pub front_setback: Option<f64>,
    #[serde(default)]
    pub side_setback: Option<f64>,
    #[serde(default)]
    pub rear_setback: Option<f64>,
    #[serde(default)]
    pub max_height: Option<f64>,
    #[serde(default)]
    pub permitted_uses: Option<String>,
}

/// Partial-match filter for the record store. Absent fields don't filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZoningQuery {
    pub zone_code: Option<String>,
    pub jurisdiction: Option<String>,
    pub limit: u32,
}

impl ZoningQuery {
    pub fn is_unfiltered(&self) -> bool {
        self.zone_code.is_none() && self.jurisdiction.is_none()
    }
}
