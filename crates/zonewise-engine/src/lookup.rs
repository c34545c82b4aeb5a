//! Zoning record lookup that enriches the prompt before generation.

use std::fmt::Write as _;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, instrument, warn};

use zonewise_core::turns::Conversation;
use zonewise_core::zoning::{ZoningQuery, ZoningRecord};
use zonewise_store::{StoreError, ZoningRepo};

use crate::gazetteer;

/// Records returned per lookup.
pub const LOOKUP_LIMIT: u32 = 5;

const BLOCK_SEPARATOR: &str = "\n---\n";

static QUERY_ZONE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z]+-?\d+[a-z]?|r-1|r-2|r-3|c-1|c-2|m-1|pd|pud)\b").unwrap()
});

/// Read-only access to zoning district records.
#[async_trait]
pub trait ZoningSource: Send + Sync {
    async fn search(&self, query: &ZoningQuery) -> Result<Vec<ZoningRecord>, StoreError>;
}

#[async_trait]
impl ZoningSource for ZoningRepo {
    async fn search(&self, query: &ZoningQuery) -> Result<Vec<ZoningRecord>, StoreError> {
        ZoningRepo::search(self, query)
    }
}

/// Filters derived from the most recent user turn, or `None` when it names
/// neither a zone code nor a known jurisdiction.
pub fn query_for(conversation: &Conversation) -> Option<ZoningQuery> {
    let text = conversation.last_user_turn()?.content.to_lowercase();

    let zone_code = QUERY_ZONE_CODE
        .captures(&text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());
    let jurisdiction = gazetteer::find_in_query(&text).map(|j| j.name.to_string());

    if zone_code.is_none() && jurisdiction.is_none() {
        return None;
    }
    Some(ZoningQuery {
        zone_code,
        jurisdiction,
        limit: LOOKUP_LIMIT,
    })
}

/// Formatted context for the prompt, or `None` when nothing relevant was found.
/// Store failures are logged and treated as "nothing found".
#[instrument(skip_all)]
pub async fn lookup(source: &dyn ZoningSource, conversation: &Conversation) -> Option<String> {
    let query = query_for(conversation)?;

    let records = match source.search(&query).await {
        Ok(records) => records,
        Err(e) => {
            warn!(
                error = %e,
                zone_code = ?query.zone_code,
                jurisdiction = ?query.jurisdiction,
                "zoning lookup failed, continuing without context"
            );
            return None;
        }
    };

    debug!(
        zone_code = ?query.zone_code,
        jurisdiction = ?query.jurisdiction,
        matched = records.len(),
        "zoning lookup"
    );

    if records.is_empty() {
        return None;
    }
    Some(
        records
            .iter()
            .map(format_record)
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR),
    )
}

/// One record as a prompt block. Missing numbers print as `N/A`.
pub fn format_record(record: &ZoningRecord) -> String {
    let mut block = String::new();
    let _ = writeln!(block, "Zone: {} ({})", record.zone_code, record.jurisdiction);
    let _ = writeln!(block, "Name: {}", record.zone_name.as_deref().unwrap_or("N/A"));
    let _ = writeln!(
        block,
        "Setbacks: Front {}ft, Side {}ft, Rear {}ft",
        feet(record.front_setback),
        feet(record.side_setback),
        feet(record.rear_setback)
    );
    let _ = writeln!(block, "Max Height: {}ft", feet(record.max_height));
    let _ = write!(
        block,
        "Permitted Uses: {}",
        record.permitted_uses.as_deref().unwrap_or("See local code")
    );
    block
}

fn feet(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}
