//! Artifact extraction from generated text.
//!
//! Explicit `[ARTIFACT:KIND:title]` markers come first. Only when there are
//! none does the implicit pass infer a single map artifact from the user's
//! question and the zone facts mentioned in the answer.
//!
//! Zoning facts are scraped from the whole answer, not from the text near
//! each marker, so every marker of one answer carries the same data.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use zonewise_core::artifact::{
    Artifact, ArtifactBody, ArtifactKind, ArtifactMetadata, Setbacks, ZoningData,
};
use zonewise_core::ids::ArtifactId;

use crate::classify::classify;
use crate::gazetteer::{self, Jurisdiction, DEFAULT_JURISDICTION};

pub const DEFAULT_FRONT_SETBACK: f64 = 25.0;
pub const DEFAULT_SIDE_SETBACK: f64 = 7.5;
pub const DEFAULT_REAR_SETBACK: f64 = 20.0;

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[ARTIFACT:(MAP|TABLE|REPORT):([^\]]+)\]").unwrap());

static ZONE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z]+-?\d+[A-Za-z]?)\b").unwrap());

static FRONT: LazyLock<Regex> = LazyLock::new(|| number_after(r"front"));
static SIDE: LazyLock<Regex> = LazyLock::new(|| number_after(r"side"));
static REAR: LazyLock<Regex> = LazyLock::new(|| number_after(r"rear"));
static HEIGHT: LazyLock<Regex> = LazyLock::new(|| number_after(r"(?:max|maximum|height)"));

static ZONING_QUESTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)setback|zone|height|building|permit|r-\d|c-\d|m-\d").unwrap()
});

fn number_after(keyword: &str) -> Regex {
    Regex::new(&format!(r"(?i){keyword}[:\s]*(\d+(?:\.\d+)?)")).unwrap()
}

/// Facts scraped from one answer.
#[derive(Clone, Debug, PartialEq)]
struct Scraped {
    zone_code: Option<String>,
    jurisdiction: Option<&'static Jurisdiction>,
    setbacks: Option<Setbacks>,
    max_height: Option<f64>,
}

impl Scraped {
    fn from_text(text: &str) -> Self {
        Self {
            zone_code: zone_code(text),
            jurisdiction: gazetteer::find_in(text),
            setbacks: setbacks(text),
            max_height: capture_number(&HEIGHT, text),
        }
    }

    fn data(&self, jurisdiction_fallback: Option<&str>) -> ZoningData {
        ZoningData {
            zone_code: self.zone_code.clone(),
            jurisdiction: self
                .jurisdiction
                .map(|j| j.name)
                .or(jurisdiction_fallback)
                .map(String::from),
            setbacks: self.setbacks,
            max_height: self.max_height,
            zone_type: classify(self.zone_code.as_deref().unwrap_or("")),
        }
    }

    fn metadata(&self, data: &ZoningData) -> ArtifactMetadata {
        ArtifactMetadata {
            jurisdiction: data.jurisdiction.clone(),
            zone_code: data.zone_code.clone(),
            coordinates: gazetteer::center_of(data.jurisdiction.as_deref()),
        }
    }
}

/// Artifacts for one answer, in marker order. Never fails; missing facts
/// become `None` or defaults.
pub fn extract(raw_text: &str, last_user_query: &str) -> Vec<Artifact> {
    let scraped = Scraped::from_text(raw_text);

    let explicit = explicit_pass(raw_text, &scraped);
    if !explicit.is_empty() {
        debug!(count = explicit.len(), "explicit artifacts");
        return explicit;
    }

    let implicit: Vec<Artifact> = implicit_pass(last_user_query, &scraped).into_iter().collect();
    if !implicit.is_empty() {
        debug!("implicit map artifact");
    }
    implicit
}

fn explicit_pass(raw_text: &str, scraped: &Scraped) -> Vec<Artifact> {
    MARKER
        .captures_iter(raw_text)
        .map(|caps| {
            let kind = match &caps[1] {
                "TABLE" => ArtifactKind::Table,
                "REPORT" => ArtifactKind::Report,
                _ => ArtifactKind::Map,
            };
            let data = scraped.data(None);
            let metadata = scraped.metadata(&data);
            Artifact {
                id: ArtifactId::new(),
                title: caps[2].to_string(),
                body: ArtifactBody::for_kind(kind, data),
                metadata,
            }
        })
        .collect()
}

fn implicit_pass(last_user_query: &str, scraped: &Scraped) -> Option<Artifact> {
    if !ZONING_QUESTION.is_match(last_user_query) {
        return None;
    }
    // Only facts found in the answer count; the title defaults don't.
    if scraped.zone_code.is_none() && scraped.jurisdiction.is_none() {
        return None;
    }

    let data = scraped.data(Some(DEFAULT_JURISDICTION));
    let title = format!(
        "{} in {}",
        data.zone_code.as_deref().unwrap_or("Zone"),
        data.jurisdiction.as_deref().unwrap_or(DEFAULT_JURISDICTION)
    );
    let metadata = scraped.metadata(&data);

    Some(Artifact {
        id: ArtifactId::new(),
        title,
        body: ArtifactBody::Map(data),
        metadata,
    })
}

/// First zone-code-shaped token, upper-cased.
pub fn zone_code(text: &str) -> Option<String> {
    ZONE_CODE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_uppercase())
}

/// Front/side/rear setbacks. If at least one is stated, the others fall back
/// to the defaults; if none is stated the result is `None`.
pub fn setbacks(text: &str) -> Option<Setbacks> {
    let front = capture_number(&FRONT, text);
    let side = capture_number(&SIDE, text);
    let rear = capture_number(&REAR, text);

    if front.is_none() && side.is_none() && rear.is_none() {
        return None;
    }
    Some(Setbacks {
        front: front.unwrap_or(DEFAULT_FRONT_SETBACK),
        side: side.unwrap_or(DEFAULT_SIDE_SETBACK),
        rear: rear.unwrap_or(DEFAULT_REAR_SETBACK),
    })
}

pub fn max_height(text: &str) -> Option<f64> {
    capture_number(&HEIGHT, text)
}

fn capture_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
