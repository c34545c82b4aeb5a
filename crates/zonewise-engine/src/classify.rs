use zonewise_core::artifact::ZoneType;

/// Category of a zone code. Rules are checked in order; the first hit wins.
pub fn classify(zone_code: &str) -> ZoneType {
    let code = zone_code.trim().to_uppercase();
    if code.is_empty() {
        ZoneType::Unknown
    } else if code.starts_with('R') || code.contains("RES") {
        ZoneType::Residential
    } else if code.starts_with('C') || code.contains("COM") {
        ZoneType::Commercial
    } else if code.starts_with('M') || code.starts_with('I') || code.contains("IND") {
        ZoneType::Industrial
    } else if code.starts_with('A') || code.contains("AG") {
        ZoneType::Agricultural
    } else if code.contains("MU") || code.contains("MIX") {
        ZoneType::MixedUse
    } else {
        ZoneType::Other
    }
}
