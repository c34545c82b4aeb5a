//! Known jurisdictions and their map centres.

use zonewise_core::artifact::Coordinates;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Jurisdiction {
    pub name: &'static str,
    pub center: Coordinates,
}

pub const DEFAULT_JURISDICTION: &str = "Brevard County";

/// Used when no jurisdiction is known.
pub const COUNTY_CENTER: Coordinates = Coordinates(-80.7, 28.3);

/// Ordered most specific first: a name that contains another name is listed
/// before it, so "Cocoa Beach" wins over "Cocoa".
pub static GAZETTEER: &[Jurisdiction] = &[
    Jurisdiction { name: "Indian Harbour Beach", center: Coordinates(-80.5880, 28.1497) },
    Jurisdiction { name: "Satellite Beach", center: Coordinates(-80.5900, 28.1761) },
    Jurisdiction { name: "Cocoa Beach", center: Coordinates(-80.6070, 28.3200) },
    Jurisdiction { name: "West Melbourne", center: Coordinates(-80.6520, 28.0720) },
    Jurisdiction { name: "Melbourne Beach", center: Coordinates(-80.5600, 28.0680) },
    Jurisdiction { name: "Cape Canaveral", center: Coordinates(-80.6050, 28.3922) },
    Jurisdiction { name: "Brevard County", center: Coordinates(-80.7000, 28.3000) },
    Jurisdiction { name: "Palm Bay", center: Coordinates(-80.5887, 28.0345) },
    Jurisdiction { name: "Titusville", center: Coordinates(-80.8076, 28.6122) },
    Jurisdiction { name: "Rockledge", center: Coordinates(-80.7253, 28.3167) },
    Jurisdiction { name: "Indialantic", center: Coordinates(-80.5660, 28.0897) },
    Jurisdiction { name: "Malabar", center: Coordinates(-80.5700, 27.9900) },
    Jurisdiction { name: "Cocoa", center: Coordinates(-80.7420, 28.3861) },
    Jurisdiction { name: "Melbourne", center: Coordinates(-80.6081, 28.0836) },
];

/// First gazetteer entry whose name occurs in `text`, ignoring case.
pub fn find_in(text: &str) -> Option<&'static Jurisdiction> {
    let haystack = text.to_lowercase();
    GAZETTEER
        .iter()
        .find(|j| haystack.contains(&j.name.to_lowercase()))
}

/// Short forms people type in questions, mapped to the full name.
static QUERY_ALIASES: &[(&str, &str)] = &[("indian harbour", "Indian Harbour Beach")];

/// Like [`find_in`], but also accepts the short forms in [`QUERY_ALIASES`].
pub fn find_in_query(text: &str) -> Option<&'static Jurisdiction> {
    find_in(text).or_else(|| {
        let haystack = text.to_lowercase();
        QUERY_ALIASES
            .iter()
            .find(|(alias, _)| haystack.contains(alias))
            .and_then(|(_, name)| by_name(name))
    })
}

/// Exact (case-insensitive) name lookup.
pub fn by_name(name: &str) -> Option<&'static Jurisdiction> {
    GAZETTEER.iter().find(|j| j.name.eq_ignore_ascii_case(name))
}

pub fn center_of(name: Option<&str>) -> Coordinates {
    name.and_then(by_name)
        .map(|j| j.center)
        .unwrap_or(COUNTY_CENTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourteen_entries() {
        assert_eq!(GAZETTEER.len(), 14);
    }

    #[test]
    fn most_specific_name_wins() {
        assert_eq!(find_in("setbacks in cocoa beach").unwrap().name, "Cocoa Beach");
        assert_eq!(find_in("West Melbourne RS-1").unwrap().name, "West Melbourne");
        assert_eq!(find_in("MELBOURNE BEACH oceanfront").unwrap().name, "Melbourne Beach");
        assert_eq!(find_in("indian harbour beach").unwrap().name, "Indian Harbour Beach");
        assert_eq!(find_in("downtown Cocoa").unwrap().name, "Cocoa");
        assert_eq!(find_in("Melbourne").unwrap().name, "Melbourne");
    }

    #[test]
    fn no_match() {
        assert!(find_in("Orlando").is_none());
        assert!(find_in("").is_none());
    }

    #[test]
    fn every_contained_name_is_listed_after_its_container() {
        for (i, outer) in GAZETTEER.iter().enumerate() {
            for later in &GAZETTEER[i + 1..] {
                assert!(
                    !later.name.contains(outer.name),
                    "{} must come before {}",
                    later.name,
                    outer.name
                );
            }
        }
    }

    #[test]
    fn query_aliases_resolve_to_full_names() {
        assert!(find_in("indian harbour").is_none());
        assert_eq!(find_in_query("Indian Harbour R-1").unwrap().name, "Indian Harbour Beach");
        assert_eq!(find_in_query("cocoa beach").unwrap().name, "Cocoa Beach");
        for (_, name) in QUERY_ALIASES {
            assert!(by_name(name).is_some(), "alias target {name} missing");
        }
    }

    #[test]
    fn centers() {
        assert_eq!(center_of(Some("Satellite Beach")), Coordinates(-80.5900, 28.1761));
        assert_eq!(center_of(Some("palm bay")), Coordinates(-80.5887, 28.0345));
        assert_eq!(center_of(Some("Grant-Valkaria")), COUNTY_CENTER);
        assert_eq!(center_of(None), COUNTY_CENTER);
    }
}
