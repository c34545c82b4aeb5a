/// Base instructions sent with every turn.
pub const SYSTEM_PROMPT: &str = include_str!("../prompts/system.txt");

/// Bumped whenever `prompts/system.txt` changes meaningfully.
pub const SYSTEM_PROMPT_VERSION: u32 = 1;

const CONTEXT_HEADER: &str = "\n\nRELEVANT ZONING DATA:\n";

/// Append looked-up zoning records to the base prompt.
pub fn build(base_prompt: &str, lookup_result: Option<&str>) -> String {
    match lookup_result {
        Some(context) => format!("{base_prompt}{CONTEXT_HEADER}{context}"),
        None => base_prompt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_context_is_unchanged() {
        assert_eq!(build("base", None), "base");
    }

    #[test]
    fn with_context_appends_section() {
        assert_eq!(
            build("base", Some("Zone: R-1 (Melbourne)")),
            "base\n\nRELEVANT ZONING DATA:\nZone: R-1 (Melbourne)"
        );
    }

    #[test]
    fn system_prompt_lists_jurisdictions_and_markers() {
        for name in ["Grant-Valkaria", "Melbourne Village", "Palm Shores", "Cape Canaveral"] {
            assert!(SYSTEM_PROMPT.contains(name), "missing {name}");
        }
        let listed = SYSTEM_PROMPT.lines().filter(|l| l.starts_with("- ")).count();
        assert_eq!(listed, 17);
        assert!(SYSTEM_PROMPT.contains("[ARTIFACT:MAP:"));
        assert!(SYSTEM_PROMPT.contains("[ARTIFACT:TABLE:"));
        assert!(SYSTEM_PROMPT.contains("[ARTIFACT:REPORT:"));
    }
}
