/// Capabilities of a Claude model relevant to answering zoning questions.
#[derive(Clone, Debug)]
pub struct ClaudeModelInfo {
    pub name: &'static str,
    pub display_name: &'static str,
    pub context_window: usize,
    pub max_output: u32,
}

pub static CLAUDE_SONNET_4: ClaudeModelInfo = ClaudeModelInfo {
    name: "claude-sonnet-4-20250514",
    display_name: "Claude Sonnet 4",
    context_window: 200_000,
    max_output: 64_000,
};

pub static CLAUDE_OPUS_4: ClaudeModelInfo = ClaudeModelInfo {
    name: "claude-opus-4-20250514",
    display_name: "Claude Opus 4",
    context_window: 200_000,
    max_output: 32_000,
};

pub static CLAUDE_HAIKU_3_5: ClaudeModelInfo = ClaudeModelInfo {
    name: "claude-3-5-haiku-20241022",
    display_name: "Claude Haiku 3.5",
    context_window: 200_000,
    max_output: 8_192,
};

static ALL_MODELS: &[&ClaudeModelInfo] = &[&CLAUDE_SONNET_4, &CLAUDE_OPUS_4, &CLAUDE_HAIKU_3_5];

pub fn find_model(name: &str) -> Option<&'static ClaudeModelInfo> {
    ALL_MODELS.iter().find(|m| m.name == name).copied()
}

pub fn default_model() -> &'static ClaudeModelInfo {
    &CLAUDE_SONNET_4
}

/// Clamp a requested completion budget to what the model can emit.
pub fn clamp_max_tokens(model: &ClaudeModelInfo, requested: u32) -> u32 {
    requested.clamp(1, model.max_output)
}
