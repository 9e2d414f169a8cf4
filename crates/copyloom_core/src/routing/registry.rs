//! Model tier classification and display metadata.
//!
//! # Responsibility
//! - Partition model identifiers into flagship and economy tiers.
//! - Resolve display names and tier glyphs for UI surfaces.
//!
//! # Invariants
//! - Classification derives from family rules, not a closed lookup table;
//!   unseen identifiers from a known family still classify correctly.
//! - Lookups never fail; unrecognized identifiers degrade to defaults.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

static OPENAI_FLAGSHIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^openai/gpt-\d").expect("valid openai family regex"));
static ANTHROPIC_FLAGSHIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^anthropic/claude-(opus|sonnet)").expect("valid anthropic family regex")
});
static GOOGLE_FLAGSHIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^google/gemini-\d+(\.\d+)?-pro").expect("valid google family regex"));
static XAI_FLAGSHIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^xai/grok-\d").expect("valid xai family regex"));

/// Identifier segments that mark a model as an economy variant.
const ECONOMY_MARKERS: [&str; 5] = ["mini", "nano", "lite", "flash", "haiku"];

const FLAGSHIP_GLYPH: &str = "\u{2726}";
const ECONOMY_GLYPH: &str = "\u{26a1}";

/// Cost/quality classification of a generation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    Flagship,
    Economy,
}

impl ModelTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flagship => "flagship",
            Self::Economy => "economy",
        }
    }
}

impl Display for ModelTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a model identifier into its tier.
///
/// Rules, in order:
/// - An economy marker segment (`mini`, `nano`, `lite`, `flash`, `haiku`)
///   anywhere in the model name wins, even inside a flagship family.
/// - Otherwise a flagship family match (`openai/gpt-N`,
///   `anthropic/claude-opus|sonnet`, `google/gemini-N-pro`, `xai/grok-N`)
///   classifies as flagship.
/// - Everything else, including unknown vendors, is economy.
pub fn tier_of(model_id: &str) -> ModelTier {
    if has_economy_marker(model_id) {
        return ModelTier::Economy;
    }

    let flagship = OPENAI_FLAGSHIP_RE.is_match(model_id)
        || ANTHROPIC_FLAGSHIP_RE.is_match(model_id)
        || GOOGLE_FLAGSHIP_RE.is_match(model_id)
        || XAI_FLAGSHIP_RE.is_match(model_id);

    if flagship {
        ModelTier::Flagship
    } else {
        ModelTier::Economy
    }
}

/// Resolves a human-readable display name for a model identifier.
///
/// Falls back to the raw identifier when unrecognized; never fails.
pub fn display_name(model_id: &str) -> String {
    let known = match model_id {
        "openai/gpt-5" => "GPT-5",
        "openai/gpt-5-mini" => "GPT-5 Mini",
        "openai/gpt-5-nano" => "GPT-5 Nano",
        "anthropic/claude-opus-4" => "Claude Opus 4",
        "anthropic/claude-sonnet-4" => "Claude Sonnet 4",
        "anthropic/claude-haiku-3.5" => "Claude Haiku 3.5",
        "google/gemini-2.5-pro" => "Gemini 2.5 Pro",
        "google/gemini-2.5-flash" => "Gemini 2.5 Flash",
        "xai/grok-4" => "Grok 4",
        _ => return model_id.to_string(),
    };
    known.to_string()
}

/// Returns the glyph shown next to a model, derived from its tier.
pub fn icon(model_id: &str) -> &'static str {
    match tier_of(model_id) {
        ModelTier::Flagship => FLAGSHIP_GLYPH,
        ModelTier::Economy => ECONOMY_GLYPH,
    }
}

fn has_economy_marker(model_id: &str) -> bool {
    let name = model_id.rsplit('/').next().unwrap_or(model_id);
    name.split('-')
        .any(|segment| ECONOMY_MARKERS.contains(&segment))
}

#[cfg(test)]
mod tests {
    use super::{display_name, icon, tier_of, ModelTier};

    #[test]
    fn flagship_families_classify_as_flagship() {
        assert_eq!(tier_of("openai/gpt-5"), ModelTier::Flagship);
        assert_eq!(tier_of("anthropic/claude-sonnet-4"), ModelTier::Flagship);
        assert_eq!(tier_of("anthropic/claude-opus-4"), ModelTier::Flagship);
        assert_eq!(tier_of("google/gemini-2.5-pro"), ModelTier::Flagship);
        assert_eq!(tier_of("xai/grok-4"), ModelTier::Flagship);
    }

    #[test]
    fn economy_marker_wins_over_flagship_family() {
        assert_eq!(tier_of("openai/gpt-5-mini"), ModelTier::Economy);
        assert_eq!(tier_of("openai/gpt-5-nano"), ModelTier::Economy);
        assert_eq!(tier_of("google/gemini-2.5-flash"), ModelTier::Economy);
        assert_eq!(tier_of("anthropic/claude-haiku-3.5"), ModelTier::Economy);
    }

    #[test]
    fn unseen_family_members_still_classify() {
        assert_eq!(tier_of("openai/gpt-6"), ModelTier::Flagship);
        assert_eq!(tier_of("anthropic/claude-sonnet-5"), ModelTier::Flagship);
        assert_eq!(tier_of("openai/gpt-6-mini"), ModelTier::Economy);
    }

    #[test]
    fn unknown_identifiers_default_to_economy() {
        assert_eq!(tier_of("mistral/ministral-8b"), ModelTier::Economy);
        assert_eq!(tier_of("gibberish"), ModelTier::Economy);
        assert_eq!(tier_of(""), ModelTier::Economy);
    }

    #[test]
    fn display_name_degrades_to_raw_identifier() {
        assert_eq!(display_name("openai/gpt-5-mini"), "GPT-5 Mini");
        assert_eq!(display_name("vendor/never-heard-of-it"), "vendor/never-heard-of-it");
    }

    #[test]
    fn icon_follows_tier() {
        assert_eq!(icon("openai/gpt-5"), "\u{2726}");
        assert_eq!(icon("openai/gpt-5-mini"), "\u{26a1}");
    }
}
