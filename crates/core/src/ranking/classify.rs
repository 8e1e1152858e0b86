//! Release-name classification for voiceover and video quality.
//!
//! Release titles from public trackers carry no structured metadata, so the
//! voiceover category and resolution are inferred from keyword markers in the
//! name itself. Matching is case-insensitive substring containment.

/// Markers for a full professional dub.
const FULL_DUB_KEYWORDS: &[&str] = &[
    "полный дубляж",
    "полное дублирование",
    "full dub",
    "full dubbing",
    "professional dubbing",
];

/// Markers for any other kind of localized voiceover.
const VOICEOVER_KEYWORDS: &[&str] = &[
    "профессионал",
    "многоголос",
    "двуголос",
    "двухголос",
    "одноголос",
    "закадров",
    "русск",
    "озвуч",
    "локализ",
    "voiceover",
    "russian",
    "dub",
];

/// Markers that explicitly exclude a localized audio track.
/// These override any other voiceover marker in the same name.
const NO_VOICEOVER_KEYWORDS: &[&str] = &[
    "без перевода",
    "оригинал",
    "original audio",
    "no voice",
    "no voiceover",
    "no translation",
];

/// Resolution keyword groups in rank order; first match wins.
const QUALITY_KEYWORDS: &[(i32, &[&str])] = &[
    (0, &["1080p", "1080"]),
    (1, &["2160p", "2160", "4k"]),
    (2, &["720p", "720"]),
    (3, &["480p", "480"]),
];

/// Voice rank assigned when no voiceover marker is present.
pub const DEFAULT_VOICE_RANK: i32 = -1;

/// Quality rank assigned when no resolution marker is present.
pub const DEFAULT_QUALITY_RANK: i32 = 5;

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// Classify a release name into `(voice_rank, quality_rank)`.
///
/// `voice_rank` is `0` for a full dub, positive for other localized
/// voiceovers and negative when no localized track is present (or when the
/// name explicitly excludes one). `quality_rank` is `0` for 1080p down to
/// `3` for 480p, with `5` for unknown; lower is better.
///
/// Blank input yields the defaults without attempting any match.
pub fn classify_release(name: &str) -> (i32, i32) {
    let normalized = name.to_lowercase();
    if normalized.trim().is_empty() {
        return (DEFAULT_VOICE_RANK, DEFAULT_QUALITY_RANK);
    }

    let voice_rank = if contains_any(&normalized, NO_VOICEOVER_KEYWORDS) {
        -1
    } else if contains_any(&normalized, FULL_DUB_KEYWORDS) {
        0
    } else if contains_any(&normalized, VOICEOVER_KEYWORDS) {
        1
    } else {
        DEFAULT_VOICE_RANK
    };

    let mut quality_rank = DEFAULT_QUALITY_RANK;
    for (rank, keywords) in QUALITY_KEYWORDS {
        if contains_any(&normalized, keywords) {
            quality_rank = *rank;
            break;
        }
    }

    (voice_rank, quality_rank)
}
