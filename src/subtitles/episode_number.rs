/*!
 * Episode number inference from subtitle filenames.
 *
 * Uploaders name files however they like ("Show - Ep01.srt", "Show.S01E02.ass",
 * "[Group] Show - 03 [1080p].vtt"), so the number is recovered with an ordered
 * list of patterns. Stricter patterns run first; the loose bare-digit pattern
 * only applies when nothing stricter matched, because it happily picks up
 * resolutions, release-group numbers, and dates.
 */

use std::collections::HashSet;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::subtitles::models::{ResolvedEpisode, SubtitleFile};

/// `ep`/`episode` token not preceded by a letter, optional separators, digits
static EXPLICIT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z])ep(?:isode)?[\s._-]*(\d+)").expect("Invalid explicit episode regex")
});

/// Single `e` immediately followed by digits (S01E02, .E2.)
static PREFIXED_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[Ee](\d+)").expect("Invalid prefixed episode regex")
});

/// Any run of digits bounded by non-digits or the string edges
static BARE_DIGITS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\D)(\d+)(?:\D|$)").expect("Invalid bare digits regex")
});

/// One tier of the episode number heuristics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePattern {
    /// "Ep01", "Episode 3", "_ep-12"
    Explicit,
    /// "E2", "S01E05"
    Prefixed,
    /// "03", "- 12 -"
    BareDigits,
}

impl EpisodePattern {
    /// Tiers in precedence order
    pub const ORDERED: [EpisodePattern; 3] = [
        EpisodePattern::Explicit,
        EpisodePattern::Prefixed,
        EpisodePattern::BareDigits,
    ];

    fn regex(self) -> &'static Regex {
        match self {
            Self::Explicit => &EXPLICIT_PATTERN,
            Self::Prefixed => &PREFIXED_PATTERN,
            Self::BareDigits => &BARE_DIGITS_PATTERN,
        }
    }

    /// Episode number captured by this tier alone
    ///
    /// Uses the first match of the tier and the first non-empty capture
    /// group within it. A capture that does not fit `u32` counts as no match.
    pub fn capture(self, filename: &str) -> Option<u32> {
        let captures = self.regex().captures(filename)?;
        captures
            .iter()
            .skip(1)
            .flatten()
            .map(|group| group.as_str())
            .find(|group| !group.is_empty())
            .and_then(|digits| digits.parse().ok())
    }
}

/// Infer the episode number of a filename, trying each tier in order
pub fn resolve_episode_number(filename: &str) -> Option<u32> {
    EpisodePattern::ORDERED
        .iter()
        .find_map(|pattern| pattern.capture(filename))
}

/// Map a file listing to episodes, keeping the first file per episode number
///
/// Files that match no pattern are skipped. Later files resolving to an
/// already seen number are discarded.
pub fn resolve_files<I>(files: I) -> Vec<ResolvedEpisode>
where
    I: IntoIterator<Item = SubtitleFile>,
{
    let mut seen = HashSet::new();
    let mut episodes = Vec::new();

    for file in files {
        let Some(number) = resolve_episode_number(&file.filename) else {
            debug!("No episode number in '{}', skipping", file.filename);
            continue;
        };

        if !seen.insert(number) {
            debug!(
                "Episode {} already resolved, discarding '{}'",
                number, file.filename
            );
            continue;
        }

        episodes.push(ResolvedEpisode {
            episode_number: number,
            subtitle_url: file.url,
            source_filename: file.filename,
        });
    }

    episodes
}
