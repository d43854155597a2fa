/*!
 * Identifier reconciliation between the catalog and the subtitle index.
 *
 * The two sides only sometimes share a numeric identifier. A `Reconciler`
 * runs an ordered list of `IdentifierMatcher`s against index candidates:
 * the exact identifier match first, then (unless disabled) a title
 * substring fallback for records that carry no identifier.
 */

use std::fmt::Debug;

use log::debug;

use crate::app_config::MatchingConfig;
use crate::catalog::SourceRecord;
use crate::errors::IndexError;
use crate::subtitles::{EntryLookup, ResolvedEpisode, SubtitleIndexClient, SubtitleIndexEntry};

pub mod matchers;

pub use self::matchers::{ExactIdMatcher, TitleSubstringMatcher};

/// One strategy for pairing a catalog record with an index entry
pub trait IdentifierMatcher: Send + Sync + Debug {
    /// Short name used in logs and match results
    fn name(&self) -> &'static str;

    /// Whether this strategy is responsible for the record at all
    fn applies_to(&self, record: &SourceRecord) -> bool;

    /// The candidate this strategy pairs with the record, if any
    fn find_match<'a>(
        &self,
        record: &SourceRecord,
        candidates: &'a [SubtitleIndexEntry],
    ) -> Option<&'a SubtitleIndexEntry>;
}

/// A successful pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    /// The matched index entry
    pub entry: &'a SubtitleIndexEntry,
    /// Name of the matcher that produced it
    pub matcher: &'static str,
}

/// Ordered set of matchers
#[derive(Debug)]
pub struct Reconciler {
    matchers: Vec<Box<dyn IdentifierMatcher>>,
}

impl Reconciler {
    /// Exact identifier matching, plus the title fallback when enabled
    pub fn new(title_fallback: bool) -> Self {
        let mut matchers: Vec<Box<dyn IdentifierMatcher>> = vec![Box::new(ExactIdMatcher)];
        if title_fallback {
            matchers.push(Box::new(TitleSubstringMatcher));
        }
        Self { matchers }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(config.title_fallback)
    }

    /// Use a custom matcher list, tried in order
    pub fn with_matchers(matchers: Vec<Box<dyn IdentifierMatcher>>) -> Self {
        Self { matchers }
    }

    pub fn matcher_names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    fn applicable<'s>(
        &'s self,
        record: &'s SourceRecord,
    ) -> impl Iterator<Item = &'s Box<dyn IdentifierMatcher>> {
        self.matchers.iter().filter(move |m| m.applies_to(record))
    }

    /// First match produced by an applicable matcher
    pub fn find_match<'a>(
        &self,
        record: &SourceRecord,
        candidates: &'a [SubtitleIndexEntry],
    ) -> Option<Match<'a>> {
        self.applicable(record).find_map(|matcher| {
            matcher.find_match(record, candidates).map(|entry| Match {
                entry,
                matcher: matcher.name(),
            })
        })
    }

    /// Records that pair with some candidate, in input order
    pub fn retain_subtitled(
        &self,
        records: Vec<SourceRecord>,
        candidates: &[SubtitleIndexEntry],
    ) -> Vec<SourceRecord> {
        let total = records.len();
        let kept: Vec<SourceRecord> = records
            .into_iter()
            .filter(|record| match self.find_match(record, candidates) {
                Some(found) => {
                    debug!("'{}' matched entry {} via {}", record.title, found.entry.entry_id, found.matcher);
                    true
                }
                None => false,
            })
            .collect();
        debug!("{} of {} records have subtitles", kept.len(), total);
        kept
    }

    /// Episodes with subtitles for one record
    ///
    /// The index is searched by identifier when the record has one, by
    /// title otherwise, and the entry is picked by the same matchers
    /// `retain_subtitled` uses. If no matcher applies the result is empty
    /// and the index is not queried.
    pub async fn resolve_episodes(
        &self,
        record: &SourceRecord,
        index: &SubtitleIndexClient,
    ) -> Result<Vec<ResolvedEpisode>, IndexError> {
        if self.applicable(record).next().is_none() {
            debug!("No matcher applies to '{}', skipping subtitle lookup", record.title);
            return Ok(Vec::new());
        }

        let Some(lookup) = EntryLookup::from_parts(record.external_id, &record.title) else {
            return Ok(Vec::new());
        };

        let candidates = index.search_entries(&lookup).await?;
        match self.find_match(record, &candidates) {
            Some(found) => {
                debug!("'{}' matched entry {} via {}", record.title, found.entry.entry_id, found.matcher);
                index.resolve_entry_episodes(found.entry).await
            }
            None => {
                debug!("No index entry pairs with '{}'", record.title);
                Ok(Vec::new())
            }
        }
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(true)
    }
}
