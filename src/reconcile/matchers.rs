use crate::catalog::SourceRecord;
use crate::reconcile::IdentifierMatcher;
use crate::subtitles::SubtitleIndexEntry;

/// Matches on the shared numeric identifier
///
/// Applies to every record that carries an identifier. When it applies it is
/// authoritative: a miss means the title has no subtitles.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactIdMatcher;

impl IdentifierMatcher for ExactIdMatcher {
    fn name(&self) -> &'static str {
        "exact_id"
    }

    fn applies_to(&self, record: &SourceRecord) -> bool {
        record.external_id.is_some()
    }

    fn find_match<'a>(
        &self,
        record: &SourceRecord,
        candidates: &'a [SubtitleIndexEntry],
    ) -> Option<&'a SubtitleIndexEntry> {
        let id = record.external_id?;
        candidates.iter().find(|entry| entry.external_id == Some(id))
    }
}

/// Case-insensitive containment between the record title and entry names
///
/// Only used for records without an identifier. Either side may contain the
/// other; the first candidate in response order wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct TitleSubstringMatcher;

impl TitleSubstringMatcher {
    fn names_overlap(title: &str, name: &str) -> bool {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return false;
        }
        name.contains(title) || title.contains(&name)
    }
}

impl IdentifierMatcher for TitleSubstringMatcher {
    fn name(&self) -> &'static str {
        "title_substring"
    }

    fn applies_to(&self, record: &SourceRecord) -> bool {
        record.external_id.is_none()
    }

    fn find_match<'a>(
        &self,
        record: &SourceRecord,
        candidates: &'a [SubtitleIndexEntry],
    ) -> Option<&'a SubtitleIndexEntry> {
        let title = record.title.trim().to_lowercase();
        if title.is_empty() {
            return None;
        }

        candidates
            .iter()
            .find(|entry| entry.names().any(|name| Self::names_overlap(&title, name)))
    }
}
