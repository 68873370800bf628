use models::GenreVocabulary;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedGenres {
    /// Canonical vocabulary names, in first-requested order, without repeats.
    pub matched: Vec<String>,
    /// Requested names absent from the vocabulary, trimmed, without repeats.
    pub unknown: Vec<String>,
}

/// Maps requested genre names onto the vocabulary, case-insensitively.
pub fn resolve_genres<S: AsRef<str>>(
    vocabulary: &GenreVocabulary,
    requested: &[S],
) -> ResolvedGenres {
    let mut resolved = ResolvedGenres::default();
    let mut seen_unknown = HashSet::new();

    for name in requested {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }

        match vocabulary.resolve(name) {
            Some(canonical) => {
                if !resolved.matched.iter().any(|g| g == canonical) {
                    resolved.matched.push(canonical.to_string());
                }
            }
            None => {
                if seen_unknown.insert(name.to_lowercase()) {
                    resolved.unknown.push(name.to_string());
                }
            }
        }
    }

    resolved
}
