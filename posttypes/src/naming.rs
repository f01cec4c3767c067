//! Naming conventions shared by every registration path.

/// Registered name derived from an internal key: trimmed, lowercased, with
/// `-` and whitespace normalised to `_`.
pub fn format_entity_name(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Display name derived from an internal key: separators become spaces and
/// each word is capitalised. `"book-review"` → `"Book Review"`.
pub fn humanize(key: &str) -> String {
    key.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(ucfirst)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Naive plural: appends `s`. Irregular plurals must be declared.
pub fn pluralize(singular: &str) -> String {
    format!("{singular}s")
}

/// Default admin column label: underscores become spaces, first letter
/// upper-cased. `"publish_year"` → `"Publish year"`.
pub fn column_label(name: &str) -> String {
    ucfirst(&name.replace('_', " "))
}

/// Upper-case the first character.
pub fn ucfirst(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Key-style sanitising: lowercase, keeping only ASCII letters, digits, `_`
/// and `-`.
pub fn sanitize_key(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Slug-style sanitising: lowercase, whitespace and dots become `-`, other
/// punctuation is dropped, and runs of dashes collapse.
pub fn sanitize_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.trim().to_lowercase().chars() {
        let mapped = match c {
            c if c.is_ascii_alphanumeric() || c == '_' => Some(c),
            c if c == '-' || c == '.' || c.is_whitespace() => Some('-'),
            _ => None,
        };
        if let Some(c) = mapped {
            if c == '-' && slug.ends_with('-') {
                continue;
            }
            slug.push(c);
        }
    }
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_names() {
        assert_eq!(format_entity_name("book"), "book");
        assert_eq!(format_entity_name("Book-Review"), "book_review");
        assert_eq!(format_entity_name(" case study "), "case_study");
        assert_eq!(format_entity_name("   "), "");
    }

    #[test]
    fn humanized_keys() {
        assert_eq!(humanize("book"), "Book");
        assert_eq!(humanize("book-review"), "Book Review");
        assert_eq!(humanize("case_study"), "Case Study");
        assert_eq!(humanize("__"), "");
    }

    #[test]
    fn plural_is_naive() {
        assert_eq!(pluralize("Book"), "Books");
        assert_eq!(pluralize("Person"), "Persons");
    }

    #[test]
    fn column_labels() {
        assert_eq!(column_label("author"), "Author");
        assert_eq!(column_label("publish_year"), "Publish year");
        assert_eq!(column_label(""), "");
    }

    #[test]
    fn sanitizers() {
        assert_eq!(sanitize_key("Genre Tag!"), "genretag");
        assert_eq!(sanitize_key("event_type"), "event_type");
        assert_eq!(sanitize_slug("Case Studies"), "case-studies");
        assert_eq!(sanitize_slug("  news & updates. "), "news-updates");
        assert_eq!(sanitize_slug("books"), "books");
    }
}
