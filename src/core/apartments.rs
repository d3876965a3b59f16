use std::collections::HashSet;

/// Parses a free-form apartment list.
///
/// Commas count as whitespace. Every token keeps only its ASCII digits, so
/// `кв.12` and `12` name the same apartment; tokens without digits are
/// dropped. Duplicates are removed, keeping the first occurrence.
pub fn parse_apartments(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut apartments = Vec::new();

    for token in text.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }

        let number: String = token.chars().filter(|c| c.is_ascii_digit()).collect();
        if number.is_empty() {
            tracing::debug!("Skipping token without digits: {:?}", token);
            continue;
        }

        if seen.insert(number.clone()) {
            apartments.push(number);
        } else {
            tracing::debug!("Skipping duplicate apartment {}", number);
        }
    }

    apartments
}
