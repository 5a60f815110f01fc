//! Address text normalization used to match free-text package addresses
//! against the columns of the distance table.

/// Canonical form of an address: uppercase, `.`/`,`/`#` removed, common street
/// words abbreviated and whitespace collapsed.
///
/// ```text
/// "3575 W Valley Central Station bus Loop" -> "3575 W VALLEY CENTRAL STA BUS LOOP"
/// "5383 South 900 East #104"               -> "5383 S 900 E 104"
/// ```
pub fn canonical_form(text: &str) -> String {
    let upper = text.trim().to_uppercase();
    let stripped = upper.replace(['.', ',', '#'], " ");

    stripped
        .split_whitespace()
        .map(abbreviate)
        .collect::<Vec<_>>()
        .join(" ")
}

fn abbreviate(token: &str) -> &str {
    match token {
        "STREET" | "ST." => "ST",
        "AVENUE" | "AV" => "AVE",
        "BOULEVARD" => "BLVD",
        "STATION" => "STA",
        "NORTH" => "N",
        "SOUTH" => "S",
        "EAST" => "E",
        "WEST" => "W",
        _ => token,
    }
}

/// Splits canonical text into maximal runs of digits or of uppercase letters.
/// Everything else separates tokens.
pub fn match_tokens(canonical: &str) -> Vec<&str> {
    let mut tokens = vec![];
    let mut start: Option<(usize, bool)> = None;

    for (index, c) in canonical.char_indices() {
        let kind = if c.is_ascii_digit() {
            Some(true)
        } else if c.is_ascii_uppercase() {
            Some(false)
        } else {
            None
        };

        match (start, kind) {
            (Some((_, digits)), Some(is_digit)) if digits == is_digit => {}
            (Some((begin, _)), _) => {
                tokens.push(&canonical[begin..index]);
                start = kind.map(|is_digit| (index, is_digit));
            }
            (None, _) => start = kind.map(|is_digit| (index, is_digit)),
        }
    }

    if let Some((begin, _)) = start {
        tokens.push(&canonical[begin..]);
    }

    tokens
}

/// Loose comparison of two canonical addresses: both need at least two tokens
/// and the first two must be equal (typically house number and street word).
pub fn leading_tokens_match(left: &str, right: &str) -> bool {
    let left = match_tokens(left);
    let right = match_tokens(right);

    left.len() >= 2 && right.len() >= 2 && left[..2] == right[..2]
}
