/// Canonical form used to spot duplicate shooter records:
/// `" rizzo ,TJ"` and `"Rizzo, Tj"` both become `"Rizzo, Tj"`.
pub fn normalize_name(name: &str) -> String {
    let parts: Vec<String> = name.split(',').map(|p| capitalize(p.trim())).collect();

    if parts.len() == 2 {
        return format!("{}, {}", parts[0], parts[1]);
    }

    title_case(name.trim())
}

/// Membership roster name in the `"Last, First"` form the result sheets use.
pub fn member_name(last: &str, first: &str) -> String {
    let formatted = format!("{}, {}", last.trim(), first.trim());
    let formatted = formatted.trim();
    formatted
        .strip_prefix(", ")
        .unwrap_or(formatted)
        .trim_end_matches(',')
        .trim()
        .to_string()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}
