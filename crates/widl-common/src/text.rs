//! Small text helpers for trivia inspection and autofix indentation repair.

/// Strip the single leading underscore that escapes an identifier whose
/// bare spelling collides with a keyword (`_interface` names `interface`).
#[must_use]
pub fn unescape(identifier: &str) -> &str {
    identifier.strip_prefix('_').unwrap_or(identifier)
}

/// The last line of a (possibly multi-line) chunk of text.
#[must_use]
pub fn last_line(text: &str) -> &str {
    match text.rfind('\n') {
        Some(pos) => &text[pos + 1..],
        None => text,
    }
}

/// The indentation of the last line of a trivia run.
///
/// Returns the leading whitespace of the final line, or an empty string when
/// that line starts with a non-space character (e.g. a trailing comment).
#[must_use]
pub fn get_last_indentation(trivia: &str) -> &str {
    let line = last_line(trivia);
    let end = line
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(line.len(), |(i, _)| i);
    &line[..end]
}

/// One indentation level deeper than `parent_trivia`'s last line.
///
/// Tab-indented sources get a tab, everything else two spaces, matching the
/// dominant styles in hand-written IDL fragments.
#[must_use]
pub fn member_indentation(parent_trivia: &str) -> String {
    let indentation = get_last_indentation(parent_trivia);
    let unit = if indentation.contains('\t') { "\t" } else { "  " };
    let mut out = String::with_capacity(indentation.len() + unit.len());
    out.push_str(indentation);
    out.push_str(unit);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_line_returns_text_after_final_newline() {
        assert_eq!(last_line("a\nb\n  c"), "  c");
        assert_eq!(last_line("no newline"), "no newline");
        assert_eq!(last_line(""), "");
    }

    #[test]
    fn last_indentation_ignores_comment_lines() {
        assert_eq!(get_last_indentation("\n    "), "    ");
        assert_eq!(get_last_indentation("\n  // hm\n\t"), "\t");
        assert_eq!(get_last_indentation("// no newline"), "");
    }

    #[test]
    fn member_indentation_adds_one_unit() {
        assert_eq!(member_indentation("\n  "), "    ");
        assert_eq!(member_indentation("\n\t"), "\t\t");
        assert_eq!(member_indentation(""), "  ");
    }
}
