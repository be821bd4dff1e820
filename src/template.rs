//! Placeholder rendering for response templates.
//!
//! Templates reference capture groups positionally: `$0` is the first
//! parenthesised group of the rule's pattern, `$1` the second, and so on.
//! The keyword `$username` is replaced with the message author's name.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::RenderError;

/// Keyword replaced with the author's name.
pub const USERNAME_KEYWORD: &str = "$username";

/// Distance between a template index and the capture group it reads.
/// Group 0 of a regex match is the whole match, so `$0` reads group 1.
pub const GROUP_OFFSET: usize = 1;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+)").expect("placeholder regex is valid"));

/// Capture group index read by template placeholder `$n`.
pub const fn placeholder_group(n: usize) -> usize {
    n + GROUP_OFFSET
}

/// A `$N` token found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'t> {
    /// The literal token, e.g. `$0`.
    pub token: &'t str,
    /// Capture group the token reads, `None` if the digits overflow.
    pub group: Option<usize>,
}

/// All `$N` tokens of `template`, left to right.
pub fn placeholders(template: &str) -> impl Iterator<Item = Placeholder<'_>> {
    PLACEHOLDER.captures_iter(template).filter_map(|caps| {
        let token = caps.get(0)?.as_str();
        let group = caps[1].parse::<usize>().ok().map(placeholder_group);
        Some(Placeholder { token, group })
    })
}

/// Replace every `$N` token with the trimmed text of its capture group.
///
/// Substituted text is not scanned again, so a capture that itself contains
/// `$0` comes through literally.
pub fn substitute_groups(template: &str, captures: &Captures<'_>) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        let token = whole.as_str();
        let group = caps[1].parse::<usize>().ok().map(placeholder_group);

        let text = group.and_then(|g| captures.get(g)).ok_or_else(|| RenderError::GroupUnset {
            placeholder: token.to_string(),
            group: group.unwrap_or(usize::MAX),
        })?;

        out.push_str(&template[last..whole.start()]);
        out.push_str(text.as_str().trim());
        last = whole.end();
    }

    out.push_str(&template[last..]);
    Ok(out)
}

/// Replace the first `$username` with `name`. Later occurrences stay literal.
pub fn replace_username(text: &str, name: &str) -> String {
    text.replacen(USERNAME_KEYWORD, name, 1)
}

/// Render a matched template: group substitution first, then the username.
pub fn render(template: &str, captures: &Captures<'_>, author: &str) -> Result<String, RenderError> {
    let substituted = substitute_groups(template, captures)?;
    Ok(replace_username(&substituted, author))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps<'h>(pattern: &str, haystack: &'h str) -> Captures<'h> {
        Regex::new(pattern).unwrap().captures(haystack).unwrap()
    }

    #[test]
    fn offset_maps_zero_to_first_group() {
        assert_eq!(GROUP_OFFSET, 1);
        assert_eq!(placeholder_group(0), 1);
        assert_eq!(placeholder_group(3), 4);
    }

    #[test]
    fn substitutes_trimmed_groups_in_order() {
        let c = caps(r"(\w+) and (.+)", "sand and  everywhere ");
        let out = substitute_groups("$1 gets $0", &c).unwrap();
        assert_eq!(out, "everywhere gets sand");
    }

    #[test]
    fn repeated_placeholder_substituted_everywhere() {
        let c = caps(r"i am the (\w+)", "i am the senate");
        let out = substitute_groups("$0? $0!", &c).unwrap();
        assert_eq!(out, "senate? senate!");
    }

    #[test]
    fn template_without_placeholders_passes_through() {
        let c = caps(r"hello", "hello");
        assert_eq!(substitute_groups("General Kenobi!", &c).unwrap(), "General Kenobi!");
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        let c = caps(r"say (.+)", "say $0");
        assert_eq!(substitute_groups("you said $0", &c).unwrap(), "you said $0");
    }

    #[test]
    fn unset_group_is_an_error() {
        let c = caps(r"(a)|(b)", "b");
        let err = substitute_groups("$0", &c).unwrap_err();
        match err {
            RenderError::GroupUnset { placeholder, group } => {
                assert_eq!(placeholder, "$0");
                assert_eq!(group, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn username_replaced_once() {
        assert_eq!(
            replace_username("$username, $username", "anakin"),
            "anakin, $username"
        );
    }

    #[test]
    fn render_applies_groups_then_username() {
        let c = caps(r"(\w+) will decide", "the mods will decide");
        let out = render("$username: I am the $0", &c, "palpatine").unwrap();
        assert_eq!(out, "palpatine: I am the mods");
    }

    #[test]
    fn placeholders_lists_tokens() {
        let found: Vec<_> = placeholders("$0 then $12 and $username").collect();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].token, "$0");
        assert_eq!(found[0].group, Some(1));
        assert_eq!(found[1].group, Some(13));
    }

    #[test]
    fn overflowing_placeholder_has_no_group() {
        let found: Vec<_> = placeholders("$99999999999999999999999").collect();
        assert_eq!(found[0].group, None);
    }
}
