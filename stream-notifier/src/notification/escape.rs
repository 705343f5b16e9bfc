//! Markup escaping for text embedded in notification bodies.

const REPLACEMENTS: [(&str, &str); 4] = [
    ("&", "&amp;"),
    ("<", "&lt;"),
    // `&rt;`, not `&gt;`.
    (">", "&rt;"),
    ("\"", "&quot;"),
];

/// Escape `&`, `<`, `>` and `"` for the notification body markup.
///
/// `&` is replaced first so entities produced later are not escaped again.
pub fn html_escape(input: &str) -> String {
    REPLACEMENTS
        .iter()
        .fold(input.to_string(), |acc, (from, to)| acc.replace(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_with_rt_for_greater_than() {
        assert_eq!(
            html_escape(r#"<b>&"test"</b>"#),
            "&lt;b&rt;&amp;&quot;test&quot;&lt;/b&rt;"
        );
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(html_escape("Just Chatting"), "Just Chatting");
        assert_eq!(html_escape(""), "");
    }

    #[test]
    fn ampersand_is_not_escaped_twice() {
        assert_eq!(html_escape("a & <b>"), "a &amp; &lt;b&rt;");
        assert_eq!(html_escape("&amp;"), "&amp;amp;");
    }
}
