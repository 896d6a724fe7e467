//! Anchor and footnote id templates.

/// Values available to id templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdContext<'a> {
    pub key: &'a str,
    pub docname: &'a str,
    pub bibliography_count: usize,
    pub footbibliography_count: usize,
}

/// Expand `{key}`, `{docname}`, `{bibliography_count}` and
/// `{footbibliography_count}` in `template`, then sanitize the result.
///
/// Unknown placeholders are kept as written.
pub fn expand_id(template: &str, ctx: &IdContext<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            rest = "";
            break;
        };
        match &after[..close] {
            "key" => out.push_str(ctx.key),
            "docname" => out.push_str(ctx.docname),
            "bibliography_count" => out.push_str(&ctx.bibliography_count.to_string()),
            "footbibliography_count" => out.push_str(&ctx.footbibliography_count.to_string()),
            other => {
                out.push('{');
                out.push_str(other);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    sanitize_id(&out)
}

/// Lowercase, with every run of characters outside `[a-z0-9]` turned into a
/// single `-` and no leading or trailing `-`.
pub fn sanitize_id(raw: &str) -> String {
    let mut id = String::with_capacity(raw.len());
    let mut pending_dash = false;
    for c in raw.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !id.is_empty() {
                id.push('-');
            }
            pending_dash = false;
            id.push(c);
        } else {
            pending_dash = true;
        }
    }
    id
}
