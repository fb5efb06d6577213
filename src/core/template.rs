//! Runtime template rendering
//!
//! Substitutes arguments into a template string chosen at runtime (header
//! formats from configuration, `log_template!` call sites). Placeholders:
//!
//! - `%N%` inserts the N-th argument (1-based)
//! - `%s`, `%d`, or `%` followed by any ASCII letter inserts the next
//!   sequential argument
//! - `%%` inserts a literal `%`
//!
//! Rendering never fails. A placeholder without a matching argument renders
//! empty and surplus arguments are ignored, so decoration arguments can be
//! mixed with user arguments without agreeing on a count.

use std::fmt::{Display, Write};

/// Render `template` with `args`.
///
/// # Example
///
/// ```
/// use logxx::core::template::render;
///
/// assert_eq!(render("%2% before %1%", &[&"a", &"b"]), "b before a");
/// assert_eq!(render("ready=%s", &[&true]), "ready=true");
/// assert_eq!(render("%1% and %2%", &[&1]), "1 and ");
/// ```
pub fn render(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut next_sequential = 0usize;
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('%') {
            out.push('%');
            rest = tail;
            continue;
        }

        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 && after[digits..].starts_with('%') {
            if let Ok(index) = after[..digits].parse::<usize>() {
                push_arg(&mut out, args, index.checked_sub(1));
            }
            rest = &after[digits + 1..];
            continue;
        }

        match after.chars().next() {
            Some(c) if c.is_ascii_alphabetic() => {
                push_arg(&mut out, args, Some(next_sequential));
                next_sequential += 1;
                rest = &after[1..];
            }
            _ => {
                // A lone '%' is kept as text
                out.push('%');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn push_arg(out: &mut String, args: &[&dyn Display], index: Option<usize>) {
    if let Some(arg) = index.and_then(|i| args.get(i)) {
        let _ = write!(out, "{}", arg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional() {
        assert_eq!(render("%1% %2% %1%", &[&"x", &7]), "x 7 x");
    }

    #[test]
    fn test_printf_style_is_sequential() {
        assert_eq!(render("trace: %d %s", &[&42, &"foo bar"]), "trace: 42 foo bar");
    }

    #[test]
    fn test_booleans_render_as_words() {
        assert_eq!(render("bool test %1%", &[&true]), "bool test true");
        assert_eq!(render("%s", &[&false]), "false");
    }

    #[test]
    fn test_missing_arguments_render_empty() {
        assert_eq!(render("a=%1% b=%2% c=%s", &[]), "a= b= c=");
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        assert_eq!(render("only %1%", &[&1, &2, &3]), "only 1");
        assert_eq!(render("no placeholders", &[&1]), "no placeholders");
    }

    #[test]
    fn test_percent_escapes() {
        assert_eq!(render("100%% done", &[]), "100% done");
        assert_eq!(render("50% off", &[]), "50% off");
        assert_eq!(render("trailing %", &[]), "trailing %");
        assert_eq!(render("%0%", &[&"x"]), "");
    }

    #[test]
    fn test_digits_without_closing_percent_are_text() {
        assert_eq!(render("%12 apples", &[&"x"]), "%12 apples");
    }

    #[test]
    fn test_multibyte_text_survives() {
        assert_eq!(render("héllo %1% wörld", &[&"ü"]), "héllo ü wörld");
    }
}
