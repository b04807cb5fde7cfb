use crate::types::Params;

/// Replaces every `{name}` in `template` with the matching value from `params`.
///
/// Placeholders without a matching parameter are left verbatim so missing
/// values stay visible in the output. Extra parameters are ignored.
/// Substitution is a single pass: inserted values are never scanned again.
pub fn format(template: &str, params: &Params) -> String {
    let mut output = String::with_capacity(template.len());
    for segment in Segments::new(template) {
        match segment {
            Segment::Text(text) => output.push_str(text),
            Segment::Placeholder(name) => match params.get(name) {
                Some(value) => output.push_str(value),
                None => {
                    output.push('{');
                    output.push_str(name);
                    output.push('}');
                }
            },
        }
    }
    output
}

/// Distinct placeholder names in order of first appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for segment in Segments::new(template) {
        if let Segment::Placeholder(name) = segment {
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

/// Splits a template into literal text and `{name}` tokens.
///
/// An unclosed `{` is literal text, and so is a `{` directly followed by
/// another `{` before any `}`.
struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Segments<'a> {
    fn new(template: &'a str) -> Self {
        Self { rest: template }
    }

    fn take_all(&mut self) -> &'a str {
        std::mem::take(&mut self.rest)
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let Some(open) = self.rest.find('{') else {
            return Some(Segment::Text(self.take_all()));
        };
        if open > 0 {
            let (text, tail) = self.rest.split_at(open);
            self.rest = tail;
            return Some(Segment::Text(text));
        }

        let body = &self.rest[1..];
        match body.find(['{', '}']) {
            Some(close) if body.as_bytes()[close] == b'}' => {
                let name = &body[..close];
                self.rest = &body[close + 1..];
                Some(Segment::Placeholder(name))
            }
            Some(next_open) => {
                let (text, tail) = self.rest.split_at(next_open + 1);
                self.rest = tail;
                Some(Segment::Text(text))
            }
            None => Some(Segment::Text(self.take_all())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_named_placeholder() {
        let params = Params::new().with("field", "Email");
        assert_eq!(
            format("The {field} field is required", &params),
            "The Email field is required"
        );
    }

    #[test]
    fn leaves_missing_placeholder_verbatim() {
        let params = Params::new().with("amount", "500");
        assert_eq!(
            format("Payment of {amount} {currency} received", &params),
            "Payment of 500 {currency} received"
        );
    }

    #[test]
    fn ignores_extra_params() {
        let params = Params::new().with("name", "Amina").with("unused", "x");
        assert_eq!(
            format("Worker {name} has been registered", &params),
            "Worker Amina has been registered"
        );
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let params = Params::new()
            .with("name", "{name}")
            .with("other", "{loop}")
            .with("loop", "boom");
        assert_eq!(format("{name} and {other}", &params), "{name} and {loop}");
    }

    #[test]
    fn repeated_placeholders_are_all_replaced() {
        let params = Params::new().with("x", "1");
        assert_eq!(format("{x}+{x}={x}{x}", &params), "1+1=11");
    }

    #[test]
    fn unclosed_and_nested_braces_stay_literal() {
        let params = Params::new().with("name", "Amina");
        assert_eq!(format("Hello {name", &params), "Hello {name");
        assert_eq!(format("{{name}}", &params), "{Amina}");
        assert_eq!(format("{}", &params), "{}");
        assert_eq!(format("trailing {", &params), "trailing {");
    }

    #[test]
    fn template_without_placeholders_is_unchanged() {
        assert_eq!(format("No results found", &Params::new()), "No results found");
        assert_eq!(format("", &Params::new()), "");
    }

    #[test]
    fn handles_multibyte_text_around_placeholders() {
        let params = Params::new().with("amount", "٥٠٠");
        assert_eq!(format("Zahlung über {amount} €", &params), "Zahlung über ٥٠٠ €");
    }

    #[test]
    fn lists_distinct_placeholders_in_order() {
        assert_eq!(
            placeholders("The {field} field must be between {min} and {max} ({field})"),
            vec!["field", "min", "max"]
        );
        assert!(placeholders("No results found").is_empty());
        assert!(placeholders("{} and {unclosed").is_empty());
    }
}
