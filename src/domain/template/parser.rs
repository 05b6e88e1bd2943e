//! Lexer and parser for label templates.

use super::{ParentIndicator, Template, TemplateComponent, TemplateSyntaxError};
use crate::domain::counter_style::CounterStyle;

#[derive(Debug, PartialEq, Eq)]
enum Token {
    /// Literal text, with quotes already removed.
    Literal(String),
    /// An alphanumeric run, possibly with internal hyphens.
    Word { text: String, position: usize },
}

/// A comma-separated slice of the template, as character offsets.
struct Segment {
    start: usize,
    end: usize,
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
}

pub fn parse(source: &str) -> Result<Template, TemplateSyntaxError> {
    Parser {
        source,
        chars: source.chars().collect(),
    }
    .parse()
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

impl Parser<'_> {
    fn parse(&self) -> Result<Template, TemplateSyntaxError> {
        let mut template = Template {
            source: self.source.to_string(),
            parts: Vec::new(),
            repeat_last: false,
        };
        if self.source.trim().is_empty() {
            return Ok(template);
        }

        let segments = self.split()?;
        let last = segments.len() - 1;
        for (index, segment) in segments.iter().enumerate() {
            // A leading `*` has nothing to repeat and is a literal marker.
            if let Some(position) = self.repeat_marker(segment).filter(|_| index > 0) {
                if index == last {
                    template.repeat_last = true;
                    break;
                }
                return Err(TemplateSyntaxError::MisplacedRepeat {
                    template: self.source.to_string(),
                    position,
                });
            }
            let tokens = self.lex(segment)?;
            template.parts.push(self.component(tokens)?);
        }
        Ok(template)
    }

    /// Splits at commas outside quoted literals.
    fn split(&self) -> Result<Vec<Segment>, TemplateSyntaxError> {
        let mut segments = Vec::new();
        let mut start = 0;
        let mut i = 0;
        while i < self.chars.len() {
            let c = self.chars[i];
            if is_quote(c) {
                i = self.skip_quoted(i)?;
                continue;
            }
            if c == ',' {
                segments.push(Segment { start, end: i });
                start = i + 1;
            }
            i += 1;
        }
        segments.push(Segment {
            start,
            end: self.chars.len(),
        });
        Ok(segments)
    }

    /// Returns the index just past the quoted literal opening at `open`.
    fn skip_quoted(&self, open: usize) -> Result<usize, TemplateSyntaxError> {
        let quote = self.chars[open];
        let mut i = open + 1;
        while i < self.chars.len() {
            if self.chars[i] == quote {
                if self.chars.get(i + 1) == Some(&quote) {
                    i += 2;
                    continue;
                }
                return Ok(i + 1);
            }
            i += 1;
        }
        Err(TemplateSyntaxError::UnterminatedQuote {
            template: self.source.to_string(),
            position: open,
        })
    }

    /// The position of a lone unquoted `*` forming the whole segment.
    fn repeat_marker(&self, segment: &Segment) -> Option<usize> {
        let mut content = (segment.start..segment.end).filter(|&i| !self.chars[i].is_whitespace());
        let position = content.next()?;
        (self.chars[position] == '*' && content.next().is_none()).then_some(position)
    }

    fn lex(&self, segment: &Segment) -> Result<Vec<Token>, TemplateSyntaxError> {
        let chars = &self.chars[..segment.end];
        let mut tokens = Vec::new();
        let mut literal = String::new();

        let mut i = segment.start;
        while i < segment.end && chars[i].is_whitespace() {
            i += 1;
        }

        while i < segment.end {
            let c = chars[i];
            if c.is_ascii_alphanumeric() {
                let start = i;
                while i < segment.end
                    && (chars[i].is_ascii_alphanumeric()
                        || (chars[i] == '-'
                            && chars.get(i + 1).is_some_and(char::is_ascii_alphanumeric)))
                {
                    i += 1;
                }
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Word {
                    text: chars[start..i].iter().collect(),
                    position: start,
                });
            } else if is_quote(c) {
                let end = self.skip_quoted(i)?;
                let mut j = i + 1;
                while j < end - 1 {
                    literal.push(chars[j]);
                    // A doubled quote stands for one quote character.
                    j += if chars[j] == c { 2 } else { 1 };
                }
                i = end;
            } else {
                literal.push(c);
                i += 1;
            }
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }
        Ok(tokens)
    }

    fn component(&self, tokens: Vec<Token>) -> Result<TemplateComponent, TemplateSyntaxError> {
        let mut component = TemplateComponent::default();
        let mut tokens = tokens.into_iter().peekable();

        if let Some(Token::Literal(text)) = tokens.next_if(|t| matches!(t, Token::Literal(_))) {
            component.prefix = text;
        }

        let Some(Token::Word { text, position }) = tokens.next() else {
            return Ok(component);
        };

        let indicator = text.parse::<ParentIndicator>().ok();
        let separator = match indicator {
            Some(_) => tokens.next_if(|t| matches!(t, Token::Literal(_))),
            None => None,
        };
        let (style_word, style_position) = match (indicator, separator) {
            (Some(parent), Some(Token::Literal(separator))) => {
                component.parent = Some(parent);
                match tokens.next() {
                    Some(Token::Word { text, position }) => {
                        component.separator = separator;
                        (text, position)
                    }
                    _ => {
                        // An ancestor label with no counter of its own.
                        component.suffix = separator;
                        return Ok(component);
                    }
                }
            }
            _ => match split_parent(&text) {
                Some((parent, style)) if CounterStyle::lookup(&text).is_err() => {
                    component.parent = Some(parent);
                    component.separator = "-".to_string();
                    let offset = text.len() - style.len();
                    (style.to_string(), position + offset)
                }
                _ => (text, position),
            },
        };

        component.style = Some(CounterStyle::lookup(&style_word).map_err(|_| {
            TemplateSyntaxError::UnknownStyle {
                template: self.source.to_string(),
                name: style_word.clone(),
                position: style_position,
            }
        })?);

        if let Some(Token::Literal(text)) = tokens.next_if(|t| matches!(t, Token::Literal(_))) {
            component.suffix = text;
        }

        match tokens.next() {
            Some(Token::Word { text, position }) => Err(TemplateSyntaxError::UnexpectedToken {
                template: self.source.to_string(),
                token: text,
                position,
            }),
            _ => Ok(component),
        }
    }
}

/// Splits a word such as `X-octal` or `H2-lower-alpha` into an indicator
/// and the style name following its hyphen.
fn split_parent(word: &str) -> Option<(ParentIndicator, &str)> {
    let (head, rest) = word.split_once('-')?;
    let parent = head.parse().ok()?;
    Some((parent, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::HeadingLevel;

    fn component(
        prefix: &str,
        parent: Option<ParentIndicator>,
        separator: &str,
        style: Option<&str>,
        suffix: &str,
    ) -> TemplateComponent {
        TemplateComponent {
            prefix: prefix.to_string(),
            parent,
            separator: separator.to_string(),
            style: style.map(|s| CounterStyle::lookup(s).unwrap()),
            suffix: suffix.to_string(),
        }
    }

    fn single(source: &str) -> TemplateComponent {
        let template = parse(source).unwrap();
        assert_eq!(template.parts.len(), 1, "{source}");
        template.parts[0].clone()
    }

    #[test]
    fn basic_components() {
        use ParentIndicator::{AnyLabel, HeadingLabel, ListLabel};

        let h3 = ParentIndicator::HeadingLabelAtLevel(HeadingLevel::new(3).unwrap());
        let cases = [
            ("(", component("(", None, "", None, "")),
            ("(a", component("(", None, "", Some("a"), "")),
            ("a)", component("", None, "", Some("a"), ")")),
            ("(a)", component("(", None, "", Some("a"), ")")),
            ("(X.a)", component("(", Some(AnyLabel), ".", Some("a"), ")")),
            ("X.a", component("", Some(AnyLabel), ".", Some("a"), "")),
            ("(H.a)", component("(", Some(HeadingLabel), ".", Some("a"), ")")),
            ("(H3.a)", component("(", Some(h3), ".", Some("a"), ")")),
            ("(L.a)", component("(", Some(ListLabel), ".", Some("a"), ")")),
            ("1. ", component("", None, "", Some("1"), ". ")),
            ("  [i] ", component("[", None, "", Some("i"), "] ")),
        ];
        for (source, expected) in cases {
            assert_eq!(single(source), expected, "{source}");
        }
    }

    #[test]
    fn hyphenated_style_names() {
        use ParentIndicator::{AnyLabel, HeadingLabel, ListLabel};

        let cases = [
            ("octal", component("", None, "", Some("octal"), "")),
            ("(octal)", component("(", None, "", Some("octal"), ")")),
            ("X-octal", component("", Some(AnyLabel), "-", Some("octal"), "")),
            ("(X-octal)", component("(", Some(AnyLabel), "-", Some("octal"), ")")),
            ("hebrew", component("", None, "", Some("hebrew"), "")),
            ("-H-hebrew-", component("-", Some(HeadingLabel), "-", Some("hebrew"), "-")),
            ("lao", component("", None, "", Some("lao"), "")),
            ("-L-lao-", component("-", Some(ListLabel), "-", Some("lao"), "-")),
            ("lower-alpha", component("", None, "", Some("lower-alpha"), "")),
            (
                "-X-lower-alpha-",
                component("-", Some(AnyLabel), "-", Some("lower-alpha"), "-"),
            ),
        ];
        for (source, expected) in cases {
            assert_eq!(single(source), expected, "{source}");
        }
    }

    #[test]
    fn quoted_literals() {
        use ParentIndicator::AnyLabel;

        let cases = [
            (r#""(a)""#, component("(a)", None, "", None, "")),
            ("'(a)'", component("(a)", None, "", None, "")),
            (r#""(a,""b,""c)""#, component(r#"(a,"b,"c)"#, None, "", None, "")),
            ("'(d,''e,''f)'", component("(d,'e,'f)", None, "", None, "")),
            (r#"a"a""#, component("", None, "", Some("a"), "a")),
            (r#"a."a"."#, component("", None, "", Some("a"), ".a.")),
            (r#"X"a"a"#, component("", Some(AnyLabel), "a", Some("a"), "")),
            (r#"X."a".a"#, component("", Some(AnyLabel), ".a.", Some("a"), "")),
            (r#""Figure "1: "#, component("Figure ", None, "", Some("1"), ": ")),
        ];
        for (source, expected) in cases {
            assert_eq!(single(source), expected, "{source}");
        }
    }

    #[test]
    fn parent_without_counter() {
        let part = single("X.");
        assert_eq!(part.parent, Some(ParentIndicator::AnyLabel));
        assert_eq!(part.style, None);
        assert_eq!(part.separator, "");
        assert_eq!(part.suffix, ".");
    }

    #[test]
    fn multiple_components() {
        let template = parse("(H.a),[L:1],{X;i}").unwrap();
        assert_eq!(
            template.parts,
            vec![
                component("(", Some(ParentIndicator::HeadingLabel), ".", Some("a"), ")"),
                component("[", Some(ParentIndicator::ListLabel), ":", Some("1"), "]"),
                component("{", Some(ParentIndicator::AnyLabel), ";", Some("i"), "}"),
            ]
        );
        assert!(!template.repeat_last);
    }

    #[test]
    fn repetition_marker() {
        for source in ["a,*", "(1),*", "X.i,*", "a, * "] {
            let template = parse(source).unwrap();
            assert_eq!(template.parts.len(), 1, "{source}");
            assert!(template.repeat_last, "{source}");
        }

        let template = parse("a,(1),X.i,*").unwrap();
        assert_eq!(template.parts.len(), 3);
        assert!(template.repeat_last);
    }

    #[test]
    fn asterisk_mixed_with_text_is_literal() {
        let part = single("*1*");
        assert_eq!(part, component("*", None, "", Some("1"), "*"));

        let template = parse("1,'*'").unwrap();
        assert_eq!(template.parts[1], component("*", None, "", None, ""));
        assert!(!template.repeat_last);
    }

    #[test]
    fn lone_asterisk_is_a_fixed_marker() {
        let template = parse("*").unwrap();
        assert_eq!(template.parts, [component("*", None, "", None, "")]);
        assert!(!template.repeat_last);

        let template = parse("*,*").unwrap();
        assert_eq!(template.parts, [component("*", None, "", None, "")]);
        assert!(template.repeat_last);
    }

    #[test]
    fn empty_template_has_no_components() {
        assert!(parse("").unwrap().parts.is_empty());
        assert!(parse("   ").unwrap().parts.is_empty());
    }

    #[test]
    fn empty_segments_are_literal_only() {
        let template = parse("1.,,a").unwrap();
        assert_eq!(template.parts.len(), 3);
        assert_eq!(template.parts[1], TemplateComponent::default());
    }

    #[test]
    fn syntax_errors() {
        assert!(matches!(
            parse("invalid-counter"),
            Err(TemplateSyntaxError::UnknownStyle { ref name, position: 0, .. }) if name == "invalid-counter"
        ));
        assert!(matches!(
            parse("a.a"),
            Err(TemplateSyntaxError::UnexpectedToken { position: 2, .. })
        ));
        assert!(matches!(
            parse("X.a.a"),
            Err(TemplateSyntaxError::UnexpectedToken { position: 4, .. })
        ));
        assert!(matches!(
            parse(r#"a""#),
            Err(TemplateSyntaxError::UnterminatedQuote { position: 1, .. })
        ));
        assert!(matches!(
            parse(r#""a"b""#),
            Err(TemplateSyntaxError::UnterminatedQuote { position: 4, .. })
        ));
        assert!(matches!(
            parse("1,*,a"),
            Err(TemplateSyntaxError::MisplacedRepeat { position: 2, .. })
        ));
        assert!(matches!(
            parse("X"),
            Err(TemplateSyntaxError::UnknownStyle { .. })
        ));
        assert!(matches!(
            parse("(X-nope)"),
            Err(TemplateSyntaxError::UnknownStyle { ref name, position: 3, .. }) if name == "nope"
        ));
    }

    #[test]
    fn error_message_names_template() {
        let error = parse("1.,(q)").unwrap_err();
        assert_eq!(
            error.to_string(),
            "unknown counter style 'q' at position 4 in label template \"1.,(q)\""
        );
    }
}
