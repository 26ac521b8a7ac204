//! Markup lexer and lenient tree builder.
//!
//! Section content is an HTML-like markup. The parser is forgiving: unknown
//! tags are kept, unclosed elements are closed at end of input, and stray
//! closing tags are dropped. Text is kept verbatim; attribute values have
//! their character references decoded.

use logos::{Lexer, Logos};

use crate::tree::{Attribute, ContentTree, Element, NodeId, NodeKind};

/// Internal logos token. Borrows from the source; tags are decoded afterwards.
#[derive(Logos, Debug, PartialEq)]
enum RawToken {
    #[token("<!--", lex_comment)]
    Comment,

    #[regex(r"</[a-zA-Z][a-zA-Z0-9-]*[ \t\r\n]*>")]
    CloseTag,

    #[regex(r"<[a-zA-Z][^<>]*>")]
    OpenTag,

    #[regex(r"[^<]+")]
    Text,

    #[token("<")]
    Lt,
}

/// Consume everything up to and including the closing `-->`.
fn lex_comment(lex: &mut Lexer<RawToken>) -> bool {
    let rest = lex.remainder();
    let len = rest.find("-->").map_or(rest.len(), |i| i + 3);
    lex.bump(len);
    true
}

/// A lexed markup token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// `<!-- body -->`.
    Comment(&'a str),
    /// `<tag attr="v">`, with `self_closing` set for `<tag/>`.
    Open {
        /// The decoded element.
        element: Element,
        /// Whether the tag ended in `/>`.
        self_closing: bool,
    },
    /// `</tag>`.
    Close(String),
    /// Raw text.
    Text(&'a str),
}

/// Lex markup into tokens.
pub fn lex(source: &str) -> Vec<Token<'_>> {
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(raw) = lexer.next() {
        let slice = lexer.slice();
        let token = match raw {
            Ok(RawToken::Comment) => {
                let body = slice.strip_prefix("<!--").unwrap_or(slice);
                Token::Comment(body.strip_suffix("-->").unwrap_or(body))
            }
            Ok(RawToken::CloseTag) => {
                let name = slice.trim_start_matches("</").trim_end_matches('>').trim();
                Token::Close(name.to_lowercase())
            }
            Ok(RawToken::OpenTag) => {
                let (element, self_closing) = parse_open_tag(slice);
                Token::Open {
                    element,
                    self_closing,
                }
            }
            Ok(RawToken::Text) | Ok(RawToken::Lt) | Err(()) => Token::Text(slice),
        };
        tokens.push(token);
    }

    tokens
}

/// Decode `<tag a="1" b='2' c=3 d>` into an element.
fn parse_open_tag(slice: &str) -> (Element, bool) {
    let inner = &slice[1..slice.len() - 1];
    let self_closing = inner.ends_with('/');
    let inner = inner.strip_suffix('/').unwrap_or(inner);

    let tag_end = inner.find(char::is_whitespace).unwrap_or(inner.len());
    let mut element = Element::new(&inner[..tag_end]);

    let rest: Vec<char> = inner[tag_end..].chars().collect();
    let mut i = 0;
    while i < rest.len() {
        while i < rest.len() && rest[i].is_whitespace() {
            i += 1;
        }
        if i >= rest.len() {
            break;
        }

        let name_start = i;
        while i < rest.len() && !rest[i].is_whitespace() && rest[i] != '=' {
            i += 1;
        }
        let name: String = rest[name_start..i].iter().collect();

        while i < rest.len() && rest[i].is_whitespace() {
            i += 1;
        }
        if i < rest.len() && rest[i] == '=' {
            i += 1;
            while i < rest.len() && rest[i].is_whitespace() {
                i += 1;
            }
            let value = if i < rest.len() && (rest[i] == '"' || rest[i] == '\'') {
                let quote = rest[i];
                i += 1;
                let start = i;
                while i < rest.len() && rest[i] != quote {
                    i += 1;
                }
                let value: String = rest[start..i].iter().collect();
                i += 1;
                value
            } else {
                let start = i;
                while i < rest.len() && !rest[i].is_whitespace() {
                    i += 1;
                }
                rest[start..i].iter().collect()
            };
            element
                .attributes
                .push(Attribute::new(name, decode_entities(&value)));
        } else if !name.is_empty() {
            element.attributes.push(Attribute::flag(name));
        }
    }

    (element, self_closing)
}

/// Decode the handful of character references stories commonly use.
///
/// `&amp;` goes last so `&amp;lt;` decodes to `&lt;` and not `<`.
pub fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", "\u{a0}")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Parse markup into a [`ContentTree`] rooted at a `div`.
pub fn parse(source: &str) -> ContentTree {
    let mut tree = ContentTree::new();
    let mut open: Vec<(NodeId, String)> = Vec::new();

    for token in lex(source) {
        let parent = open.last().map_or(tree.root(), |(id, _)| *id);
        match token {
            Token::Text(text) => tree.append_text(parent, text),
            Token::Comment(body) => {
                tree.append_child(parent, NodeKind::Comment(body.to_string()));
            }
            Token::Open {
                element,
                self_closing,
            } => {
                let tag = element.tag.clone();
                let keeps_open = !self_closing && !element.is_void();
                let id = tree.append_child(parent, NodeKind::Element(element));
                if keeps_open {
                    open.push((id, tag));
                }
            }
            Token::Close(tag) => {
                if let Some(pos) = open.iter().rposition(|(_, t)| *t == tag) {
                    open.truncate(pos);
                }
            }
        }
    }

    tree
}
