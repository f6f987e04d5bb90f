//! Incremental HTML tokenizer.
//!
//! An explicit state machine that recognizes open-tag events (tag name plus
//! attribute list) in text fed to it piecewise. A tag may be split across
//! any number of `push` calls; the machine buffers the partial tag
//! internally and reports the event only when the closing `>` arrives.
//! Discovered tags go to an injectable [`TagSink`], which keeps the
//! tokenizer free of I/O and independently testable.
//!
//! This is not a full HTML parser. It recognizes exactly what link
//! discovery needs: open tags with attributes (quoted, unquoted, valueless),
//! comments, doctype/bogus markup, end tags, and raw-text element content
//! (`script`, `style`, `title`, `textarea`) where `<` is not markup.
//! Entity references are passed through verbatim.

/// Receiver for open-tag events.
///
/// `name` and attribute names are ASCII-lowercased; attribute values are
/// verbatim. For repeated attributes the first occurrence wins.
pub trait TagSink {
    fn open_tag(&mut self, name: &str, attrs: &[(String, String)]);
}

/// Elements whose content is raw text until the matching end tag.
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "title", "textarea"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    /// Just saw `<`.
    TagOpen,
    /// Inside `</...>`, skipping to `>`.
    EndTag,
    TagName,
    BeforeAttrName,
    AttrName,
    AfterAttrName,
    BeforeAttrValue,
    AttrValueDouble,
    AttrValueSingle,
    AttrValueUnquoted,
    AfterAttrValueQuoted,
    /// Saw `/` inside a tag, expecting `>`.
    SelfClosing,
    /// Saw `<!`, deciding between comment and bogus markup.
    MarkupDecl,
    /// Saw `<!-`.
    CommentStartDash,
    Comment,
    /// Saw `-` inside a comment.
    CommentEndDash,
    /// Saw `--` inside a comment.
    CommentEnd,
    /// `<!...>` or `<?...>` that is not a comment.
    BogusMarkup,
    /// Inside a raw-text element's content.
    RawText,
    /// Saw `<` inside raw text.
    RawTextLt,
    /// Accumulating a candidate end-tag name inside raw text.
    RawTextEndTag,
}

/// Incremental open-tag tokenizer. One instance per document.
#[derive(Debug)]
pub struct Tokenizer {
    state: State,
    tag_name: String,
    attr_name: String,
    attr_value: String,
    attrs: Vec<(String, String)>,
    /// Lowercased name of the raw-text element currently open.
    raw_end: String,
    /// Candidate end-tag name being matched against `raw_end`.
    raw_match: String,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            state: State::Text,
            tag_name: String::new(),
            attr_name: String::new(),
            attr_value: String::new(),
            attrs: Vec::new(),
            raw_end: String::new(),
            raw_match: String::new(),
        }
    }

    /// Feed the next piece of decoded text.
    pub fn push(&mut self, text: &str, sink: &mut dyn TagSink) {
        for c in text.chars() {
            let mut next = Some(c);
            // A transition may ask to reprocess the character in the new
            // state; every reconsume changes state, so this terminates.
            while let Some(c) = next.take() {
                next = self.step(c, sink);
            }
        }
    }

    /// End of document. A dangling partial tag is not a match and is
    /// silently discarded.
    pub fn finish(&mut self) {
        self.state = State::Text;
        self.tag_name.clear();
        self.attr_name.clear();
        self.attr_value.clear();
        self.attrs.clear();
        self.raw_match.clear();
    }

    fn step(&mut self, c: char, sink: &mut dyn TagSink) -> Option<char> {
        match self.state {
            State::Text => {
                if c == '<' {
                    self.state = State::TagOpen;
                }
            }
            State::TagOpen => match c {
                '/' => self.state = State::EndTag,
                '!' => self.state = State::MarkupDecl,
                '?' => self.state = State::BogusMarkup,
                '<' => {}
                c if c.is_ascii_alphabetic() => {
                    self.tag_name.clear();
                    self.attrs.clear();
                    self.tag_name.push(c.to_ascii_lowercase());
                    self.state = State::TagName;
                }
                _ => self.state = State::Text,
            },
            State::EndTag => {
                if c == '>' {
                    self.state = State::Text;
                }
            }
            State::TagName => match c {
                c if c.is_ascii_whitespace() => self.state = State::BeforeAttrName,
                '/' => self.state = State::SelfClosing,
                '>' => self.emit(sink, false),
                _ => self.tag_name.push(c.to_ascii_lowercase()),
            },
            State::BeforeAttrName => match c {
                c if c.is_ascii_whitespace() => {}
                '/' => self.state = State::SelfClosing,
                '>' => self.emit(sink, false),
                _ => {
                    self.attr_name.push(c.to_ascii_lowercase());
                    self.state = State::AttrName;
                }
            },
            State::AttrName => match c {
                c if c.is_ascii_whitespace() => self.state = State::AfterAttrName,
                '=' => self.state = State::BeforeAttrValue,
                '/' => {
                    self.commit_attr();
                    self.state = State::SelfClosing;
                }
                '>' => {
                    self.commit_attr();
                    self.emit(sink, false);
                }
                _ => self.attr_name.push(c.to_ascii_lowercase()),
            },
            State::AfterAttrName => match c {
                c if c.is_ascii_whitespace() => {}
                '=' => self.state = State::BeforeAttrValue,
                '/' => {
                    self.commit_attr();
                    self.state = State::SelfClosing;
                }
                '>' => {
                    self.commit_attr();
                    self.emit(sink, false);
                }
                _ => {
                    // Previous attribute had no value; this starts the next.
                    self.commit_attr();
                    self.attr_name.push(c.to_ascii_lowercase());
                    self.state = State::AttrName;
                }
            },
            State::BeforeAttrValue => match c {
                c if c.is_ascii_whitespace() => {}
                '"' => self.state = State::AttrValueDouble,
                '\'' => self.state = State::AttrValueSingle,
                '>' => {
                    self.commit_attr();
                    self.emit(sink, false);
                }
                _ => {
                    self.attr_value.push(c);
                    self.state = State::AttrValueUnquoted;
                }
            },
            State::AttrValueDouble => {
                if c == '"' {
                    self.commit_attr();
                    self.state = State::AfterAttrValueQuoted;
                } else {
                    self.attr_value.push(c);
                }
            }
            State::AttrValueSingle => {
                if c == '\'' {
                    self.commit_attr();
                    self.state = State::AfterAttrValueQuoted;
                } else {
                    self.attr_value.push(c);
                }
            }
            State::AttrValueUnquoted => match c {
                c if c.is_ascii_whitespace() => {
                    self.commit_attr();
                    self.state = State::BeforeAttrName;
                }
                '>' => {
                    self.commit_attr();
                    self.emit(sink, false);
                }
                _ => self.attr_value.push(c),
            },
            State::AfterAttrValueQuoted => match c {
                c if c.is_ascii_whitespace() => self.state = State::BeforeAttrName,
                '/' => self.state = State::SelfClosing,
                '>' => self.emit(sink, false),
                _ => {
                    // `href="/a"id=x` — sloppy but seen in the wild.
                    self.state = State::BeforeAttrName;
                    return Some(c);
                }
            },
            State::SelfClosing => {
                if c == '>' {
                    self.emit(sink, true);
                } else {
                    self.state = State::BeforeAttrName;
                    return Some(c);
                }
            }
            State::MarkupDecl => match c {
                '-' => self.state = State::CommentStartDash,
                '>' => self.state = State::Text,
                _ => self.state = State::BogusMarkup,
            },
            State::CommentStartDash => match c {
                '-' => self.state = State::Comment,
                '>' => self.state = State::Text,
                _ => self.state = State::BogusMarkup,
            },
            State::Comment => {
                if c == '-' {
                    self.state = State::CommentEndDash;
                }
            }
            State::CommentEndDash => {
                self.state = if c == '-' { State::CommentEnd } else { State::Comment };
            }
            State::CommentEnd => match c {
                '>' => self.state = State::Text,
                '-' => {}
                _ => self.state = State::Comment,
            },
            State::BogusMarkup => {
                if c == '>' {
                    self.state = State::Text;
                }
            }
            State::RawText => {
                if c == '<' {
                    self.state = State::RawTextLt;
                }
            }
            State::RawTextLt => match c {
                '/' => {
                    self.raw_match.clear();
                    self.state = State::RawTextEndTag;
                }
                '<' => {}
                _ => self.state = State::RawText,
            },
            State::RawTextEndTag => match c {
                c if c.is_ascii_alphanumeric() => {
                    self.raw_match.push(c.to_ascii_lowercase());
                    if self.raw_match.len() > self.raw_end.len() {
                        self.state = State::RawText;
                    }
                }
                '>' => {
                    self.state = if self.raw_match == self.raw_end {
                        State::Text
                    } else {
                        State::RawText
                    };
                }
                c if c.is_ascii_whitespace() || c == '/' => {
                    self.state = if self.raw_match == self.raw_end {
                        State::EndTag
                    } else {
                        State::RawText
                    };
                }
                _ => self.state = State::RawText,
            },
        }
        None
    }

    fn commit_attr(&mut self) {
        if self.attr_name.is_empty() {
            self.attr_value.clear();
            return;
        }
        let name = std::mem::take(&mut self.attr_name);
        let value = std::mem::take(&mut self.attr_value);
        if !self.attrs.iter().any(|(n, _)| *n == name) {
            self.attrs.push((name, value));
        }
    }

    fn emit(&mut self, sink: &mut dyn TagSink, self_closing: bool) {
        sink.open_tag(&self.tag_name, &self.attrs);
        if !self_closing && RAW_TEXT_ELEMENTS.contains(&self.tag_name.as_str()) {
            self.raw_end.clear();
            self.raw_end.push_str(&self.tag_name);
            self.state = State::RawText;
        } else {
            self.state = State::Text;
        }
        self.tag_name.clear();
        self.attrs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collect {
        tags: Vec<(String, Vec<(String, String)>)>,
    }

    impl TagSink for Collect {
        fn open_tag(&mut self, name: &str, attrs: &[(String, String)]) {
            self.tags.push((name.to_string(), attrs.to_vec()));
        }
    }

    fn tags_of(html: &str) -> Vec<(String, Vec<(String, String)>)> {
        let mut tokenizer = Tokenizer::new();
        let mut sink = Collect::default();
        tokenizer.push(html, &mut sink);
        tokenizer.finish();
        sink.tags
    }

    fn attr(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn basic_open_tags_in_document_order() {
        let tags = tags_of(r#"<div id="x"><a href="/a">A</a><a href='/b'>B</a><a href=/c>C</a></div>"#);
        assert_eq!(
            tags,
            vec![
                ("div".to_string(), vec![attr("id", "x")]),
                ("a".to_string(), vec![attr("href", "/a")]),
                ("a".to_string(), vec![attr("href", "/b")]),
                ("a".to_string(), vec![attr("href", "/c")]),
            ]
        );
    }

    #[test]
    fn split_across_pushes_matches_single_push() {
        let html = r#"<p>text</p><a class="nav" href="/about?x=1&y=2">About</a><br/>"#;
        let whole = tags_of(html);

        for size in [1, 2, 3, 7] {
            let mut tokenizer = Tokenizer::new();
            let mut sink = Collect::default();
            let chars: Vec<char> = html.chars().collect();
            for piece in chars.chunks(size) {
                let piece: String = piece.iter().collect();
                tokenizer.push(&piece, &mut sink);
            }
            tokenizer.finish();
            assert_eq!(sink.tags, whole, "split size {}", size);
        }
    }

    #[test]
    fn names_fold_to_lowercase_values_do_not() {
        let tags = tags_of(r#"<A HREF="/Upper">x</A>"#);
        assert_eq!(tags, vec![("a".to_string(), vec![attr("href", "/Upper")])]);
    }

    #[test]
    fn valueless_and_empty_attributes() {
        let tags = tags_of(r#"<a download href="">x</a>"#);
        assert_eq!(
            tags,
            vec![("a".to_string(), vec![attr("download", ""), attr("href", "")])]
        );
    }

    #[test]
    fn first_duplicate_attribute_wins() {
        let tags = tags_of(r#"<a href="/first" href="/second">x</a>"#);
        assert_eq!(tags, vec![("a".to_string(), vec![attr("href", "/first")])]);
    }

    #[test]
    fn self_closing_tag_is_reported() {
        let tags = tags_of(r#"<a href="/s"/>"#);
        assert_eq!(tags, vec![("a".to_string(), vec![attr("href", "/s")])]);
    }

    #[test]
    fn comments_and_doctype_contribute_nothing() {
        let tags = tags_of(
            "<!doctype html><!-- <a href=\"/hidden\"> --><a href=\"/real\">x</a><!-- -- --></html>",
        );
        assert_eq!(tags, vec![("a".to_string(), vec![attr("href", "/real")])]);
    }

    #[test]
    fn script_content_is_not_markup() {
        let tags = tags_of(
            r#"<script>if (a<b) { s = '<a href="/no">'; }</script><a href="/yes">x</a>"#,
        );
        assert_eq!(
            tags,
            vec![
                ("script".to_string(), vec![]),
                ("a".to_string(), vec![attr("href", "/yes")]),
            ]
        );
    }

    #[test]
    fn style_end_tag_with_whitespace_closes_raw_text() {
        let tags = tags_of("<style>a < b {}</style ><a href=\"/x\">x</a>");
        assert_eq!(tags[1], ("a".to_string(), vec![attr("href", "/x")]));
    }

    #[test]
    fn gt_inside_quoted_value_does_not_close_tag() {
        let tags = tags_of(r#"<a href="/x?a>b" title='1>0'>x</a>"#);
        assert_eq!(
            tags,
            vec![(
                "a".to_string(),
                vec![attr("href", "/x?a>b"), attr("title", "1>0")]
            )]
        );
    }

    #[test]
    fn stray_lt_is_not_a_tag() {
        let tags = tags_of("<p>1 < 2 and << 3</p><a href=/z>x</a>");
        assert_eq!(tags[0].0, "p");
        assert_eq!(tags[1], ("a".to_string(), vec![attr("href", "/z")]));
    }

    #[test]
    fn dangling_partial_tag_is_dropped_at_finish() {
        let mut tokenizer = Tokenizer::new();
        let mut sink = Collect::default();
        tokenizer.push("<a href=\"/ok\">x</a><a href=\"/trunc", &mut sink);
        tokenizer.finish();
        assert_eq!(sink.tags, vec![("a".to_string(), vec![attr("href", "/ok")])]);
    }

    #[test]
    fn multibyte_text_and_attribute_values() {
        let tags = tags_of(r#"<p>日本語</p><a href="/ünïcode/路径">リンク</a>"#);
        assert_eq!(
            tags[1],
            ("a".to_string(), vec![attr("href", "/ünïcode/路径")])
        );
    }
}
