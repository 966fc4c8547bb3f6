//! EDIFACT syntax definitions and delimiter handling
//!
//! This module handles the service string advice (UNA), the default
//! separators, and the release-aware splitting of segments, elements and
//! components. Separators are `char`s so that UTF-8 payloads are split on
//! character boundaries.

/// Default EDIFACT separators (when no UNA is present)
pub const DEFAULT_COMPONENT_SEPARATOR: char = ':';
pub const DEFAULT_ELEMENT_SEPARATOR: char = '+';
pub const DEFAULT_DECIMAL_POINT: char = '.';
pub const DEFAULT_RELEASE_CHARACTER: char = '?';
pub const DEFAULT_RESERVED: char = ' ';
pub const DEFAULT_SEGMENT_TERMINATOR: char = '\'';

/// Service characters used for parsing EDIFACT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separators {
    /// Component separator (default ':')
    pub component: char,
    /// Element separator (default '+')
    pub element: char,
    /// Decimal point (default '.')
    pub decimal: char,
    /// Release character (default '?')
    pub release: char,
    /// Reserved for future use (default ' ')
    pub reserved: char,
    /// Segment terminator (default '\'')
    pub segment: char,
}

impl Default for Separators {
    fn default() -> Self {
        Self {
            component: DEFAULT_COMPONENT_SEPARATOR,
            element: DEFAULT_ELEMENT_SEPARATOR,
            decimal: DEFAULT_DECIMAL_POINT,
            release: DEFAULT_RELEASE_CHARACTER,
            reserved: DEFAULT_RESERVED,
            segment: DEFAULT_SEGMENT_TERMINATOR,
        }
    }
}

/// A framing problem found while splitting the segment stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    /// 1-based index of the offending segment within the split text
    pub segment_index: usize,
    pub message: String,
    /// The text that could not be framed
    pub value: Option<String>,
}

impl Separators {
    /// Parse separators from a UNA segment
    /// UNA format: UNA:+.? '
    /// Positions:  012345678
    pub fn from_una(una: &str) -> Option<Self> {
        let advice = una.strip_prefix("UNA")?;
        let chars: Vec<char> = advice.chars().take(6).collect();
        if chars.len() < 6 {
            return None;
        }

        Some(Self {
            component: chars[0],
            element: chars[1],
            decimal: chars[2],
            release: chars[3],
            reserved: chars[4],
            segment: chars[5],
        })
    }

    /// Separators announced at the start of `text`, or the defaults when
    /// there is no UNA. The second value is the UNA segment itself.
    pub fn detect(text: &str) -> (Self, Option<&str>) {
        match Self::from_una(text) {
            Some(separators) => {
                let una_len = text
                    .char_indices()
                    .nth(9)
                    .map_or(text.len(), |(offset, _)| offset);
                (separators, Some(&text[..una_len]))
            }
            None => (Self::default(), None),
        }
    }

    /// Check if a character is a special character (needs escaping)
    pub fn is_special(&self, c: char) -> bool {
        c == self.component || c == self.element || c == self.segment || c == self.release
    }

    /// Iterate over the raw segments of `text`. Release sequences are kept
    /// so that elements and components can still be split afterwards.
    pub fn segments<'a>(&self, text: &'a str) -> SegmentSplitter<'a> {
        SegmentSplitter {
            text,
            pos: 0,
            index: 0,
            separators: *self,
            finished: false,
        }
    }

    /// Split `text` on the segment terminator; empty segments and line
    /// breaks between segments are dropped.
    pub fn split_segments<'a>(&self, text: &'a str) -> Result<Vec<&'a str>, SyntaxIssue> {
        self.segments(text).collect()
    }

    /// Split on `separator` honoring the release character, keeping the
    /// release sequences in the returned slices
    pub fn split_raw<'a>(&self, text: &'a str, separator: char) -> Vec<&'a str> {
        let mut parts = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices();

        while let Some((i, c)) = chars.next() {
            if c == self.release {
                chars.next();
            } else if c == separator {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
        }
        parts.push(&text[start..]);
        parts
    }

    /// Split a segment into its unescaped elements
    pub fn split_elements(&self, segment: &str) -> Vec<String> {
        self.split_raw(segment, self.element)
            .into_iter()
            .map(|element| self.unescape(element))
            .collect()
    }

    /// Split an element into its unescaped components
    pub fn split_components(&self, element: &str) -> Vec<String> {
        self.split_raw(element, self.component)
            .into_iter()
            .map(|component| self.unescape(component))
            .collect()
    }

    /// Replace release sequences in front of special characters by the
    /// character itself; a single left-to-right pass
    pub fn unescape(&self, text: &str) -> String {
        if !text.contains(self.release) {
            return text.to_string();
        }

        let mut result = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if c == self.release {
                if let Some(&next) = chars.peek() {
                    if self.is_special(next) {
                        result.push(next);
                        chars.next();
                        continue;
                    }
                }
            }
            result.push(c);
        }
        result
    }
}

/// Iterator over raw segments, see [`Separators::segments`]
#[derive(Debug, Clone)]
pub struct SegmentSplitter<'a> {
    text: &'a str,
    pos: usize,
    index: usize,
    separators: Separators,
    finished: bool,
}

impl<'a> Iterator for SegmentSplitter<'a> {
    type Item = Result<&'a str, SyntaxIssue>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let rest = &self.text[self.pos..];
            let start = self.pos + (rest.len() - rest.trim_start().len());
            if start >= self.text.len() {
                self.finished = true;
                return None;
            }

            let mut end = None;
            let mut chars = self.text[start..].char_indices();
            while let Some((i, c)) = chars.next() {
                if c == self.separators.release {
                    if chars.next().is_none() {
                        self.finished = true;
                        return Some(Err(SyntaxIssue {
                            segment_index: self.index + 1,
                            message: "Unterminated release escape at end of input".to_string(),
                            value: Some(self.text[start..].to_string()),
                        }));
                    }
                } else if c == self.separators.segment {
                    end = Some(start + i);
                    break;
                }
            }

            let Some(end) = end else {
                self.finished = true;
                return Some(Err(SyntaxIssue {
                    segment_index: self.index + 1,
                    message: "Missing segment terminator".to_string(),
                    value: Some(self.text[start..].trim_end().to_string()),
                }));
            };

            self.pos = end + self.separators.segment.len_utf8();
            let segment = self.text[start..end].trim_end_matches(['\r', '\n']);
            if !segment.is_empty() {
                self.index += 1;
                return Some(Ok(segment));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_separators() {
        let sep = Separators::default();
        assert_eq!(sep.component, ':');
        assert_eq!(sep.element, '+');
        assert_eq!(sep.decimal, '.');
        assert_eq!(sep.release, '?');
        assert_eq!(sep.segment, '\'');
    }

    #[test]
    fn test_una_parsing() {
        let sep = Separators::from_una("UNA:+.? '").unwrap();
        assert_eq!(sep, Separators::default());
    }

    #[test]
    fn test_una_custom_separators() {
        let sep = Separators::from_una("UNA*=,# ~").unwrap();
        assert_eq!(sep.component, '*');
        assert_eq!(sep.element, '=');
        assert_eq!(sep.decimal, ',');
        assert_eq!(sep.release, '#');
        assert_eq!(sep.segment, '~');
    }

    #[test]
    fn test_una_too_short() {
        assert!(Separators::from_una("UNA:+.").is_none());
        assert!(Separators::from_una("UNB+UNOC:3").is_none());
    }

    #[test]
    fn test_detect_returns_una_segment() {
        let (sep, una) = Separators::detect("UNA:+,? 'UNB+UNOC:3'");
        assert_eq!(una, Some("UNA:+,? '"));
        assert_eq!(sep.decimal, ',');

        let (sep, una) = Separators::detect("UNB+UNOC:3'");
        assert_eq!(una, None);
        assert_eq!(sep, Separators::default());
    }

    #[test]
    fn test_release_character_in_elements_and_components() {
        let sep = Separators::default();
        assert_eq!(sep.split_elements("A?+B+C"), vec!["A+B", "C"]);
        assert_eq!(sep.split_components("X?:Y:Z"), vec!["X:Y", "Z"]);
    }

    #[test]
    fn test_split_raw_keeps_release_sequences() {
        let sep = Separators::default();
        assert_eq!(
            sep.split_raw("FTX+ABO+++A:B?+00?:303", '+'),
            vec!["FTX", "ABO", "", "", "A:B?+00?:303"]
        );
    }

    #[test]
    fn test_double_release_character() {
        let sep = Separators::default();
        assert_eq!(sep.unescape("ABC??DEF"), "ABC?DEF");
        // ?? releases the release character, so the + still separates
        assert_eq!(sep.split_elements("A??+B"), vec!["A?", "B"]);
    }

    #[test]
    fn test_unescape_leaves_other_characters() {
        let sep = Separators::default();
        assert_eq!(sep.unescape("?a?'?+"), "?a'+");
        assert_eq!(sep.unescape("trailing?"), "trailing?");
    }

    #[test]
    fn test_unescape_idempotent_without_release() {
        let sep = Separators::default();
        for text in ["", "plain", "a:b+c", "Müller-Lüdenscheidt"] {
            assert_eq!(sep.unescape(text), text);
            assert_eq!(sep.unescape(&sep.unescape(text)), text);
        }
    }

    #[test]
    fn test_split_segments_with_line_breaks() {
        let sep = Separators::default();
        let segments = sep
            .split_segments("UNB+UNOC:3'\r\nUNH+1+APERAK'\nBGM+313+X?'Y'\n")
            .unwrap();
        assert_eq!(segments, vec!["UNB+UNOC:3", "UNH+1+APERAK", "BGM+313+X?'Y"]);
    }

    #[test]
    fn test_split_segments_drops_empty_segments() {
        let sep = Separators::default();
        let segments = sep.split_segments("UNS+D''UNT+2+1'  \n").unwrap();
        assert_eq!(segments, vec!["UNS+D", "UNT+2+1"]);
    }

    #[test]
    fn test_missing_segment_terminator() {
        let sep = Separators::default();
        let issue = sep.split_segments("UNS+D'UNT+2+1").unwrap_err();
        assert_eq!(issue.segment_index, 2);
        assert_eq!(issue.value.as_deref(), Some("UNT+2+1"));
        assert!(issue.message.contains("Missing segment terminator"));
    }

    #[test]
    fn test_unterminated_release_escape() {
        let sep = Separators::default();
        let issue = sep.split_segments("UNS+D'FTX+ABO+++A?").unwrap_err();
        assert!(issue.message.contains("release"));
    }

    #[test]
    fn test_multibyte_separators_and_content() {
        let sep = Separators::from_una("UNA§¦.?\u{20}¬").unwrap();
        let segments = sep.split_segments("NAD¦MS¦Grüße§9¬UNT¦2¦1¬").unwrap();
        assert_eq!(segments, vec!["NAD¦MS¦Grüße§9", "UNT¦2¦1"]);
        let elements = sep.split_raw(segments[0], sep.element);
        assert_eq!(sep.split_components(elements[2]), vec!["Grüße", "9"]);
    }
}
