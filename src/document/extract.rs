//! Block extraction.
//!
//! Fenced code blocks and ATX headings are pulled out of the raw markdown
//! before the prose renderer sees it. Each one is replaced by a placeholder
//! token (`<TAG>_<index>`) that survives prose rendering as literal text
//! and is swapped for the rendered block afterwards.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Fenced code block: optional language tag, body up to a closing fence.
static CODE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ms)^```([a-zA-Z][a-zA-Z0-9_+-]*)?\n(.*?)^```[^\S\r\n]*$")
        .expect("valid code block regex")
});

/// ATX heading: 1-6 `#`, spaces, then the heading text.
static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(#{1,6})[ \t]+(.+)$").expect("valid heading regex"));

pub const CODE_BLOCK_TAG: &str = "INCIPIT_CODEBLOCK";
pub const HEADING_TAG: &str = "INCIPIT_HEADER";

/// A fenced code block, identified by its extraction index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub code: String,
}

impl CodeBlock {
    pub fn new(language: Option<&str>, code: impl Into<String>) -> Self {
        Self {
            language: language.filter(|l| !l.is_empty()).map(ToString::to_string),
            code: code.into(),
        }
    }

    /// Language tag, or the empty string when none was given.
    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or_default()
    }
}

/// An ATX heading with its raw (possibly emphasized) text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingBlock {
    pub level: u8,
    pub text: String,
}

impl HeadingBlock {
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level: level.clamp(1, 6),
            text: text.into(),
        }
    }
}

/// Tag used to build placeholders for one kind of block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderTag(String);

impl PlaceholderTag {
    /// Tag for code block placeholders, without a collision check.
    pub fn code_blocks() -> Self {
        Self(CODE_BLOCK_TAG.to_string())
    }

    /// Tag for heading placeholders, without a collision check.
    pub fn headings() -> Self {
        Self(HEADING_TAG.to_string())
    }

    /// A tag starting with `base` that does not occur anywhere in `source`.
    pub fn unique(base: &str, source: &str) -> Self {
        let mut tag = base.to_string();
        while source.contains(&tag) {
            tag.push('X');
        }
        Self(tag)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The placeholder for the block at `index`.
    pub fn placeholder(&self, index: usize) -> String {
        format!("{}_{index}", self.0)
    }

    /// Whether `text` contains the placeholder for `index` as a whole token.
    ///
    /// `TAG_1` does not match inside `TAG_12`.
    pub fn occurs_in(&self, text: &str, index: usize) -> bool {
        let needle = self.placeholder(index);
        text.match_indices(&needle).any(|(start, _)| {
            !text[start + needle.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit())
        })
    }
}

/// The pair of placeholder tags used during one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    pub code: PlaceholderTag,
    pub heading: PlaceholderTag,
}

impl Placeholders {
    /// Tags guaranteed not to collide with anything in `source`.
    pub fn for_source(source: &str) -> Self {
        Self {
            code: PlaceholderTag::unique(CODE_BLOCK_TAG, source),
            heading: PlaceholderTag::unique(HEADING_TAG, source),
        }
    }
}

/// Replace every fenced code block in `markdown` with a placeholder.
pub fn extract_code_blocks(markdown: &str, tag: &PlaceholderTag) -> (String, Vec<CodeBlock>) {
    extract_with(markdown, &CODE_BLOCK, tag, |caps| {
        CodeBlock::new(
            caps.get(1).map(|m| m.as_str()),
            caps.get(2).map_or("", |m| m.as_str()),
        )
    })
}

/// Replace every ATX heading in `markdown` with a placeholder.
///
/// Run this on the output of [`extract_code_blocks`] so `#` lines inside
/// fences are never taken for headings.
pub fn extract_headings(markdown: &str, tag: &PlaceholderTag) -> (String, Vec<HeadingBlock>) {
    extract_with(markdown, &HEADING, tag, |caps| {
        let hashes = caps.get(1).map_or("#", |m| m.as_str());
        let level = u8::try_from(hashes.len()).unwrap_or(6);
        HeadingBlock::new(level, caps.get(2).map_or("", |m| m.as_str()))
    })
}

fn extract_with<T>(
    markdown: &str,
    pattern: &Regex,
    tag: &PlaceholderTag,
    mut build: impl FnMut(&Captures<'_>) -> T,
) -> (String, Vec<T>) {
    let mut blocks = Vec::new();
    let prose = pattern
        .replace_all(markdown, |caps: &Captures<'_>| {
            let placeholder = tag.placeholder(blocks.len());
            blocks.push(build(caps));
            placeholder
        })
        .into_owned();
    (prose, blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fenced(block: &CodeBlock) -> String {
        format!("```{}\n{}```", block.language(), block.code)
    }

    fn restore_code_blocks(prose: &str, blocks: &[CodeBlock], tag: &PlaceholderTag) -> String {
        let mut out = prose.to_string();
        for (idx, block) in blocks.iter().enumerate().rev() {
            out = out.replacen(&tag.placeholder(idx), &fenced(block), 1);
        }
        out
    }

    #[test]
    fn test_extract_code_block_with_language() {
        let md = "```go\nfunc main() {}\n```\n";
        let (prose, blocks) = extract_code_blocks(md, &PlaceholderTag::code_blocks());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language.as_deref(), Some("go"));
        assert_eq!(blocks[0].code, "func main() {}\n");
        assert_eq!(prose, "INCIPIT_CODEBLOCK_0\n");
    }

    #[test]
    fn test_extract_code_block_without_language() {
        let md = "```\nsome code\n```\n";
        let (prose, blocks) = extract_code_blocks(md, &PlaceholderTag::code_blocks());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language, None);
        assert!(prose.contains("INCIPIT_CODEBLOCK_0"));
        assert!(!prose.contains("```"));
    }

    #[test]
    fn test_extract_multiple_code_blocks_in_order() {
        let md = "```go\nfunc a() {}\n```\n\nSome prose.\n\n```python\nprint('hi')\n```\n";
        let (prose, blocks) = extract_code_blocks(md, &PlaceholderTag::code_blocks());
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].language(), "go");
        assert_eq!(blocks[1].language(), "python");
        assert_eq!(
            prose,
            "INCIPIT_CODEBLOCK_0\n\nSome prose.\n\nINCIPIT_CODEBLOCK_1\n"
        );
    }

    #[test]
    fn test_extract_no_code_blocks_leaves_prose_unchanged() {
        let md = "Just plain prose.\n\nAnother paragraph.\n";
        let (prose, blocks) = extract_code_blocks(md, &PlaceholderTag::code_blocks());
        assert!(blocks.is_empty());
        assert_eq!(prose, md);
    }

    #[test]
    fn test_closing_fence_tolerates_trailing_whitespace() {
        let md = "```rust\nlet x = 1;\n```   \nafter\n";
        let (prose, blocks) = extract_code_blocks(md, &PlaceholderTag::code_blocks());
        assert_eq!(blocks.len(), 1);
        assert_eq!(prose, "INCIPIT_CODEBLOCK_0\nafter\n");
    }

    #[test]
    fn test_language_tag_requires_no_space() {
        let md = "``` go\nx\n```\n";
        let (_, blocks) = extract_code_blocks(md, &PlaceholderTag::code_blocks());
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_code_block_body_keeps_hash_lines() {
        let md = "```sh\n# not a heading\necho hi\n```\n";
        let tags = Placeholders::for_source(md);
        let (prose, blocks) = extract_code_blocks(md, &tags.code);
        let (_, headings) = extract_headings(&prose, &tags.heading);
        assert!(headings.is_empty());
        assert_eq!(blocks[0].code, "# not a heading\necho hi\n");
    }

    #[test]
    fn test_extract_single_heading() {
        let md = "## Section\n\nSome prose.";
        let (prose, headings) = extract_headings(md, &PlaceholderTag::headings());
        assert_eq!(headings, vec![HeadingBlock::new(2, "Section")]);
        assert_eq!(prose, "INCIPIT_HEADER_0\n\nSome prose.");
    }

    #[test]
    fn test_extract_heading_levels_in_order() {
        let md = "# Title\n\n## Section\n\n### Sub\n";
        let (_, headings) = extract_headings(md, &PlaceholderTag::headings());
        let levels: Vec<u8> = headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
    }

    #[test]
    fn test_heading_keeps_raw_inline_markdown() {
        let (_, headings) = extract_headings("## **Bold** Title\n", &PlaceholderTag::headings());
        assert_eq!(headings[0].text, "**Bold** Title");
    }

    #[test]
    fn test_seven_hashes_is_not_a_heading() {
        let (_, headings) = extract_headings("####### nope\n", &PlaceholderTag::headings());
        assert!(headings.is_empty());
    }

    #[test]
    fn test_hash_without_space_is_not_a_heading() {
        let (prose, headings) = extract_headings("#hashtag\n", &PlaceholderTag::headings());
        assert!(headings.is_empty());
        assert_eq!(prose, "#hashtag\n");
    }

    #[test]
    fn test_unique_tag_avoids_document_text() {
        let source = "mentions INCIPIT_CODEBLOCK_0 literally";
        let tags = Placeholders::for_source(source);
        assert_eq!(tags.code.as_str(), "INCIPIT_CODEBLOCKX");
        assert_eq!(tags.heading.as_str(), HEADING_TAG);
    }

    #[test]
    fn test_occurs_in_requires_whole_index() {
        let tag = PlaceholderTag::code_blocks();
        assert!(tag.occurs_in("  INCIPIT_CODEBLOCK_1", 1));
        assert!(!tag.occurs_in("  INCIPIT_CODEBLOCK_12", 1));
        assert!(tag.occurs_in("  INCIPIT_CODEBLOCK_12", 12));
    }

    #[test]
    fn test_restore_reproduces_document() {
        let md = "Intro\n\n```rust\nfn a() {}\n```\n\nMiddle\n\n```\nraw\n```\nEnd";
        let tag = PlaceholderTag::unique(CODE_BLOCK_TAG, md);
        let (prose, blocks) = extract_code_blocks(md, &tag);
        assert_eq!(restore_code_blocks(&prose, &blocks, &tag), md);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn block_strategy() -> impl Strategy<Value = CodeBlock> {
            (
                prop::option::of("[a-z][a-z0-9+]{0,5}"),
                prop::collection::vec("[a-z ;(){}=]{0,12}", 0..4),
            )
                .prop_map(|(language, lines)| {
                    let code: String = lines.iter().map(|l| format!("{l}\n")).collect();
                    CodeBlock::new(language.as_deref(), code)
                })
        }

        proptest! {
            #[test]
            fn extract_then_restore_round_trips(
                prose in prop::collection::vec("[a-zA-Z .,]{0,20}", 1..5),
                blocks in prop::collection::vec(block_strategy(), 0..4),
            ) {
                let mut md = String::new();
                for (idx, para) in prose.iter().enumerate() {
                    md.push_str(para);
                    md.push('\n');
                    if let Some(block) = blocks.get(idx) {
                        md.push_str(&fenced(block));
                        md.push('\n');
                    }
                }
                let tag = PlaceholderTag::unique(CODE_BLOCK_TAG, &md);
                let (residual, extracted) = extract_code_blocks(&md, &tag);
                let expected: Vec<CodeBlock> =
                    blocks.iter().take(prose.len()).cloned().collect();
                prop_assert_eq!(&extracted, &expected);
                prop_assert_eq!(restore_code_blocks(&residual, &extracted, &tag), md);
            }
        }
    }
}
