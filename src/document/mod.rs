//! Markdown document rendering.
//!
//! This module handles:
//! - Extracting fenced code blocks and ATX headings into placeholders
//! - Rendering the remaining prose with comrak
//! - Injecting boxed code blocks and heading pills back into the output
//!
//! [`render_markdown`] is the single entry point.

mod code_block;
mod extract;
mod heading;
mod inject;
mod prose;

pub use code_block::render_code_block;
pub use extract::{
    CodeBlock, HeadingBlock, PlaceholderTag, Placeholders, extract_code_blocks, extract_headings,
};
pub use heading::{heading_label, render_heading};
pub use inject::{inject_code_blocks, inject_headings};
pub use prose::ProseRenderer;

use crate::theme::Theme;

/// Failure of the prose renderer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("invalid word wrap width: {0}")]
    InvalidWidth(u16),
    #[error("failed to assemble rendered output")]
    Format(#[from] std::fmt::Error),
}

/// Render `source` as ANSI text for a terminal `width` columns wide.
///
/// Never fails: if the prose renderer does, the source comes back
/// unchanged. Successful output never ends with a newline.
pub fn render_markdown(source: &str, theme: Theme, width: u16) -> String {
    let _scope = crate::perf::scope("render.markdown");
    let tags = Placeholders::for_source(source);
    let (prose, code_blocks) = extract_code_blocks(source, &tags.code);
    let (prose, headings) = extract_headings(&prose, &tags.heading);

    let rendered = match ProseRenderer::new(theme, width).and_then(|r| r.render(&prose)) {
        Ok(rendered) => rendered,
        Err(err) => {
            tracing::warn!(%err, width, "prose rendering failed; showing raw document");
            crate::perf::log_event("render.fallback", err.to_string());
            return source.to_string();
        }
    };

    let rendered = rendered.trim_end_matches('\n');
    let rendered = inject_code_blocks(rendered, &code_blocks, &tags.code, width, theme);
    let rendered = inject_headings(&rendered, &headings, &tags.heading, theme);
    rendered.trim_end_matches('\n').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi::strip_ansi;

    const SAMPLE: &str = "# Title\n\nSome *prose* here.\n\n```rust\nfn main() {}\n```\n\n## Section\n\nMore text.\n";

    #[test]
    fn test_render_replaces_blocks_and_headings() {
        let out = render_markdown(SAMPLE, Theme::NoTty, 40);
        assert!(!out.contains("INCIPIT_"));
        assert!(!out.contains("```"));
        assert!(!out.contains("## "));
        let lines: Vec<&str> = out.split('\n').collect();
        assert!(lines.contains(&"Title"));
        assert!(lines.contains(&"Section"));
        assert!(lines.iter().any(|l| l.starts_with("╭── rust ")));
        assert!(lines.contains(&"  Some prose here."));
    }

    #[test]
    fn test_render_keeps_document_order() {
        let out = render_markdown(SAMPLE, Theme::NoTty, 40);
        let title = out.find("Title").unwrap();
        let code = out.find("fn main").unwrap();
        let section = out.find("Section").unwrap();
        assert!(title < code && code < section);
    }

    #[test]
    fn test_render_dark_heading_is_pill() {
        let out = render_markdown("## Section\n", Theme::Dark, 60);
        assert_eq!(strip_ansi(&out), "  Section  ");
    }

    #[test]
    fn test_zero_width_falls_back_to_source() {
        assert_eq!(render_markdown(SAMPLE, Theme::Dark, 0), SAMPLE);
    }

    #[test]
    fn test_literal_placeholder_text_is_preserved() {
        let md = "Writing INCIPIT_CODEBLOCK_0 by hand.\n\n```\ncode\n```\n";
        let out = render_markdown(md, Theme::NoTty, 60);
        assert!(out.contains("Writing INCIPIT_CODEBLOCK_0 by hand."));
        assert!(out.contains("│ code"));
    }

    #[test]
    fn test_hash_lines_in_code_stay_in_box() {
        let md = "```sh\n# comment\n```\n";
        let out = render_markdown(md, Theme::NoTty, 30);
        assert!(out.contains("│ # comment"));
    }

    #[test]
    fn test_notty_output_has_no_escapes() {
        let out = render_markdown(SAMPLE, Theme::NoTty, 80);
        assert!(!out.contains('\x1b'));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn render_never_ends_with_newline(
                md in "(#{1,3} [a-z]{1,8}\n|[a-z *_`]{0,30}\n|```[a-z]{0,4}\n[a-z #]{0,20}\n```\n|\n){1,8}",
                width in 1u16..120,
            ) {
                let out = render_markdown(&md, Theme::Dark, width);
                prop_assert!(!out.ends_with('\n'), "output {:?}", out);
            }
        }
    }
}
