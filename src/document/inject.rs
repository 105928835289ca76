//! Placeholder injection.
//!
//! Each line of the rendered prose is checked (with escapes stripped) for
//! the placeholders that have not been consumed yet. The first match
//! replaces the whole line with the rendered block.
//!
//! A placeholder sharing its line with other prose takes that prose with
//! it. Extraction keeps blocks on their own lines, so this only happens when
//! the source puts a fence or heading directly against a paragraph.

use crate::ansi::strip_ansi;
use crate::theme::Theme;

use super::code_block::render_code_block;
use super::extract::{CodeBlock, HeadingBlock, PlaceholderTag};
use super::heading::render_heading;

/// Swap code block placeholders in `rendered` for boxed code blocks.
pub fn inject_code_blocks(
    rendered: &str,
    blocks: &[CodeBlock],
    tag: &PlaceholderTag,
    width: u16,
    theme: Theme,
) -> String {
    inject_with(rendered, blocks, tag, |block| {
        render_code_block(block, width, theme)
    })
}

/// Swap heading placeholders in `rendered` for heading pills.
pub fn inject_headings(
    rendered: &str,
    headings: &[HeadingBlock],
    tag: &PlaceholderTag,
    theme: Theme,
) -> String {
    inject_with(rendered, headings, tag, |heading| {
        render_heading(heading, theme)
    })
}

fn inject_with<T>(
    rendered: &str,
    blocks: &[T],
    tag: &PlaceholderTag,
    render: impl Fn(&T) -> String,
) -> String {
    if blocks.is_empty() {
        return rendered.to_string();
    }
    let mut consumed = vec![false; blocks.len()];
    rendered
        .split('\n')
        .map(|line| {
            let plain = strip_ansi(line);
            let found = blocks
                .iter()
                .enumerate()
                .find(|(idx, _)| !consumed[*idx] && tag.occurs_in(&plain, *idx));
            match found {
                Some((idx, block)) => {
                    consumed[idx] = true;
                    render(block)
                }
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
