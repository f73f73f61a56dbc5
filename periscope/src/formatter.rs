//! Compact one-line rendering of enriched elements.
//!
//! Output format:
//! `[Role] "text" (x,y WxH)` with an `[off-screen]` tag when the element is
//! known to be outside the viewport. Meant for embedding a readable excerpt
//! in tool summaries, not for machine parsing.

use crate::enrich::EnrichedElement;

pub fn format_elements(elements: &[EnrichedElement]) -> String {
    let mut output = String::new();
    for element in elements {
        format_element(element, &mut output);
    }
    output
}

fn format_element(element: &EnrichedElement, output: &mut String) {
    output.push_str(&format!("[{}]", element.role));

    if let Some(ref text) = element.text {
        if !text.is_empty() {
            output.push_str(&format!(" \"{text}\""));
        }
    }

    match element.frame {
        Some(frame) => output.push_str(&format!(
            " ({:.0},{:.0} {:.0}x{:.0})",
            frame.x, frame.y, frame.width, frame.height
        )),
        None => output.push_str(" (?)"),
    }

    if element.in_viewport == Some(false) {
        output.push_str(" [off-screen]");
    }

    output.push('\n');
}
