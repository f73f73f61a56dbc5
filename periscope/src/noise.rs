//! Role-keyed predicates separating application state from presentation
//! chrome. Kept as pure functions over the role string plus optional text;
//! the role vocabulary is a small closed set, not worth a type hierarchy.

/// Role fragments that mark scroll machinery and its companion widgets.
const SCROLL_CHROME_MARKERS: &[&str] = &[
    "scrollbar",
    "valueindicator",
    "incrementarrow",
    "decrementarrow",
    "pageup",
    "pagedown",
];

/// Container roles that carry no meaning of their own unless they have text.
const STRUCTURAL_CONTAINER_MARKERS: &[&str] = &["row", "cell", "column", "menu"];

/// Attribute names that only describe where something sits on screen.
const GEOMETRY_ATTRIBUTE_MARKERS: &[&str] = &["position", "size", "frame"];

fn matches_any(haystack: &str, markers: &[&str]) -> bool {
    let lowered = haystack.to_lowercase();
    markers.iter().any(|marker| lowered.contains(marker))
}

/// True when the role denotes a scrollbar, value indicator, or paging/arrow
/// control. These churn on every scroll and never represent app state.
pub fn is_scroll_chrome(role: &str) -> bool {
    matches_any(role, SCROLL_CHROME_MARKERS)
}

/// True when the node is a textless row/cell/column/menu container.
/// Containers that carry their own text are signal and pass through.
pub fn is_structural_container(role: &str, text: Option<&str>) -> bool {
    if text.is_some_and(|t| !t.trim().is_empty()) {
        return false;
    }
    matches_any(role, STRUCTURAL_CONTAINER_MARKERS)
}

/// True when an attribute name denotes a pure position/size field.
pub fn is_geometry_attribute(name: &str) -> bool {
    matches_any(name, GEOMETRY_ATTRIBUTE_MARKERS)
}
