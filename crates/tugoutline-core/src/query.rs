//! Queries over a finished outline forest.

use crate::element::{OutlineElement, RangeTag};
use crate::types::Position;

/// All elements in depth-first pre-order, paired with their depth.
pub fn flatten(forest: &[OutlineElement]) -> Vec<(usize, &OutlineElement)> {
    fn walk<'e>(
        elements: &'e [OutlineElement],
        depth: usize,
        out: &mut Vec<(usize, &'e OutlineElement)>,
    ) {
        for element in elements {
            out.push((depth, element));
            walk(&element.children, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(forest, 0, &mut out);
    out
}

fn filter_element(element: &OutlineElement, keyword: &str) -> Option<OutlineElement> {
    let is_matched = element.name.to_lowercase().contains(keyword);

    let children: Vec<OutlineElement> = element
        .children
        .iter()
        .filter_map(|child| filter_element(child, keyword))
        .collect();

    if !is_matched && children.is_empty() {
        return None;
    }

    Some(OutlineElement {
        kind: element.kind,
        name: element.name.clone(),
        display_name: element.display_name.clone(),
        ranges: element.ranges.clone(),
        properties: element.properties.clone(),
        children,
        owning_contexts: element.owning_contexts.clone(),
    })
}

/// Keep elements whose name contains `query` (case-insensitive), plus the
/// ancestors needed to reach them. A blank query keeps everything.
pub fn filter(forest: &[OutlineElement], query: &str) -> Vec<OutlineElement> {
    let keyword = query.trim().to_lowercase();
    if keyword.is_empty() {
        return forest.to_vec();
    }
    forest
        .iter()
        .filter_map(|element| filter_element(element, &keyword))
        .collect()
}

/// Innermost element whose Full range contains `position`.
pub fn element_at(forest: &[OutlineElement], position: Position) -> Option<&OutlineElement> {
    let mut found = None;
    let mut level = forest;
    while let Some(element) = level.iter().find(|e| {
        e.range(RangeTag::Full)
            .is_some_and(|range| range.contains_position(position))
    }) {
        found = Some(element);
        level = &element.children;
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, OutlineRanges};
    use crate::types::TextRange;

    fn element(kind: ElementKind, name: &str, range: TextRange) -> OutlineElement {
        let mut ranges = OutlineRanges::new();
        ranges.insert(RangeTag::Full, range);
        OutlineElement::new(kind, name, name, ranges)
    }

    fn forest() -> Vec<OutlineElement> {
        let mut shapes = element(ElementKind::Namespace, "Shapes", TextRange::new(0, 0, 20, 13));
        let mut circle = element(ElementKind::Class, "Circle", TextRange::new(1, 2, 10, 11));
        circle
            .children
            .push(element(ElementKind::Field, "radius", TextRange::new(2, 4, 2, 30)));
        circle
            .children
            .push(element(ElementKind::Method, "Area()", TextRange::new(4, 4, 6, 16)));
        let square = element(ElementKind::Class, "Square", TextRange::new(12, 2, 19, 11));
        shapes.children.push(circle);
        shapes.children.push(square);
        vec![shapes]
    }

    #[test]
    fn flatten_is_preorder_with_depth() {
        let forest = forest();
        let flat: Vec<(usize, &str)> = flatten(&forest)
            .into_iter()
            .map(|(depth, e)| (depth, e.name.as_str()))
            .collect();
        assert_eq!(
            flat,
            vec![
                (0, "Shapes"),
                (1, "Circle"),
                (2, "radius"),
                (2, "Area()"),
                (1, "Square"),
            ]
        );
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn keeps_ancestors_of_matches() {
            let filtered = filter(&forest(), "AREA");
            assert_eq!(filtered.len(), 1);
            let circle = &filtered[0].children[0];
            assert_eq!(filtered[0].children.len(), 1);
            assert_eq!(circle.name, "Circle");
            assert_eq!(circle.children.len(), 1);
            assert_eq!(circle.children[0].name, "Area()");
        }

        #[test]
        fn no_match_yields_empty_forest() {
            assert!(filter(&forest(), "triangle").is_empty());
        }

        #[test]
        fn blank_query_keeps_everything() {
            assert_eq!(filter(&forest(), "   "), forest());
        }
    }

    mod element_at_tests {
        use super::*;

        #[test]
        fn innermost_element_wins() {
            let forest = forest();
            let hit = element_at(&forest, Position::new(5, 0)).unwrap();
            assert_eq!(hit.name, "Area()");
        }

        #[test]
        fn container_returned_between_members() {
            let forest = forest();
            let hit = element_at(&forest, Position::new(11, 0)).unwrap();
            assert_eq!(hit.name, "Shapes");
        }

        #[test]
        fn outside_every_element() {
            let forest = forest();
            assert!(element_at(&forest, Position::new(30, 0)).is_none());
        }
    }
}
