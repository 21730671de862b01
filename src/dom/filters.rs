use crate::dom::element::Element;

/// Stable sort, front-most (highest paint order) first. Elements with
/// equal paint order keep their input order, so a given snapshot always
/// produces the same ranking.
pub fn sort_by_paint_order(elements: &mut [Element]) {
    elements.sort_by(|a, b| b.paint_order.cmp(&a.paint_order));
}

/// Marks elements mostly covered (ratio >= `threshold`) by an element
/// painted above them. Expects `elements` sorted front-most first; each
/// candidate only scans the entries ranked above it, so marking is never
/// symmetric.
pub fn mark_occluded(elements: &mut [Element], threshold: f64) {
    for i in 0..elements.len() {
        if elements[i].bounding_box.is_empty() {
            continue;
        }
        for j in 0..i {
            if elements[j].bounding_box.is_empty() {
                continue;
            }
            if elements[i]
                .bounding_box
                .coverage_by(&elements[j].bounding_box)
                >= threshold
            {
                elements[i].is_occluded = true;
                break;
            }
        }
    }
}

/// Marks elements sitting almost entirely (ratio >= `threshold`) inside a
/// strictly larger interactive element, so one visual affordance yields
/// one index. Equal-area pairs are never contained in each other.
pub fn mark_contained(elements: &mut [Element], threshold: f64) {
    for i in 0..elements.len() {
        if elements[i].bounding_box.is_empty() {
            continue;
        }
        for j in 0..elements.len() {
            if i == j || !elements[j].is_interactive || elements[j].bounding_box.is_empty() {
                continue;
            }
            let inner = elements[i].bounding_box;
            let outer = elements[j].bounding_box;
            if inner.coverage_by(&outer) >= threshold && inner.area() < outer.area() {
                elements[i].is_contained = true;
                break;
            }
        }
    }
}
