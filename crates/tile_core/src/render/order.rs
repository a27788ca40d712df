use super::renderable::Renderable;

/// Sort renderables into draw order, back to front.
///
/// Lower layers draw first; within a layer, sprites whose bottom edge is
/// higher on screen draw first. The sort is stable, so renderables with equal
/// priority keep their collection order.
pub fn order_by_priority(renderables: &mut [Renderable]) {
    renderables.sort_by_key(|r| r.priority);
}

/// Consuming variant of `order_by_priority`.
pub fn ordered(mut renderables: Vec<Renderable>) -> Vec<Renderable> {
    order_by_priority(&mut renderables);
    renderables
}
