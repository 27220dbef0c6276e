//! Example: three-pane layout with a fixed sidebar and two flexed panes

use trellis_geometry::{Axis, Size};
use trellis_layout::{Align, Container, Dimension, Item, LayoutEngine, LayoutTree, MapMeasure};

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut tree = LayoutTree::new();
    let root = tree.add_container(
        Container::new(Axis::Horizontal, Align::StretchMax)
            .with_width(Dimension::Percent(100.0))
            .with_height(Dimension::Percent(100.0)),
    );
    let sidebar = tree.add_item(root, Item::fixed(240.0));
    let main_pane = tree.add_item(root, Item::flex(2.0));
    let inspector = tree.add_item(root, Item::flex(1.0));

    // natural content sizes, as the rendering layer would report them
    let mut measure = MapMeasure::new();
    measure.set(sidebar, Size::new(240.0, 420.0));
    measure.set(main_pane, Size::new(600.0, 540.0));
    measure.set(inspector, Size::new(200.0, 360.0));

    let mut engine = LayoutEngine::new();
    let result = engine.layout(&tree, root, Size::new(1280.0, 720.0), &measure);

    for (id, label) in [
        (sidebar, "sidebar"),
        (main_pane, "main"),
        (inspector, "inspector"),
    ] {
        if let Some(rect) = result.rect(id) {
            println!(
                "{label}: {}x{} at ({}, {})",
                rect.width, rect.height, rect.x, rect.y
            );
        }
    }
}
