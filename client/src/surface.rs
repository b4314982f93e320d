use warmap_shared::TerritoryId;

/// Bounding box of a rendered shape, in the map's logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn union(&self, other: &BBox) -> BBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        BBox {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

/// Callbacks a shape fires on pointer interaction.
pub struct RegionHandlers {
    pub on_hover_enter: Box<dyn Fn()>,
    pub on_hover_exit: Box<dyn Fn()>,
    pub on_press: Box<dyn Fn()>,
}

/// One hit-testable shape on the rendering surface. The surface owns the
/// drawing; the engine only reads the attached territory id and mutates
/// style.
pub trait RegionShape {
    fn attached_id(&self) -> Option<TerritoryId>;
    fn set_fill(&self, color: &str);
    fn set_stroke(&self, color: &str, width: f64);
    fn set_opacity(&self, opacity: f64);
    fn bbox(&self) -> BBox;
    fn set_handlers(&self, handlers: RegionHandlers);
}

/// Handle to a text label placed on the surface.
pub trait TextLabel {
    fn set_text(&self, text: &str);
}

/// A selectable map region: either one shape, or a linked group of shapes
/// that together draw a single territory (disjoint landmasses of the same
/// country).
#[derive(Clone)]
pub enum MapRegion<S> {
    Single(S),
    Linked(Vec<S>),
}

impl<S: RegionShape> MapRegion<S> {
    /// The sole join key between rendering and the game store. Linked groups
    /// resolve through their first member; every member carries the same id.
    pub fn territory_id(&self) -> Option<TerritoryId> {
        match self {
            MapRegion::Single(shape) => shape.attached_id(),
            MapRegion::Linked(shapes) => shapes.first().and_then(RegionShape::attached_id),
        }
    }

    pub fn shapes(&self) -> std::slice::Iter<'_, S> {
        match self {
            MapRegion::Single(shape) => std::slice::from_ref(shape).iter(),
            MapRegion::Linked(shapes) => shapes.iter(),
        }
    }

    pub fn set_opacity_all(&self, opacity: f64) {
        for shape in self.shapes() {
            shape.set_opacity(opacity);
        }
    }

    pub fn set_fill_all(&self, color: &str) {
        for shape in self.shapes() {
            shape.set_fill(color);
        }
    }

    /// Union of member bounding boxes; `None` for an empty linked group.
    pub fn bbox(&self) -> Option<BBox> {
        let mut shapes = self.shapes();
        let first = shapes.next()?.bbox();
        Some(shapes.fold(first, |acc, shape| acc.union(&shape.bbox())))
    }
}

/// The rendering surface as the engine sees it: hit-testable regions, text
/// labels, and a resizable drawing area with a fixed logical view box.
pub trait MapSurface {
    type Shape: RegionShape;
    type Label: TextLabel;

    /// Enumerate every selectable region, linked groups already folded.
    fn regions(&self) -> Vec<MapRegion<Self::Shape>>;

    /// Place a text label at logical coordinates, returning a handle for
    /// later rewrites.
    fn place_label(&self, x: f64, y: f64, text: &str) -> Option<Self::Label>;

    /// Resize the drawing area while preserving the logical view box.
    fn resize(&self, width: f64, height: f64, logical_width: f64, logical_height: f64);
}

#[cfg(test)]
pub(crate) mod mock {
    use std::cell::RefCell;
    use std::rc::Rc;

    use warmap_shared::TerritoryId;

    use super::{BBox, MapRegion, MapSurface, RegionHandlers, RegionShape, TextLabel};

    #[derive(Debug, Default)]
    pub struct ShapeState {
        pub fill: Option<String>,
        pub stroke: Option<(String, f64)>,
        pub opacity: f64,
    }

    #[derive(Clone)]
    pub struct MockShape {
        pub id: Option<TerritoryId>,
        pub bbox: BBox,
        pub state: Rc<RefCell<ShapeState>>,
        pub handlers: Rc<RefCell<Option<RegionHandlers>>>,
    }

    impl MockShape {
        pub fn new(id: TerritoryId, bbox: BBox) -> Self {
            Self {
                id: Some(id),
                bbox,
                state: Rc::new(RefCell::new(ShapeState {
                    opacity: 1.0,
                    ..ShapeState::default()
                })),
                handlers: Rc::new(RefCell::new(None)),
            }
        }

        pub fn hover_enter(&self) {
            if let Some(handlers) = &*self.handlers.borrow() {
                (handlers.on_hover_enter)();
            }
        }

        pub fn hover_exit(&self) {
            if let Some(handlers) = &*self.handlers.borrow() {
                (handlers.on_hover_exit)();
            }
        }

        pub fn press(&self) {
            if let Some(handlers) = &*self.handlers.borrow() {
                (handlers.on_press)();
            }
        }
    }

    impl RegionShape for MockShape {
        fn attached_id(&self) -> Option<TerritoryId> {
            self.id
        }

        fn set_fill(&self, color: &str) {
            self.state.borrow_mut().fill = Some(color.to_string());
        }

        fn set_stroke(&self, color: &str, width: f64) {
            self.state.borrow_mut().stroke = Some((color.to_string(), width));
        }

        fn set_opacity(&self, opacity: f64) {
            self.state.borrow_mut().opacity = opacity;
        }

        fn bbox(&self) -> BBox {
            self.bbox
        }

        fn set_handlers(&self, handlers: RegionHandlers) {
            *self.handlers.borrow_mut() = Some(handlers);
        }
    }

    #[derive(Clone)]
    pub struct MockLabel(pub Rc<RefCell<String>>);

    impl TextLabel for MockLabel {
        fn set_text(&self, text: &str) {
            *self.0.borrow_mut() = text.to_string();
        }
    }

    pub struct MockSurface {
        pub shapes: Vec<MapRegion<MockShape>>,
        pub labels: RefCell<Vec<((f64, f64), MockLabel)>>,
        pub resizes: RefCell<Vec<(f64, f64, f64, f64)>>,
    }

    impl MockSurface {
        pub fn new(shapes: Vec<MapRegion<MockShape>>) -> Self {
            Self {
                shapes,
                labels: RefCell::new(Vec::new()),
                resizes: RefCell::new(Vec::new()),
            }
        }
    }

    impl MapSurface for MockSurface {
        type Shape = MockShape;
        type Label = MockLabel;

        fn regions(&self) -> Vec<MapRegion<MockShape>> {
            self.shapes.clone()
        }

        fn place_label(&self, x: f64, y: f64, text: &str) -> Option<MockLabel> {
            let label = MockLabel(Rc::new(RefCell::new(text.to_string())));
            self.labels.borrow_mut().push(((x, y), label.clone()));
            Some(label)
        }

        fn resize(&self, width: f64, height: f64, logical_width: f64, logical_height: f64) {
            self.resizes
                .borrow_mut()
                .push((width, height, logical_width, logical_height));
        }
    }
}
