use std::collections::BTreeMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Element;

use warmap_shared::TerritoryId;

use crate::surface::{BBox, MapRegion, MapSurface, RegionHandlers, RegionShape, TextLabel};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Attribute on each drawable shape naming the territory it belongs to.
/// Several shapes carrying the same id form a linked group.
const TERRITORY_ATTR: &str = "data-territory";

/// One SVG shape of the inline map document.
#[derive(Clone)]
pub struct SvgShape {
    el: Element,
}

impl RegionShape for SvgShape {
    fn attached_id(&self) -> Option<TerritoryId> {
        self.el.get_attribute(TERRITORY_ATTR)?.parse().ok()
    }

    fn set_fill(&self, color: &str) {
        self.el.set_attribute("fill", color).ok();
    }

    fn set_stroke(&self, color: &str, width: f64) {
        self.el.set_attribute("stroke", color).ok();
        self.el.set_attribute("stroke-width", &width.to_string()).ok();
    }

    fn set_opacity(&self, opacity: f64) {
        self.el.set_attribute("opacity", &opacity.to_string()).ok();
    }

    fn bbox(&self) -> BBox {
        self.el
            .dyn_ref::<web_sys::SvgGraphicsElement>()
            .and_then(|g| g.get_b_box().ok())
            .map(|r| BBox {
                x: r.x() as f64,
                y: r.y() as f64,
                width: r.width() as f64,
                height: r.height() as f64,
            })
            .unwrap_or(BBox {
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
            })
    }

    fn set_handlers(&self, handlers: RegionHandlers) {
        // Listeners live for the whole session; the index is built once and
        // regions are never torn down, so the closures are handed to the DOM
        // permanently.
        let enter = Closure::wrap(handlers.on_hover_enter);
        self.el
            .add_event_listener_with_callback("mouseover", enter.as_ref().unchecked_ref())
            .ok();
        enter.forget();

        let exit = Closure::wrap(handlers.on_hover_exit);
        self.el
            .add_event_listener_with_callback("mouseout", exit.as_ref().unchecked_ref())
            .ok();
        exit.forget();

        let press = Closure::wrap(handlers.on_press);
        self.el
            .add_event_listener_with_callback("mousedown", press.as_ref().unchecked_ref())
            .ok();
        press.forget();
    }
}

/// Army-count text node appended to the map document.
pub struct SvgLabel {
    el: Element,
}

impl TextLabel for SvgLabel {
    fn set_text(&self, text: &str) {
        self.el.set_text_content(Some(text));
    }
}

/// The inline map SVG, located under a host element by id.
pub struct SvgSurface {
    root: Element,
}

impl SvgSurface {
    pub fn locate(host_id: &str) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let host = document.get_element_by_id(host_id)?;
        let root = host.query_selector("svg").ok()??;
        Some(Self { root })
    }
}

impl MapSurface for SvgSurface {
    type Shape = SvgShape;
    type Label = SvgLabel;

    fn regions(&self) -> Vec<MapRegion<SvgShape>> {
        let mut grouped: BTreeMap<TerritoryId, Vec<SvgShape>> = BTreeMap::new();
        let Ok(nodes) = self.root.query_selector_all(&format!("[{TERRITORY_ATTR}]")) else {
            return Vec::new();
        };
        for i in 0..nodes.length() {
            let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let shape = SvgShape { el };
            if let Some(id) = shape.attached_id() {
                grouped.entry(id).or_default().push(shape);
            }
        }
        grouped
            .into_values()
            .map(|mut shapes| {
                if shapes.len() == 1 {
                    MapRegion::Single(shapes.remove(0))
                } else {
                    MapRegion::Linked(shapes)
                }
            })
            .collect()
    }

    fn place_label(&self, x: f64, y: f64, text: &str) -> Option<SvgLabel> {
        let document = web_sys::window()?.document()?;
        let el = document.create_element_ns(Some(SVG_NS), "text").ok()?;
        el.set_attribute("x", &x.to_string()).ok()?;
        el.set_attribute("y", &y.to_string()).ok()?;
        el.set_attribute("text-anchor", "middle").ok()?;
        el.set_attribute("dominant-baseline", "middle").ok()?;
        el.set_attribute("pointer-events", "none").ok()?;
        el.set_text_content(Some(text));
        self.root.append_child(&el).ok()?;
        Some(SvgLabel { el })
    }

    fn resize(&self, width: f64, height: f64, logical_width: f64, logical_height: f64) {
        self.root
            .set_attribute("viewBox", &format!("0 0 {logical_width} {logical_height}"))
            .ok();
        self.root.set_attribute("width", &width.to_string()).ok();
        self.root.set_attribute("height", &height.to_string()).ok();
    }
}
