use kurbo::PathEl;

use crate::{
    foundation::core::{Affine, BezPath, VIEW_SIZE},
    geometry::mask::{MaskRegion, MaskShape},
    scene::tree::{LayerTree, MaskDef, Node},
};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Serialize a layer tree as a standalone SVG document with a `0 0 400 400` view box.
pub fn write_svg(tree: &LayerTree) -> String {
    let mut out = String::with_capacity(4096 + tree.spoke_count() * 160);
    let size = num(VIEW_SIZE);
    out.push_str(&format!(
        r#"<svg xmlns="{SVG_NS}" id="{}" viewBox="0 0 {size} {size}" width="{size}" height="{size}">"#,
        tree.view.element_id()
    ));

    if !tree.defs.is_empty() {
        out.push_str("<defs>");
        for def in &tree.defs {
            write_mask(&mut out, def);
        }
        out.push_str("</defs>");
    }

    for node in &tree.children {
        write_node(&mut out, node);
    }

    out.push_str("</svg>");
    out
}

fn write_mask(out: &mut String, def: &MaskDef) {
    let MaskDef { id, region } = def;
    let size = num(VIEW_SIZE);
    out.push_str(&format!(
        r#"<mask id="{}" maskUnits="userSpaceOnUse" x="0" y="0" width="{size}" height="{size}">"#,
        escape_attr(id)
    ));
    write_region(out, region);
    out.push_str("</mask>");
}

fn write_region(out: &mut String, region: &MaskRegion) {
    let bg = region.background;
    out.push_str(&format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="black"/>"#,
        num(bg.x0),
        num(bg.y0),
        num(bg.width()),
        num(bg.height())
    ));

    for layer in &region.layers {
        let grouped = layer.transform != Affine::IDENTITY;
        if grouped {
            out.push_str(&format!(
                r#"<g transform="{}">"#,
                transform_attr(layer.transform)
            ));
        }
        for shape in &layer.shapes {
            write_shape(out, shape);
        }
        if grouped {
            out.push_str("</g>");
        }
    }
}

fn write_shape(out: &mut String, shape: &MaskShape) {
    let fill = shape.paint().svg_fill();
    match shape {
        MaskShape::Rect { rect, .. } => out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}"/>"#,
            num(rect.x0),
            num(rect.y0),
            num(rect.width()),
            num(rect.height())
        )),
        MaskShape::Path { path, .. } => out.push_str(&format!(
            r#"<path d="{}" fill="{fill}"/>"#,
            path_data(path)
        )),
        MaskShape::Lens {
            from, to, radius, ..
        } => {
            let r = num(*radius);
            out.push_str(&format!(
                r#"<path d="M {} {} A {r} {r} 0 0 1 {} {} A {r} {r} 0 0 1 {} {} Z" fill="{fill}"/>"#,
                num(from.x),
                num(from.y),
                num(to.x),
                num(to.y),
                num(from.x),
                num(from.y)
            ));
        }
    }
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Spoke(s) => out.push_str(&format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{:.2}" stroke-linecap="butt"/>"#,
            num(s.line.p0.x),
            num(s.line.p0.y),
            num(s.line.p1.x),
            num(s.line.p1.y),
            s.stroke.to_hex(),
            s.width
        )),
        Node::Group { mask, children } => {
            match mask {
                Some(id) => out.push_str(&format!(r#"<g mask="url(#{})">"#, escape_attr(id))),
                None => out.push_str("<g>"),
            }
            for child in children {
                write_node(out, child);
            }
            out.push_str("</g>");
        }
    }
}

/// SVG path data for a kurbo path.
pub fn path_data(path: &BezPath) -> String {
    let mut d = String::new();
    for el in path.elements() {
        if !d.is_empty() {
            d.push(' ');
        }
        match el {
            PathEl::MoveTo(p) => d.push_str(&format!("M{} {}", num(p.x), num(p.y))),
            PathEl::LineTo(p) => d.push_str(&format!("L{} {}", num(p.x), num(p.y))),
            PathEl::QuadTo(a, b) => d.push_str(&format!(
                "Q{} {} {} {}",
                num(a.x),
                num(a.y),
                num(b.x),
                num(b.y)
            )),
            PathEl::CurveTo(a, b, c) => d.push_str(&format!(
                "C{} {} {} {} {} {}",
                num(a.x),
                num(a.y),
                num(b.x),
                num(b.y),
                num(c.x),
                num(c.y)
            )),
            PathEl::ClosePath => d.push('Z'),
        }
    }
    d
}

fn transform_attr(t: Affine) -> String {
    let [a, b, c, d, e, f] = t.as_coeffs();
    format!(
        "matrix({} {} {} {} {} {})",
        num(a),
        num(b),
        num(c),
        num(d),
        num(e),
        num(f)
    )
}

/// Compact decimal formatting: at most four fractional digits, no trailing zeros, no `-0`.
pub(crate) fn num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let s = format!("{v:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        _ => s.to_string(),
    }
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
#[path = "../../tests/unit/scene/svg.rs"]
mod tests;
