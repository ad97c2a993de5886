//! Vector shape catalog ported verbatim from the original marker data
//! (vertex coordinates and default colors taken from `cMarkerShape::GetNameMap`).

use crate::{MarkerShape, Shape};
use std::collections::HashMap;

const BLACK: u32 = 0x000000;

fn line(p1: (f64, f64, f64), p2: (f64, f64, f64)) -> Shape {
    Shape::Line {
        p1,
        p2,
        default_color: BLACK,
    }
}

fn tri(p1: (f64, f64, f64), p2: (f64, f64, f64), p3: (f64, f64, f64)) -> Shape {
    Shape::Triangle {
        p1,
        p2,
        p3,
        default_color: BLACK,
    }
}

pub(crate) fn populate(map: &mut HashMap<&'static str, MarkerShape>) {
    map.insert(
        "ArrowXM",
        MarkerShape::new(vec![
            tri((0.0, 0.5, 0.5), (0.5, 0.5, 1.0), (0.5, 0.5, 0.0)),
            tri((1.0, 0.5, 0.6), (1.0, 0.5, 0.4), (0.0, 0.5, 0.5)),
        ]),
    );
    map.insert(
        "ArrowXP",
        MarkerShape::new(vec![
            tri((1.0, 0.5, 0.5), (0.5, 0.5, 1.0), (0.5, 0.5, 0.0)),
            tri((0.0, 0.5, 0.6), (0.0, 0.5, 0.4), (1.0, 0.5, 0.5)),
        ]),
    );
    map.insert(
        "ArrowYM",
        MarkerShape::new(vec![
            tri((1.0, 0.5, 0.0), (0.0, 0.5, 1.0), (0.5, 0.0, 0.5)),
            tri((0.4, 1.0, 0.6), (0.6, 1.0, 0.4), (0.5, 0.0, 0.5)),
        ]),
    );
    map.insert(
        "ArrowYMCornerXMZM",
        MarkerShape::new(vec![
            line((0.0, 0.0, 0.0), (0.5, 0.5, 0.0)),
            line((0.0, 0.0, 0.0), (0.0, 0.5, 0.5)),
            line((0.0, 0.0, 0.0), (0.0, 1.0, 0.0)),
        ]),
    );
    map.insert(
        "ArrowYMCornerXMZP",
        MarkerShape::new(vec![
            line((0.0, 0.0, 1.0), (0.5, 0.5, 1.0)),
            line((0.0, 0.0, 1.0), (0.0, 0.5, 0.5)),
            line((0.0, 0.0, 1.0), (0.0, 1.0, 1.0)),
        ]),
    );
    map.insert(
        "ArrowYMCornerXPZM",
        MarkerShape::new(vec![
            line((1.0, 0.0, 0.0), (0.5, 0.5, 0.0)),
            line((1.0, 0.0, 0.0), (1.0, 0.5, 0.5)),
            line((1.0, 0.0, 0.0), (1.0, 1.0, 0.0)),
        ]),
    );
    map.insert(
        "ArrowYMCornerXPZP",
        MarkerShape::new(vec![
            line((1.0, 0.0, 1.0), (0.5, 0.5, 1.0)),
            line((1.0, 0.0, 1.0), (1.0, 0.5, 0.5)),
            line((1.0, 0.0, 1.0), (1.0, 1.0, 1.0)),
        ]),
    );
    map.insert(
        "ArrowYP",
        MarkerShape::new(vec![
            tri((1.0, 0.5, 0.0), (0.0, 0.5, 1.0), (0.5, 1.0, 0.5)),
            tri((0.4, 0.0, 0.6), (0.6, 0.0, 0.4), (0.5, 1.0, 0.5)),
        ]),
    );
    map.insert(
        "ArrowYPCornerXMZM",
        MarkerShape::new(vec![
            line((0.0, 1.0, 0.0), (0.5, 0.5, 0.0)),
            line((0.0, 1.0, 0.0), (0.0, 0.5, 0.5)),
            line((0.0, 0.0, 0.0), (0.0, 1.0, 0.0)),
        ]),
    );
    map.insert(
        "ArrowYPCornerXMZP",
        MarkerShape::new(vec![
            line((0.0, 1.0, 1.0), (0.5, 0.5, 1.0)),
            line((0.0, 1.0, 1.0), (0.0, 0.5, 0.5)),
            line((0.0, 0.0, 1.0), (0.0, 1.0, 1.0)),
        ]),
    );
    map.insert(
        "ArrowYPCornerXPZM",
        MarkerShape::new(vec![
            line((1.0, 1.0, 0.0), (0.5, 0.5, 0.0)),
            line((1.0, 1.0, 0.0), (1.0, 0.5, 0.5)),
            line((1.0, 0.0, 0.0), (1.0, 1.0, 0.0)),
        ]),
    );
    map.insert(
        "ArrowYPCornerXPZP",
        MarkerShape::new(vec![
            line((1.0, 1.0, 1.0), (0.5, 0.5, 1.0)),
            line((1.0, 1.0, 1.0), (1.0, 0.5, 0.5)),
            line((1.0, 0.0, 1.0), (1.0, 1.0, 1.0)),
        ]),
    );
    map.insert(
        "ArrowZM",
        MarkerShape::new(vec![
            tri((0.5, 0.5, 0.0), (1.0, 0.5, 0.5), (0.0, 0.5, 0.5)),
            tri((0.6, 0.5, 1.0), (0.4, 0.5, 1.0), (0.5, 0.5, 0.0)),
        ]),
    );
    map.insert(
        "ArrowZP",
        MarkerShape::new(vec![
            tri((0.5, 0.5, 1.0), (1.0, 0.5, 0.5), (0.0, 0.5, 0.5)),
            tri((0.6, 0.5, 0.0), (0.4, 0.5, 0.0), (0.5, 0.5, 1.0)),
        ]),
    );
    map.insert(
        "BottomArrowXM",
        MarkerShape::new(vec![
            tri((0.0, 0.0, 0.5), (0.5, 0.0, 1.0), (0.5, 0.0, 0.0)),
            tri((1.0, 0.0, 0.6), (1.0, 0.0, 0.4), (0.0, 0.0, 0.5)),
        ]),
    );
    map.insert(
        "BottomArrowXP",
        MarkerShape::new(vec![
            tri((1.0, 0.0, 0.5), (0.5, 0.0, 1.0), (0.5, 0.0, 0.0)),
            tri((0.0, 0.0, 0.6), (0.0, 0.0, 0.4), (1.0, 0.0, 0.5)),
        ]),
    );
    map.insert(
        "BottomArrowZM",
        MarkerShape::new(vec![
            tri((0.5, 0.0, 0.0), (1.0, 0.0, 0.5), (0.0, 0.0, 0.5)),
            tri((0.6, 0.0, 1.0), (0.4, 0.0, 1.0), (0.5, 0.0, 0.0)),
        ]),
    );
    map.insert(
        "BottomArrowZP",
        MarkerShape::new(vec![
            tri((0.5, 0.0, 1.0), (1.0, 0.0, 0.5), (0.0, 0.0, 0.5)),
            tri((0.6, 0.0, 0.0), (0.4, 0.0, 0.0), (0.5, 0.0, 1.0)),
        ]),
    );
    map.insert(
        "BottomDot",
        MarkerShape::new(vec![
            tri((0.0, 0.0, 0.5), (0.5, 0.0, 1.0), (1.0, 0.0, 0.5)),
            tri((0.0, 0.0, 0.5), (0.5, 0.0, 0.0), (1.0, 0.0, 0.5)),
        ]),
    );
    map.insert(
        "Cube",
        MarkerShape::new(vec![
            line((0.0, 0.0, 0.0), (1.0, 0.0, 0.0)),
            line((0.0, 0.0, 0.0), (0.0, 1.0, 0.0)),
            line((0.0, 0.0, 0.0), (0.0, 0.0, 1.0)),
            line((1.0, 0.0, 0.0), (1.0, 1.0, 0.0)),
            line((1.0, 0.0, 0.0), (1.0, 0.0, 1.0)),
            line((0.0, 1.0, 0.0), (1.0, 1.0, 0.0)),
            line((0.0, 1.0, 0.0), (0.0, 1.0, 1.0)),
            line((0.0, 0.0, 1.0), (1.0, 0.0, 1.0)),
            line((0.0, 0.0, 1.0), (0.0, 1.0, 1.0)),
            line((1.0, 1.0, 1.0), (1.0, 1.0, 0.0)),
            line((1.0, 1.0, 1.0), (1.0, 0.0, 1.0)),
            line((1.0, 1.0, 1.0), (0.0, 1.0, 1.0)),
        ]),
    );
}
