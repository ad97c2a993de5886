//! The `LetterA`..`LetterZ` shape catalog.
//!
//! No surviving source defines these (the original marker catalog ends with
//! a `// TODO: Other shapes` comment); this is an original stick-font design
//! rather than a port. Each letter is built from 2-5 lines over a 3x3 point
//! grid spanning the block's unit cube at `z = 0.5`.

use crate::{MarkerShape, Shape};
use std::collections::HashMap;

const BLACK: u32 = 0x000000;

type P = (f64, f64, f64);

const TL: P = (0.2, 1.0, 0.5);
const TM: P = (0.5, 1.0, 0.5);
const TR: P = (0.8, 1.0, 0.5);
const ML: P = (0.2, 0.5, 0.5);
const MM: P = (0.5, 0.5, 0.5);
const MR: P = (0.8, 0.5, 0.5);
const BL: P = (0.2, 0.0, 0.5);
const BM: P = (0.5, 0.0, 0.5);
const BR: P = (0.8, 0.0, 0.5);

fn line(p1: P, p2: P) -> Shape {
    Shape::Line {
        p1,
        p2,
        default_color: BLACK,
    }
}

fn letter(segments: &[(P, P)]) -> MarkerShape {
    MarkerShape::new(segments.iter().map(|(a, b)| line(*a, *b)).collect())
}

pub(crate) fn populate(map: &mut HashMap<&'static str, MarkerShape>) {
    map.insert("LetterA", letter(&[(BL, TM), (TM, BR), (ML, MR)]));
    map.insert(
        "LetterB",
        letter(&[(TL, BL), (TL, TR), (ML, MR), (BL, BR), (TR, BR)]),
    );
    map.insert("LetterC", letter(&[(TL, TR), (TL, BL), (BL, BR)]));
    map.insert("LetterD", letter(&[(TL, BL), (TL, TR), (TR, BR), (BL, BR)]));
    map.insert(
        "LetterE",
        letter(&[(TL, BL), (TL, TR), (ML, MR), (BL, BR)]),
    );
    map.insert("LetterF", letter(&[(TL, BL), (TL, TR), (ML, MR)]));
    map.insert(
        "LetterG",
        letter(&[(TL, TR), (TL, BL), (BL, BR), (MR, BR), (MM, MR)]),
    );
    map.insert("LetterH", letter(&[(TL, BL), (TR, BR), (ML, MR)]));
    map.insert("LetterI", letter(&[(TL, TR), (TM, BM), (BL, BR)]));
    map.insert("LetterJ", letter(&[(TR, BR), (BL, BR), (ML, BL)]));
    map.insert("LetterK", letter(&[(TL, BL), (TR, ML), (BR, ML)]));
    map.insert("LetterL", letter(&[(TL, BL), (BL, BR)]));
    map.insert(
        "LetterM",
        letter(&[(TL, BL), (TR, BR), (TL, MM), (TR, MM)]),
    );
    map.insert("LetterN", letter(&[(TL, BL), (TR, BR), (TL, BR)]));
    map.insert("LetterO", letter(&[(TL, TR), (BL, BR), (TL, BL), (TR, BR)]));
    map.insert(
        "LetterP",
        letter(&[(TL, BL), (TL, TR), (TR, MR), (ML, MR)]),
    );
    map.insert(
        "LetterQ",
        letter(&[(TL, TR), (BL, BR), (TL, BL), (TR, BR), (MM, BR)]),
    );
    map.insert(
        "LetterR",
        letter(&[(TL, BL), (TL, TR), (TR, MR), (ML, MR), (MM, BR)]),
    );
    map.insert(
        "LetterS",
        letter(&[(TL, TR), (TL, ML), (ML, MR), (MR, BR), (BL, BR)]),
    );
    map.insert("LetterT", letter(&[(TL, TR), (TM, BM)]));
    map.insert("LetterU", letter(&[(TL, BL), (BL, BR), (TR, BR)]));
    map.insert("LetterV", letter(&[(TL, BM), (TR, BM)]));
    map.insert(
        "LetterW",
        letter(&[(TL, ML), (ML, BM), (BM, MR), (MR, TR)]),
    );
    map.insert("LetterX", letter(&[(TL, BR), (TR, BL)]));
    map.insert("LetterY", letter(&[(TL, MM), (TR, MM), (MM, BM)]));
    map.insert("LetterZ", letter(&[(TL, TR), (TR, BL), (BL, BR)]));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_letter_has_between_two_and_five_segments() {
        let mut map = HashMap::new();
        populate(&mut map);
        assert_eq!(map.len(), 26);
        for letter in 'A'..='Z' {
            let name = format!("Letter{}", letter);
            let shape = map.get(name.as_str()).expect("letter must be present");
            let count = shape.len();
            assert!(
                (2..=5).contains(&count),
                "{} has {} segments",
                name,
                count
            );
        }
    }
}
