//! The static block-color lookup table: `block_colors[type][meta] -> RGBA`.
//!
//! The full historical Minecraft block palette is external data not present
//! in the retrieved original source (see DESIGN.md); this table carries a
//! representative working set of common block types instead, sufficient to
//! exercise every rendering code path (air, opaque solids, per-meta
//! variation, alpha).

use markers::Rgba;

const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

/// Looks up the normal-shade color for a block type/meta pair. `meta` is
/// masked to its low nibble by the caller (the decoder already does this);
/// unknown types fall back to a flat magenta so missing palette entries are
/// obvious rather than silently wrong, the same way an unrecognized sprite
/// "missing texture" color would be.
pub fn block_color(block_type: u8, block_meta: u8) -> Rgba {
    let meta = (block_meta & 0x0f) as usize;
    match block_type {
        0 => TRANSPARENT,
        1 => stone(meta),
        2 => Rgba::new(0x7a, 0xb6, 0x3e, 0xff),
        3 => Rgba::new(0x8a, 0x5a, 0x33, 0xff),
        4 => Rgba::new(0x7a, 0x7a, 0x7a, 0xff),
        5 => wood_plank(meta),
        12 => Rgba::new(0xdb, 0xd3, 0x9a, 0xff),
        13 => Rgba::new(0x88, 0x86, 0x80, 0xff),
        17 => log(meta),
        18 => Rgba::new(0x4a, 0x7a, 0x33, 0xcc),
        20 => Rgba::new(0xc0, 0xe6, 0xf0, 0x60),
        24 => Rgba::new(0xe0, 0xd2, 0x9a, 0xff),
        35 => wool(meta),
        41 => Rgba::new(0xfd, 0xe0, 0x4c, 0xff),
        57 => Rgba::new(0x5c, 0xe6, 0xe0, 0xff),
        _ => Rgba::new(0xff, 0x00, 0xff, 0xff),
    }
}

fn stone(meta: usize) -> Rgba {
    match meta {
        1 => Rgba::new(0x9c, 0x8a, 0x7a, 0xff),
        3 => Rgba::new(0x6b, 0x6b, 0x6b, 0xff),
        _ => Rgba::new(0x7f, 0x7f, 0x7f, 0xff),
    }
}

fn wood_plank(meta: usize) -> Rgba {
    match meta {
        1 => Rgba::new(0x7a, 0x5a, 0x3a, 0xff),
        2 => Rgba::new(0xc4, 0xa8, 0x76, 0xff),
        _ => Rgba::new(0xb0, 0x8a, 0x53, 0xff),
    }
}

fn log(meta: usize) -> Rgba {
    match meta & 0x3 {
        1 => Rgba::new(0x5a, 0x45, 0x2b, 0xff),
        2 => Rgba::new(0x6e, 0x5a, 0x38, 0xff),
        _ => Rgba::new(0x6f, 0x57, 0x34, 0xff),
    }
}

fn wool(meta: usize) -> Rgba {
    match meta {
        1 => Rgba::new(0xdd, 0x7a, 0x32, 0xff),
        4 => Rgba::new(0xe1, 0xc1, 0x35, 0xff),
        5 => Rgba::new(0x70, 0xb9, 0x1c, 0xff),
        14 => Rgba::new(0xb0, 0x2e, 0x26, 0xff),
        15 => Rgba::new(0x1d, 0x1a, 0x1c, 0xff),
        _ => Rgba::new(0xe9, 0xec, 0xec, 0xff),
    }
}

/// Derives the light (top-face) shade from a block's normal color:
/// `c + (255-c)/3` per channel, alpha unchanged.
pub fn light_shade(normal: Rgba) -> Rgba {
    Rgba::new(
        normal.r + (0xff - normal.r) / 3,
        normal.g + (0xff - normal.g) / 3,
        normal.b + (0xff - normal.b) / 3,
        normal.a,
    )
}

/// Derives the shadow (right-face) shade from a block's normal color:
/// `2*c/3` per channel, alpha unchanged.
pub fn shadow_shade(normal: Rgba) -> Rgba {
    Rgba::new(
        (2 * normal.r as u16 / 3) as u8,
        (2 * normal.g as u16 / 3) as u8,
        (2 * normal.b as u16 / 3) as u8,
        normal.a,
    )
}
