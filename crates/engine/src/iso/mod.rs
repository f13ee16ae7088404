mod packing;
mod projection;

pub use packing::{
    draw_packed_row, iso_sheet_origin, iso_sheet_size, packed_coord, packed_row_bounds,
    packed_size, render_iso_sheet, render_packed_sheet, DiagonalCursor, DiagonalStep, PackedRow,
    TilePlacement,
};
pub use projection::{
    from_screen, to_iso, to_ortho, to_screen, Mat2, SPRITE_HEIGHT, SPRITE_WIDTH, TO_ISO, TO_ORTHO,
    TO_SCREEN,
};
