use super::*;

#[test]
fn empty_canvas_prints_title_only() {
    let canvas = TextCanvas::new(Layout::default());
    assert_eq!(canvas.to_text(), "room - (0x0 cells)");
}

#[test]
fn redraw_then_draw_cell_shows_glyphs() {
    let mut canvas = TextCanvas::new(Layout::default());
    let mut grid = Grid::new(2, 1);
    grid.set(0, 0, ColorCode::RED);
    canvas.redraw(&grid);
    canvas.draw_cell(2, 1, ColorCode::BLUE);
    canvas.draw_cell(1, 1, ColorCode(9));
    canvas.room_changed("alpha");

    assert_eq!(canvas.room(), Some("alpha"));
    assert_eq!(canvas.to_text(), "room alpha (3x2 cells)\nR..\n.#B");
}

#[test]
fn draw_outside_painted_area_grows_rows() {
    let mut canvas = TextCanvas::new(Layout::default());
    canvas.draw_cell(1, 2, ColorCode::RED);
    assert_eq!(canvas.to_text(), "room - (2x3 cells)\n..\n..\n.R");
}
