use super::*;

#[test]
fn blank_line_is_no_command() {
    assert_eq!(parse(""), Ok(None));
    assert_eq!(parse("   \t"), Ok(None));
}

#[test]
fn paint_defaults_to_red() {
    assert_eq!(parse("paint 3 4"), Ok(Some(Command::Paint { x: 3, y: 4, color: ColorCode::RED })));
}

#[test]
fn paint_accepts_names_codes_and_negative_coordinates() {
    assert_eq!(parse("paint 0 0 Blue"), Ok(Some(Command::Paint { x: 0, y: 0, color: ColorCode::BLUE })));
    assert_eq!(parse("p -1 5 7"), Ok(Some(Command::Paint { x: -1, y: 5, color: ColorCode(7) })));
}

#[test]
fn px_parses_fractional_pixels() {
    assert_eq!(
        parse("px 39.5 49 white"),
        Ok(Some(Command::PaintPixel { px: 39.5, py: 49.0, color: ColorCode::WHITE }))
    );
}

#[test]
fn bad_paint_arguments_are_reported() {
    assert_eq!(parse("paint 3"), Err(InputError::Usage("paint <x> <y> [color]")));
    assert_eq!(parse("paint x 4"), Err(InputError::Number("x".to_owned())));
    assert_eq!(parse("paint 1 2 green"), Err(InputError::Color("green".to_owned())));
    assert_eq!(parse("paint 1 2 300"), Err(InputError::Color("300".to_owned())));
}

#[test]
fn room_commands_parse() {
    assert_eq!(parse("create"), Ok(Some(Command::Create)));
    assert_eq!(parse("JOIN alpha"), Ok(Some(Command::Join { name: "alpha".to_owned() })));
    assert_eq!(parse("join"), Err(InputError::Usage("join <name>")));
    assert_eq!(parse("create now"), Err(InputError::Usage("create")));
}

#[test]
fn resize_requires_two_unsigned_numbers() {
    assert_eq!(parse("resize 800 600"), Ok(Some(Command::Resize { width: 800, height: 600 })));
    assert_eq!(parse("resize -1 600"), Err(InputError::Number("-1".to_owned())));
    assert_eq!(parse("resize 800"), Err(InputError::Usage("resize <width> <height>")));
}

#[test]
fn simple_commands_and_aliases() {
    assert_eq!(parse("show"), Ok(Some(Command::Show)));
    assert_eq!(parse("history"), Ok(Some(Command::History)));
    assert_eq!(parse("status"), Ok(Some(Command::Status)));
    assert_eq!(parse("?"), Ok(Some(Command::Help)));
    assert_eq!(parse("exit"), Ok(Some(Command::Quit)));
}

#[test]
fn unknown_command_names_the_word() {
    let err = parse("fill 1 2").unwrap_err();
    assert_eq!(err.to_string(), "unknown command 'fill'; try 'help'");
}
