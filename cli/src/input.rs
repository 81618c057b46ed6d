//! Line-oriented command parsing for the interactive client.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use pixelroom::ColorCode;

pub const HELP: &str = "\
commands:
  paint <x> <y> [color]    paint a grid cell (color: white|red|blue|0-255, default red)
  px <px> <py> [color]     paint the cell under a surface pixel
  create                   create a new room from the current grid
  join <name>              switch to an existing room
  resize <width> <height>  resize the viewport in surface pixels
  show                     print the grid
  history                  print recorded changes as JSON lines
  status                   print session state
  help                     print this text
  quit                     disconnect and exit";

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Paint { x: i64, y: i64, color: ColorCode },
    PaintPixel { px: f64, py: f64, color: ColorCode },
    Create,
    Join { name: String },
    Resize { width: u32, height: u32 },
    Show,
    History,
    Status,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown command '{0}'; try 'help'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid number '{0}'")]
    Number(String),
    #[error("unknown color '{0}'; use white, red, blue, or a code 0-255")]
    Color(String),
}

/// Parse one input line. Blank lines yield `None`.
///
/// # Errors
///
/// Returns [`InputError`] for unknown commands, wrong arity, or values that
/// do not parse.
pub fn parse(line: &str) -> Result<Option<Command>, InputError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match head.to_ascii_lowercase().as_str() {
        "paint" | "p" => {
            let (x, y, color) = point_args(&args, "paint <x> <y> [color]")?;
            Command::Paint { x: number(x)?, y: number(y)?, color: color_arg(color)? }
        }
        "px" => {
            let (px, py, color) = point_args(&args, "px <px> <py> [color]")?;
            Command::PaintPixel { px: number(px)?, py: number(py)?, color: color_arg(color)? }
        }
        "create" => no_args(&args, "create", Command::Create)?,
        "join" => match args.as_slice() {
            [name] => Command::Join { name: (*name).to_owned() },
            _ => return Err(InputError::Usage("join <name>")),
        },
        "resize" => match args.as_slice() {
            [width, height] => Command::Resize { width: number(width)?, height: number(height)? },
            _ => return Err(InputError::Usage("resize <width> <height>")),
        },
        "show" => no_args(&args, "show", Command::Show)?,
        "history" => no_args(&args, "history", Command::History)?,
        "status" => no_args(&args, "status", Command::Status)?,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(InputError::Unknown(other.to_owned())),
    };
    Ok(Some(command))
}

fn point_args<'a>(args: &[&'a str], usage: &'static str) -> Result<(&'a str, &'a str, Option<&'a str>), InputError> {
    match *args {
        [x, y] => Ok((x, y, None)),
        [x, y, color] => Ok((x, y, Some(color))),
        _ => Err(InputError::Usage(usage)),
    }
}

fn no_args(args: &[&str], usage: &'static str, command: Command) -> Result<Command, InputError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(InputError::Usage(usage))
    }
}

fn number<N: std::str::FromStr>(raw: &str) -> Result<N, InputError> {
    raw.parse::<N>().map_err(|_| InputError::Number(raw.to_owned()))
}

/// Color by name or numeric code; red when omitted.
fn color_arg(raw: Option<&str>) -> Result<ColorCode, InputError> {
    let Some(raw) = raw else {
        return Ok(ColorCode::RED);
    };
    if let Some(code) = ColorCode::from_name(raw) {
        return Ok(code);
    }
    match raw.parse::<u8>() {
        Ok(code) => Ok(ColorCode(code)),
        Err(_) => Err(InputError::Color(raw.to_owned())),
    }
}
