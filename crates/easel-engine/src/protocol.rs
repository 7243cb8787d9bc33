//! Inbound wire protocol.
//!
//! One text frame carries one event: a command name and positional string
//! arguments joined by `'|'`. The command set is closed, so frames decode
//! once into an [`InboundEvent`]; anything malformed becomes a
//! [`ProtocolError`] for the session to log and drop — a misbehaving
//! client never brings the session down.

use thiserror::Error;
use uuid::Uuid;

use crate::batcher::FIELD_SEPARATOR;
use crate::geometry::{Point, Size};
use crate::painter::{KeyInput, KeyModifiers};
use crate::resources::{ResourceId, TextMetrics};

#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command} requires exactly {expected} arguments, got {got}")]
    WrongArity {
        command: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{command} argument {position} must be a {expected}")]
    InvalidArgument {
        command: &'static str,
        position: usize,
        expected: &'static str,
    },
}

/// One decoded browser event.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Click(Point),
    MouseDown(Point),
    MouseUp(Point),
    WindowMouseUp(Point),
    MouseMove(Point),
    KeyDown(KeyInput),
    KeyUp(KeyInput),
    /// Client could not materialize a resource (`onImageError`, ...).
    ResourceError { command: String, id: ResourceId },
    /// Resource is now usable on the client (`onImageLoaded`, ...).
    ResourceLoaded { command: String, id: ResourceId },
    /// Client began handling a resource (`onImageProcessed`, ...).
    ResourceProcessed { command: String, id: ResourceId },
    TextMetricReady { id: ResourceId, metrics: TextMetrics },
    CanvasResize(Size),
    WindowResize(Size),
}

impl InboundEvent {
    /// Decode one inbound frame. The first `'|'`-separated token is the
    /// command name, the rest are its arguments.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let mut fields = text.split(FIELD_SEPARATOR);
        // split always yields at least one (possibly empty) token
        let command = fields.next().unwrap_or_default();
        let args: Vec<&str> = fields.collect();

        match command {
            "onClick" => Ok(Self::Click(parse_point("onClick", &args)?)),
            "onMouseDown" => Ok(Self::MouseDown(parse_point("onMouseDown", &args)?)),
            "onMouseUp" => Ok(Self::MouseUp(parse_point("onMouseUp", &args)?)),
            "onWindowMouseUp" => Ok(Self::WindowMouseUp(parse_point("onWindowMouseUp", &args)?)),
            "onMouseMove" => Ok(Self::MouseMove(parse_point("onMouseMove", &args)?)),

            "onKeyDown" => Ok(Self::KeyDown(parse_key("onKeyDown", &args)?)),
            "onKeyUp" => Ok(Self::KeyUp(parse_key("onKeyUp", &args)?)),

            "onImageError" | "onAudioError" => Ok(Self::ResourceError {
                command: command.to_string(),
                id: parse_id(command_name(command), &args)?,
            }),

            "onImageLoaded" | "onAudioLoaded" | "onLinearGradientLoaded"
            | "onRadialGradientLoaded" | "onPatternLoaded" | "onTextMetricLoaded" => {
                Ok(Self::ResourceLoaded {
                    command: command.to_string(),
                    id: parse_id(command_name(command), &args)?,
                })
            }

            "onImageProcessed" | "onAudioProcessed" | "onLinearGradientProcessed"
            | "onRadialGradientProcessed" | "onPatternProcessed" | "onTextMetricProcessed" => {
                Ok(Self::ResourceProcessed {
                    command: command.to_string(),
                    id: parse_id(command_name(command), &args)?,
                })
            }

            "onTextMetricReady" => parse_text_metric_ready(&args),

            "onCanvasResize" => Ok(Self::CanvasResize(parse_size("onCanvasResize", &args)?)),
            "onWindowResize" => Ok(Self::WindowResize(parse_size("onWindowResize", &args)?)),

            other => Err(ProtocolError::UnknownCommand(other.to_string())),
        }
    }
}

/// Map a matched resource-lifecycle command back to its static name for
/// error reporting.
fn command_name(command: &str) -> &'static str {
    match command {
        "onImageError" => "onImageError",
        "onAudioError" => "onAudioError",
        "onImageLoaded" => "onImageLoaded",
        "onAudioLoaded" => "onAudioLoaded",
        "onLinearGradientLoaded" => "onLinearGradientLoaded",
        "onRadialGradientLoaded" => "onRadialGradientLoaded",
        "onPatternLoaded" => "onPatternLoaded",
        "onTextMetricLoaded" => "onTextMetricLoaded",
        "onImageProcessed" => "onImageProcessed",
        "onAudioProcessed" => "onAudioProcessed",
        "onLinearGradientProcessed" => "onLinearGradientProcessed",
        "onRadialGradientProcessed" => "onRadialGradientProcessed",
        "onPatternProcessed" => "onPatternProcessed",
        "onTextMetricProcessed" => "onTextMetricProcessed",
        _ => "resource event",
    }
}

fn expect_arity(
    command: &'static str,
    args: &[&str],
    expected: usize,
) -> Result<(), ProtocolError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ProtocolError::WrongArity {
            command,
            expected,
            got: args.len(),
        })
    }
}

/// Browsers send pointer coordinates as either integer- or
/// double-formatted strings; accept both and truncate.
fn int_from_double(
    command: &'static str,
    position: usize,
    value: &str,
) -> Result<i32, ProtocolError> {
    value
        .parse::<f64>()
        .map(|d| d as i32)
        .map_err(|_| ProtocolError::InvalidArgument {
            command,
            position,
            expected: "number",
        })
}

fn parse_bool(
    command: &'static str,
    position: usize,
    value: &str,
) -> Result<bool, ProtocolError> {
    value
        .parse::<bool>()
        .map_err(|_| ProtocolError::InvalidArgument {
            command,
            position,
            expected: "bool",
        })
}

fn parse_point(command: &'static str, args: &[&str]) -> Result<Point, ProtocolError> {
    expect_arity(command, args, 2)?;
    Ok(Point::new(
        int_from_double(command, 1, args[0])?,
        int_from_double(command, 2, args[1])?,
    ))
}

fn parse_size(command: &'static str, args: &[&str]) -> Result<Size, ProtocolError> {
    expect_arity(command, args, 2)?;
    Ok(Size::new(
        int_from_double(command, 1, args[0])?,
        int_from_double(command, 2, args[1])?,
    ))
}

fn parse_key(command: &'static str, args: &[&str]) -> Result<KeyInput, ProtocolError> {
    expect_arity(command, args, 6)?;
    Ok(KeyInput {
        key: args[0].to_string(),
        code: args[1].to_string(),
        modifiers: KeyModifiers {
            ctrl: parse_bool(command, 3, args[2])?,
            shift: parse_bool(command, 4, args[3])?,
            alt: parse_bool(command, 5, args[4])?,
            meta: parse_bool(command, 6, args[5])?,
        },
    })
}

fn parse_id(command: &'static str, args: &[&str]) -> Result<ResourceId, ProtocolError> {
    expect_arity(command, args, 1)?;
    parse_uuid(command, 1, args[0])
}

fn parse_uuid(
    command: &'static str,
    position: usize,
    value: &str,
) -> Result<ResourceId, ProtocolError> {
    Uuid::parse_str(value).map_err(|_| ProtocolError::InvalidArgument {
        command,
        position,
        expected: "UUID",
    })
}

fn mandatory_double(
    command: &'static str,
    args: &[&str],
    index: usize,
) -> Result<f64, ProtocolError> {
    args[index]
        .parse::<f64>()
        .map_err(|_| ProtocolError::InvalidArgument {
            command,
            position: index + 1,
            expected: "double",
        })
}

fn parse_text_metric_ready(args: &[&str]) -> Result<InboundEvent, ProtocolError> {
    const COMMAND: &str = "onTextMetricReady";
    expect_arity(COMMAND, args, 13)?;

    let id = parse_uuid(COMMAND, 1, args[0])?;

    // An unparseable optional field is the browser saying "not supported",
    // not a protocol violation.
    let optional = |index: usize| args[index].parse::<f64>().ok();

    let metrics = TextMetrics {
        width: mandatory_double(COMMAND, args, 1)?,
        actual_bounding_box_left: mandatory_double(COMMAND, args, 2)?,
        actual_bounding_box_right: mandatory_double(COMMAND, args, 3)?,
        font_bounding_box_ascent: optional(4),
        font_bounding_box_descent: optional(5),
        actual_bounding_box_ascent: mandatory_double(COMMAND, args, 6)?,
        actual_bounding_box_descent: mandatory_double(COMMAND, args, 7)?,
        em_height_ascent: optional(8),
        em_height_descent: optional(9),
        hanging_baseline: optional(10),
        alphabetic_baseline: optional(11),
        ideographic_baseline: optional(12),
    };

    Ok(InboundEvent::TextMetricReady { id, metrics })
}
