//! CSS transform-list parsing
//!
//! Parses `transform` property values like
//! `"rotate(20deg) scale(1.2) translate(20px, 50px)"` into [`Matrix`] values,
//! one per function, in textual order. Units are converted during parsing;
//! 3D transform functions are recognized but never supported and are either
//! skipped with a warning or rejected, depending on the caller.

use std::f64::consts::PI;

use thiserror::Error;

use crate::matrix::Matrix;

/// Error type for transform-list parsing failures.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Input does not follow the `name(args) name(args)` grammar
    #[error("malformed transform: {0}")]
    MalformedTransform(String),
    /// Wrong or missing unit for an argument class
    #[error("invalid unit in {function}(): {message}")]
    UnitMismatch { function: String, message: String },
    /// Function name outside the supported grammar
    #[error("unrecognized transform function: {0}")]
    UnrecognizedFunction(String),
    /// 3D transform function while 3D rejection was requested
    #[error("3d transform function is not supported: {0}")]
    ThreeDTransform(String),
}

/// A non-fatal diagnostic raised while parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    /// Function name the warning refers to
    pub function: String,
    pub message: String,
}

impl Warning {
    fn new(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self { function: function.into(), message: message.into() }
    }
}

/// Result of parsing a transform-list string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    /// Parsed matrices, one per transform function, in textual order
    pub matrices: Vec<Matrix>,
    /// Diagnostics for tolerated-but-ignored functions
    pub warnings: Vec<Warning>,
}

/// 3D transform function names: recognized so they can be reported
/// precisely, never parsed.
const THREE_D_FUNCTIONS: &[&str] = &[
    "matrix3d",
    "perspective",
    "rotate3d",
    "rotatex",
    "rotatey",
    "rotatez",
    "scale3d",
    "scalez",
    "translate3d",
    "translatez",
];

/// Parse a CSS transform-list string into matrices.
///
/// With `safe_3d` set, any 3D transform function fails the parse with
/// [`ParseError::ThreeDTransform`]; otherwise 3D functions are skipped and a
/// [`Warning`] is recorded in the outcome. A failing parse yields no
/// matrices, never a partial list.
///
/// ```
/// use cssmatrix::parse::parse_transform;
///
/// let outcome = parse_transform("scale(2) translate(3px)", false).unwrap();
/// let kinds: Vec<_> = outcome.matrices.iter().map(|m| m.kind().name()).collect();
/// assert_eq!(kinds, ["scale", "translate"]);
/// ```
pub fn parse_transform(input: &str, safe_3d: bool) -> Result<ParseOutcome, ParseError> {
    let normalized = normalize(input);
    let mut outcome = ParseOutcome::default();

    for call in tokenize(&normalized)? {
        match parse_function(&call)? {
            Some(matrix) => outcome.matrices.push(matrix),
            None => {
                if safe_3d {
                    return Err(ParseError::ThreeDTransform(call.name));
                }
                outcome
                    .warnings
                    .push(Warning::new(call.name, "ignoring unsupported 3d transform function"));
            }
        }
    }

    Ok(outcome)
}

/// Lowercase, strip the `transform:` property prefix and a trailing `;`, and
/// collapse whitespace runs to single spaces.
fn normalize(input: &str) -> String {
    let mut text = input.trim().to_lowercase();
    if let Some(rest) = text.strip_prefix("transform:") {
        text = rest.trim_start().to_string();
    }
    if let Some(rest) = text.strip_suffix(';') {
        text = rest.trim_end().to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch);
    }
    out
}

/// One `name(body)` call extracted by the tokenizer.
struct FunctionCall {
    name: String,
    body: String,
}

enum State {
    /// Before a function name
    Between,
    /// Inside a function name
    Name,
    /// Inside the parentheses
    Body,
    /// Just past the closing parenthesis
    End,
}

/// Split a normalized transform list into function calls.
///
/// A four-state machine enforces the `name(...)` shape and exactly one space
/// between calls; anything else is malformed.
fn tokenize(input: &str) -> Result<Vec<FunctionCall>, ParseError> {
    let mut calls = Vec::new();
    let mut state = State::Between;
    let mut name = String::new();
    let mut body = String::new();

    for (pos, ch) in input.char_indices() {
        match state {
            State::Between => {
                if ch.is_ascii_alphanumeric() {
                    name.push(ch);
                    state = State::Name;
                } else {
                    return Err(malformed(pos, format!("expected a function name, found '{ch}'")));
                }
            }
            State::Name => {
                if ch == '(' {
                    state = State::Body;
                } else if ch.is_ascii_alphanumeric() {
                    name.push(ch);
                } else {
                    return Err(malformed(
                        pos,
                        format!("expected '(' after '{name}', found '{ch}'"),
                    ));
                }
            }
            State::Body => {
                if ch == ')' {
                    calls.push(FunctionCall {
                        name: std::mem::take(&mut name),
                        body: std::mem::take(&mut body),
                    });
                    state = State::End;
                } else if ch == '(' {
                    return Err(malformed(pos, "nested '(' in function arguments".to_string()));
                } else {
                    body.push(ch);
                }
            }
            State::End => {
                if ch == ' ' {
                    state = State::Between;
                } else {
                    return Err(malformed(
                        pos,
                        format!("expected a space between functions, found '{ch}'"),
                    ));
                }
            }
        }
    }

    match state {
        State::End => Ok(calls),
        State::Between if calls.is_empty() => Ok(calls),
        State::Between => {
            Err(malformed(input.len(), "dangling input after last function".to_string()))
        }
        State::Name => Err(malformed(input.len(), format!("'{name}' is missing its '(...)'"))),
        State::Body => Err(malformed(input.len(), format!("'{name}(' is missing its ')'"))),
    }
}

fn malformed(position: usize, message: String) -> ParseError {
    ParseError::MalformedTransform(format!("{message} (byte {position})"))
}

/// Dispatch one function call to the family parsers in fixed order:
/// translate, scale, rotate, skew, matrix. `Ok(None)` marks a recognized 3D
/// function for the caller to skip or reject.
fn parse_function(call: &FunctionCall) -> Result<Option<Matrix>, ParseError> {
    if let Some(matrix) = parse_translate(call)? {
        return Ok(Some(matrix));
    }
    if let Some(matrix) = parse_scale(call)? {
        return Ok(Some(matrix));
    }
    if let Some(matrix) = parse_rotate(call)? {
        return Ok(Some(matrix));
    }
    if let Some(matrix) = parse_skew(call)? {
        return Ok(Some(matrix));
    }
    if let Some(matrix) = parse_matrix(call)? {
        return Ok(Some(matrix));
    }
    if THREE_D_FUNCTIONS.contains(&call.name.as_str()) {
        return Ok(None);
    }
    Err(ParseError::UnrecognizedFunction(call.name.clone()))
}

fn parse_translate(call: &FunctionCall) -> Result<Option<Matrix>, ParseError> {
    let (tx, ty) = match call.name.as_str() {
        "translate" => {
            let args = expect_args(call, 1, 2)?;
            let x = parse_length(&call.name, args[0])?;
            let y = match args.get(1) {
                Some(raw) => parse_length(&call.name, raw)?,
                None => 0.0,
            };
            (x, y)
        }
        "translatex" => (parse_length(&call.name, expect_args(call, 1, 1)?[0])?, 0.0),
        "translatey" => (0.0, parse_length(&call.name, expect_args(call, 1, 1)?[0])?),
        _ => return Ok(None),
    };
    Ok(Some(Matrix::translation(tx, ty)))
}

fn parse_scale(call: &FunctionCall) -> Result<Option<Matrix>, ParseError> {
    let (sx, sy) = match call.name.as_str() {
        "scale" => {
            let args = expect_args(call, 1, 2)?;
            let x = parse_number(&call.name, args[0])?;
            let y = match args.get(1) {
                Some(raw) => parse_number(&call.name, raw)?,
                None => x,
            };
            (x, y)
        }
        "scalex" => (parse_number(&call.name, expect_args(call, 1, 1)?[0])?, 1.0),
        "scaley" => (1.0, parse_number(&call.name, expect_args(call, 1, 1)?[0])?),
        _ => return Ok(None),
    };
    Ok(Some(Matrix::scaling(sx, sy)))
}

fn parse_rotate(call: &FunctionCall) -> Result<Option<Matrix>, ParseError> {
    if call.name != "rotate" {
        return Ok(None);
    }
    let args = expect_args(call, 1, 1)?;
    Ok(Some(Matrix::rotation(parse_angle(&call.name, args[0])?)))
}

fn parse_skew(call: &FunctionCall) -> Result<Option<Matrix>, ParseError> {
    let matrix = match call.name.as_str() {
        "skew" => {
            let args = expect_args(call, 1, 2)?;
            let ax = parse_angle(&call.name, args[0])?;
            let ay = match args.get(1) {
                Some(raw) => parse_angle(&call.name, raw)?,
                None => 0.0,
            };
            Matrix::skew(ax, ay)
        }
        "skewx" => Matrix::skew_x(parse_angle(&call.name, expect_args(call, 1, 1)?[0])?),
        "skewy" => Matrix::skew_y(parse_angle(&call.name, expect_args(call, 1, 1)?[0])?),
        _ => return Ok(None),
    };
    Ok(Some(matrix))
}

fn parse_matrix(call: &FunctionCall) -> Result<Option<Matrix>, ParseError> {
    if call.name != "matrix" {
        return Ok(None);
    }
    let args = expect_args(call, 6, 6)?;
    let mut coefficients = [0.0; 6];
    for (slot, raw) in coefficients.iter_mut().zip(args.iter()) {
        *slot = parse_number(&call.name, raw)?;
    }
    let [a, b, c, d, e, f] = coefficients;
    Ok(Some(Matrix::new(a, b, c, d, e, f)))
}

/// Split a function body on commas, trimming each argument.
fn expect_args<'a>(
    call: &'a FunctionCall,
    min: usize,
    max: usize,
) -> Result<Vec<&'a str>, ParseError> {
    let body = call.body.trim();
    let args: Vec<&str> = if body.is_empty() {
        Vec::new()
    } else {
        body.split(',').map(str::trim).collect()
    };

    if args.len() < min || args.len() > max {
        let expected = if min == max {
            format!("{min}")
        } else {
            format!("{min} to {max}")
        };
        return Err(ParseError::MalformedTransform(format!(
            "{}() takes {expected} argument(s), found {}",
            call.name,
            args.len()
        )));
    }
    Ok(args)
}

/// Split a raw argument into its numeric prefix and unit suffix.
fn split_unit(raw: &str) -> (&str, &str) {
    let number_len = raw
        .trim_end_matches(|ch: char| ch.is_ascii_alphabetic() || ch == '%')
        .len();
    raw.split_at(number_len)
}

/// Unitless number class: matrix coefficients and scale factors.
fn parse_number(function: &str, raw: &str) -> Result<f64, ParseError> {
    let (value, unit) = split_unit(raw);
    if !unit.is_empty() {
        return Err(ParseError::UnitMismatch {
            function: function.to_string(),
            message: format!("'{raw}' must be a unitless number"),
        });
    }
    parse_value(function, value, raw)
}

/// Length class: translate offsets, `px` only.
fn parse_length(function: &str, raw: &str) -> Result<f64, ParseError> {
    let (value, unit) = split_unit(raw);
    match unit {
        "px" => parse_value(function, value, raw),
        "" => Err(ParseError::UnitMismatch {
            function: function.to_string(),
            message: format!("length '{raw}' is missing its px unit"),
        }),
        other => Err(ParseError::UnitMismatch {
            function: function.to_string(),
            message: format!("unsupported length unit '{other}'"),
        }),
    }
}

/// Angle class: rotate and skew arguments, converted to radians.
fn parse_angle(function: &str, raw: &str) -> Result<f64, ParseError> {
    let (value, unit) = split_unit(raw);
    match unit {
        "deg" => Ok(parse_value(function, value, raw)?.to_radians()),
        "rad" => parse_value(function, value, raw),
        "grad" => Ok(parse_value(function, value, raw)? * (PI / 200.0)),
        "turn" => Ok(parse_value(function, value, raw)? * (2.0 * PI)),
        "" => Err(ParseError::UnitMismatch {
            function: function.to_string(),
            message: format!("angle '{raw}' is missing its unit"),
        }),
        other => Err(ParseError::UnitMismatch {
            function: function.to_string(),
            message: format!("unsupported angle unit '{other}'"),
        }),
    }
}

fn parse_value(function: &str, value: &str, raw: &str) -> Result<f64, ParseError> {
    value.trim().parse::<f64>().map_err(|_| {
        ParseError::MalformedTransform(format!("cannot parse '{raw}' in {function}()"))
    })
}
