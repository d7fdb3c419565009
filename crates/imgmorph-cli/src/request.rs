use std::path::PathBuf;

use argh::{EarlyExit, FromArgs};
use imgmorph::imgproc::morphology::MorphOperation;

/// Exit code reported for a wrong number of arguments (the `-1` of a signed status).
pub const USAGE_EXIT_CODE: u8 = 255;

/// Half-size of the kernel used by the fixed variant.
pub const FIXED_KERNEL_SIZE: i32 = 1;

/// Shape code of the kernel used by the fixed variant (ellipse).
pub const FIXED_KERNEL_SHAPE: i32 = 2;

#[derive(FromArgs, Debug)]
/// Dilate or erode an image with a rectangle, cross or ellipse structuring element.
struct MorphologyArgs {
    /// kernel half-width in pixels: 1, 2, ...
    #[argh(positional)]
    size: String,

    /// kernel shape: rect = 0, cross = 1, ellipse = 2
    #[argh(positional)]
    shape: String,

    /// operation: dilate = 0, erode = 1
    #[argh(positional, arg_name = "type")]
    operation: String,

    /// path to the input image
    #[argh(positional)]
    input: PathBuf,

    /// path to the output image
    #[argh(positional)]
    output: PathBuf,
}

#[derive(FromArgs, Debug)]
/// Dilate an image with a 3x3 elliptical structuring element.
struct FixedArgs {
    /// path to the input image
    #[argh(positional)]
    input: PathBuf,

    /// path to the output image
    #[argh(positional)]
    output: PathBuf,
}

/// A fully parsed morphology invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorphologyRequest {
    /// Kernel half-width, the kernel side is `2 * size + 1`.
    pub size: i32,
    /// Raw shape code, validated when the kernel is built.
    pub shape: i32,
    /// The operation to apply.
    pub operation: MorphOperation,
    /// Image to read.
    pub input: PathBuf,
    /// Image to write.
    pub output: PathBuf,
}

/// The command line could not be turned into a request.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// The number of arguments is not the expected one.
    #[error("expected {expected} arguments, got {found}")]
    Arity {
        /// Number of arguments the command takes.
        expected: usize,
        /// Number of arguments given.
        found: usize,
        /// Usage text of the command.
        usage: String,
    },
}

impl UsageError {
    /// The usage text to show the user.
    pub fn usage(&self) -> &str {
        match self {
            UsageError::Arity { usage, .. } => usage,
        }
    }

    /// Exit code of the process for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            UsageError::Arity { .. } => USAGE_EXIT_CODE,
        }
    }
}

/// Parse an integer the way C `atoi` does.
///
/// Leading whitespace is skipped, an optional sign is accepted and the longest
/// run of digits is converted; anything after it is ignored. Text without a
/// leading number yields 0 and out-of-range values saturate.
///
/// # Examples
///
/// ```
/// use imgmorph_cli::parse_int_lenient;
///
/// assert_eq!(parse_int_lenient("3"), 3);
/// assert_eq!(parse_int_lenient("  -12px"), -12);
/// assert_eq!(parse_int_lenient("ellipse"), 0);
/// ```
pub fn parse_int_lenient(text: &str) -> i32 {
    let text = text.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut value: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + i64::from(digit - b'0')).min(i64::from(i32::MAX) + 1);
    }

    let value = if negative { -value } else { value };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Parse `T` from positional arguments, enforcing an exact count first.
///
/// Any other count is a usage error, even when it contains `--help` or `help`.
fn parse_positional<T: FromArgs>(
    command: &str,
    args: &[&str],
    expected: usize,
) -> Result<T, UsageError> {
    let usage = || match T::from_args(&[command], &["--help"]) {
        Err(EarlyExit { output, .. }) => output,
        Ok(_) => String::new(),
    };

    if args.len() != expected {
        return Err(UsageError::Arity {
            expected,
            found: args.len(),
            usage: usage(),
        });
    }

    // everything after `--` is positional, so values such as `-1` reach us verbatim
    let argv: Vec<&str> = std::iter::once("--").chain(args.iter().copied()).collect();
    T::from_args(&[command], &argv).map_err(|_| UsageError::Arity {
        expected,
        found: args.len(),
        usage: usage(),
    })
}

/// Parse the arguments of the parametric variant:
/// `<size> <shape> <type> <input> <output>`.
///
/// `size`, `shape` and `type` use [`parse_int_lenient`], so malformed numbers
/// become 0 instead of failing. A `type` of 0 selects dilation, anything else
/// erosion. The shape code is kept raw and validated when the kernel is built.
///
/// # Errors
///
/// Returns [`UsageError`] unless exactly five arguments are given.
pub fn parse_request(command: &str, args: &[&str]) -> Result<MorphologyRequest, UsageError> {
    let parsed: MorphologyArgs = parse_positional(command, args, 5)?;

    Ok(MorphologyRequest {
        size: parse_int_lenient(&parsed.size),
        shape: parse_int_lenient(&parsed.shape),
        operation: MorphOperation::from(parse_int_lenient(&parsed.operation)),
        input: parsed.input,
        output: parsed.output,
    })
}

/// Parse the arguments of the fixed variant: `<input> <output>`.
///
/// The request always dilates with a 3x3 ellipse.
///
/// # Errors
///
/// Returns [`UsageError`] unless exactly two arguments are given.
pub fn parse_fixed_request(command: &str, args: &[&str]) -> Result<MorphologyRequest, UsageError> {
    let parsed: FixedArgs = parse_positional(command, args, 2)?;

    Ok(MorphologyRequest {
        size: FIXED_KERNEL_SIZE,
        shape: FIXED_KERNEL_SHAPE,
        operation: MorphOperation::Dilate,
        input: parsed.input,
        output: parsed.output,
    })
}
