//! The `explain` command: describe an error code.

use extra_diagnostic::ErrorCode;

/// `E2001 (type error): …`, or `None` for an unknown code.
pub fn explain(code: &str) -> Option<String> {
    let code = ErrorCode::ALL
        .iter()
        .find(|known| known.as_str().eq_ignore_ascii_case(code))?;
    let phase = if code.is_parser_error() {
        "parse error"
    } else if code.is_type_error() {
        "type error"
    } else {
        "internal error"
    };
    Some(format!("{code} ({phase}): {}", code.description()))
}

pub fn explain_error(code: &str) {
    if let Some(text) = explain(code) {
        println!("{text}");
        return;
    }
    eprintln!("Unknown error code: {code}");
    eprintln!();
    eprintln!("Codes have the format EXXXX where X is a digit.");
    eprintln!("Examples: E1001, E2001");
    std::process::exit(1);
}
