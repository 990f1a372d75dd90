/// Display code shown for any wire code missing from the table.
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Wire code to application display code.
const DISPLAY_CODES: &[(&str, &str)] = &[
    ("BAD_REQUEST", "VALIDATION_ERROR"),
    ("PARSE_ERROR", "INVALID_REQUEST"),
    ("METHOD_NOT_SUPPORTED", "INVALID_REQUEST"),
    ("NOT_FOUND", "RESOURCE_NOT_FOUND"),
    ("CONFLICT", "RESOURCE_CONFLICT"),
    ("INTERNAL_SERVER_ERROR", "SERVER_ERROR"),
    ("UNAUTHORIZED", "AUTHENTICATION_REQUIRED"),
    ("FORBIDDEN", "ACCESS_DENIED"),
    ("TIMEOUT", "REQUEST_TIMEOUT"),
    ("TOO_MANY_REQUESTS", "RATE_LIMITED"),
];

/// The code a client shows for a wire error code.
pub fn display_code(wire_code: &str) -> &'static str {
    DISPLAY_CODES
        .iter()
        .find(|(wire, _)| *wire == wire_code)
        .map(|(_, display)| *display)
        .unwrap_or(UNKNOWN_ERROR)
}
