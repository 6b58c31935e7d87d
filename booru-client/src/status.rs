//! Human readable descriptions for the status codes imageboard APIs answer with.
//!
//! The table is only used to build error messages. A response is either one of
//! [`SUCCESS_CODES`] or a failure, whatever its description says.
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusInfo {
    pub name: &'static str,
    pub description: &'static str,
}

impl Display for StatusInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.name, self.description)
    }
}

/// Status codes accepted as a successful call.
pub const SUCCESS_CODES: [u16; 4] = [200, 201, 202, 204];

pub const UNDEFINED: StatusInfo = StatusInfo {
    name: "Undefined",
    description: "Undefined status code",
};

macro_rules! status {
    ($code:expr, $name:expr, $description:expr) => {
        (
            $code,
            StatusInfo {
                name: $name,
                description: $description,
            },
        )
    };
}

static STATUS_CODES: [(u16, StatusInfo); 17] = [
    status!(200, "OK", "Request was successful"),
    status!(201, "Created", "Request was successful, resource created"),
    status!(202, "Accepted", "Request was accepted for processing"),
    status!(204, "No Content", "Request was successful"),
    status!(400, "Bad Request", "The given parameters could not be parsed"),
    status!(401, "Unauthorized", "Authentication failed"),
    status!(403, "Forbidden", "Access denied"),
    status!(404, "Not Found", "Not found"),
    status!(420, "Invalid Record", "Record could not be saved"),
    status!(421, "User Throttled", "User is throttled, try again later"),
    status!(422, "Locked", "The resource is locked and cannot be modified"),
    status!(423, "Already Exists", "Resource already exists"),
    status!(424, "Invalid Parameters", "The given parameters were invalid"),
    status!(429, "Too Many Requests", "Rate limited, try again later"),
    status!(500, "Internal Server Error", "Some unknown error occurred on the server"),
    status!(502, "Bad Gateway", "A database timeout or a bug caused the server to fail"),
    status!(503, "Service Unavailable", "Server cannot currently handle the request"),
];

#[inline]
#[must_use]
pub fn lookup(code: u16) -> Option<StatusInfo> {
    STATUS_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, info)| *info)
}

/// Same as [`lookup`], falling back to [`UNDEFINED`] for codes outside of the table.
#[inline]
#[must_use]
pub fn describe(code: u16) -> StatusInfo {
    lookup(code).unwrap_or(UNDEFINED)
}

#[inline]
#[must_use]
pub const fn is_success(code: u16) -> bool {
    let mut i = 0;
    while i < SUCCESS_CODES.len() {
        if SUCCESS_CODES[i] == code {
            return true;
        }
        i += 1;
    }
    false
}
