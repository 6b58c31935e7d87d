/// Builds the `reqwest` client used for every call to a dialect, with its user-agent and
/// request timeout set. Evaluates to a `Result<Client, reqwest::Error>`.
#[macro_export]
macro_rules! client {
    ($x:expr, $timeout:expr) => {{
        $crate::reqwest::Client::builder()
            .user_agent($x.user_agent())
            .timeout($timeout)
            .build()
    }};
}

/// Merges a tag list into the space separated form every dialect expects in `tags`.
#[macro_export]
macro_rules! join_tags {
    ($x:expr) => {{
        let tl = $x.join(" ");
        tl
    }};
}
