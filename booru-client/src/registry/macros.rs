#[macro_export]
macro_rules! site_config {
    ($name:expr, $dialect:expr, $base_url:expr, $auth_template:expr, $format:expr) => {
        $crate::registry::SiteConfig {
            name: String::from($name),
            dialect: $dialect,
            base_url: String::from($base_url),
            auth_template: $auth_template,
            format: $format,
        }
    };
    ($name:expr, $dialect:expr, $base_url:expr) => {
        $crate::site_config!(
            $name,
            $dialect,
            $base_url,
            None,
            $dialect.default_format()
        )
    };
}
