mod api;
mod pages;
mod util;

pub use api::{cache_demo, cache_status, middleware_echo, middleware_test, ping, test_cache};
pub use pages::{
    cache_dashboard, locale_cache_dashboard, locale_home, middleware_dashboard, root_home,
};
