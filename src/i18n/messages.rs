//! Translated strings for the home page.

/// Home page message catalog for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    pub title: &'static str,
    pub description: &'static str,
    pub latest_posts: &'static str,
    pub user_information: &'static str,
    pub post_id: &'static str,
    pub render_time: &'static str,
    pub timestamp: &'static str,
    pub cache_hint: &'static str,
    pub language: &'static str,
    pub current: &'static str,
}

const EN: Messages = Messages {
    title: "Server-Side Rendering Demo",
    description: "The following data is fetched and rendered on the server, \
                  demonstrating server-side rendering with edge caching",
    latest_posts: "Latest Posts",
    user_information: "User Information",
    post_id: "Post ID",
    render_time: "Render Time",
    timestamp: "Timestamp",
    cache_hint: "If these timestamps stay the same across refreshes, the page cache is working",
    language: "Language",
    current: "Current",
};

const ZH: Messages = Messages {
    title: "服务器端渲染演示",
    description: "以下数据在服务器端获取并渲染，用于演示服务器端渲染与边缘缓存",
    latest_posts: "最新文章",
    user_information: "用户信息",
    post_id: "文章 ID",
    render_time: "渲染时间",
    timestamp: "时间戳",
    cache_hint: "如果这些时间戳在刷新页面时保持不变，说明页面缓存正在工作",
    language: "语言",
    current: "当前",
};

impl Messages {
    /// Catalog for `locale`, English for anything without a translation.
    pub fn for_locale(locale: &str) -> &'static Messages {
        match locale {
            "zh" => &ZH,
            _ => &EN,
        }
    }
}
