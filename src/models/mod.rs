mod api;

pub use api::{
    CacheDemoInstructions, CacheDemoQuery, CacheDemoResponse, CacheInfo, CacheStatus,
    CacheStatusResponse, MiddlewareEchoResponse, MiddlewareSeen, MiddlewareTestInfo,
    MiddlewareTestResponse, PingResponse, TestCacheQuery, TestCacheResponse,
};
