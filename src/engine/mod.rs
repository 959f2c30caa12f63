mod analytics_engine;

pub use analytics_engine::AnalyticsEngine;
