/// Unit tests for the streak engine and analytics, through the public API
mod streak_properties;
mod analytics_queries;
