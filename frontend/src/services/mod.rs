pub mod api;
pub mod charts;
pub mod date_utils;
pub mod download;
pub mod locales;
pub mod logging;
pub mod storage;
