#[macro_use]
extern crate rust_i18n;

pub mod calendar;
pub mod config;
pub mod cosmic;
pub mod error;
pub mod shutdown;
pub mod startup;
pub mod submission;
pub mod utils;
#[cfg(feature = "web-interface")]
pub mod web;

// Initialize i18n
i18n!("locales", fallback = "en");
