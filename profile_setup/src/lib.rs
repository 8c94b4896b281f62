pub mod cli;
pub mod configuration;
pub mod domain;
pub mod personal_store;
pub mod ports;
pub mod repositories;
pub mod startup;
pub mod use_cases;
