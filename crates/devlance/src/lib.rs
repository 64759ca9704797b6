//! Core library for the devlance freelance marketplace.
//!
//! Clients post jobs, developers bid on them with proposals, and clients
//! decide on proposals. The decision path is the interesting part: accepting
//! one proposal rejects every sibling proposal on the same job inside a
//! single storage transaction, so a job can never expose two accepted bids.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
