//! Civiport E2E Regression Suite
//!
//! This crate drives the Civiport onboarding console end to end:
//! - Spawns a Node/Playwright driver subprocess and speaks a JSON-lines
//!   protocol to it over stdio
//! - Reads cases from a CSV sheet (`TC ID` / `Test Data` / `Expected
//!   Result`) and writes `Status` / `Remarks` back after every case
//! - Captures a failure screenshot before the browser state moves on
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Suite Runner (Rust)                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                  │
//! │    ├── ResultTable (CSV in, Status/Remarks out, _temp        │
//! │    │     fallback when the sheet is held open)               │
//! │    ├── workflows::run_case(tc_id) -> family dispatch         │
//! │    │     ├── AUTH    login, tabs, password toggle            │
//! │    │     ├── FPASS   forgot-password modal, OTP, passwords   │
//! │    │     ├── COUNTRY dashboard tabs + Add Country wizard     │
//! │    │     ├── GOV     governance uploads + role mapping       │
//! │    │     ├── PARTY   add/edit/view parties                   │
//! │    │     └── PERS    personnel wizard, edit, view            │
//! │    └── ArtifactStore (failure screenshots)                   │
//! ├──────────────────────────────────────────────────────────────┤
//! │  PlaywrightSession (Node subprocess, JSON lines over stdio)  │
//! │    goto / click / fill / press / wait / count / set_files /  │
//! │    eval / download / screenshot / ...                        │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod artifacts;
pub mod config;
pub mod data;
pub mod driver;
pub mod error;
pub mod locator;
pub mod otp;
pub mod pages;
pub mod resolve;
pub mod runner;
pub mod session;
pub mod workflows;

pub use config::{Browser, SuiteConfig};
pub use data::{ResultTable, TestData};
pub use error::{SuiteError, SuiteResult};
pub use locator::Locator;
pub use runner::{SuiteSummary, TestRunner};
pub use session::PlaywrightSession;
