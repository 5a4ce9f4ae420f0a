// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |          propagate / refresh / repo
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  TOML, env, preferences   |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!            propagate     refresh    sync
//!           plan, lease   classify  fetch/pull
//!                 |           |        |
//!                 +-----------+--------+
//!                             v
//!   +-----------------------------------------+
//!   |  git   repo, inventory, history         |
//!   |        gix (read) / git CLI (write)     |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, report    |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod propagate;
pub mod refresh;
pub mod report;
pub mod sync;
