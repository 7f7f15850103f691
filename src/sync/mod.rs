// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Synchronization with the remote seat authority.

pub mod channel;
pub mod derive;
pub mod protocol;
