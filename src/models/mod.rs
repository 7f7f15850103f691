// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Core data model: seat geometry and attendance state.

pub mod attendance;
pub mod seat;
