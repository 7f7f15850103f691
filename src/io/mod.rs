// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for media, layout, and report files.

pub mod layout;
pub mod media;
pub mod serialization;
