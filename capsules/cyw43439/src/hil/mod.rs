// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Hardware interfaces the driver consumes.
//!
//! The board provides implementations of these traits for its pins, its
//! serial primitive and a free-running counter. All methods take `&self`;
//! implementations use interior mutability as peripheral drivers do.

pub mod gpio;
pub mod gspi;
pub mod time;
