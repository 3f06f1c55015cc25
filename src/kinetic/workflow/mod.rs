// SPDX-License-Identifier: MIT

pub mod branch;
pub mod condition;
