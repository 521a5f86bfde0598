// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod config;
pub mod consultants;
pub mod doctor;
pub mod expenses;
pub mod exporter;
pub mod logs;
pub mod personnel;
pub mod reports;
pub mod transactions;
pub mod vendors;
