// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod groups;
pub mod members;
pub mod expenses;
pub mod balances;
pub mod settle;
pub mod currencies;
pub mod exporter;
pub mod doctor;
