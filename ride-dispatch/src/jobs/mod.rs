// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

pub mod booking;
pub mod booking_result;

#[cfg(test)]
mod tests;
