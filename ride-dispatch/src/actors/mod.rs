// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

//! Trip actors. Drivers and passengers share an [`ActorProfile`] and add
//! their role-specific behaviour on top of it.

pub mod driver;
pub mod passenger;
pub mod profile;

pub use driver::Driver;
pub use passenger::Passenger;
pub use profile::ActorProfile;

#[cfg(test)]
mod tests;
