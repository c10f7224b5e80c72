#![no_std]

pub mod access;
pub mod constants;
pub mod errors;
pub mod events;
pub mod interfaces;
pub mod random;
pub mod types;
