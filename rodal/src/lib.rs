#![warn(clippy::pedantic)]
#![warn(clippy::style)]
#![warn(clippy::nursery)]
// Just let me cast in peace
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod action;
pub mod agent;
pub mod discretize;
pub mod env;
pub mod growth;
pub mod site;
pub mod space;
pub mod transition;
