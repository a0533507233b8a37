// Performance lints
#![warn(variant_size_differences)]
#![warn(
    clippy::needless_pass_by_value,
    clippy::unnecessary_wraps,
    clippy::mutex_integer,
    clippy::mem_forget,
    clippy::maybe_infinite_iter
)]

pub mod board;
pub mod config;
pub mod console;
pub mod device;
pub mod flash;
pub mod interactive;
pub mod mdns;
pub mod run;
pub mod table;
