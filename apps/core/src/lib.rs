pub mod bus;
pub mod change_filter;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod observer;
pub mod reconstructor;
pub mod runtime;
pub mod trace;
