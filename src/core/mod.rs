pub mod bootstrap;
pub mod password;

pub use bootstrap::{plan, run_bootstrap, BootstrapAction};
