mod cli;
mod watch;

pub(crate) use cli::{as_cli, print_usage};
