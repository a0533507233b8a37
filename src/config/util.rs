pub use {
    clap::{
        builder::styling::{AnsiColor, Effects, Styles},
        ArgAction, CommandFactory, Parser,
    },
    std::path::PathBuf,
};
