/*
[INPUT]:  Parsed subcommands from main
[OUTPUT]: Account, init, check and drive command handlers
[POS]:    CLI layer
[UPDATE]: When adding a subcommand
*/

pub mod account;
pub mod drive;
pub mod init;
