pub mod check;
pub mod create_env;
pub mod creds;
pub mod delete_env;
pub mod go_routines;
pub mod list_envs;
pub mod listen_ports;
pub mod proc_status;
pub mod route;
pub mod ssh_command;
