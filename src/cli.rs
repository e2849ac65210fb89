use clap::{Parser, Subcommand};
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(name = "wellknown")]
#[command(about = "RFC 5785 well-known URI responder", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Server(ServerArgs),
    /// Validate a Content-Type value the way the settings form does
    CheckType(CheckTypeArgs),
    /// Print the stored entries in match order
    List,
}

#[derive(clap::Args, Debug)]
pub struct ServerArgs {
    /// Address to bind the HTTP server to (defaults to server.bind_addr)
    #[arg(long)]
    pub address: Option<SocketAddr>,
}

#[derive(clap::Args, Debug)]
pub struct CheckTypeArgs {
    /// Raw Content-Type, e.g. "application/json; charset=utf-8"
    pub value: String,
}
